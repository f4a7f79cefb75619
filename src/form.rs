use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::expense::ExpenseDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Category,
    Amount,
    Memo,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Date,
        FormField::Category,
        FormField::Amount,
        FormField::Memo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Date => "Date",
            FormField::Category => "Category",
            FormField::Amount => "Amount",
            FormField::Memo => "Memo",
        }
    }

    pub fn next(self) -> FormField {
        match self {
            FormField::Date => FormField::Category,
            FormField::Category => FormField::Amount,
            FormField::Amount => FormField::Memo,
            FormField::Memo => FormField::Date,
        }
    }

    pub fn previous(self) -> FormField {
        match self {
            FormField::Date => FormField::Memo,
            FormField::Category => FormField::Date,
            FormField::Amount => FormField::Category,
            FormField::Memo => FormField::Amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Editing,
}

/// Raw text of the four input fields. Only committed expenses are persisted;
/// whatever sits here is lost on exit.
#[derive(Debug, Clone)]
pub struct ExpenseForm {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub memo: String,
    pub focus: FormField,
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self {
            date: String::new(),
            category: String::new(),
            amount: String::new(),
            memo: String::new(),
            focus: FormField::Date,
        }
    }
}

impl ExpenseForm {
    pub fn state(&self) -> FormState {
        if self.date.is_empty()
            && self.category.is_empty()
            && self.amount.is_empty()
            && self.memo.is_empty()
        {
            FormState::Idle
        } else {
            FormState::Editing
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Category => &self.category,
            FormField::Amount => &self.amount,
            FormField::Memo => &self.memo,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Date => &mut self.date,
            FormField::Category => &mut self.category,
            FormField::Amount => &mut self.amount,
            FormField::Memo => &mut self.memo,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn fill_today(&mut self) {
        self.date = Local::now().date_naive().format("%Y-%m-%d").to_string();
    }

    /// Replaces the category text with the option after the current one,
    /// wrapping around. Free text that matches no option jumps to the first.
    pub fn cycle_category(&mut self, options: &[String]) {
        if options.is_empty() {
            return;
        }
        let next = match options.iter().position(|c| c == &self.category) {
            Some(i) => (i + 1) % options.len(),
            None => 0,
        };
        self.category = options[next].clone();
    }

    pub fn draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            date: NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok(),
            category: self.category.trim().to_string(),
            amount: parse_amount(&self.amount),
            memo: self.memo.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim().replace(',', "");
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text).ok()
}
