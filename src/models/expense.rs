use chrono::NaiveDate;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::view::format_amount;

/// One logged spending entry, as persisted under the `expenses` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub category: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(default)]
    pub memo: String,
}

/// Values collected by the input form. `None` means the field was left
/// empty or could not be read as a date/number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub date: Option<NaiveDate>,
    pub category: String,
    pub amount: Option<Decimal>,
    pub memo: String,
}

impl ExpenseDraft {
    /// Builds the record for `id`, or `None` when the date, the category or
    /// the amount is missing.
    pub fn to_expense(&self, id: i64) -> Option<Expense> {
        if self.category.is_empty() {
            return None;
        }
        Some(Expense {
            id,
            date: self.date?,
            category: self.category.clone(),
            amount: self.amount?,
            memo: self.memo.clone(),
        })
    }
}

impl Expense {
    pub fn to_list_item(&self, currency_suffix: &str) -> ListItem {
        let amount_style = if self.amount < Decimal::ZERO {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };

        ListItem::new(Line::from(vec![
            Span::raw(format!("{:<10} ", self.date.format("%Y-%m-%d"))),
            Span::raw(format!("{:<16} ", self.category)),
            Span::styled(
                format!("{:>12} ", format!("{}{}", format_amount(self.amount), currency_suffix)),
                amount_style,
            ),
            Span::raw(self.memo.as_str()),
        ]))
    }
}
