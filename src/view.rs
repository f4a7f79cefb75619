//! Values derived from the store on every render. Nothing here is cached.

use rust_decimal::Decimal;

use crate::models::{category::CategoryFilter, expense::Expense};

/// Distinct categories in order of first appearance.
pub fn category_options(expenses: &[Expense]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for expense in expenses {
        if !options.iter().any(|c| c == &expense.category) {
            options.push(expense.category.clone());
        }
    }
    options
}

pub fn filter_expenses<'a>(expenses: &'a [Expense], filter: &CategoryFilter) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|e| filter.matches(&e.category))
        .collect()
}

/// Sum of the amounts, or `None` if it leaves the `Decimal` range.
pub fn total<'a, I>(expenses: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, e| sum.checked_add(e.amount))
}

pub fn format_total(total: Option<Decimal>) -> String {
    match total {
        Some(total) => format_amount(total),
        None => "overflow".to_string(),
    }
}

/// Formats an amount with `,` thousands grouping, keeping the fractional
/// part as-is (`1234567.5` -> `1,234,567.5`).
pub fn format_amount(amount: Decimal) -> String {
    let raw = amount.normalize().to_string();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
