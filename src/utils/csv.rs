use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::models::expense::Expense;

const HEADER: [&str; 4] = ["Date", "Category", "Amount", "Memo"];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: String,
    category: &'a str,
    amount: String,
    memo: &'a str,
}

pub fn export_csv<'a, P, I>(path: P, expenses: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Expense>,
{
    // Header goes out even when there are no rows to export.
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(HEADER)?;

    let mut written = 0;
    for expense in expenses {
        writer.serialize(ExportRow {
            date: expense.date.format("%Y-%m-%d").to_string(),
            category: &expense.category,
            amount: expense.amount.normalize().to_string(),
            memo: &expense.memo,
        })?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}
