//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use budgetsync_core::budget::{Budget, BudgetEntry, Category, EntryType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rusqlite::types::Type;
use rusqlite::Row;

/// Convert a SQLite row to a Budget.
///
/// Expected columns: id, name, amount, date
pub fn row_to_budget(row: &Row) -> rusqlite::Result<Budget> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let amount: String = row.get(2)?;
    let date: String = row.get(3)?;

    Ok(Budget {
        id,
        amount: parse_decimal(2, &amount)?,
        name,
        total_expenses: Decimal::ZERO,
        date: parse_date(3, &date)?,
    })
}

/// Convert a SQLite row to a BudgetEntry.
///
/// Expected columns: id, budget_id, amount, description, type, category, date, invoice
pub fn row_to_entry(row: &Row) -> rusqlite::Result<BudgetEntry> {
    let id: i64 = row.get(0)?;
    let budget_id: i64 = row.get(1)?;
    let amount: String = row.get(2)?;
    let description: String = row.get(3)?;
    let entry_type: String = row.get(4)?;
    let category: String = row.get(5)?;
    let date: String = row.get(6)?;
    let invoice: Option<String> = row.get(7)?;

    Ok(BudgetEntry {
        id,
        budget_id,
        amount,
        description,
        entry_type: parse_entry_type(4, &entry_type)?,
        category: parse_category(5, &category)?,
        date: parse_date(6, &date)?,
        invoice,
        is_selected: false,
    })
}

/// Format a date as `YYYY-MM-DD` for storage.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn invalid_value(column: usize, message: String) -> rusqlite::Error {
    conversion_error(column, std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

fn parse_date(column: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| conversion_error(column, e))
}

fn parse_decimal(column: usize, s: &str) -> rusqlite::Result<Decimal> {
    s.parse::<Decimal>().map_err(|e| conversion_error(column, e))
}

fn parse_entry_type(column: usize, s: &str) -> rusqlite::Result<EntryType> {
    EntryType::parse(s).ok_or_else(|| invalid_value(column, format!("unknown entry type: {s}")))
}

fn parse_category(column: usize, s: &str) -> rusqlite::Result<Category> {
    Category::parse(s).ok_or_else(|| invalid_value(column, format!("unknown category: {s}")))
}
