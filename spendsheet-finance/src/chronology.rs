//! Chronological normalizer.
//!
//! Records keep their date as a `NaiveDate`, so the sort is a stable sort on
//! that key and re-serialization happens when fields are rendered. For rows
//! that arrive already serialized, `sort_serialized` parses, sorts and
//! re-renders the date column in the display format.

use chrono::NaiveDate;
use spendsheet_core::{CategorizedRecord, Result, format_display_date, parse_display_date};

/// Stable ascending sort by date. Same-day records keep their input order.
pub fn sort_by_date(mut records: Vec<CategorizedRecord>) -> Vec<CategorizedRecord> {
    records.sort_by_key(CategorizedRecord::date);
    records
}

/// Sort serialized `[Date, Transaction, Name, Amount, Category]` rows.
///
/// Every date must be in `MM/DD/YYYY` form; the first one that is not fails
/// the whole call and nothing is reordered. Only the date column is rewritten.
pub fn sort_serialized(rows: Vec<[String; 5]>) -> Result<Vec<[String; 5]>> {
    let mut keyed: Vec<(NaiveDate, [String; 5])> = rows
        .into_iter()
        .map(|row| Ok((parse_display_date(&row[0])?, row)))
        .collect::<Result<_>>()?;
    keyed.sort_by_key(|(date, _)| *date);
    Ok(keyed
        .into_iter()
        .map(|(date, mut row)| {
            row[0] = format_display_date(date);
            row
        })
        .collect())
}
