//! Publishing categorized records, one sheet per category.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use spendsheet_core::{CategorizedRecord, Category, Error, Result, date::display_format};
use tracing::info;

/// Column header written above every sheet.
pub const SHEET_HEADER: [&str; 3] = ["Date", "Name", "Amount"];

/// A published row: Kind and Category are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishRow {
    #[serde(rename = "Date", with = "display_format")]
    pub date: NaiveDate,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
}

impl PublishRow {
    pub fn cells(&self) -> [String; 3] {
        [
            spendsheet_core::format_display_date(self.date),
            self.name.clone(),
            self.amount.to_string(),
        ]
    }
}

impl From<&CategorizedRecord> for PublishRow {
    fn from(c: &CategorizedRecord) -> Self {
        Self {
            date: c.record.date,
            name: c.record.name.clone(),
            amount: c.record.amount,
        }
    }
}

/// Cells a sheet with `rows` data rows occupies, header included.
pub fn cell_count(rows: usize) -> usize {
    SHEET_HEADER.len() * (rows + 1)
}

/// A sink for one sheet at a time.
///
/// `destination` names the workbook, directory or stream; `sheet` names the
/// tab within it. Returns the number of cells written. Failures are reported
/// as-is and never retried by the caller.
pub trait Publisher {
    fn publish(&mut self, sheet: &str, destination: &str, rows: &[PublishRow]) -> anyhow::Result<usize>;
}

/// Cells written per sheet.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishSummary {
    pub sheets: BTreeMap<Category, usize>,
}

impl PublishSummary {
    pub fn total_cells(&self) -> usize {
        self.sheets.values().sum()
    }
}

/// Publish every category, in enumeration order, to its own sheet.
///
/// Categories without records still publish a header-only sheet so a
/// previous run's rows do not linger. The first failure stops the loop.
pub fn publish_by_category(
    publisher: &mut dyn Publisher,
    destination: &str,
    records: &[CategorizedRecord],
) -> Result<PublishSummary> {
    let mut summary = PublishSummary::default();
    for category in Category::ALL {
        let rows: Vec<PublishRow> = records
            .iter()
            .filter(|c| c.category == category)
            .map(PublishRow::from)
            .collect();
        let sheet = category.sheet_name();
        let cells = publisher
            .publish(&sheet, destination, &rows)
            .with_context(|| format!("publishing sheet {sheet} to {destination}"))
            .map_err(Error::Publish)?;
        info!(sheet = %sheet, rows = rows.len(), cells, "published");
        summary.sheets.insert(category, cells);
    }
    Ok(summary)
}

/// Writes `<destination>/<Sheet>.csv` per sheet.
#[derive(Debug, Default)]
pub struct CsvDirPublisher {
    written: Vec<PathBuf>,
}

impl CsvDirPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files written so far, in publish order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Publisher for CsvDirPublisher {
    fn publish(&mut self, sheet: &str, destination: &str, rows: &[PublishRow]) -> anyhow::Result<usize> {
        fs::create_dir_all(destination).with_context(|| format!("creating {destination}"))?;
        let path = PathBuf::from(destination).join(format!("{sheet}.csv"));

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        writer.write_record(SHEET_HEADER)?;
        for row in rows {
            writer.write_record(row.cells())?;
        }
        writer.flush()?;

        self.written.push(path);
        Ok(cell_count(rows.len()))
    }
}
