use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendsheet_core::{Error, Result};

/// Institution an export comes from.
///
/// Declaration order is the merge order: brokerage, then card, then bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "brokerage")]
    Brokerage,
    #[serde(rename = "card")]
    MembershipCard,
    #[serde(rename = "bank")]
    Bank,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Brokerage, Source::MembershipCard, Source::Bank];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Source::Brokerage => "Brokerage cash management",
            Source::MembershipCard => "Membership credit card",
            Source::Bank => "Digital bank",
        }
    }

    /// Short code used on the command line and in logs
    pub fn code(&self) -> &'static str {
        match self {
            Source::Brokerage => "brokerage",
            Source::MembershipCard => "card",
            Source::Bank => "bank",
        }
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Source::ALL
            .into_iter()
            .find(|src| src.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_input(format!("unknown source '{s}'")))
    }
}

/// Guess the source from an export's filename.
pub fn detect_source(path: &Path) -> Result<Source> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    if filename.contains("fidelity") || filename.contains("brokerage") {
        return Ok(Source::Brokerage);
    }
    if filename.contains("costco") || filename.contains("card") {
        return Ok(Source::MembershipCard);
    }
    if filename.contains("sofi") || filename.contains("bank") || filename.contains("checking") {
        return Ok(Source::Bank);
    }

    Err(Error::invalid_input(format!(
        "could not detect source from filename: {}",
        path.display()
    )))
}

/// Reject paths that do not name an existing `.csv` file.
pub fn validate_export_path(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(Error::invalid_input(format!(
            "{} is not a .csv file",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(Error::invalid_input(format!(
            "{} does not exist",
            path.display()
        )));
    }
    Ok(())
}

/// Field-named rows read from one export.
#[derive(Debug, Clone)]
pub struct RowTable {
    source_name: String,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl RowTable {
    /// Read a CSV export, validating the path first.
    pub fn from_path(path: &Path) -> Result<Self> {
        validate_export_path(path)?;
        let file = File::open(path)
            .map_err(|e| Error::invalid_input(format!("opening {}: {e}", path.display())))?;
        Self::from_reader(path.display().to_string(), file)
    }

    pub fn from_reader<R: Read>(source_name: impl Into<String>, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut headers = rdr.headers()?.clone();
        headers.trim();
        let rows = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            source_name: source_name.into(),
            headers,
            rows,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Index of a named column; fails fast when it is absent.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
                source_name: self.source_name.clone(),
            })
    }

    /// Rows with their 1-based line number in the file (header is line 1).
    pub fn rows(&self) -> impl Iterator<Item = (usize, &StringRecord)> {
        self.rows.iter().enumerate().map(|(i, r)| (i + 2, r))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trimmed field value; short rows read as empty.
pub fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

/// Parse an export amount. Empty cells are `None`.
///
/// Accepts `$` and thousands separators, and `(12.50)` for negatives.
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }

    let (negative, s) = match s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();

    let amount = Decimal::from_str(cleaned.trim())
        .map_err(|e| Error::invalid_input(format!("invalid amount '{raw}': {e}")))?;
    Ok(Some(if negative { -amount } else { amount }))
}
