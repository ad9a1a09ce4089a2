//! Date utilities: the canonical `MM/DD/YYYY` display format.

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Canonical display format used at every stage boundary.
pub const DISPLAY_FORMAT: &str = "%m/%d/%Y";

/// Export formats accepted by the adapters, tried in order.
const EXPORT_FORMATS: &[&str] = &[DISPLAY_FORMAT, "%Y-%m-%d"];

/// Parse a date in the canonical display format, e.g. "03/07/2024".
pub fn parse_display_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DISPLAY_FORMAT)
        .map_err(|e| Error::invalid_input(format!("invalid date '{s}': {e}")))
}

/// Format a date in the canonical display format.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Parse a date as it appears in a raw export (display form or ISO `YYYY-MM-DD`).
pub fn parse_export_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    EXPORT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| Error::invalid_input(format!("unrecognized date '{s}'")))
}

/// Serde adapter so records serialize their date as `MM/DD/YYYY`.
pub mod display_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_display_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_display_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        for s in ["01/05/2024", "12/31/1999", "02/29/2024"] {
            let d = parse_display_date(s).unwrap();
            assert_eq!(format_display_date(d), s);
        }
    }

    #[test]
    fn test_export_date_accepts_iso() {
        let d = parse_export_date("2024-03-07").unwrap();
        assert_eq!(format_display_date(d), "03/07/2024");
    }

    #[test]
    fn test_invalid_dates_rejected() {
        assert!(parse_display_date("2024-03-07").is_err());
        assert!(parse_display_date("02/30/2024").is_err());
        let err = parse_export_date("yesterday").unwrap_err();
        assert!(err.is_invalid_input());
    }
}
