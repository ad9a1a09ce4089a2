//! Brokerage cash-management export.
//!
//! Expected header (Status and Member Name are ignored):
//!   Date,Description,Debit,Credit,Status,Member Name
//!   2024-03-02,COSTCO WHSE #1234,12.50,,Cleared,J DOE
//!
//! Descriptions are space-padded by the exporter, so only the first 22
//! characters are meaningful.

use spendsheet_core::{Error, RawRecord, Result, parse_export_date};
use tracing::debug;

use crate::SourceAdapter;
use crate::name_rules::{BROKERAGE_RULES, CleaningContext};
use crate::parsers::{DebitCreditColumns, IngestSettings, debit_or_credit};
use crate::types::{RowTable, Source, field};

/// Significant width of the Description column.
pub const NAME_WIDTH: usize = 22;

/// Self-payment rows, compared after truncation to [`NAME_WIDTH`].
pub const PAYMENT_SENTINELS: &[&str] = &["INTERNET PAYMENT THANK YOU", "ONLINE PAYMENT, THANK YOU"];

pub struct BrokerageAdapter {
    settings: IngestSettings,
}

impl BrokerageAdapter {
    pub fn new(settings: IngestSettings) -> Self {
        Self { settings }
    }
}

pub fn truncate_name(name: &str) -> &str {
    match name.char_indices().nth(NAME_WIDTH) {
        Some((byte_idx, _)) => &name[..byte_idx],
        None => name,
    }
}

fn is_payment_sentinel(truncated: &str) -> bool {
    PAYMENT_SENTINELS
        .iter()
        .any(|s| truncate_name(s) == truncated)
}

impl SourceAdapter for BrokerageAdapter {
    fn source(&self) -> Source {
        Source::Brokerage
    }

    fn adapt_table(&self, table: &RowTable) -> Result<Vec<RawRecord>> {
        let date_idx = table.column("Date")?;
        let name_idx = table.column("Description")?;
        let columns = DebitCreditColumns::resolve(table)?;

        let mut out = Vec::new();
        for (line, row) in table.rows() {
            let name = truncate_name(field(row, name_idx));
            if is_payment_sentinel(name) {
                debug!(line, name, "dropping self-payment row");
                continue;
            }

            let (kind, amount) = debit_or_credit(row, &columns, line)?;
            let date = parse_export_date(field(row, date_idx))?;

            let ctx = CleaningContext {
                amount,
                insurance_threshold: self.settings.insurance_threshold,
            };
            let cleaned = BROKERAGE_RULES.clean(name, &ctx).ok_or_else(|| {
                Error::invalid_input(format!("{}:{line}: empty description", table.source_name()))
            })?;

            out.push(RawRecord::new(date, kind, cleaned, amount));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spendsheet_core::Kind;

    fn adapt(csv: &str) -> Result<Vec<RawRecord>> {
        let table = RowTable::from_reader("brokerage.csv", csv.as_bytes())?;
        BrokerageAdapter::new(IngestSettings::default()).adapt_table(&table)
    }

    const HEADER: &str = "Date,Description,Debit,Credit,Status,Member Name\n";

    #[test]
    fn test_debit_row() {
        let txns = adapt(&format!("{HEADER}2024-03-02,COSTCO WHSE #1234,12.50,,x,y\n")).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].kind, Kind::Debit);
        assert_eq!(txns[0].amount, dec!(12.50));
        assert_eq!(txns[0].name, "COSTCO");
        assert_eq!(txns[0].fields()[0], "03/02/2024");
    }

    #[test]
    fn test_credit_row_is_negated() {
        let txns = adapt(&format!("{HEADER}03/04/2024,REFUND SHOP,,40.00,x,y\n")).unwrap();
        assert_eq!(txns[0].kind, Kind::Credit);
        assert_eq!(txns[0].amount, dec!(-40.00));
        assert_eq!(txns[0].name, "REFUND SHOP");
    }

    #[test]
    fn test_payment_sentinels_dropped() {
        let csv = format!(
            "{HEADER}\
             2024-03-05,\"ONLINE PAYMENT, THANK YOU...\",,500.00,x,y\n\
             2024-03-06,INTERNET PAYMENT THANK YOU 0042,,300.00,x,y\n\
             2024-03-07,SAFEWAY #1557,30.10,,x,y\n"
        );
        let txns = adapt(&csv).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].name, "SAFEWAY");
    }

    #[test]
    fn test_truncates_to_22_chars() {
        assert_eq!(truncate_name("ABCDEFGHIJKLMNOPQRSTUVWXYZ"), "ABCDEFGHIJKLMNOPQRSTUV");
        assert_eq!(truncate_name("SHORT"), "SHORT");

        let txns = adapt(&format!("{HEADER}2024-03-02,KING SOOPERS GROCERY STORE 88,55.00,,x,y\n")).unwrap();
        assert_eq!(txns[0].name, "KING SOOPERS GROCERY S");
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let err = adapt("Date,Description,Debit\n2024-03-02,X,1.00\n").unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("Credit"));
    }

    #[test]
    fn test_row_without_amount_is_invalid() {
        let err = adapt(&format!("{HEADER}2024-03-02,MYSTERY,,,x,y\n")).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
