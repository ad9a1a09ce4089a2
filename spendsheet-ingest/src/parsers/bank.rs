//! Digital bank (checking) export.
//!
//! Expected header (Current balance and Status are ignored):
//!   Date,Description,Type,Amount,Current balance,Status
//!   2024-03-01,EMPLOYER INC,Direct Deposit,2500.00,3120.55,Posted
//!
//! Amounts are signed by the bank; records keep only the magnitude and carry
//! direction in `Kind`.

use spendsheet_core::{Error, Kind, RawRecord, Result, parse_export_date};
use tracing::debug;

use crate::SourceAdapter;
use crate::name_rules::{BANK_RULES, CleaningContext};
use crate::parsers::IngestSettings;
use crate::types::{RowTable, Source, field, parse_amount};

/// Sweeps to accounts that are ingested on their own.
pub const PASS_THROUGH_DESCRIPTIONS: &[&str] =
    &["CARDMEMBER SERV", "FID BKG SVC LLC", "CITI CARD ONLINE"];

/// Balance movements between own accounts.
pub const TRANSFER_TYPES: &[&str] = &["Deposit", "Withdrawal"];

const DIRECT_DEPOSIT: &str = "Direct Deposit";
const INTEREST_EARNED: &str = "INTEREST EARNED";

pub struct BankAdapter {
    settings: IngestSettings,
}

impl BankAdapter {
    pub fn new(settings: IngestSettings) -> Self {
        Self { settings }
    }
}

/// Only payroll and interest count as credits; every other type is a debit.
pub fn kind_for_type(tx_type: &str) -> Kind {
    if tx_type == DIRECT_DEPOSIT || tx_type.to_uppercase() == INTEREST_EARNED {
        Kind::Credit
    } else {
        Kind::Debit
    }
}

impl SourceAdapter for BankAdapter {
    fn source(&self) -> Source {
        Source::Bank
    }

    fn adapt_table(&self, table: &RowTable) -> Result<Vec<RawRecord>> {
        let date_idx = table.column("Date")?;
        let desc_idx = table.column("Description")?;
        let type_idx = table.column("Type")?;
        let amount_idx = table.column("Amount")?;

        let mut out = Vec::with_capacity(table.len());
        for (line, row) in table.rows() {
            let description = field(row, desc_idx);
            let tx_type = field(row, type_idx);

            if PASS_THROUGH_DESCRIPTIONS.contains(&description) {
                debug!(line, description, "dropping pass-through sweep");
                continue;
            }
            if TRANSFER_TYPES.contains(&tx_type) {
                debug!(line, tx_type, "dropping transfer");
                continue;
            }

            let amount = parse_amount(field(row, amount_idx))?
                .ok_or_else(|| Error::invalid_input(format!("line {line}: Amount is empty")))?
                .abs();
            let date = parse_export_date(field(row, date_idx))?;

            let ctx = CleaningContext {
                amount,
                insurance_threshold: self.settings.insurance_threshold,
            };
            let name = BANK_RULES
                .clean(&description.to_uppercase(), &ctx)
                .ok_or_else(|| {
                    Error::invalid_input(format!(
                        "{}:{line}: empty description",
                        table.source_name()
                    ))
                })?;

            out.push(RawRecord::new(date, kind_for_type(tx_type), name, amount));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Date,Description,Type,Amount,Current balance,Status\n";

    fn adapt_with(csv: &str, settings: IngestSettings) -> Vec<RawRecord> {
        let table = RowTable::from_reader("bank.csv", csv.as_bytes()).unwrap();
        BankAdapter::new(settings).adapt_table(&table).unwrap()
    }

    fn adapt(csv: &str) -> Vec<RawRecord> {
        adapt_with(csv, IngestSettings::default())
    }

    #[test]
    fn test_direct_deposit_is_credit_magnitude() {
        let txns = adapt(&format!("{HEADER}2024-03-01,EMPLOYER INC,Direct Deposit,-2500.00,0,Posted\n"));
        assert_eq!(txns[0].kind, Kind::Credit);
        assert_eq!(txns[0].amount, dec!(2500.00));
        assert_eq!(txns[0].name, "EMPLOYER INC");
        assert_eq!(txns[0].fields()[0], "03/01/2024");
    }

    #[test]
    fn test_kind_override() {
        assert_eq!(kind_for_type("Direct Deposit"), Kind::Credit);
        assert_eq!(kind_for_type("Interest Earned"), Kind::Credit);
        assert_eq!(kind_for_type("interest earned"), Kind::Credit);
        assert_eq!(kind_for_type("direct deposit"), Kind::Debit);
        assert_eq!(kind_for_type("Debit Card"), Kind::Debit);
        assert_eq!(kind_for_type("ACH Credit"), Kind::Debit);
    }

    #[test]
    fn test_insurance_threshold() {
        let csv = format!(
            "{HEADER}\
             2024-03-03,LIBERTY MUTUAL 123,ACH,-18.00,0,Posted\n\
             2024-03-04,LIBERTY MUTUAL 123,ACH,-95.00,0,Posted\n"
        );
        let txns = adapt(&csv);
        assert_eq!(txns[0].name, "RENTERS INSURANCE");
        assert_eq!(txns[1].name, "CAR INSURANCE");

        let raised = IngestSettings {
            insurance_threshold: dec!(100.00),
        };
        let txns = adapt_with(&csv, raised);
        assert_eq!(txns[1].name, "RENTERS INSURANCE");
    }

    #[test]
    fn test_sweeps_and_transfers_dropped() {
        let csv = format!(
            "{HEADER}\
             2024-03-05,CARDMEMBER SERV,ACH,-700.00,0,Posted\n\
             2024-03-05,FID BKG SVC LLC,ACH,-300.00,0,Posted\n\
             2024-03-05,CITI CARD ONLINE,ACH,-120.00,0,Posted\n\
             2024-03-06,From Savings,Deposit,200.00,0,Posted\n\
             2024-03-06,To Savings,Withdrawal,-200.00,0,Posted\n\
             2024-03-07,Xcel Energy,ACH,-61.20,0,Posted\n"
        );
        let txns = adapt(&csv);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].name, "XCEL ENERGY");
        assert_eq!(txns[0].kind, Kind::Debit);
    }

    #[test]
    fn test_interest_row() {
        let txns = adapt(&format!("{HEADER}2024-03-31,Interest Earned,Interest Earned,1.37,0,Posted\n"));
        assert_eq!(txns[0].kind, Kind::Credit);
        assert_eq!(txns[0].name, "INTEREST");
    }

    #[test]
    fn test_unknown_merchant_upper_cased() {
        let txns = adapt(&format!("{HEADER}2024-03-08,Joe's Corner Store,Debit Card,-7.25,0,Posted\n"));
        assert_eq!(txns[0].name, "JOE'S CORNER STORE");
        assert_eq!(txns[0].amount, dec!(7.25));
    }
}
