//! Membership credit card export.
//!
//! Same Debit/Credit layout as the brokerage export, but descriptions are not
//! padded and the full name is cleaned:
//!   Date,Description,Debit,Credit,Status,Member Name
//!   03/09/2024,COSTCO GAS #0677,41.07,,Posted,J DOE

use spendsheet_core::{Error, RawRecord, Result, parse_export_date};
use tracing::debug;

use crate::SourceAdapter;
use crate::name_rules::{CARD_RULES, CleaningContext};
use crate::parsers::{DebitCreditColumns, IngestSettings, debit_or_credit};
use crate::types::{RowTable, Source, field};

/// Card bill payment made from another account.
pub const PAYMENT_SENTINEL: &str = "ONLINE PAYMENT, THANK YOU";

pub struct MembershipCardAdapter {
    settings: IngestSettings,
}

impl MembershipCardAdapter {
    pub fn new(settings: IngestSettings) -> Self {
        Self { settings }
    }
}

impl SourceAdapter for MembershipCardAdapter {
    fn source(&self) -> Source {
        Source::MembershipCard
    }

    fn adapt_table(&self, table: &RowTable) -> Result<Vec<RawRecord>> {
        let date_idx = table.column("Date")?;
        let name_idx = table.column("Description")?;
        let columns = DebitCreditColumns::resolve(table)?;

        let mut out = Vec::with_capacity(table.len());
        for (line, row) in table.rows() {
            let name = field(row, name_idx);
            if name == PAYMENT_SENTINEL {
                debug!(line, "dropping card payment row");
                continue;
            }

            let (kind, amount) = debit_or_credit(row, &columns, line)?;
            let date = parse_export_date(field(row, date_idx))?;

            let ctx = CleaningContext {
                amount,
                insurance_threshold: self.settings.insurance_threshold,
            };
            let cleaned = CARD_RULES.clean(name, &ctx).ok_or_else(|| {
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

    const HEADER: &str = "Date,Description,Debit,Credit,Status,Member Name\n";

    fn adapt(csv: &str) -> Vec<RawRecord> {
        let table = RowTable::from_reader("card.csv", csv.as_bytes()).unwrap();
        MembershipCardAdapter::new(IngestSettings::default())
            .adapt_table(&table)
            .unwrap()
    }

    #[test]
    fn test_full_name_is_cleaned_without_truncation() {
        let txns = adapt(&format!(
            "{HEADER}03/09/2024,EUROPEAN WAX CENTER LITTLETON CO 0412,65.00,,Posted,J DOE\n"
        ));
        assert_eq!(txns[0].name, "EUROPEAN WAX CENTER");
        assert_eq!(txns[0].kind, Kind::Debit);
    }

    #[test]
    fn test_gas_station_stays_distinct() {
        let txns = adapt(&format!("{HEADER}03/09/2024,COSTCO GAS #0677,41.07,,Posted,J DOE\n"));
        assert_eq!(txns[0].name, "COSTCO GAS");
        assert_eq!(txns[0].amount, dec!(41.07));
    }

    #[test]
    fn test_payment_row_dropped() {
        let txns = adapt(&format!(
            "{HEADER}\
             03/10/2024,\"ONLINE PAYMENT, THANK YOU\",,812.44,Posted,J DOE\n\
             03/11/2024,SQ *A CLIP ABOVE,55.00,,Posted,J DOE\n"
        ));
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].name, "GROOMER");
    }

    #[test]
    fn test_refund_is_credit() {
        let txns = adapt(&format!("{HEADER}03/12/2024,AMZN Mktp US*2K4,,19.99,Posted,J DOE\n"));
        assert_eq!(txns[0].kind, Kind::Credit);
        assert_eq!(txns[0].amount, dec!(-19.99));
        assert_eq!(txns[0].name, "AMAZON");
    }
}
