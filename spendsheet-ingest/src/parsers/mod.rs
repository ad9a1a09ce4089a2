//! Per-institution export adapters.

pub mod bank;
pub mod brokerage;
pub mod membership_card;

use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendsheet_core::{Error, Kind, Result};

use crate::name_rules::DEFAULT_INSURANCE_THRESHOLD;
use crate::types::{RowTable, field, parse_amount};

pub use bank::BankAdapter;
pub use brokerage::BrokerageAdapter;
pub use membership_card::MembershipCardAdapter;

/// Tunables shared by all adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSettings {
    /// Bank insurer payments below this are renters insurance, otherwise car.
    #[serde(default = "default_threshold")]
    pub insurance_threshold: Decimal,
}

fn default_threshold() -> Decimal {
    DEFAULT_INSURANCE_THRESHOLD
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            insurance_threshold: DEFAULT_INSURANCE_THRESHOLD,
        }
    }
}

/// Column indices for exports that split amounts into Debit/Credit.
pub(crate) struct DebitCreditColumns {
    debit: usize,
    credit: usize,
}

impl DebitCreditColumns {
    pub(crate) fn resolve(table: &RowTable) -> Result<Self> {
        Ok(Self {
            debit: table.column("Debit")?,
            credit: table.column("Credit")?,
        })
    }
}

/// DEBIT when the Debit cell is filled (amount as-is), otherwise CREDIT with
/// the Credit value negated.
pub(crate) fn debit_or_credit(
    row: &StringRecord,
    columns: &DebitCreditColumns,
    line: usize,
) -> Result<(Kind, Decimal)> {
    if let Some(debit) = parse_amount(field(row, columns.debit))? {
        return Ok((Kind::Debit, debit));
    }
    match parse_amount(field(row, columns.credit))? {
        Some(credit) => Ok((Kind::Credit, -credit)),
        None => Err(Error::invalid_input(format!(
            "line {line}: neither Debit nor Credit is set"
        ))),
    }
}
