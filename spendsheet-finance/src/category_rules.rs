//! Deterministic category rules mapping cleaned merchant names to categories.
//!
//! Credits are always income. Debits are looked up by exact name; anything
//! not in the table is `Other`, which is an expected outcome, not an error.

use std::collections::HashMap;
use std::sync::LazyLock;

use spendsheet_core::{CategorizedRecord, Category, Error, Kind, RawRecord, Result};
use tracing::debug;

/// Cleaned name → category. Names must match the adapters' output exactly.
pub const CATEGORY_RULES: &[(&str, Category)] = &[
    ("ROVER", Category::Pet),
    ("RX PLUS PHARMACY", Category::Medical),
    ("GROOMER", Category::Pet),
    ("WAGTOPIA", Category::Pet),
    ("COSTCO", Category::Food),
    ("KING SOOPERS", Category::Food),
    ("RENTERS INSURANCE", Category::Housing),
    ("RENT", Category::Housing),
    ("CAR INSURANCE", Category::Housing),
    ("VET", Category::Pet),
    ("COSTCO GAS", Category::Car),
    ("SAFEWAY", Category::Food),
    ("CRUNCHYROLL", Category::Subscriptions),
    ("CAR PAYMENT", Category::Car),
    ("AMAZON PRIME", Category::Subscriptions),
    ("SHELL OIL", Category::Car),
    ("SPOTIFY", Category::Subscriptions),
    ("XFINITY MOBILE", Category::Utilities),
    ("HEADWAY", Category::Medical),
    ("XCEL ENERGY", Category::Utilities),
    ("HULU", Category::Subscriptions),
    ("SPOT PET INSURANCE", Category::Pet),
    ("DENVER HEALTH", Category::Medical),
    ("ADVENTHEALTH", Category::Medical),
    ("SWEDISH", Category::Medical),
];

static CATEGORY_TABLE: LazyLock<HashMap<&'static str, Category>> =
    LazyLock::new(|| CATEGORY_RULES.iter().copied().collect());

/// Category of a debit with this cleaned name.
pub fn category_for(name: &str) -> Category {
    CATEGORY_TABLE.get(name).copied().unwrap_or(Category::Other)
}

/// Categorize a single record.
pub fn categorize_record(record: RawRecord) -> CategorizedRecord {
    let category = match record.kind {
        Kind::Credit => Category::Income,
        Kind::Debit => category_for(&record.name),
    };
    if category == Category::Other {
        debug!(name = %record.name, "no category rule, using OTHER");
    }
    record.with_category(category)
}

/// Categorize merged adapter output, keeping input order.
///
/// An empty input means every upstream adapter produced nothing, which is
/// reported instead of publishing empty sheets.
pub fn categorize(records: Vec<RawRecord>) -> Result<Vec<CategorizedRecord>> {
    if records.is_empty() {
        return Err(Error::invalid_input("no records to categorize"));
    }
    Ok(records.into_iter().map(categorize_record).collect())
}
