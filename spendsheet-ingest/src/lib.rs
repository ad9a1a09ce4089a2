//! spendsheet-ingest: export row sources, merchant name rules and per-institution adapters.

pub mod name_rules;
pub mod parsers;
pub mod types;

use std::path::Path;

use spendsheet_core::{RawRecord, Result};
use tracing::info;

pub use name_rules::{BANK_RULES, BROKERAGE_RULES, CARD_RULES, CleaningContext, NameRules};
pub use parsers::{BankAdapter, BrokerageAdapter, IngestSettings, MembershipCardAdapter};
pub use types::{RowTable, Source, detect_source, validate_export_path};

/// Turns one institution's export into canonical records.
///
/// Adapters are pure functions of the export content; adding an institution
/// means adding an implementation, not touching the merge stages.
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    /// Adapt rows that have already been read.
    fn adapt_table(&self, table: &RowTable) -> Result<Vec<RawRecord>>;

    /// Read and adapt an export file.
    fn adapt(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let table = RowTable::from_path(path)?;
        let records = self.adapt_table(&table)?;
        info!(
            source = self.source().code(),
            path = %path.display(),
            rows = table.len(),
            records = records.len(),
            "adapted export"
        );
        Ok(records)
    }
}

/// Adapter for a source.
pub fn adapter_for(source: Source, settings: IngestSettings) -> Box<dyn SourceAdapter> {
    match source {
        Source::Brokerage => Box::new(BrokerageAdapter::new(settings)),
        Source::MembershipCard => Box::new(MembershipCardAdapter::new(settings)),
        Source::Bank => Box::new(BankAdapter::new(settings)),
    }
}
