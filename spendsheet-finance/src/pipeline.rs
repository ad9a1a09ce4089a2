//! Merge pipeline: adapt every export, concatenate in source order,
//! categorize and sort.

use std::fmt;
use std::path::PathBuf;

use spendsheet_core::{CategorizedRecord, Error, RawRecord, Result};
use spendsheet_ingest::{IngestSettings, Source, adapter_for};
use tracing::{info, warn};

use crate::category_rules::categorize;
use crate::chronology::sort_by_date;

/// One export file to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    pub source: Source,
    pub path: PathBuf,
}

impl SourceInput {
    pub fn new(source: Source, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            path: path.into(),
        }
    }
}

/// An adapter that failed; its rows are absent from the output.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: Source,
    pub path: PathBuf,
    pub error: Error,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.source.name(), self.path.display(), self.error)
    }
}

/// Categorized, date-sorted records plus any sources that failed.
#[derive(Debug)]
pub struct PipelineOutput {
    pub records: Vec<CategorizedRecord>,
    pub failures: Vec<SourceFailure>,
}

impl PipelineOutput {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fail when any source was skipped.
    pub fn ensure_complete(self) -> Result<Vec<CategorizedRecord>> {
        if self.failures.is_empty() {
            return Ok(self.records);
        }
        let summary = self
            .failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(Error::invalid_input(format!(
            "{} source(s) failed: {summary}",
            self.failures.len()
        )))
    }
}

/// Run every input through its adapter, then categorize and sort.
///
/// Inputs are processed in `Source` order regardless of how they were passed,
/// which fixes the tie-break for same-day records. A failing adapter is
/// recorded and skipped. If nothing at all was produced the run fails.
pub fn run_pipeline(mut inputs: Vec<SourceInput>, settings: &IngestSettings) -> Result<PipelineOutput> {
    inputs.sort_by_key(|input| input.source);

    let mut merged: Vec<RawRecord> = Vec::new();
    let mut failures = Vec::new();
    for input in inputs {
        let adapter = adapter_for(input.source, *settings);
        match adapter.adapt(&input.path) {
            Ok(records) => merged.extend(records),
            Err(error) => {
                warn!(
                    source = input.source.code(),
                    path = %input.path.display(),
                    %error,
                    "source skipped"
                );
                failures.push(SourceFailure {
                    source: input.source,
                    path: input.path,
                    error,
                });
            }
        }
    }

    let records = sort_by_date(categorize(merged)?);
    info!(records = records.len(), failed_sources = failures.len(), "pipeline finished");
    Ok(PipelineOutput { records, failures })
}
