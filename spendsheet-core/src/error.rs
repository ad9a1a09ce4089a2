//! Error types shared by the ingest and finance crates.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors.
///
/// A transaction that matches no merchant or category rule is not an error;
/// it keeps its default cleaned name and lands in `Category::Other`.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing required argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An expected column is absent from an export header.
    #[error("invalid input: column '{column}' not found in {source_name}")]
    MissingColumn {
        column: String,
        source_name: String,
    },

    /// The export could not be read as CSV.
    #[error("invalid input: CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Opaque failure reported by a publisher; never retried.
    #[error(transparent)]
    Publish(anyhow::Error),
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True for every flavour of caller-side input error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::MissingColumn { .. } | Error::Csv(_)
        )
    }
}
