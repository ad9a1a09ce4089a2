//! spendsheet-finance: category rules, chronological sort, merge pipeline and publishing

pub mod category_rules;
pub mod chronology;
pub mod pipeline;
pub mod publish;

pub use category_rules::{categorize, categorize_record, category_for};
pub use chronology::{sort_by_date, sort_serialized};
pub use pipeline::{PipelineOutput, SourceFailure, SourceInput, run_pipeline};
pub use publish::{CsvDirPublisher, PublishRow, PublishSummary, Publisher, cell_count, publish_by_category};
