//! spendsheet-core: canonical transaction records, display dates and the error taxonomy

pub mod date;
pub mod error;
pub mod record;

pub use date::{DISPLAY_FORMAT, format_display_date, parse_display_date, parse_export_date};
pub use error::{Error, Result};
pub use record::{CategorizedRecord, Category, Kind, RawRecord};
