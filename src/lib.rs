//! Toggl Report Utility Library
//!
//! This library extracts billable-hours summaries from time-tracking PDF
//! exports, folds consecutive reports of the same month together, and writes
//! the result as a `;`-separated CSV file.

pub mod error;
pub mod helpers;
pub mod logger;
pub mod models;
pub mod service;

pub use error::ReportError;
pub use service::{BatchOutcome, ReportConfig, ReportService};

// Re-export key types for convenience
pub use helpers::duration::parse_duration;
pub use helpers::export::{to_csv, CsvRow};
pub use helpers::pdf::{PdfTextSource, TextSource};
pub use helpers::period::{parse_period, PeriodLayout, PeriodParseError, PERIOD_LAYOUTS};
pub use models::aggregate::{fold, AggregateRecord, Aggregator};
pub use models::report::{Duration, ReportPeriod, ReportRecord};
