use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::{
    error::ReportError,
    helpers::{
        duration::parse_duration,
        export,
        fs::{collect_documents, Traversal},
        pdf::TextSource,
        period::{parse_period, PeriodParseError},
    },
    models::{
        aggregate::{AggregateRecord, Aggregator, Folded},
        report::ReportRecord,
    },
};

pub const DEFAULT_OUTPUT: &str = "Toggle Reports.csv";

/// Configuration for the report service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Fold consecutive reports that start in the same month into one row
    pub combine_by_month: bool,
    /// Where `export_csv` writes
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            combine_by_month: true,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        info!("Loading configuration from {}", path.display());

        let contents = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|e| {
            error!("Invalid configuration in {}: {}", path.display(), e);
            ReportError::Config {
                message: format!("{}: {}", path.display(), e),
            }
        })
    }
}

/// Result of one batch run: how many documents made it in and what went wrong
/// with the others, in the order it happened.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub processed: usize,
    pub errors: Vec<ReportError>,
}

/// Drives a batch of report documents through parsing and aggregation and
/// keeps the latest batch's aggregates for export.
pub struct ReportService<S: TextSource> {
    source: S,
    config: ReportConfig,
    aggregates: Vec<AggregateRecord>,
}

impl<S: TextSource> ReportService<S> {
    pub fn new(source: S, config: ReportConfig) -> Self {
        info!(
            "Creating ReportService (combine by month: {})",
            config.combine_by_month
        );
        Self {
            source,
            config,
            aggregates: Vec::new(),
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Aggregates of the most recent batch.
    pub fn aggregates(&self) -> &[AggregateRecord] {
        &self.aggregates
    }

    /// Process files and directories as one batch, replacing the previous one.
    pub fn process_inputs<P: AsRef<Path>>(&mut self, inputs: &[P]) -> BatchOutcome {
        self.process_traversal(collect_documents(inputs))
    }

    /// Process the documents of a finished walk; a listing failure is reported
    /// after the per-document errors.
    pub fn process_traversal(&mut self, traversal: Traversal) -> BatchOutcome {
        let mut outcome = self.process_documents(&traversal.documents);

        if let Some(e) = traversal.error {
            outcome.errors.push(e);
        }

        outcome
    }

    /// Process documents in order as one batch, replacing the previous one.
    pub fn process_documents<P: AsRef<Path>>(&mut self, documents: &[P]) -> BatchOutcome {
        info!("Processing batch of {} document(s)", documents.len());

        let mut aggregator = Aggregator::new(self.config.combine_by_month);
        let mut outcome = BatchOutcome::default();

        for path in documents {
            match self.parse_report(path.as_ref()) {
                Ok(record) => {
                    match aggregator.push(record) {
                        Folded::Seeded(index) => info!("Report added as row #{}", index + 1),
                        Folded::Merged(index) => info!("Report combined into row #{}", index + 1),
                    }
                    outcome.processed += 1;
                }
                Err(e) => {
                    warn!("Skipping document: {}", e);
                    outcome.errors.push(e);
                }
            }
        }

        self.aggregates = aggregator.into_aggregates();
        info!(
            "Batch done: {} report(s) in {} row(s), {} error(s)",
            outcome.processed,
            self.aggregates.len(),
            outcome.errors.len()
        );

        outcome
    }

    /// Extract and parse a single document.
    pub fn parse_report(&self, path: &Path) -> Result<ReportRecord, ReportError> {
        info!("Processing report at {}", path.display());
        let contents = self.source.extract_text(path)?;
        parse_report_text(path, &contents)
    }

    pub fn to_csv(&self) -> Result<String, ReportError> {
        if self.aggregates.is_empty() {
            return Err(ReportError::NothingToExport);
        }
        export::to_csv(&self.aggregates)
    }

    /// Write the current batch to `path`, or to the configured output.
    pub fn export_csv(&self, path: Option<&Path>) -> Result<PathBuf, ReportError> {
        if self.aggregates.is_empty() {
            error!("Nothing to export, no reports were processed");
            return Err(ReportError::NothingToExport);
        }

        let path = path.unwrap_or(self.config.output.as_path());
        export::save_csv(path, &self.aggregates)?;
        Ok(path.to_path_buf())
    }
}

/// Build a record from a document's text. Both the period and the total hours
/// must be found; nothing partial is returned.
pub fn parse_report_text(path: &Path, text: &str) -> Result<ReportRecord, ReportError> {
    let period = parse_period(text);
    let duration = parse_duration(text);

    let period = match period {
        Ok(period) => period,
        Err(PeriodParseError::NotFound) => {
            return Err(ReportError::PeriodNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            warn!("{} in {}", e, path.display());
            return Err(ReportError::PeriodNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    let Some(duration) = duration else {
        return Err(ReportError::DurationNotFound {
            path: path.to_path_buf(),
        });
    };

    let record = ReportRecord::new(period, duration);
    info!("Parsed report: {}", record);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{Duration, ReportPeriod};
    use chrono::NaiveDate;

    #[test]
    fn parse_report_text_builds_record() {
        let record = parse_report_text(
            Path::new("a.pdf"),
            "Summary report 2015-11-01 - 2015-11-30 Total 12 h 30 min",
        )
        .unwrap();
        assert_eq!(
            record,
            ReportRecord::new(
                ReportPeriod::new(
                    NaiveDate::from_ymd_opt(2015, 11, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2015, 11, 30).unwrap()
                ),
                Duration::new(12, 30, 0)
            )
        );
    }

    #[test]
    fn missing_period_wins_over_missing_hours() {
        let err = parse_report_text(Path::new("a.pdf"), "nothing here").unwrap_err();
        assert!(matches!(err, ReportError::PeriodNotFound { .. }));
    }

    #[test]
    fn invalid_dates_are_reported_as_missing_period() {
        let err = parse_report_text(
            Path::new("a.pdf"),
            "2015-02-30 - 2015-03-01 TOTAL HOURS: 1:00:00",
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::PeriodNotFound { .. }));
    }

    #[test]
    fn missing_hours_names_the_document() {
        let err = parse_report_text(Path::new("/r/jan.pdf"), "2015-11-01 - 2015-11-30")
            .unwrap_err();
        assert_eq!(err.to_string(), "unable to parse hours in /r/jan.pdf");
    }

    #[test]
    fn out_of_range_hours_are_reported_as_missing_hours() {
        let err = parse_report_text(
            Path::new("/r/huge.pdf"),
            "2015-11-01 - 2015-11-30 TOTAL HOURS: 18446744073709551615:59:59",
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::DurationNotFound { .. }));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.toml");
        fs::write(&path, "combine_by_month = false\n").unwrap();

        let config = ReportConfig::from_file(&path).unwrap();
        assert!(!config.combine_by_month);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn bad_config_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.toml");
        fs::write(&path, "combine_by_month = \"sometimes\"\n").unwrap();

        assert!(matches!(
            ReportConfig::from_file(&path),
            Err(ReportError::Config { .. })
        ));
    }
}
