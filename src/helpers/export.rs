use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

use crate::error::ReportError;
use crate::models::aggregate::AggregateRecord;
use crate::models::report::ReportRecord;

pub const SEPARATOR: u8 = b';';
pub const HEADER: [&str; 3] = ["Period", "Total Hours", "Decimal Hours"];

/// Anything that can be written as one CSV row.
pub trait CsvRow {
    fn period_start_string(&self) -> String;
    fn period_end_string(&self) -> String;
    fn total_hours_string(&self) -> String;
    fn total_decimal_hours(&self) -> f64;
}

impl CsvRow for ReportRecord {
    fn period_start_string(&self) -> String {
        ReportRecord::period_start_string(self)
    }

    fn period_end_string(&self) -> String {
        ReportRecord::period_end_string(self)
    }

    fn total_hours_string(&self) -> String {
        ReportRecord::total_hours_string(self)
    }

    fn total_decimal_hours(&self) -> f64 {
        ReportRecord::total_decimal_hours(self)
    }
}

impl CsvRow for AggregateRecord {
    fn period_start_string(&self) -> String {
        self.record().period_start_string()
    }

    fn period_end_string(&self) -> String {
        self.record().period_end_string()
    }

    fn total_hours_string(&self) -> String {
        self.record().total_hours_string()
    }

    fn total_decimal_hours(&self) -> f64 {
        self.record().total_decimal_hours()
    }
}

/// Shortest representation that parses back to the same value, always with a
/// fractional part (`8.0`, `2.5`).
pub fn format_decimal_hours(hours: f64) -> String {
    format!("{:?}", hours)
}

/// `Period;Total Hours;Decimal Hours` followed by the blank separator line.
pub fn header_block() -> String {
    let separator = char::from(SEPARATOR).to_string();
    format!("{}\n\n", HEADER.join(separator.as_str()))
}

/// Writes the header, a blank line, then one `;`-separated row per entry.
/// Fields are never quoted.
pub fn write_csv<W: Write, R: CsvRow>(mut writer: W, rows: &[R]) -> Result<W, ReportError> {
    writer
        .write_all(header_block().as_bytes())
        .map_err(csv::Error::from)?;

    let mut wtr = WriterBuilder::new()
        .delimiter(SEPARATOR)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(writer);

    for row in rows {
        wtr.write_record([
            format!("{} - {}", row.period_start_string(), row.period_end_string()),
            row.total_hours_string(),
            format_decimal_hours(row.total_decimal_hours()),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| ReportError::Csv(csv::Error::from(e.into_error())))
}

pub fn to_csv<R: CsvRow>(rows: &[R]) -> Result<String, ReportError> {
    let buffer = write_csv(Vec::new(), rows)?;
    String::from_utf8(buffer).map_err(|e| {
        ReportError::Csv(csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })
}

pub fn save_csv<R: CsvRow>(path: &Path, rows: &[R]) -> Result<(), ReportError> {
    info!("Writing {} row(s) to {}", rows.len(), path.display());

    let file = File::create(path).map_err(|source| {
        error!("Failed to create {}: {}", path.display(), source);
        ReportError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut file = write_csv(file, rows)?;
    file.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved CSV to {}", path.display());
    Ok(())
}

/// One aggregate as shown to a reader: what the hours chart used to plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub period_start: String,
    pub period_end: String,
    pub total_hours: String,
    pub decimal_hours: f64,
    pub reports: usize,
}

impl From<&AggregateRecord> for AggregateSummary {
    fn from(aggregate: &AggregateRecord) -> Self {
        let record = aggregate.record();
        Self {
            period_start: record.period_start_string(),
            period_end: record.period_end_string(),
            total_hours: record.total_hours_string(),
            decimal_hours: record.total_decimal_hours(),
            reports: aggregate.constituents().len(),
        }
    }
}

pub fn summaries(aggregates: &[AggregateRecord]) -> Vec<AggregateSummary> {
    aggregates.iter().map(AggregateSummary::from).collect()
}

pub fn render_summary(aggregates: &[AggregateRecord]) -> String {
    summaries(aggregates)
        .iter()
        .map(|s| {
            format!(
                "{} - {}  {:>10}  ({} report{})\n",
                s.period_start,
                s.period_end,
                s.total_hours,
                s.reports,
                if s.reports == 1 { "" } else { "s" }
            )
        })
        .collect()
}

pub fn to_json(aggregates: &[AggregateRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&summaries(aggregates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::aggregate::fold;
    use crate::models::report::{Duration, ReportPeriod};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(start: (i32, u32, u32), end: (i32, u32, u32), d: Duration) -> ReportRecord {
        ReportRecord::new(
            ReportPeriod::new(
                NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
                NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            ),
            d,
        )
    }

    fn two_records() -> Vec<ReportRecord> {
        vec![
            record((2023, 1, 1), (2023, 1, 15), Duration::new(2, 30, 0)),
            record((2023, 2, 1), (2023, 2, 28), Duration::new(8, 0, 0)),
        ]
    }

    #[test]
    fn csv_body_is_byte_exact() {
        let csv = to_csv(&two_records()).unwrap();
        assert_eq!(
            csv,
            "Period;Total Hours;Decimal Hours\n\
             \n\
             2023-01-01 - 2023-01-15;2:30:00;2.5\n\
             2023-02-01 - 2023-02-28;8:00:00;8.0\n"
        );
    }

    #[test]
    fn csv_is_stable_across_runs() {
        let records = two_records();
        assert_eq!(to_csv(&records).unwrap(), to_csv(&records).unwrap());
    }

    #[test]
    fn empty_input_writes_only_header_block() {
        let rows: Vec<ReportRecord> = Vec::new();
        assert_eq!(to_csv(&rows).unwrap(), "Period;Total Hours;Decimal Hours\n\n");
    }

    #[test]
    fn undefined_fields_use_sentinels() {
        let rows = vec![ReportRecord::from_parts(None, None)];
        assert_eq!(
            to_csv(&rows).unwrap(),
            "Period;Total Hours;Decimal Hours\n\n\
             Start date undefined - End date undefined;Undefined;0.0\n"
        );
    }

    #[test]
    fn aggregates_serialize_with_seed_period_and_summed_hours() {
        let aggregates = fold(vec![
            record((2023, 1, 5), (2023, 1, 19), Duration::new(1, 15, 0)),
            record((2023, 1, 20), (2023, 1, 31), Duration::new(0, 45, 30)),
        ]);
        assert_eq!(
            to_csv(&aggregates).unwrap(),
            "Period;Total Hours;Decimal Hours\n\n\
             2023-01-05 - 2023-01-19;2:00:30;2.0083333333333333\n"
        );
    }

    #[test]
    fn header_block_is_written_before_rows() {
        assert_eq!(header_block(), "Period;Total Hours;Decimal Hours\n\n");

        let buffer = write_csv(Vec::new(), &two_records()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines[0], "Period;Total Hours;Decimal Hours");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "2023-01-01 - 2023-01-15;2:30:00;2.5");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn decimal_hours_format() {
        assert_eq!(format_decimal_hours(2.5), "2.5");
        assert_eq!(format_decimal_hours(8.0), "8.0");
        assert_eq!(format_decimal_hours(0.25), "0.25");
    }

    #[test]
    fn saves_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Toggle Reports.csv");
        save_csv(&path, &two_records()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            to_csv(&two_records()).unwrap()
        );
    }

    #[test]
    fn summary_lists_each_aggregate() {
        let aggregates = fold(vec![
            record((2023, 1, 5), (2023, 1, 19), Duration::new(1, 0, 0)),
            record((2023, 1, 20), (2023, 1, 31), Duration::new(1, 0, 0)),
            record((2023, 2, 1), (2023, 2, 28), Duration::new(3, 0, 0)),
        ]);
        assert_eq!(
            render_summary(&aggregates),
            "2023-01-05 - 2023-01-19     2:00:00  (2 reports)\n\
             2023-02-01 - 2023-02-28     3:00:00  (1 report)\n"
        );

        let json: serde_json::Value =
            serde_json::from_str(&to_json(&aggregates).unwrap()).unwrap();
        assert_eq!(json[0]["reports"], 2);
        assert_eq!(json[1]["decimal_hours"], 3.0);
    }
}
