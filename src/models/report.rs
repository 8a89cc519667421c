use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Date layout used whenever a period boundary is rendered.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const START_DATE_UNDEFINED: &str = "Start date undefined";
pub const END_DATE_UNDEFINED: &str = "End date undefined";
pub const DURATION_UNDEFINED: &str = "Undefined";

/// Calendar date range covered by a single time-tracking export.
///
/// Dates are UTC calendar days without a time-of-day component. The parser
/// does not enforce `start <= end`, so a reversed period is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Calendar (year, month) of the start date.
    pub fn year_month(&self) -> (i32, u32) {
        (self.start.year(), self.start.month())
    }

    /// True when both periods start in the same calendar year and month.
    pub fn same_month_as(&self, other: &ReportPeriod) -> bool {
        self.year_month() == other.year_month()
    }

    /// True when start and end fall in the same calendar month.
    pub fn covers_single_month(&self) -> bool {
        self.start.year() == self.end.year() && self.start.month() == self.end.month()
    }

    /// Number of days covered, counting both ends. Zero or negative for a
    /// reversed period.
    pub fn days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }

    pub fn start_string(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_string(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Elapsed billable time as hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Duration {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Normalizes a seconds count into hours, minutes (< 60) and seconds (< 60).
    pub fn from_total_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }

    /// `None` when the seconds count does not fit in a `u64`.
    pub fn checked_total_seconds(&self) -> Option<u64> {
        self.hours
            .checked_mul(3600)?
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.seconds)
    }

    /// Saturates at `u64::MAX`.
    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    pub fn decimal_hours(&self) -> f64 {
        self.total_seconds() as f64 / 3600.0
    }
}

/// Positional `H:MM:SS`, hours unbounded.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalized = Self::from_total_seconds(self.total_seconds());
        write!(
            f,
            "{}:{:02}:{:02}",
            normalized.hours, normalized.minutes, normalized.seconds
        )
    }
}

/// One processed export: its period and its total billable duration.
///
/// Either part may be absent; absence is only turned into display text by the
/// string accessors below.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    period: Option<ReportPeriod>,
    duration: Option<Duration>,
}

impl ReportRecord {
    pub fn new(period: ReportPeriod, duration: Duration) -> Self {
        Self {
            period: Some(period),
            duration: Some(duration),
        }
    }

    pub fn from_parts(period: Option<ReportPeriod>, duration: Option<Duration>) -> Self {
        Self { period, duration }
    }

    pub fn period(&self) -> Option<&ReportPeriod> {
        self.period.as_ref()
    }

    pub fn duration(&self) -> Option<&Duration> {
        self.duration.as_ref()
    }

    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = Some(duration);
    }

    pub fn total_seconds(&self) -> u64 {
        self.duration.map(|d| d.total_seconds()).unwrap_or(0)
    }

    pub fn total_decimal_hours(&self) -> f64 {
        self.total_seconds() as f64 / 3600.0
    }

    pub fn period_start_string(&self) -> String {
        self.period
            .map(|p| p.start_string())
            .unwrap_or_else(|| START_DATE_UNDEFINED.to_string())
    }

    pub fn period_end_string(&self) -> String {
        self.period
            .map(|p| p.end_string())
            .unwrap_or_else(|| END_DATE_UNDEFINED.to_string())
    }

    pub fn total_hours_string(&self) -> String {
        self.duration
            .map(|d| d.to_string())
            .unwrap_or_else(|| DURATION_UNDEFINED.to_string())
    }
}

impl fmt::Display for ReportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Period: {} - {}, total hours: {}",
            self.period_start_string(),
            self.period_end_string(),
            self.total_hours_string()
        )
    }
}
