use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::models::report::ReportPeriod;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    #[error("no known period layout found")]
    NotFound,
    #[error("{layout} layout matched but '{value}' is not a valid date")]
    InvalidDate { layout: &'static str, value: String },
}

/// A date-range layout found in report exports: a regex capturing the start
/// and end date, and the chrono format both captures are parsed with.
#[derive(Debug)]
pub struct PeriodLayout {
    pub name: &'static str,
    pub pattern: Regex,
    pub date_format: &'static str,
}

impl PeriodLayout {
    pub fn new(
        name: &'static str,
        pattern: &str,
        date_format: &'static str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            date_format,
        })
    }

    /// Start and end date substrings of the first match in `text`.
    pub fn capture<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        let caps = self.pattern.captures(text)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }

    pub fn parse_date(&self, value: &str) -> Result<NaiveDate, PeriodParseError> {
        NaiveDate::parse_from_str(value, self.date_format).map_err(|_| {
            PeriodParseError::InvalidDate {
                layout: self.name,
                value: value.to_string(),
            }
        })
    }

    /// `None` if the layout does not occur in `text`. A match whose dates do
    /// not parse is an error, not a miss.
    pub fn parse(&self, text: &str) -> Option<Result<ReportPeriod, PeriodParseError>> {
        let (start, end) = self.capture(text)?;
        Some(
            self.parse_date(start)
                .and_then(|start| Ok(ReportPeriod::new(start, self.parse_date(end)?))),
        )
    }
}

/// Known layouts in priority order.
pub static PERIOD_LAYOUTS: Lazy<Vec<PeriodLayout>> = Lazy::new(|| {
    vec![
        // 2015-11-01 - 2015-11-30
        PeriodLayout::new(
            "iso",
            r"(\d{4}-\d{2}-\d{2}) - (\d{4}-\d{2}-\d{2})",
            "%Y-%m-%d",
        ),
        // October 01, 2019 – October 15, 2019 (en dash)
        PeriodLayout::new(
            "long",
            r"([A-Za-z]+ \d{2}, \d{4}) – ([A-Za-z]+ \d{2}, \d{4})",
            "%B %d, %Y",
        ),
        // 03/16/2020 – 03/31/2020 (en dash)
        PeriodLayout::new(
            "us",
            r"(\d{2}/\d{2}/\d{4}) – (\d{2}/\d{2}/\d{4})",
            "%m/%d/%Y",
        ),
        // 16-07-2021 - 31-07-2021, hyphen or en dash
        PeriodLayout::new(
            "dmy",
            r"(\d{2}-\d{2}-\d{4}) [-–] (\d{2}-\d{2}-\d{4})",
            "%d-%m-%Y",
        ),
    ]
    .into_iter()
    .map(|layout| layout.expect("period layout pattern must compile"))
    .collect()
});

pub fn parse_period(text: &str) -> Result<ReportPeriod, PeriodParseError> {
    parse_period_with(&PERIOD_LAYOUTS, text)
}

/// Tries `layouts` in order and stops at the first one present in `text`.
pub fn parse_period_with(
    layouts: &[PeriodLayout],
    text: &str,
) -> Result<ReportPeriod, PeriodParseError> {
    for layout in layouts {
        if let Some(result) = layout.parse(text) {
            debug!("Period matched {} layout", layout.name);
            return result;
        }
    }

    Err(PeriodParseError::NotFound)
}
