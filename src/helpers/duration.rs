use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::models::report::Duration;

/// A total-hours layout. Captures are hours, minutes and optionally seconds.
#[derive(Debug)]
pub struct DurationLayout {
    pub name: &'static str,
    pub pattern: Regex,
}

impl DurationLayout {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn parse(&self, text: &str) -> Option<Duration> {
        let caps = self.pattern.captures(text)?;
        Some(Duration::new(
            number_at(&caps, 1),
            number_at(&caps, 2),
            number_at(&caps, 3),
        ))
    }
}

// Missing or unparseable captures count as zero.
fn number_at(caps: &Captures<'_>, index: usize) -> u64 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub static DURATION_LAYOUTS: Lazy<Vec<DurationLayout>> = Lazy::new(|| {
    vec![
        DurationLayout::new("hours-minutes", r"Total (\d+) h (\d+) min"),
        DurationLayout::new("clock", r"TOTAL HOURS: (\d+):(\d+):(\d+)"),
    ]
    .into_iter()
    .map(|layout| layout.expect("duration layout pattern must compile"))
    .collect()
});

pub fn parse_duration(text: &str) -> Option<Duration> {
    parse_duration_with(&DURATION_LAYOUTS, text)
}

/// Tries `layouts` in order. The first layout present decides; a total too
/// large to count in seconds is rejected rather than clamped.
pub fn parse_duration_with(layouts: &[DurationLayout], text: &str) -> Option<Duration> {
    let (layout, duration) = layouts
        .iter()
        .find_map(|layout| Some((layout, layout.parse(text)?)))?;
    debug!("Duration matched {} layout", layout.name);

    if duration.checked_total_seconds().is_none() {
        warn!("Total hours {:?} out of range", duration);
        return None;
    }

    Some(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_minutes_layout_has_zero_seconds() {
        assert_eq!(
            parse_duration("Workspace\nTotal 161 h 42 min\nProjects"),
            Some(Duration::new(161, 42, 0))
        );
    }

    #[test]
    fn clock_layout_reads_all_three_parts() {
        assert_eq!(
            parse_duration("TOTAL HOURS: 80:05:59"),
            Some(Duration::new(80, 5, 59))
        );
    }

    #[test]
    fn first_layout_wins_when_both_present() {
        assert_eq!(
            parse_duration("TOTAL HOURS: 1:02:03 ... Total 4 h 5 min"),
            Some(Duration::new(4, 5, 0))
        );
    }

    #[test]
    fn no_total_is_none() {
        assert_eq!(parse_duration("2015-11-01 - 2015-11-30"), None);
        assert_eq!(parse_duration("Total h min"), None);
    }

    #[test]
    fn total_too_large_for_seconds_is_rejected() {
        assert_eq!(parse_duration("TOTAL HOURS: 18446744073709551615:59:59"), None);
        assert_eq!(
            parse_duration("Total 18446744073709551615 h 0 min TOTAL HOURS: 1:00:00"),
            None
        );
    }

    #[test]
    fn oversized_capture_defaults_to_zero() {
        assert_eq!(
            parse_duration("Total 99999999999999999999999 h 7 min"),
            Some(Duration::new(0, 7, 0))
        );
    }
}
