use tracing::debug;

use super::report::{Duration, ReportRecord};

/// A reported row built from one or more consecutive same-month records.
///
/// The period stays the period of the seeding record; only the duration grows
/// as constituents are appended.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    record: ReportRecord,
    constituents: Vec<ReportRecord>,
}

impl AggregateRecord {
    pub fn seed(record: ReportRecord) -> Self {
        Self {
            record: record.clone(),
            constituents: vec![record],
        }
    }

    /// Whether `record` belongs to the same calendar month as this aggregate's
    /// seed. Undefined periods on either side never match.
    pub fn accepts(&self, record: &ReportRecord) -> bool {
        match (self.record.period(), record.period()) {
            (Some(seed), Some(other)) => seed.same_month_as(other),
            _ => false,
        }
    }

    pub fn append(&mut self, record: ReportRecord) {
        let total = self
            .record
            .total_seconds()
            .saturating_add(record.total_seconds());
        self.record.set_duration(Duration::from_total_seconds(total));
        self.constituents.push(record);
    }

    pub fn record(&self) -> &ReportRecord {
        &self.record
    }

    pub fn constituents(&self) -> &[ReportRecord] {
        &self.constituents
    }
}

/// What happened to a record pushed into the [`Aggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folded {
    /// Started a new aggregate at this index.
    Seeded(usize),
    /// Appended to the existing aggregate at this index.
    Merged(usize),
}

/// Running fold of a batch's records into aggregates.
///
/// Only the most recent aggregate is ever considered for merging, so the
/// result depends on arrival order.
#[derive(Debug)]
pub struct Aggregator {
    combine_by_month: bool,
    aggregates: Vec<AggregateRecord>,
}

impl Aggregator {
    pub fn new(combine_by_month: bool) -> Self {
        Self {
            combine_by_month,
            aggregates: Vec::new(),
        }
    }

    pub fn push(&mut self, record: ReportRecord) -> Folded {
        if self.combine_by_month {
            if let Some(last) = self.aggregates.len().checked_sub(1) {
                if self.aggregates[last].accepts(&record) {
                    self.aggregates[last].append(record);
                    debug!("Merged report into aggregate #{}", last);
                    return Folded::Merged(last);
                }
            }
        }

        self.aggregates.push(AggregateRecord::seed(record));
        let index = self.aggregates.len() - 1;
        debug!("Started aggregate #{}", index);
        Folded::Seeded(index)
    }

    pub fn aggregates(&self) -> &[AggregateRecord] {
        &self.aggregates
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    pub fn into_aggregates(self) -> Vec<AggregateRecord> {
        self.aggregates
    }
}

impl Default for Aggregator {
    /// Combines by month, like the default report configuration.
    fn default() -> Self {
        Self::new(true)
    }
}

/// Folds records by month in the order given.
pub fn fold<I>(records: I) -> Vec<AggregateRecord>
where
    I: IntoIterator<Item = ReportRecord>,
{
    let mut aggregator = Aggregator::new(true);
    for record in records {
        aggregator.push(record);
    }
    aggregator.into_aggregates()
}
