//! Month-keyed accumulation of extraction records.
//!
//! A session may see the same reporting period several times (re-upload of an
//! overlapping batch); readings for a month are always appended to what was
//! collected before, never overwritten. Months are kept in first-seen order
//! so the chart's x-axis is stable as more reports arrive.

use std::collections::HashMap;

use gluco_core::models::ExtractionRecord;
use gluco_core::readings::parse_reading;

// ── MonthAggregate ────────────────────────────────────────────────────────────

/// All parsed readings collected for one reporting period.
#[derive(Debug, Clone)]
pub struct MonthAggregate {
    /// The period label this aggregate is keyed by.
    pub month: String,
    /// Fasting readings in the order they were seen across all uploads.
    pub fasting_values: Vec<f64>,
    /// Post-lunch readings in the order they were seen across all uploads.
    pub post_lunch_values: Vec<f64>,
}

impl MonthAggregate {
    fn new(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            fasting_values: Vec::new(),
            post_lunch_values: Vec::new(),
        }
    }

    /// Append `record`'s parseable readings to this aggregate.
    ///
    /// A reading string without a finite leading number is dropped with a
    /// debug log; a bad value never aborts the record or the batch.
    fn add_record(&mut self, record: &ExtractionRecord) {
        append_parsed(&mut self.fasting_values, &record.fasting, "fasting");
        append_parsed(
            &mut self.post_lunch_values,
            &record.post_lunch,
            "post_lunch",
        );
    }
}

fn append_parsed(values: &mut Vec<f64>, raw: &[String], metric: &str) {
    for reading in raw {
        match parse_reading(reading) {
            Some(value) => values.push(value),
            None => tracing::debug!(%metric, %reading, "dropping unparseable reading"),
        }
    }
}

// ── MonthlyAggregates ─────────────────────────────────────────────────────────

/// Ordered map `month → MonthAggregate`.
///
/// Iteration order is the order months were first encountered across the
/// whole history of [`Aggregator::aggregate`] calls, which is exactly the
/// category order of the rendered chart.
#[derive(Debug, Clone, Default)]
pub struct MonthlyAggregates {
    entries: Vec<MonthAggregate>,
    index: HashMap<String, usize>,
}

impl MonthlyAggregates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the aggregate for `month`, if that period has been seen.
    pub fn get(&self, month: &str) -> Option<&MonthAggregate> {
        self.index.get(month).map(|&i| &self.entries[i])
    }

    /// Aggregates in first-seen month order.
    pub fn iter(&self) -> impl Iterator<Item = &MonthAggregate> {
        self.entries.iter()
    }

    /// Month labels in first-seen order.
    pub fn months(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|a| a.month.as_str())
    }

    /// Return the aggregate for `month`, creating it at the end of the
    /// insertion order when the period is new.
    fn entry_mut(&mut self, month: &str) -> &mut MonthAggregate {
        let idx = match self.index.get(month) {
            Some(&i) => i,
            None => {
                self.entries.push(MonthAggregate::new(month));
                let i = self.entries.len() - 1;
                self.index.insert(month.to_string(), i);
                i
            }
        };
        &mut self.entries[idx]
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless folder of extraction records into month-keyed state.
pub struct Aggregator;

impl Aggregator {
    /// Fold `records` into a copy of `prior`.
    ///
    /// The prior state is never mutated; callers swap in the returned value,
    /// which keeps the accumulate-only invariant easy to reason about between
    /// renders. Months keep their first-seen position; readings for an
    /// already-known month are appended.
    pub fn aggregate(records: &[ExtractionRecord], prior: &MonthlyAggregates) -> MonthlyAggregates {
        let mut next = prior.clone();
        for record in records {
            next.entry_mut(&record.month).add_record(record);
        }
        next
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
