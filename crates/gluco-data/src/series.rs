//! Chart-series construction from aggregated state.
//!
//! Converts [`MonthlyAggregates`] into the ordered category / value arrays a
//! line-chart widget consumes, and renders the widget's configuration object.

use serde::Serialize;
use serde_json::{json, Value};

use crate::aggregator::MonthlyAggregates;

// ── ChartSeries ───────────────────────────────────────────────────────────────

/// Chart-ready series pair, recomputed on every render.
///
/// `fasting` and `post_lunch` are index-aligned with `categories`; a month
/// with no reading for a metric carries `None`, which the widget must render
/// as a gap in the line, not a zero reading.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartSeries {
    /// Month labels in first-seen order.
    pub categories: Vec<String>,
    /// One fasting value per category.
    pub fasting: Vec<Option<f64>>,
    /// One post-lunch value per category.
    pub post_lunch: Vec<Option<f64>>,
}

// ── ChartSeriesBuilder ────────────────────────────────────────────────────────

/// Pure converter from aggregated state to chart-ready arrays.
pub struct ChartSeriesBuilder;

impl ChartSeriesBuilder {
    /// Build the series pair from `aggregates`.
    ///
    /// Each month contributes the *first* value recorded for each metric. A
    /// month may accumulate several readings across overlapping uploads; the
    /// first one is reported as the representative point, deferring richer
    /// statistics (mean/min/max) to future work.
    pub fn build_series(aggregates: &MonthlyAggregates) -> ChartSeries {
        let mut series = ChartSeries::default();
        for aggregate in aggregates.iter() {
            series.categories.push(aggregate.month.clone());
            series.fasting.push(aggregate.fasting_values.first().copied());
            series
                .post_lunch
                .push(aggregate.post_lunch_values.first().copied());
        }
        series
    }

    /// Render the line-chart configuration object for the external widget.
    ///
    /// Shape follows the widget's options schema: named series with `null`
    /// gaps, data labels enabled, no axis gridlines.
    pub fn chart_options(series: &ChartSeries) -> Value {
        json!({
            "chart": { "type": "line", "height": "400px" },
            "title": { "text": "Blood Sugar Levels Comparison" },
            "xAxis": {
                "categories": &series.categories,
                "title": { "text": "Months" },
                "gridLineWidth": 0,
            },
            "yAxis": {
                "title": { "text": "Blood Sugar Level (mg/dl)" },
                "gridLineWidth": 0,
            },
            "series": [
                { "name": "Fasting Blood Sugar", "type": "line", "data": &series.fasting },
                { "name": "Post Lunch Blood Sugar", "type": "line", "data": &series.post_lunch },
            ],
            "plotOptions": {
                "series": { "dataLabels": { "enabled": true } },
            },
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
