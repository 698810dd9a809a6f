//! Aggregation layer for glucochart.
//!
//! Folds per-file extraction records into month-keyed fasting / post-lunch
//! value collections and turns the accumulated state into the ordered
//! category / series arrays the chart widget consumes.

pub mod aggregator;
pub mod series;

pub use gluco_core as core;
