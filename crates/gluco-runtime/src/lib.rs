//! Upload runtime for glucochart.
//!
//! Owns the session's accumulated month-keyed state and drives the
//! upload → extract → aggregate → chart cycle against the external
//! extraction service.

pub mod client;
pub mod coordinator;

pub use gluco_core as core;
pub use gluco_data as data;
