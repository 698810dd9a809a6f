//! Core data contracts for glucochart.
//!
//! Defines the extraction-service record shape, reading-string parsing,
//! the error taxonomy and the CLI settings shared by the other crates.

pub mod error;
pub mod models;
pub mod readings;
pub mod settings;

pub use error::{GlucoError, Result};
