use thiserror::Error;

/// All errors produced by the glucochart pipeline.
#[derive(Error, Debug)]
pub enum GlucoError {
    /// The extraction service could not be reached, timed out, or answered
    /// with a non-success status.
    #[error("Extraction service error: {0}")]
    Transport(String),

    /// A report file yielded zero extraction records. Non-fatal: surfaced as
    /// a warning while the rest of the batch proceeds.
    #[error("No readings extracted from {file}")]
    Validation { file: String },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for raw I/O errors (reading report files from disk).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the glucochart crates.
pub type Result<T> = std::result::Result<T, GlucoError>;
