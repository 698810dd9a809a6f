use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Blood-sugar report aggregation and chart-series generation
#[derive(Parser, Debug, Clone)]
#[command(
    name = "glucochart",
    about = "Aggregate blood-sugar lab reports into a chart-ready series",
    version
)]
pub struct Settings {
    /// Report files or directories (directories are searched for PDFs)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Base URL of the extraction service
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub service_url: String,

    /// Per-request timeout in seconds (1-300)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout_secs: u64,

    /// Write the chart configuration JSON to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}
