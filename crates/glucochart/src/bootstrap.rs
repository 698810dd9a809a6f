use std::path::{Path, PathBuf};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use gluco_core::models::ReportFile;
use gluco_core::Result;

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.glucochart/` directory hierarchy exists.
///
/// Creates the following directories if absent (including missing parents):
/// - `~/.glucochart/`
/// - `~/.glucochart/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_dir = home.join(".glucochart");
    std::fs::create_dir_all(&app_dir)?;
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is one of the CLI level names; unrecognised values fall back
/// to `"info"`. Output goes to stderr so the chart configuration on stdout
/// stays machine-readable.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let upper = log_level.to_uppercase();
    let directive = match upper.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Report-file collection ─────────────────────────────────────────────────────

/// Load the report files named by `inputs`.
///
/// A path to a file is loaded as-is (the extraction service enforces format,
/// not the client); a directory is walked recursively and every `.pdf` inside
/// it is loaded, in path order for a stable batch layout.
pub fn collect_report_files(inputs: &[PathBuf]) -> Result<Vec<ReportFile>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file() && is_pdf(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();

            tracing::debug!(dir = %input.display(), count = found.len(), "collected PDFs");
            for path in found {
                files.push(load_report_file(&path)?);
            }
        } else {
            files.push(load_report_file(input)?);
        }
    }

    Ok(files)
}

fn load_report_file(path: &Path) -> Result<ReportFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let bytes = std::fs::read(path)?;
    Ok(ReportFile::new(name, bytes))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
