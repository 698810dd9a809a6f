mod bootstrap;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use gluco_core::settings::Settings;
use gluco_data::series::ChartSeriesBuilder;
use gluco_runtime::client::HttpExtractionClient;
use gluco_runtime::coordinator::UploadCoordinator;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("glucochart v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        service = %settings.service_url,
        timeout_secs = settings.timeout_secs,
        "configuration loaded"
    );

    let files = bootstrap::collect_report_files(&settings.inputs)?;
    if files.is_empty() {
        anyhow::bail!("no report files found under the given inputs");
    }
    tracing::info!(files = files.len(), "report files collected");

    let client = HttpExtractionClient::new(
        &settings.service_url,
        Duration::from_secs(settings.timeout_secs),
    )?;
    let mut coordinator = UploadCoordinator::new(Arc::new(client));
    coordinator.select_files(files);

    let outcome = match coordinator.submit().await {
        Ok(outcome) => outcome,
        Err(e) => {
            // Accumulated state is untouched on a failed submission; re-running
            // the command is the retry.
            eprintln!("Error uploading files. Please try again.");
            return Err(e.into());
        }
    };

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }

    let options = ChartSeriesBuilder::chart_options(&outcome.series);
    let rendered = serde_json::to_string_pretty(&options)?;
    match &settings.out {
        Some(path) => {
            std::fs::write(path, rendered)?;
            tracing::info!(path = %path.display(), "chart configuration written");
        }
        None => println!("{rendered}"),
    }

    tracing::info!(
        months = outcome.series.categories.len(),
        warnings = outcome.warnings.len(),
        "done"
    );
    Ok(())
}
