//! HTTP client for the external extraction service.
//!
//! The service accepts a multipart upload of a report file and answers with a
//! JSON array of extraction records. Everything behind the trait seam is an
//! external collaborator; the coordinator only sees records or a transport
//! error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use gluco_core::models::{ExtractionRecord, ReportFile};
use gluco_core::{GlucoError, Result};

// ── ExtractionClient ──────────────────────────────────────────────────────────

/// Seam over the extraction service, mockable in tests.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Submit one report file and return the records extracted from it.
    async fn extract(&self, file: &ReportFile) -> Result<Vec<ExtractionRecord>>;
}

// ── HttpExtractionClient ──────────────────────────────────────────────────────

/// Reqwest-backed client posting multipart uploads to `{base_url}/upload`.
pub struct HttpExtractionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExtractionClient {
    /// Build a client with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GlucoError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }
}

#[async_trait]
impl ExtractionClient for HttpExtractionClient {
    async fn extract(&self, file: &ReportFile) -> Result<Vec<ExtractionRecord>> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str("application/pdf")
            .map_err(|e| GlucoError::Transport(e.to_string()))?;
        let form = Form::new().part("files", part);

        tracing::debug!(file = %file.name, url = %self.upload_url(), "posting report for extraction");
        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| GlucoError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GlucoError::Transport(format!(
                "service answered {status} for {}",
                file.name
            )));
        }

        // Missing fields inside a record degrade to empty values via serde
        // defaults; only a body that is not a record array is an error.
        let body = response
            .text()
            .await
            .map_err(|e| GlucoError::Transport(e.to_string()))?;
        let records: Vec<ExtractionRecord> = serde_json::from_str(&body)?;
        Ok(records)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
