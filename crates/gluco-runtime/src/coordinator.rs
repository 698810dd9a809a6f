//! Session coordinator for the upload → extract → aggregate → chart cycle.
//!
//! Owns the accumulated month-keyed state for one session. Each submission
//! fans out one extraction call per staged file, joins the whole batch, then
//! folds the surviving records into the state and rebuilds the chart series —
//! the chart always reflects a consistent full-batch view, never a partially
//! updated one. Per-file failures are collected as warnings; only a batch
//! where every file fails is reported as a failed submission.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;

use gluco_core::models::{ExtractionRecord, ReportFile};
use gluco_core::{GlucoError, Result};
use gluco_data::aggregator::{Aggregator, MonthlyAggregates};
use gluco_data::series::{ChartSeries, ChartSeriesBuilder};

use crate::client::ExtractionClient;

// ── Phases ────────────────────────────────────────────────────────────────────

/// Where the coordinator currently is in its cycle.
///
/// A successful submission ends in [`Phase::Idle`]; a failed batch parks in
/// [`Phase::FilesSelected`] with its selection intact so a retry is simply
/// re-submitting. The session stays interactive after any outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No files staged, no work in flight.
    Idle,
    /// Files staged, waiting for submission.
    FilesSelected,
    /// Batch dispatched to the extraction service.
    Uploading,
    /// Batch resolved; folding records and rebuilding the series.
    Aggregating,
}

// ── Warnings & outcome ────────────────────────────────────────────────────────

/// A non-fatal per-file problem surfaced alongside a successful submission.
#[derive(Debug)]
pub struct UploadWarning {
    /// Name of the file the problem belongs to.
    pub file: String,
    /// What went wrong (transport failure or zero extracted records).
    pub error: GlucoError,
}

impl fmt::Display for UploadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.error)
    }
}

/// Result of one successful (possibly partial) submission.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// Chart series rebuilt from the full accumulated state.
    pub series: ChartSeries,
    /// Per-file warnings for the files that did not contribute records.
    pub warnings: Vec<UploadWarning>,
    /// When the batch finished aggregating.
    pub completed_at: DateTime<Utc>,
}

// ── UploadCoordinator ─────────────────────────────────────────────────────────

/// Drives file selection, extraction dispatch and state accumulation for one
/// session.
///
/// Within a session the aggregate state only ever grows: months and readings
/// are added, never removed. Discarding the state means dropping the
/// coordinator. One submission at a time is the supported mode; interleaved
/// submissions resolve last-resolved-wins.
pub struct UploadCoordinator {
    client: Arc<dyn ExtractionClient>,
    state: MonthlyAggregates,
    staged: Vec<ReportFile>,
    phase: Phase,
}

impl UploadCoordinator {
    pub fn new(client: Arc<dyn ExtractionClient>) -> Self {
        Self {
            client,
            state: MonthlyAggregates::new(),
            staged: Vec::new(),
            phase: Phase::Idle,
        }
    }

    /// Current phase of the cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Accumulated month-keyed state for the session.
    pub fn state(&self) -> &MonthlyAggregates {
        &self.state
    }

    /// Stage `files` for the next submission, replacing any prior selection.
    pub fn select_files(&mut self, files: Vec<ReportFile>) {
        self.phase = if files.is_empty() {
            Phase::Idle
        } else {
            Phase::FilesSelected
        };
        self.staged = files;
    }

    /// Submit the staged files as a single batch.
    ///
    /// With nothing staged this is a no-op that returns the current series.
    /// On success the selection is cleared and the accumulated state has
    /// grown by the batch's records; on failure (every file hit a transport
    /// error) the state is untouched and the selection is kept so the caller
    /// can simply re-submit.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        if self.staged.is_empty() {
            tracing::debug!("submit with no staged files; nothing to do");
            return Ok(self.outcome(Vec::new()));
        }

        self.phase = Phase::Uploading;
        tracing::info!(files = self.staged.len(), "dispatching batch to extraction service");

        // Fan out one call per file and join the whole batch before touching
        // any state.
        let calls = self.staged.iter().map(|f| self.client.extract(f));
        let results = join_all(calls).await;

        self.phase = Phase::Aggregating;
        let mut records: Vec<ExtractionRecord> = Vec::new();
        let mut warnings: Vec<UploadWarning> = Vec::new();
        let mut failed = 0usize;

        for (file, result) in self.staged.iter().zip(results) {
            match result {
                Ok(extracted) if extracted.is_empty() => {
                    tracing::warn!(file = %file.name, "file produced no extraction records");
                    warnings.push(UploadWarning {
                        file: file.name.clone(),
                        error: GlucoError::Validation {
                            file: file.name.clone(),
                        },
                    });
                }
                Ok(extracted) => {
                    tracing::debug!(file = %file.name, records = extracted.len(), "file extracted");
                    records.extend(extracted);
                }
                Err(error) => {
                    tracing::warn!(file = %file.name, %error, "extraction call failed");
                    failed += 1;
                    warnings.push(UploadWarning {
                        file: file.name.clone(),
                        error,
                    });
                }
            }
        }

        if failed == self.staged.len() {
            // Nothing in the batch survived; leave state and selection alone
            // so a retry is simply re-submitting.
            self.phase = Phase::FilesSelected;
            return Err(GlucoError::Transport(format!(
                "extraction failed for all {failed} files in the batch"
            )));
        }

        self.state = Aggregator::aggregate(&records, &self.state);
        self.staged.clear();
        self.phase = Phase::Idle;

        let outcome = self.outcome(warnings);
        tracing::info!(
            months = self.state.len(),
            warnings = outcome.warnings.len(),
            "batch aggregated"
        );
        Ok(outcome)
    }

    fn outcome(&self, warnings: Vec<UploadWarning>) -> SubmitOutcome {
        SubmitOutcome {
            series: ChartSeriesBuilder::build_series(&self.state),
            warnings,
            completed_at: Utc::now(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Scripted stand-in for the extraction service.
    ///
    /// File bytes carry the JSON record array to answer with; the reserved
    /// names `"unreachable.pdf"` and `"empty.pdf"` script a transport failure
    /// and a zero-record response.
    struct ScriptedClient;

    #[async_trait]
    impl ExtractionClient for ScriptedClient {
        async fn extract(&self, file: &ReportFile) -> Result<Vec<ExtractionRecord>> {
            match file.name.as_str() {
                "unreachable.pdf" => {
                    Err(GlucoError::Transport("connection refused".to_string()))
                }
                "empty.pdf" => Ok(Vec::new()),
                _ => Ok(serde_json::from_slice(&file.bytes).expect("test payload")),
            }
        }
    }

    fn file_with(month: &str, fasting: &[&str], post_lunch: &[&str]) -> ReportFile {
        let payload = serde_json::json!([{
            "month": month,
            "fasting": fasting,
            "post_lunch": post_lunch,
        }]);
        ReportFile::new(
            format!("{}.pdf", month.to_lowercase().replace(' ', "-")),
            payload.to_string().into_bytes(),
        )
    }

    fn coordinator() -> UploadCoordinator {
        UploadCoordinator::new(Arc::new(ScriptedClient))
    }

    // ── happy path ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_single_file_submission() {
        let mut coord = coordinator();
        coord.select_files(vec![file_with("Jan", &["95"], &["140"])]);

        let outcome = coord.submit().await.unwrap();

        assert_eq!(outcome.series.categories, vec!["Jan"]);
        assert_eq!(outcome.series.fasting, vec![Some(95.0)]);
        assert_eq!(outcome.series.post_lunch, vec![Some(140.0)]);
        assert!(outcome.warnings.is_empty());
        assert_eq!(coord.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_submissions_accumulate_across_batches() {
        let mut coord = coordinator();

        coord.select_files(vec![file_with("Jan", &["95"], &[])]);
        coord.submit().await.unwrap();

        coord.select_files(vec![file_with("Jan", &["110"], &[])]);
        let outcome = coord.submit().await.unwrap();

        // Internal state keeps both readings; the chart reports the first.
        let jan = coord.state().get("Jan").unwrap();
        assert_eq!(jan.fasting_values, vec![95.0, 110.0]);
        assert_eq!(outcome.series.fasting, vec![Some(95.0)]);
    }

    #[tokio::test]
    async fn test_state_grows_monotonically() {
        let mut coord = coordinator();

        coord.select_files(vec![file_with("Jan", &["95"], &[])]);
        coord.submit().await.unwrap();
        let months_before = coord.state().len();

        coord.select_files(vec![file_with("Feb", &["100"], &[])]);
        coord.submit().await.unwrap();

        assert!(coord.state().len() >= months_before);
        assert!(coord.state().get("Jan").is_some(), "prior months survive");
    }

    // ── selection handling ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_empty_submission_is_noop() {
        let mut coord = coordinator();
        let outcome = coord.submit().await.unwrap();

        assert!(outcome.series.categories.is_empty());
        assert!(outcome.warnings.is_empty());
        assert_eq!(coord.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_select_files_sets_phase() {
        let mut coord = coordinator();
        coord.select_files(vec![file_with("Jan", &["95"], &[])]);
        assert_eq!(coord.phase(), Phase::FilesSelected);

        coord.select_files(Vec::new());
        assert_eq!(coord.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_selection_cleared_after_success() {
        let mut coord = coordinator();
        coord.select_files(vec![file_with("Jan", &["95"], &[])]);
        coord.submit().await.unwrap();

        // Re-submitting without a new selection adds nothing.
        let outcome = coord.submit().await.unwrap();
        assert_eq!(coord.state().get("Jan").unwrap().fasting_values, vec![95.0]);
        assert_eq!(outcome.series.categories.len(), 1);
    }

    // ── partial failure (scenario: one file of three fails) ───────────────

    #[tokio::test]
    async fn test_partial_failure_keeps_rest_of_batch() {
        let mut coord = coordinator();
        coord.select_files(vec![
            file_with("Jan", &["95"], &[]),
            ReportFile::new("unreachable.pdf", Vec::new()),
            file_with("Feb", &["100"], &[]),
        ]);

        let outcome = coord.submit().await.unwrap();

        assert_eq!(outcome.series.categories, vec!["Jan", "Feb"]);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].file, "unreachable.pdf");
        assert!(matches!(
            outcome.warnings[0].error,
            GlucoError::Transport(_)
        ));
        assert_eq!(coord.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_zero_record_file_warns_but_batch_proceeds() {
        let mut coord = coordinator();
        coord.select_files(vec![
            ReportFile::new("empty.pdf", Vec::new()),
            file_with("Jan", &["95"], &[]),
        ]);

        let outcome = coord.submit().await.unwrap();

        assert_eq!(outcome.series.categories, vec!["Jan"]);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            outcome.warnings[0].error,
            GlucoError::Validation { .. }
        ));
    }

    // ── total failure ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_all_files_failing_fails_submission() {
        let mut coord = coordinator();
        coord.select_files(vec![file_with("Jan", &["95"], &[])]);
        coord.submit().await.unwrap();

        coord.select_files(vec![
            ReportFile::new("unreachable.pdf", Vec::new()),
            ReportFile::new("unreachable.pdf", Vec::new()),
        ]);
        let err = coord.submit().await.unwrap_err();

        assert!(matches!(err, GlucoError::Transport(_)));
        // Accumulated state untouched; selection kept for a retry.
        assert_eq!(coord.state().len(), 1);
        assert_eq!(coord.phase(), Phase::FilesSelected);

        // Retry is simply re-submitting (still fails against the script, but
        // the staged batch is intact).
        assert!(coord.submit().await.is_err());
    }

    // ── warning display ───────────────────────────────────────────────────

    #[test]
    fn test_warning_display() {
        let warning = UploadWarning {
            file: "march.pdf".to_string(),
            error: GlucoError::Validation {
                file: "march.pdf".to_string(),
            },
        };
        assert_eq!(
            warning.to_string(),
            "march.pdf: No readings extracted from march.pdf"
        );
    }
}
