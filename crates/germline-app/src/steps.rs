//! Step bookkeeping for the job pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::error::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// The five steps of a germline job, in execution order.
pub enum StepKind {
    /// Create the scratch directory.
    PrepareWorkingDir,
    /// Download both FASTQ files.
    DownloadInputs,
    /// Run `pbrun germline`.
    RunGermline,
    /// Upload the output directory.
    UploadOutput,
    /// Delete the scratch directory.
    Cleanup,
}

impl StepKind {
    /// Stable snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrepareWorkingDir => "prepare_working_dir",
            Self::DownloadInputs => "download_inputs",
            Self::RunGermline => "run_germline",
            Self::UploadOutput => "upload_output",
            Self::Cleanup => "cleanup",
        }
    }

    const fn announcement(self) -> &'static str {
        match self {
            Self::PrepareWorkingDir => "Preparing working directory",
            Self::DownloadInputs => "Downloading FASTQs",
            Self::RunGermline => "Running Parabricks Germline",
            Self::UploadOutput => "Uploading results",
            Self::Cleanup => "Cleaning up working dir",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Terminal status of a step.
pub enum StepStatus {
    /// The step finished.
    Completed,
    /// The step failed and aborted the job.
    Failed,
}

/// Outcome of one executed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// Which step ran.
    pub step: StepKind,
    /// How it ended.
    pub status: StepStatus,
    /// Short context (paths, counts) or the failure message.
    pub detail: Option<String>,
    /// When the step started.
    pub started_at: DateTime<Utc>,
    /// When the step ended.
    pub finished_at: DateTime<Utc>,
}

/// Records steps as the pipeline advances.
#[derive(Debug, Default)]
pub(crate) struct StepLog {
    records: Vec<StepRecord>,
}

impl StepLog {
    pub(crate) fn begin(step: StepKind) -> DateTime<Utc> {
        germline_telemetry::record_job_step(step.as_str());
        info!(step = step.as_str(), "{}", step.announcement());
        Utc::now()
    }

    pub(crate) fn complete(
        &mut self,
        step: StepKind,
        started_at: DateTime<Utc>,
        detail: Option<String>,
    ) {
        info!(
            step = step.as_str(),
            detail = detail.as_deref().unwrap_or_default(),
            "step completed"
        );
        self.records.push(StepRecord {
            step,
            status: StepStatus::Completed,
            detail,
            started_at,
            finished_at: Utc::now(),
        });
    }

    pub(crate) fn fail(&mut self, step: StepKind, started_at: DateTime<Utc>, err: &AppError) {
        let detail = err.detail();
        error!(step = step.as_str(), error = %detail, "step failed");
        self.records.push(StepRecord {
            step,
            status: StepStatus::Failed,
            detail: Some(detail),
            started_at,
            finished_at: Utc::now(),
        });
    }

    pub(crate) fn finish<T>(
        &mut self,
        step: StepKind,
        started_at: DateTime<Utc>,
        result: AppResult<T>,
        detail: impl FnOnce(&T) -> Option<String>,
    ) -> AppResult<T> {
        match result {
            Ok(value) => {
                self.complete(step, started_at, detail(&value));
                Ok(value)
            }
            Err(err) => {
                self.fail(step, started_at, &err);
                Err(err)
            }
        }
    }

    pub(crate) fn into_records(self) -> Vec<StepRecord> {
        self.records
    }
}
