//! Result of a completed job.

use std::path::PathBuf;

use germline_fsops::{CleanupOutcome, LocalFile};
use germline_storage::S3Uri;
use serde::Serialize;
use uuid::Uuid;

use crate::steps::StepRecord;

/// What a finished job did, suitable for printing as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    /// Job identifier; also the scratch directory name when it could be created.
    pub job_id: Uuid,
    /// Scratch directory used by the job.
    pub working_dir: PathBuf,
    /// Local read-1 FASTQ.
    pub fastq1: PathBuf,
    /// Local read-2 FASTQ.
    pub fastq2: PathBuf,
    /// Command line handed to the tool.
    pub command: String,
    /// Variants file written by the tool.
    pub variants_file: PathBuf,
    /// Upload destination.
    pub output_uri: S3Uri,
    /// Files that were uploaded, relative to the output directory.
    pub uploaded_files: Vec<LocalFile>,
    /// What happened to the scratch directory.
    pub cleanup: CleanupOutcome,
    /// Every executed step.
    pub steps: Vec<StepRecord>,
}

impl JobSummary {
    /// Total bytes uploaded.
    #[must_use]
    pub fn uploaded_bytes(&self) -> u64 {
        self.uploaded_files.iter().map(|file| file.bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{StepKind, StepStatus};
    use chrono::Utc;

    fn summary() -> Result<JobSummary, Box<dyn std::error::Error>> {
        let now = Utc::now();
        Ok(JobSummary {
            job_id: Uuid::new_v4(),
            working_dir: PathBuf::from("/mnt/disks/local/job"),
            fastq1: PathBuf::from("/mnt/disks/local/job/fastq/s_R1.fq.gz"),
            fastq2: PathBuf::from("/mnt/disks/local/job/fastq/s_R2.fq.gz"),
            command: "/opt/parabricks/pbrun germline".to_string(),
            variants_file: PathBuf::from("/mnt/disks/local/job/output/output.vcf"),
            output_uri: S3Uri::parse("s3://results/s/")?,
            uploaded_files: vec![
                LocalFile {
                    relative: PathBuf::from("output.bam"),
                    bytes: 10,
                },
                LocalFile {
                    relative: PathBuf::from("report.txt"),
                    bytes: 5,
                },
            ],
            cleanup: CleanupOutcome::Removed,
            steps: [StepKind::DownloadInputs, StepKind::Cleanup]
                .into_iter()
                .map(|step| StepRecord {
                    step,
                    status: StepStatus::Completed,
                    detail: None,
                    started_at: now,
                    finished_at: now,
                })
                .collect(),
        })
    }

    #[test]
    fn uploaded_bytes_sums_files() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(summary()?.uploaded_bytes(), 15);
        Ok(())
    }

    #[test]
    fn json_form_uses_snake_case_labels() -> Result<(), Box<dyn std::error::Error>> {
        let summary = summary()?;
        let value = serde_json::to_value(&summary)?;
        assert_eq!(value["job_id"], summary.job_id.to_string());
        assert_eq!(value["output_uri"], "s3://results/s/");
        assert_eq!(value["cleanup"], "removed");
        assert_eq!(value["steps"][0]["step"], "download_inputs");
        assert_eq!(value["steps"][0]["status"], "completed");
        assert_eq!(value["steps"][1]["step"], "cleanup");
        assert_eq!(value["uploaded_files"][1]["bytes"], 5);
        Ok(())
    }
}
