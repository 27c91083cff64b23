//! The five job steps.
//!
//! # Design
//! - Steps run strictly in order; each is awaited before the next starts.
//! - The first failing step aborts the job. The working directory is left in
//!   place so its contents can be inspected, and its path is logged.
//! - Cleanup never fails the job; its outcome is reported in the summary.

use std::path::{Path, PathBuf};

use germline_config::JobConfig;
use germline_fsops::{WorkingDir, list_files};
use germline_pbrun::GermlineInvocation;
use germline_storage::{ObjectStore, S3Uri};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::steps::{StepKind, StepLog};
use crate::summary::JobSummary;

/// Subdirectory of the working directory receiving the FASTQ downloads.
pub const FASTQ_DIR: &str = "fastq";
/// Subdirectory of the working directory the tool writes into.
pub const OUTPUT_DIR: &str = "output";

/// Run one germline job end to end.
///
/// # Errors
///
/// Returns [`AppError::Config`] when `config` fails validation (before any
/// filesystem or storage side effect), and the error of the first failing
/// step otherwise.
pub async fn run_job(
    job_id: Uuid,
    config: &JobConfig,
    store: &dyn ObjectStore,
) -> AppResult<JobSummary> {
    config
        .validate()
        .map_err(|source| AppError::Config { source })?;

    let mut steps = StepLog::default();

    let started = StepLog::begin(StepKind::PrepareWorkingDir);
    let working_dir = WorkingDir::generate_with_id(&config.working_dir_base, job_id);
    steps.complete(
        StepKind::PrepareWorkingDir,
        started,
        Some(format!(
            "working_dir={} owned={}",
            working_dir.path().display(),
            working_dir.is_owned()
        )),
    );

    let started = StepLog::begin(StepKind::DownloadInputs);
    let downloaded =
        download_fastq_files(store, &config.fastq1, &config.fastq2, &working_dir).await;
    let (fastq1, fastq2) = steps
        .finish(StepKind::DownloadInputs, started, downloaded, |(one, two)| {
            Some(format!("fastq1={} fastq2={}", one.display(), two.display()))
        })
        .inspect_err(|_| left_in_place(&working_dir))?;

    let started = StepLog::begin(StepKind::RunGermline);
    let output_dir = working_dir.subdir_logged(OUTPUT_DIR);
    let invocation =
        GermlineInvocation::from_config(config, fastq1.clone(), fastq2.clone(), &output_dir);
    let ran = invocation
        .run(working_dir.path())
        .await
        .map_err(|source| AppError::Tool { source });
    let output_dir = steps
        .finish(StepKind::RunGermline, started, ran, |dir| {
            Some(format!("output_dir={}", dir.display()))
        })
        .inspect_err(|_| left_in_place(&working_dir))?;

    let started = StepLog::begin(StepKind::UploadOutput);
    let uploaded = upload_listed(store, &config.output, &output_dir).await;
    let uploaded_files = steps
        .finish(StepKind::UploadOutput, started, uploaded, |files| {
            Some(format!("files={} destination={}", files.len(), config.output))
        })
        .inspect_err(|_| left_in_place(&working_dir))?;

    let started = StepLog::begin(StepKind::Cleanup);
    let cleanup = working_dir.remove();
    steps.complete(StepKind::Cleanup, started, Some(format!("outcome={cleanup:?}")));

    info!(job_id = %job_id, "Completed");

    Ok(JobSummary {
        job_id,
        working_dir: working_dir.path().to_path_buf(),
        fastq1,
        fastq2,
        command: invocation.command_line(),
        variants_file: invocation.layout.variants,
        output_uri: config.output.clone(),
        uploaded_files,
        cleanup,
        steps: steps.into_records(),
    })
}

/// Download both FASTQs into the working directory's `fastq/` subdirectory.
///
/// Failure to create `fastq/` is ignored; it usually means the directory
/// already exists. Local files are named after the final segment of each key.
///
/// # Errors
///
/// Returns [`AppError::Storage`] when either download fails.
pub async fn download_fastq_files(
    store: &dyn ObjectStore,
    fastq1: &S3Uri,
    fastq2: &S3Uri,
    working_dir: &WorkingDir,
) -> AppResult<(PathBuf, PathBuf)> {
    let fastq_dir = working_dir.subdir_quiet(FASTQ_DIR);
    let local1 = store
        .download_file(fastq1, &fastq_dir)
        .await
        .map_err(|source| AppError::storage("download_inputs", source))?;
    let local2 = store
        .download_file(fastq2, &fastq_dir)
        .await
        .map_err(|source| AppError::storage("download_inputs", source))?;
    Ok((local1, local2))
}

/// Recursively upload `local_folder` under `output`, requesting server-side encryption.
///
/// # Errors
///
/// Returns [`AppError::Storage`] when the transfer fails.
pub async fn upload_output(
    store: &dyn ObjectStore,
    output: &S3Uri,
    local_folder: &Path,
) -> AppResult<()> {
    info!(destination = %output, "Uploading results to {output}");
    store
        .upload_folder(output, local_folder, true)
        .await
        .map_err(|source| AppError::storage("upload_output", source))
}

async fn upload_listed(
    store: &dyn ObjectStore,
    output: &S3Uri,
    local_folder: &Path,
) -> AppResult<Vec<germline_fsops::LocalFile>> {
    let files = list_files(local_folder).map_err(|source| AppError::FsOps {
        operation: "list_output",
        source,
    })?;
    upload_output(store, output, local_folder).await?;
    Ok(files)
}

fn left_in_place(working_dir: &WorkingDir) {
    error!(
        working_dir = %working_dir.path().display(),
        "job failed; working directory left in place"
    );
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    use germline_config::PassthroughArgs;
    use germline_fsops::CleanupOutcome;
    use germline_test_support::fixtures::{fake_pbrun, recording_stub, scratch_dir};
    use germline_test_support::mocks::{RecordingStore, StoreCall};

    use crate::steps::StepStatus;

    const R1: &str = "s3://reads/run-1/sample_R1.fastq.gz";
    const R2: &str = "s3://reads/run-1/sample_R2.fastq.gz";
    const OUT: &str = "s3://results/run-1/";

    fn seeded_store() -> RecordingStore {
        RecordingStore::new()
            .with_object(R1, "@read1")
            .with_object(R2, "@read2")
    }

    fn job_config(base: &Path, pbrun: PathBuf) -> anyhow::Result<JobConfig> {
        let mut config = JobConfig::with_defaults(
            S3Uri::parse(R1)?,
            S3Uri::parse(R2)?,
            S3Uri::parse(OUT)?,
        );
        config.working_dir_base = base.to_path_buf();
        config.pbrun_path = pbrun;
        Ok(config)
    }

    #[tokio::test]
    async fn job_runs_all_steps_and_removes_working_dir() -> anyhow::Result<()> {
        let scratch = scratch_dir()?;
        let base = scratch.path().join("base");
        fs::create_dir(&base)?;
        let pbrun = fake_pbrun(scratch.path())?;
        let config = job_config(&base, pbrun.path.clone())?;
        let store = seeded_store();
        let job_id = Uuid::new_v4();

        let summary = run_job(job_id, &config, &store).await?;

        let working_dir = base.join(job_id.to_string());
        assert_eq!(summary.working_dir, working_dir);
        assert_eq!(summary.fastq1, working_dir.join("fastq/sample_R1.fastq.gz"));
        assert_eq!(summary.fastq2, working_dir.join("fastq/sample_R2.fastq.gz"));
        assert_eq!(summary.variants_file, working_dir.join("output/output.vcf"));
        assert_eq!(summary.cleanup, CleanupOutcome::Removed);
        assert!(!working_dir.exists());
        assert!(summary.command.contains(" germline "));

        assert_eq!(
            store.uris(),
            vec![
                R1.to_string(),
                R2.to_string(),
                "s3://results/run-1/output.bam".to_string(),
                "s3://results/run-1/output.vcf".to_string(),
                "s3://results/run-1/report.txt".to_string(),
            ]
        );
        assert_eq!(summary.uploaded_files.len(), 3);
        assert!(summary.uploaded_bytes() > 0);
        assert!(store.calls().contains(&StoreCall::UploadFolder(
            OUT.to_string(),
            working_dir.join(OUTPUT_DIR),
            true
        )));

        let steps: Vec<_> = summary.steps.iter().map(|record| record.step).collect();
        assert_eq!(
            steps,
            [
                StepKind::PrepareWorkingDir,
                StepKind::DownloadInputs,
                StepKind::RunGermline,
                StepKind::UploadOutput,
                StepKind::Cleanup,
            ]
        );
        assert!(
            summary
                .steps
                .iter()
                .all(|record| record.status == StepStatus::Completed)
        );
        Ok(())
    }

    #[tokio::test]
    async fn gvcf_passthrough_switches_variants_file() -> anyhow::Result<()> {
        let scratch = scratch_dir()?;
        let base = scratch.path().join("base");
        fs::create_dir(&base)?;
        let pbrun = fake_pbrun(scratch.path())?;
        let mut config = job_config(&base, pbrun.path.clone())?;
        config.passthrough = PassthroughArgs::from_raw(["--gvcf"]);
        let store = seeded_store();

        let summary = run_job(Uuid::new_v4(), &config, &store).await?;

        assert!(summary.variants_file.ends_with("output/output.g.vcf.gz"));
        assert!(
            store
                .object("s3://results/run-1/output.g.vcf.gz")
                .is_some()
        );
        assert_eq!(
            pbrun.invocations()?[0].last().map(String::as_str),
            Some("--gvcf")
        );
        Ok(())
    }

    #[tokio::test]
    async fn invalid_config_has_no_side_effects() -> anyhow::Result<()> {
        let scratch = scratch_dir()?;
        let mut config = job_config(scratch.path(), scratch.path().join("pbrun"))?;
        config.num_gpus = 0;
        let store = seeded_store();

        let err = run_job(Uuid::new_v4(), &config, &store)
            .await
            .expect_err("zero gpus is rejected");

        assert_eq!(err.exit_code(), 2);
        assert!(store.calls().is_empty());
        assert_eq!(fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn download_failure_leaves_working_dir() -> anyhow::Result<()> {
        let scratch = scratch_dir()?;
        let base = scratch.path().join("base");
        fs::create_dir(&base)?;
        let pbrun = fake_pbrun(scratch.path())?;
        let config = job_config(&base, pbrun.path.clone())?;
        let store = seeded_store().failing_on("download_file");
        let job_id = Uuid::new_v4();

        let err = run_job(job_id, &config, &store)
            .await
            .expect_err("download fails");

        assert!(matches!(
            err,
            AppError::Storage {
                operation: "download_inputs",
                ..
            }
        ));
        assert_eq!(err.exit_code(), 1);
        assert!(base.join(job_id.to_string()).is_dir());
        assert!(pbrun.invocations()?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn tool_failure_skips_upload() -> anyhow::Result<()> {
        let scratch = scratch_dir()?;
        let base = scratch.path().join("base");
        fs::create_dir(&base)?;
        let pbrun = recording_stub(scratch.path(), "pbrun", 3)?;
        let config = job_config(&base, pbrun.path.clone())?;
        let store = seeded_store();
        let job_id = Uuid::new_v4();

        let err = run_job(job_id, &config, &store)
            .await
            .expect_err("tool exits with 3");

        assert!(matches!(err, AppError::Tool { .. }));
        assert!(err.detail().contains("exit code 3"));
        assert!(
            !store
                .calls()
                .iter()
                .any(|call| matches!(call, StoreCall::UploadFolder(..)))
        );
        let working_dir = base.join(job_id.to_string());
        assert!(working_dir.join("fastq/sample_R1.fastq.gz").is_file());
        assert!(working_dir.join(OUTPUT_DIR).is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn upload_failure_is_reported_as_storage_error() -> anyhow::Result<()> {
        let scratch = scratch_dir()?;
        let base = scratch.path().join("base");
        fs::create_dir(&base)?;
        let pbrun = fake_pbrun(scratch.path())?;
        let config = job_config(&base, pbrun.path.clone())?;
        let store = seeded_store().failing_on("upload_folder");

        let err = run_job(Uuid::new_v4(), &config, &store)
            .await
            .expect_err("upload fails");

        assert!(matches!(
            err,
            AppError::Storage {
                operation: "upload_output",
                ..
            }
        ));
        assert!(err.detail().contains("simulated failure"));
        Ok(())
    }

    #[tokio::test]
    async fn downloads_tolerate_existing_fastq_dir() -> anyhow::Result<()> {
        let scratch = scratch_dir()?;
        let working_dir = WorkingDir::generate_with_id(scratch.path(), Uuid::new_v4());
        fs::create_dir(working_dir.path().join(FASTQ_DIR))?;
        let store = seeded_store();

        let (one, two) = download_fastq_files(
            &store,
            &S3Uri::parse(R1)?,
            &S3Uri::parse(R2)?,
            &working_dir,
        )
        .await?;

        assert_eq!(fs::read_to_string(one)?, "@read1");
        assert_eq!(fs::read_to_string(two)?, "@read2");
        Ok(())
    }
}
