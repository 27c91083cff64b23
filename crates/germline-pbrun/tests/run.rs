#![cfg(unix)]

use std::fs;
use std::path::PathBuf;

use germline_config::{JobConfig, PassthroughArgs};
use germline_pbrun::{GermlineInvocation, PbrunError};
use germline_storage::S3Uri;
use germline_test_support::fixtures::{fake_pbrun, recording_stub, scratch_dir};

fn config(pbrun: PathBuf, passthrough: &[&str]) -> anyhow::Result<JobConfig> {
    let mut config = JobConfig::with_defaults(
        S3Uri::parse("s3://reads/a_R1.fq")?,
        S3Uri::parse("s3://reads/a_R2.fq")?,
        S3Uri::parse("s3://results/a/")?,
    );
    config.pbrun_path = pbrun;
    config.passthrough = PassthroughArgs::from_raw(passthrough);
    Ok(config)
}

#[tokio::test]
async fn run_writes_outputs_from_working_directory() -> anyhow::Result<()> {
    let scratch = scratch_dir()?;
    let pbrun = fake_pbrun(scratch.path())?;
    let work = scratch.path().join("job");
    let output = work.join("output");
    fs::create_dir_all(&output)?;

    let invocation = GermlineInvocation::from_config(
        &config(pbrun.path.clone(), &["--gvcf"])?,
        work.join("fastq/a_R1.fq"),
        work.join("fastq/a_R2.fq"),
        &output,
    );
    let result = invocation.run(&work).await?;

    assert_eq!(result, output);
    assert!(output.join("output.bam").is_file());
    assert!(output.join("output.g.vcf.gz").is_file());
    assert!(output.join("report.txt").is_file());
    assert_eq!(pbrun.recorded_cwd()?.canonicalize()?, work.canonicalize()?);

    let calls = pbrun.invocations()?;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0], "germline");
    assert_eq!(calls[0].last().map(String::as_str), Some("--gvcf"));
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_carries_captured_output() -> anyhow::Result<()> {
    let scratch = scratch_dir()?;
    let pbrun = recording_stub(scratch.path(), "pbrun", 2)?;
    let invocation = GermlineInvocation::from_config(
        &config(pbrun.path.clone(), &[])?,
        scratch.path().join("r1.fq"),
        scratch.path().join("r2.fq"),
        scratch.path(),
    );

    let err = invocation
        .run(scratch.path())
        .await
        .expect_err("stub exits with 2");
    match err {
        PbrunError::NonZeroExit {
            command,
            code,
            output,
        } => {
            assert_eq!(code, Some(2));
            assert!(command.starts_with(&pbrun.path.display().to_string()));
            assert!(output.contains("pbrun stdout"));
            assert!(output.contains("pbrun stderr"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_launcher_is_a_spawn_error() -> anyhow::Result<()> {
    let scratch = scratch_dir()?;
    let invocation = GermlineInvocation::from_config(
        &config(scratch.path().join("absent-pbrun"), &[])?,
        scratch.path().join("r1.fq"),
        scratch.path().join("r2.fq"),
        scratch.path(),
    );
    let err = invocation
        .run(scratch.path())
        .await
        .expect_err("launcher missing");
    assert!(matches!(err, PbrunError::Spawn { .. }));
    Ok(())
}
