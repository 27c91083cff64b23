//! Validation helpers for job configuration.

use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::model::JobConfig;

pub(crate) fn validate_job(config: &JobConfig) -> ConfigResult<()> {
    ensure_positive("num_cpu_threads", config.num_cpu_threads)?;
    ensure_positive("num_gpus", config.num_gpus)?;
    ensure_path("reference", &config.reference)?;
    ensure_path("known_sites", &config.known_sites)?;
    ensure_path("pbrun_path", &config.pbrun_path)?;
    ensure_path("aws_cli_path", &config.aws_cli_path)?;
    ensure_path("working_dir", &config.working_dir_base)?;

    let read1 = config
        .fastq1
        .object_name()
        .map_err(|source| ConfigError::InvalidLocation {
            field: "fastq1_s3_path",
            source,
        })?;
    let read2 = config
        .fastq2
        .object_name()
        .map_err(|source| ConfigError::InvalidLocation {
            field: "fastq2_s3_path",
            source,
        })?;
    if read1 == read2 {
        return Err(ConfigError::InvalidField {
            field: "fastq2_s3_path",
            value: Some(read2.to_string()),
            reason: "both reads download to the same local file name",
        });
    }
    Ok(())
}

fn ensure_positive(field: &'static str, value: u32) -> ConfigResult<()> {
    if value == 0 {
        return Err(ConfigError::InvalidField {
            field,
            value: None,
            reason: "must be at least 1",
        });
    }
    Ok(())
}

fn ensure_path(field: &'static str, path: &Path) -> ConfigResult<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            value: None,
            reason: "path cannot be empty",
        });
    }
    Ok(())
}
