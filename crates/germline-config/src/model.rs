//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers built by the CLI and consumed by the pipeline.
//! - Pass-through arguments stay opaque; only `--gvcf` is ever inspected.

use std::path::PathBuf;

use germline_storage::S3Uri;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigResult;
use crate::validate;

/// Pass-through flag that switches the variants output to gzipped gVCF.
pub const GVCF_FLAG: &str = "--gvcf";

/// Everything one germline job needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Read-1 FASTQ location.
    pub fastq1: S3Uri,
    /// Read-2 FASTQ location.
    pub fastq2: S3Uri,
    /// Prefix the output directory is uploaded to.
    pub output: S3Uri,
    /// Local reference FASTA.
    pub reference: PathBuf,
    /// Local known-sites VCF.
    pub known_sites: PathBuf,
    /// `pbrun` launcher.
    pub pbrun_path: PathBuf,
    /// `aws` executable used for transfers.
    pub aws_cli_path: PathBuf,
    /// CPU threads handed to the tool.
    pub num_cpu_threads: u32,
    /// GPUs handed to the tool.
    pub num_gpus: u32,
    /// Base directory for the job's scratch directory.
    pub working_dir_base: PathBuf,
    /// Arguments forwarded verbatim to the tool.
    pub passthrough: PassthroughArgs,
}

impl JobConfig {
    /// Configuration for the given locations with every other field defaulted.
    #[must_use]
    pub fn with_defaults(fastq1: S3Uri, fastq2: S3Uri, output: S3Uri) -> Self {
        Self {
            fastq1,
            fastq2,
            output,
            reference: PathBuf::from(defaults::REFERENCE),
            known_sites: PathBuf::from(defaults::KNOWN_SITES),
            pbrun_path: PathBuf::from(defaults::PBRUN_PATH),
            aws_cli_path: PathBuf::from(germline_storage::DEFAULT_AWS_CLI),
            num_cpu_threads: defaults::NUM_CPU_THREADS,
            num_gpus: defaults::NUM_GPUS,
            working_dir_base: PathBuf::from(defaults::WORKING_DIR),
            passthrough: PassthroughArgs::default(),
        }
    }

    /// Check resource counts, paths and input locations.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn validate(&self) -> ConfigResult<()> {
        validate::validate_job(self)
    }

    /// Whether the tool was asked to emit a gVCF.
    #[must_use]
    pub fn gvcf(&self) -> bool {
        self.passthrough.contains_flag(GVCF_FLAG)
    }
}

/// Arguments forwarded to the external tool, in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassthroughArgs(Vec<String>);

impl PassthroughArgs {
    /// Trim every raw argument and drop the ones left empty.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            raw.into_iter()
                .map(|arg| arg.as_ref().trim().to_string())
                .filter(|arg| !arg.is_empty())
                .collect(),
        )
    }

    /// Arguments as supplied (trimmed).
    #[must_use]
    pub fn raw(&self) -> &[String] {
        &self.0
    }

    /// Whether nothing is forwarded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whitespace-separated tokens; an argument `"--a --b"` yields two tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flat_map(|arg| arg.split_whitespace())
    }

    /// Whether `flag` appears as a whole token.
    #[must_use]
    pub fn contains_flag(&self, flag: &str) -> bool {
        self.tokens().any(|token| token == flag)
    }

    /// Tokens joined with single spaces.
    #[must_use]
    pub fn joined(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(" ")
    }
}
