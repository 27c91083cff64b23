//! `pbrun germline` argument assembly and execution.
//!
//! # Design
//! - Arguments are assembled as a vector and handed to the process directly,
//!   so no shell parsing happens between the runner and the tool.
//! - Pass-through arguments are split on whitespace and appended last.
//! - The rendered command line is for logs only and is not escaped.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use germline_config::{JobConfig, PassthroughArgs};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{PbrunError, PbrunResult};
use crate::layout::OutputLayout;

/// Subcommand run by the launcher.
pub const GERMLINE_SUBCOMMAND: &str = "germline";

/// One fully specified run of the germline pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GermlineInvocation {
    /// Launcher executable.
    pub pbrun: PathBuf,
    /// Reference FASTA.
    pub reference: PathBuf,
    /// Known-sites VCF.
    pub known_sites: PathBuf,
    /// Local read-1 FASTQ.
    pub fastq1: PathBuf,
    /// Local read-2 FASTQ.
    pub fastq2: PathBuf,
    /// CPU threads.
    pub num_cpu_threads: u32,
    /// GPUs.
    pub num_gpus: u32,
    /// Output targets.
    pub layout: OutputLayout,
    /// Extra arguments appended verbatim.
    pub passthrough: PassthroughArgs,
}

impl GermlineInvocation {
    /// Invocation for `config` reading the downloaded FASTQs and writing into `output_dir`.
    #[must_use]
    pub fn from_config(
        config: &JobConfig,
        fastq1: PathBuf,
        fastq2: PathBuf,
        output_dir: &Path,
    ) -> Self {
        Self {
            pbrun: config.pbrun_path.clone(),
            reference: config.reference.clone(),
            known_sites: config.known_sites.clone(),
            fastq1,
            fastq2,
            num_cpu_threads: config.num_cpu_threads,
            num_gpus: config.num_gpus,
            layout: OutputLayout::for_dir(output_dir, config.gvcf()),
            passthrough: config.passthrough.clone(),
        }
    }

    /// Arguments following the launcher path.
    #[must_use]
    pub fn argv(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            GERMLINE_SUBCOMMAND.into(),
            "--num-cpu-threads".into(),
            self.num_cpu_threads.to_string().into(),
            "--num-gpus".into(),
            self.num_gpus.to_string().into(),
            "--ref".into(),
            self.reference.clone().into_os_string(),
            "--in-fq".into(),
            self.fastq1.clone().into_os_string(),
            self.fastq2.clone().into_os_string(),
            "--knownSites".into(),
            self.known_sites.clone().into_os_string(),
            "--out-bam".into(),
            self.layout.bam.clone().into_os_string(),
            "--out-variants".into(),
            self.layout.variants.clone().into_os_string(),
            "--out-recal-file".into(),
            self.layout.recal_report.clone().into_os_string(),
        ];
        args.extend(self.passthrough.tokens().map(OsString::from));
        args
    }

    /// Launcher and arguments joined with spaces, unescaped.
    #[must_use]
    pub fn command_line(&self) -> String {
        let args = self.argv();
        std::iter::once(self.pbrun.as_os_str())
            .chain(args.iter().map(OsString::as_os_str))
            .map(OsStr::to_string_lossy)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the tool to completion with `cwd` as its working directory.
    ///
    /// Returns the output directory on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the launcher cannot be started or exits unsuccessfully.
    pub async fn run(&self, cwd: &Path) -> PbrunResult<PathBuf> {
        let command = self.command_line();
        info!(command = %command, "running germline tool");

        let output = Command::new(&self.pbrun)
            .args(self.argv())
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| PbrunError::Spawn {
                program: self.pbrun.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let captured = [stdout.trim_end(), stderr.trim_end()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if !output.status.success() {
            return Err(PbrunError::NonZeroExit {
                command,
                code: output.status.code(),
                output: captured,
            });
        }
        if !captured.is_empty() {
            debug!(output = %captured, "germline tool output");
        }
        Ok(self.layout.dir.clone())
    }
}
