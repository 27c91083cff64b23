//! Argument parsing and job dispatch.
//!
//! # Design
//! - Only the runner's own flags go through clap. Every other argument is
//!   forwarded to the germline tool untouched and in order.
//! - `--` ends flag recognition; everything after it is forwarded.
//! - Every flag can also come from a `GERMLINE_*` environment variable.
//! - A repeated flag keeps its last value.
//! - Arguments stay `OsString` until clap sees them, so non-UTF-8 paths
//!   survive. Forwarded arguments must be UTF-8.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};
use germline_app::run_job;
use germline_config::{JobConfig, PassthroughArgs, defaults};
use germline_storage::{AwsCliStore, DEFAULT_AWS_CLI, S3Uri, StorageError};
use germline_telemetry::{
    DEFAULT_LOG_LEVEL, JobSpanGuard, LogFormat, LoggingConfig, init_logging,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::client::{CliError, CliResult};
use crate::output::render_summary;

/// Flags clap handles itself that take no value.
const BUILTIN_SWITCHES: [&str; 4] = ["--help", "-h", "--version", "-V"];

/// Parses arguments from the process environment, runs one job and returns
/// the process exit code.
pub async fn run() -> i32 {
    run_with_args(std::env::args_os()).await
}

/// Same as [`run`] with an explicit argument vector (program name first).
pub async fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let (known, passthrough) = split_known_args(args);
    let cli = match Cli::try_parse_from(&known) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    let passthrough = match utf8_passthrough(passthrough) {
        Ok(passthrough) => passthrough,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    if let Err(err) = init_logging(&cli.logging_config()) {
        eprintln!("warning: {err}; continuing with the existing subscriber");
    }

    let job_id = Uuid::new_v4();
    let _job_span = JobSpanGuard::new(job_id);
    let output = cli.output;
    let config = cli.into_job_config(passthrough);
    info!(
        fastq1 = %config.fastq1,
        fastq2 = %config.fastq2,
        output = %config.output,
        passthrough = %config.passthrough.joined(),
        "starting germline job"
    );

    match dispatch(job_id, &config, output).await {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            error!(exit_code, "job failed");
            eprintln!("error: {message}");
            exit_code
        }
    }
}

async fn dispatch(job_id: Uuid, config: &JobConfig, output: OutputFormat) -> CliResult<()> {
    let store = AwsCliStore::new(&config.aws_cli_path);
    let summary = run_job(job_id, config, &store).await?;
    render_summary(&summary, output)
}

/// Split `argv` (program name first) into arguments the runner recognises and
/// arguments forwarded to the germline tool.
///
/// A recognised flag is `--name value` or `--name=value` for one of the
/// runner's long flags. Unrecognised tokens, including the values following
/// unrecognised flags, are forwarded in order. `--` is dropped and forwards
/// everything after it.
///
/// Tokens are kept byte-for-byte; a token that is not UTF-8 is never a
/// runner flag.
#[must_use]
pub fn split_known_args<I, T>(args: I) -> (Vec<OsString>, Vec<OsString>)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let flags = known_flags();
    let mut args = args.into_iter().map(Into::into);
    let mut known: Vec<OsString> = args.next().into_iter().collect();
    let mut passthrough = Vec::new();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str().map(str::to_owned) else {
            passthrough.push(arg);
            continue;
        };
        if text == "--" {
            passthrough.extend(args.by_ref());
            break;
        }
        if BUILTIN_SWITCHES.contains(&text.as_str()) {
            known.push(arg);
            continue;
        }
        let (name, inline) = text
            .split_once('=')
            .map_or((text.as_str(), false), |(name, _)| (name, true));
        match flags.iter().find(|(flag, _)| flag == name) {
            Some((_, takes_value)) => {
                let wants_value = *takes_value && !inline;
                known.push(arg);
                if wants_value {
                    if let Some(value) = args.next() {
                        known.push(value);
                    }
                }
            }
            None => passthrough.push(arg),
        }
    }

    (known, passthrough)
}

fn utf8_passthrough(passthrough: Vec<OsString>) -> CliResult<Vec<String>> {
    passthrough
        .into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| {
                CliError::validation(format!(
                    "forwarded argument is not valid UTF-8: {}",
                    raw.to_string_lossy()
                ))
            })
        })
        .collect()
}

fn known_flags() -> Vec<(String, bool)> {
    Cli::command()
        .get_arguments()
        .filter_map(|arg| {
            arg.get_long()
                .map(|long| (format!("--{long}"), arg.get_action().takes_values()))
        })
        .collect()
}

#[derive(Debug, Parser)]
#[command(
    name = "germline-runner",
    version,
    args_override_self = true,
    about = "Run one Parabricks germline job: download FASTQs, run pbrun, upload results"
)]
pub(crate) struct Cli {
    #[arg(
        long = "fastq1_s3_path",
        env = "GERMLINE_FASTQ1_S3_PATH",
        value_parser = parse_s3_uri,
        help = "S3 URI of the read-1 FASTQ"
    )]
    fastq1: S3Uri,
    #[arg(
        long = "fastq2_s3_path",
        env = "GERMLINE_FASTQ2_S3_PATH",
        value_parser = parse_s3_uri,
        help = "S3 URI of the read-2 FASTQ"
    )]
    fastq2: S3Uri,
    #[arg(
        long = "output_s3_folder_path",
        env = "GERMLINE_OUTPUT_S3_FOLDER_PATH",
        value_parser = parse_s3_uri,
        help = "S3 prefix the output directory is uploaded to"
    )]
    output_folder: S3Uri,
    #[arg(long = "reference", env = "GERMLINE_REFERENCE", default_value = defaults::REFERENCE)]
    reference: PathBuf,
    #[arg(
        long = "known_sites",
        env = "GERMLINE_KNOWN_SITES",
        default_value = defaults::KNOWN_SITES
    )]
    known_sites: PathBuf,
    #[arg(long = "pbrun_path", env = "GERMLINE_PBRUN_PATH", default_value = defaults::PBRUN_PATH)]
    pbrun_path: PathBuf,
    #[arg(
        long = "num_cpu_threads",
        env = "GERMLINE_NUM_CPU_THREADS",
        default_value_t = defaults::NUM_CPU_THREADS
    )]
    num_cpu_threads: u32,
    #[arg(long = "num_gpus", env = "GERMLINE_NUM_GPUS", default_value_t = defaults::NUM_GPUS)]
    num_gpus: u32,
    #[arg(
        long = "working_dir",
        env = "GERMLINE_WORKING_DIR",
        default_value = defaults::WORKING_DIR,
        help = "Base directory scratch directories are created under"
    )]
    working_dir: PathBuf,
    #[arg(long = "aws_cli_path", env = "GERMLINE_AWS_CLI_PATH", default_value = DEFAULT_AWS_CLI)]
    aws_cli_path: PathBuf,
    #[arg(
        long = "log_level",
        env = "GERMLINE_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter used when RUST_LOG is unset"
    )]
    log_level: String,
    #[arg(
        long = "log_format",
        env = "GERMLINE_LOG_FORMAT",
        help = "Log format: pretty or json (defaults to pretty in debug builds)"
    )]
    log_format: Option<LogFormat>,
    #[arg(
        long = "output",
        env = "GERMLINE_OUTPUT",
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Format of the job summary printed on success"
    )]
    pub(crate) output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn logging_config(&self) -> LoggingConfig<'_> {
        LoggingConfig {
            level: &self.log_level,
            format: self.log_format.unwrap_or_else(LogFormat::infer),
            ..LoggingConfig::default()
        }
    }

    fn into_job_config(self, passthrough: Vec<String>) -> JobConfig {
        JobConfig {
            fastq1: self.fastq1,
            fastq2: self.fastq2,
            output: self.output_folder,
            reference: self.reference,
            known_sites: self.known_sites,
            pbrun_path: self.pbrun_path,
            aws_cli_path: self.aws_cli_path,
            num_cpu_threads: self.num_cpu_threads,
            num_gpus: self.num_gpus,
            working_dir_base: self.working_dir,
            passthrough: PassthroughArgs::from_raw(passthrough),
        }
    }
}

fn parse_s3_uri(raw: &str) -> Result<S3Uri, String> {
    S3Uri::parse(raw).map_err(|err| match err {
        StorageError::InvalidUri { reason, .. } => reason.to_string(),
        other => other.to_string(),
    })
}
