//! [`ObjectStore`] backed by the `aws s3 cp` command.
//!
//! # Design
//! - Every transfer is one blocking child process awaited to completion.
//! - stdout and stderr are captured; they are logged at debug level on
//!   success and carried inside the error on failure.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::store::{ObjectStore, local_object_path};
use crate::uri::S3Uri;

/// Program name used when no explicit AWS CLI path is configured.
pub const DEFAULT_AWS_CLI: &str = "aws";

/// Server-side encryption algorithm requested for single-file uploads.
pub const SSE_ALGORITHM: &str = "AES256";

/// Object store that shells out to the AWS command-line interface.
#[derive(Debug, Clone)]
pub struct AwsCliStore {
    program: PathBuf,
}

impl Default for AwsCliStore {
    fn default() -> Self {
        Self::new(DEFAULT_AWS_CLI)
    }
}

impl AwsCliStore {
    /// Create a store that invokes the given `aws` executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program invoked for transfers.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn run(&self, operation: &'static str, args: Vec<OsString>) -> StorageResult<()> {
        let command = render_command(&self.program, &args);
        info!(operation, command = %command, "running object storage transfer");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| StorageError::Spawn {
                operation,
                program: self.program.clone(),
                source,
            })?;

        let captured = combine_output(&output.stdout, &output.stderr);
        if output.status.success() {
            if !captured.is_empty() {
                debug!(operation, output = %captured, "transfer output");
            }
            Ok(())
        } else {
            Err(StorageError::CommandFailed {
                operation,
                command,
                code: output.status.code(),
                output: captured,
            })
        }
    }
}

#[async_trait]
impl ObjectStore for AwsCliStore {
    async fn download_file(&self, uri: &S3Uri, directory: &Path) -> StorageResult<PathBuf> {
        let local = local_object_path(uri, directory)?;
        self.run("download_file", download_file_args(uri, &local))
            .await?;
        Ok(local)
    }

    async fn download_folder(&self, uri: &S3Uri, directory: &Path) -> StorageResult<PathBuf> {
        self.run("download_folder", download_folder_args(uri, directory))
            .await?;
        Ok(directory.to_path_buf())
    }

    async fn upload_file(&self, uri: &S3Uri, local_path: &Path) -> StorageResult<()> {
        self.run("upload_file", upload_file_args(uri, local_path))
            .await
    }

    async fn upload_folder(
        &self,
        uri: &S3Uri,
        local_folder: &Path,
        sse: bool,
    ) -> StorageResult<()> {
        self.run("upload_folder", upload_folder_args(uri, local_folder, sse))
            .await
    }
}

fn download_file_args(uri: &S3Uri, local: &Path) -> Vec<OsString> {
    vec![
        "s3".into(),
        "cp".into(),
        uri.to_string().into(),
        local.as_os_str().to_owned(),
    ]
}

fn download_folder_args(uri: &S3Uri, directory: &Path) -> Vec<OsString> {
    vec![
        "s3".into(),
        "cp".into(),
        "--recursive".into(),
        uri.to_string().into(),
        directory.as_os_str().to_owned(),
    ]
}

fn upload_file_args(uri: &S3Uri, local: &Path) -> Vec<OsString> {
    vec![
        "s3".into(),
        "cp".into(),
        local.as_os_str().to_owned(),
        uri.to_string().into(),
        "--sse".into(),
        SSE_ALGORITHM.into(),
    ]
}

fn upload_folder_args(uri: &S3Uri, local_folder: &Path, sse: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "s3".into(),
        "cp".into(),
        "--recursive".into(),
        local_folder.as_os_str().to_owned(),
        uri.to_string().into(),
    ];
    if sse {
        args.push("--sse".into());
    }
    args
}

fn render_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    [stdout.trim_end(), stderr.trim_end()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(value: &str) -> S3Uri {
        S3Uri::parse(value).expect("valid uri")
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn download_file_targets_local_object_path() {
        let args = download_file_args(
            &uri("s3://reads/run1/r1.fq.gz"),
            Path::new("/scratch/fastq/r1.fq.gz"),
        );
        assert_eq!(
            strings(&args),
            ["s3", "cp", "s3://reads/run1/r1.fq.gz", "/scratch/fastq/r1.fq.gz"]
        );
    }

    #[test]
    fn folder_transfers_are_recursive() {
        let down = download_folder_args(&uri("s3://ref/hg38/"), Path::new("/scratch/ref"));
        assert_eq!(
            strings(&down),
            ["s3", "cp", "--recursive", "s3://ref/hg38/", "/scratch/ref"]
        );

        let up = upload_folder_args(&uri("s3://out/sample/"), Path::new("/scratch/output"), true);
        assert_eq!(
            strings(&up),
            [
                "s3",
                "cp",
                "--recursive",
                "/scratch/output",
                "s3://out/sample/",
                "--sse"
            ]
        );

        let plain = upload_folder_args(&uri("s3://out/sample/"), Path::new("/o"), false);
        assert!(!strings(&plain).contains(&"--sse".to_string()));
    }

    #[test]
    fn single_uploads_request_aes256() {
        let args = upload_file_args(&uri("s3://out/report.txt"), Path::new("/o/report.txt"));
        assert_eq!(
            strings(&args),
            ["s3", "cp", "/o/report.txt", "s3://out/report.txt", "--sse", "AES256"]
        );
    }

    #[test]
    fn render_command_joins_program_and_args() {
        let args = download_folder_args(&uri("s3://a/b/"), Path::new("/c"));
        assert_eq!(
            render_command(Path::new("/usr/bin/aws"), &args),
            "/usr/bin/aws s3 cp --recursive s3://a/b/ /c"
        );
    }

    #[test]
    fn combine_output_skips_empty_streams() {
        assert_eq!(combine_output(b"", b""), "");
        assert_eq!(combine_output(b"done\n", b""), "done");
        assert_eq!(combine_output(b"out\n", b"err\n"), "out\nerr");
    }

    #[test]
    fn default_store_invokes_aws() {
        assert_eq!(AwsCliStore::default().program(), Path::new(DEFAULT_AWS_CLI));
    }
}
