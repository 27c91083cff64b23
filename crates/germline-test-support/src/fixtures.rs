//! Stub executables and scratch directories.
//!
//! Stubs are POSIX shell scripts. Every invocation appends its argv to a log
//! file, one argument per line, terminated by [`INVOCATION_END`], so tests can
//! assert on exactly what the runner executed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Line written after the last argument of each recorded invocation.
pub const INVOCATION_END: &str = "--end-of-invocation--";

/// Create a scratch directory for a test.
///
/// # Errors
///
/// Returns an error if the temporary directory cannot be created.
pub fn scratch_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("germline-test-")
        .tempdir()
        .context("failed to create scratch directory")
}

/// Handle to a stub executable and the log of its invocations.
#[derive(Debug, Clone)]
pub struct StubProgram {
    /// Path of the executable script.
    pub path: PathBuf,
    /// Path of the argv log the script appends to.
    pub log: PathBuf,
}

impl StubProgram {
    /// Arguments of every recorded invocation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn invocations(&self) -> Result<Vec<Vec<String>>> {
        if !self.log.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.log)
            .with_context(|| format!("failed to read stub log {}", self.log.display()))?;
        let mut calls = Vec::new();
        let mut current = Vec::new();
        for line in raw.lines() {
            if line == INVOCATION_END {
                calls.push(std::mem::take(&mut current));
            } else {
                current.push(line.to_string());
            }
        }
        Ok(calls)
    }

    /// Working directory recorded by stubs that log their cwd.
    ///
    /// # Errors
    ///
    /// Returns an error if the cwd log cannot be read.
    pub fn recorded_cwd(&self) -> Result<PathBuf> {
        let path = self.log.with_extension("cwd");
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read cwd log {}", path.display()))?;
        Ok(PathBuf::from(raw.trim()))
    }
}

/// Write an executable shell script into `dir`.
///
/// # Errors
///
/// Returns an error if the script cannot be written or made executable.
pub fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}"))
        .with_context(|| format!("failed to write stub {}", path.display()))?;
    #[cfg(unix)]
    {
        let mut permissions = fs::metadata(&path)?.permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions)
            .with_context(|| format!("failed to mark {} executable", path.display()))?;
    }
    Ok(path)
}

fn record_args_snippet(log: &Path) -> String {
    format!(
        "{{ for arg in \"$@\"; do printf '%s\\n' \"$arg\"; done; printf '%s\\n' '{INVOCATION_END}'; }} >> '{}'\npwd > '{}'\n",
        log.display(),
        log.with_extension("cwd").display()
    )
}

/// Stub that records its arguments, prints to both streams and exits with `exit_code`.
///
/// # Errors
///
/// Returns an error if the stub cannot be written.
pub fn recording_stub(dir: &Path, name: &str, exit_code: i32) -> Result<StubProgram> {
    let log = dir.join(format!("{name}.args"));
    let body = format!(
        "{}echo \"{name} stdout\"\necho \"{name} stderr\" >&2\nexit {exit_code}\n",
        record_args_snippet(&log)
    );
    let path = write_script(dir, name, &body)?;
    Ok(StubProgram { path, log })
}

/// Stub for `aws s3 cp` that maps `s3://bucket/key` onto `bucket_root/bucket/key`.
///
/// Supports single-object and `--recursive` copies in either direction and
/// ignores trailing flags such as `--sse`.
///
/// # Errors
///
/// Returns an error if the stub cannot be written.
pub fn fake_aws(dir: &Path, bucket_root: &Path) -> Result<StubProgram> {
    let log = dir.join("aws.args");
    let body = format!(
        r#"{record}
shift 2
recursive=0
if [ "$1" = "--recursive" ]; then recursive=1; shift; fi
map() {{
  case "$1" in
    s3://*) printf '%s/%s' '{root}' "${{1#s3://}}" ;;
    *) printf '%s' "$1" ;;
  esac
}}
src=$(map "$1")
dst=$(map "$2")
if [ "$recursive" = 1 ]; then
  mkdir -p "$dst" && cp -R "$src"/. "$dst"/
else
  mkdir -p "$(dirname "$dst")" && cp "$src" "$dst"
fi
"#,
        record = record_args_snippet(&log),
        root = bucket_root.display()
    );
    let path = write_script(dir, "aws", &body)?;
    Ok(StubProgram { path, log })
}

/// Stub for `pbrun` that touches every `--out-*` path it is handed.
///
/// # Errors
///
/// Returns an error if the stub cannot be written.
pub fn fake_pbrun(dir: &Path) -> Result<StubProgram> {
    let log = dir.join("pbrun.args");
    let body = format!(
        r#"{record}
while [ "$#" -gt 0 ]; do
  case "$1" in
    --out-bam|--out-variants|--out-recal-file)
      shift
      mkdir -p "$(dirname "$1")"
      echo "generated by pbrun stub" > "$1"
      ;;
  esac
  shift
done
echo "pbrun germline finished"
"#,
        record = record_args_snippet(&log)
    );
    let path = write_script(dir, "pbrun", &body)?;
    Ok(StubProgram { path, log })
}

/// Place `contents` at the local path backing `s3://bucket/key` for [`fake_aws`].
///
/// # Errors
///
/// Returns an error if the object cannot be written.
pub fn seed_object(bucket_root: &Path, bucket: &str, key: &str, contents: &str) -> Result<PathBuf> {
    let path = bucket_root.join(bucket).join(key);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents).with_context(|| format!("failed to seed {}", path.display()))?;
    Ok(path)
}
