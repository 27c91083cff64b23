//! Inventory of the files produced under a directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{FsOpsError, FsOpsResult};

/// A regular file found under a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFile {
    /// Path relative to the listed directory.
    pub relative: PathBuf,
    /// Size in bytes.
    pub bytes: u64,
}

/// Regular files under `dir`, sorted by relative path.
///
/// # Errors
///
/// Returns an error if `dir` cannot be traversed.
pub fn list_files(dir: &Path) -> FsOpsResult<Vec<LocalFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| FsOpsError::walkdir("list_files", dir, source))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = entry
            .metadata()
            .map_err(|source| FsOpsError::walkdir("list_files", entry.path(), source))?
            .len();
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_or_else(|_| entry.path().to_path_buf(), Path::to_path_buf);
        files.push(LocalFile { relative, bytes });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    #[test]
    fn list_files_reports_nested_files_with_sizes() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("output.bam"), "bam!")?;
        fs::create_dir(temp.path().join("logs"))?;
        fs::write(temp.path().join("logs").join("run.log"), "ok")?;

        let files = list_files(temp.path())?;
        assert_eq!(
            files,
            vec![
                LocalFile {
                    relative: PathBuf::from("logs/run.log"),
                    bytes: 2,
                },
                LocalFile {
                    relative: PathBuf::from("output.bam"),
                    bytes: 4,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn list_files_fails_for_missing_directory() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let err = list_files(&temp.path().join("absent")).expect_err("missing dir");
        assert!(matches!(err, FsOpsError::Walkdir { .. }));
        Ok(())
    }
}
