//! In-memory [`ObjectStore`] used by pipeline tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use germline_storage::{ObjectStore, S3Uri, StorageError, StorageResult, local_object_path};
use walkdir::WalkDir;

/// A transfer observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `download_file(uri, directory)`.
    DownloadFile(String, PathBuf),
    /// `download_folder(uri, directory)`.
    DownloadFolder(String, PathBuf),
    /// `upload_file(uri, local_path)`.
    UploadFile(String, PathBuf),
    /// `upload_folder(uri, local_folder, sse)`.
    UploadFolder(String, PathBuf, bool),
}

#[derive(Default)]
struct StoreState {
    objects: BTreeMap<String, Vec<u8>>,
    calls: Vec<StoreCall>,
    fail_operation: Option<&'static str>,
}

/// Object store keeping objects in memory, keyed by their `s3://` URI.
#[derive(Default)]
pub struct RecordingStore {
    state: Mutex<StoreState>,
}

impl RecordingStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object at `uri`.
    #[must_use]
    pub fn with_object(self, uri: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.lock().objects.insert(uri.to_string(), contents.into());
        self
    }

    /// Make every call of `operation` fail with a command failure.
    #[must_use]
    pub fn failing_on(self, operation: &'static str) -> Self {
        self.lock().fail_operation = Some(operation);
        self
    }

    /// Transfers observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Object contents stored at `uri`, if any.
    #[must_use]
    pub fn object(&self, uri: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(uri).cloned()
    }

    /// Every stored URI, sorted.
    #[must_use]
    pub fn uris(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, operation: &'static str, call: StoreCall) -> StorageResult<()> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.fail_operation == Some(operation) {
            return Err(StorageError::CommandFailed {
                operation,
                command: format!("recording-store {operation}"),
                code: Some(1),
                output: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

fn prefix_of(uri: &S3Uri) -> String {
    let rendered = uri.to_string();
    if rendered.ends_with('/') {
        rendered
    } else {
        format!("{rendered}/")
    }
}

fn write_local(path: &Path, contents: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| StorageError::io("create_parent", parent, source))?;
    }
    fs::write(path, contents).map_err(|source| StorageError::io("write_local", path, source))
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn download_file(&self, uri: &S3Uri, directory: &Path) -> StorageResult<PathBuf> {
        self.record(
            "download_file",
            StoreCall::DownloadFile(uri.to_string(), directory.to_path_buf()),
        )?;
        let local = local_object_path(uri, directory)?;
        let contents = self
            .object(&uri.to_string())
            .ok_or_else(|| StorageError::CommandFailed {
                operation: "download_file",
                command: format!("recording-store download {uri}"),
                code: Some(1),
                output: "object not found".to_string(),
            })?;
        write_local(&local, &contents)?;
        Ok(local)
    }

    async fn download_folder(&self, uri: &S3Uri, directory: &Path) -> StorageResult<PathBuf> {
        self.record(
            "download_folder",
            StoreCall::DownloadFolder(uri.to_string(), directory.to_path_buf()),
        )?;
        let prefix = prefix_of(uri);
        let matching: Vec<(String, Vec<u8>)> = self
            .lock()
            .objects
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|relative| (relative.to_string(), value.clone()))
            })
            .collect();
        for (relative, contents) in matching {
            write_local(&directory.join(relative), &contents)?;
        }
        Ok(directory.to_path_buf())
    }

    async fn upload_file(&self, uri: &S3Uri, local_path: &Path) -> StorageResult<()> {
        self.record(
            "upload_file",
            StoreCall::UploadFile(uri.to_string(), local_path.to_path_buf()),
        )?;
        let contents = fs::read(local_path)
            .map_err(|source| StorageError::io("read_local", local_path, source))?;
        self.lock().objects.insert(uri.to_string(), contents);
        Ok(())
    }

    async fn upload_folder(
        &self,
        uri: &S3Uri,
        local_folder: &Path,
        sse: bool,
    ) -> StorageResult<()> {
        self.record(
            "upload_folder",
            StoreCall::UploadFolder(uri.to_string(), local_folder.to_path_buf(), sse),
        )?;
        let prefix = prefix_of(uri);
        for entry in WalkDir::new(local_folder)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            let relative = entry
                .path()
                .strip_prefix(local_folder)
                .unwrap_or_else(|_| entry.path());
            let contents = fs::read(entry.path())
                .map_err(|source| StorageError::io("read_local", entry.path(), source))?;
            let key = format!("{prefix}{}", relative.to_string_lossy());
            self.lock().objects.insert(key, contents);
        }
        Ok(())
    }
}
