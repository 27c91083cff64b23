//! Transfer seam implemented by object-storage backends.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::uri::S3Uri;

/// Moves objects and folders between object storage and the local disk.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download a single object into `directory`, returning the local file path.
    ///
    /// The local file is named after the final segment of the object key.
    async fn download_file(&self, uri: &S3Uri, directory: &Path) -> StorageResult<PathBuf>;

    /// Recursively download every object under `uri` into `directory`.
    async fn download_folder(&self, uri: &S3Uri, directory: &Path) -> StorageResult<PathBuf>;

    /// Upload a single local file with AES256 server-side encryption.
    async fn upload_file(&self, uri: &S3Uri, local_path: &Path) -> StorageResult<()>;

    /// Recursively upload a local folder, optionally requesting server-side encryption.
    async fn upload_folder(&self, uri: &S3Uri, local_folder: &Path, sse: bool)
    -> StorageResult<()>;
}

/// Local destination for a single-object download into `directory`.
///
/// # Errors
///
/// Returns an error when the key has no final file name segment.
pub fn local_object_path(uri: &S3Uri, directory: &Path) -> StorageResult<PathBuf> {
    Ok(directory.join(uri.object_name()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_object_path_uses_final_key_segment() -> StorageResult<()> {
        let uri = S3Uri::parse("s3://bucket/a/b/sample_R2.fastq.gz")?;
        let path = local_object_path(&uri, Path::new("/scratch/job/fastq"))?;
        assert_eq!(path, PathBuf::from("/scratch/job/fastq/sample_R2.fastq.gz"));
        Ok(())
    }

    #[test]
    fn local_object_path_rejects_prefixes() -> StorageResult<()> {
        let uri = S3Uri::parse("s3://bucket/a/b/")?;
        assert!(local_object_path(&uri, Path::new("/scratch")).is_err());
        Ok(())
    }
}
