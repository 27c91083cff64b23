//! `s3://bucket/key` addressing.
//!
//! The bucket is the first path segment after the scheme and the key is
//! everything after it, verbatim. A trailing slash on the key is kept so
//! folder prefixes render exactly as they were supplied.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// URI scheme accepted for object storage locations.
pub const S3_SCHEME: &str = "s3://";

/// Parsed object-storage location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct S3Uri {
    bucket: String,
    key: String,
}

impl S3Uri {
    /// Parse an `s3://bucket/key` string.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidUri`] when the scheme or bucket is missing.
    pub fn parse(value: &str) -> StorageResult<Self> {
        let trimmed = value.trim();
        let rest = trimmed
            .strip_prefix(S3_SCHEME)
            .ok_or_else(|| StorageError::invalid_uri(trimmed, "missing s3:// scheme"))?;
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(StorageError::invalid_uri(trimmed, "missing bucket name"));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Bucket component.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key component, possibly empty for a bucket root.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Final segment of the key, used as the local file name of a download.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidUri`] when the key is empty or ends with
    /// a slash, since there is no object name to materialise.
    pub fn object_name(&self) -> StorageResult<&str> {
        match self.key.rsplit('/').next() {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(StorageError::invalid_uri(
                self.to_string(),
                "object key has no file name",
            )),
        }
    }
}

impl Display for S3Uri {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{S3_SCHEME}{}/{}", self.bucket, self.key)
    }
}

impl FromStr for S3Uri {
    type Err = StorageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for S3Uri {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<S3Uri> for String {
    fn from(uri: S3Uri) -> Self {
        uri.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_bucket_and_key() -> StorageResult<()> {
        let uri = S3Uri::parse("s3://genomes/runs/sample-1/reads_R1.fastq.gz")?;
        assert_eq!(uri.bucket(), "genomes");
        assert_eq!(uri.key(), "runs/sample-1/reads_R1.fastq.gz");
        assert_eq!(uri.object_name()?, "reads_R1.fastq.gz");
        Ok(())
    }

    #[test]
    fn object_name_is_last_key_segment() -> StorageResult<()> {
        assert_eq!(S3Uri::parse("s3://b/top.fq")?.object_name()?, "top.fq");
        assert_eq!(S3Uri::parse("s3://b/a/b/c/deep.fq")?.object_name()?, "deep.fq");
        Ok(())
    }

    #[test]
    fn folder_prefixes_have_no_object_name() -> StorageResult<()> {
        let folder = S3Uri::parse("s3://results/sample-1/")?;
        assert_eq!(folder.key(), "sample-1/");
        assert!(matches!(
            folder.object_name(),
            Err(StorageError::InvalidUri {
                reason: "object key has no file name",
                ..
            })
        ));
        let root = S3Uri::parse("s3://results")?;
        assert_eq!(root.key(), "");
        assert!(root.object_name().is_err());
        Ok(())
    }

    #[test]
    fn display_preserves_supplied_form() -> StorageResult<()> {
        for raw in [
            "s3://bucket/key.fq",
            "s3://bucket/prefix/",
            "s3://bucket/nested/prefix/file.vcf.gz",
        ] {
            assert_eq!(S3Uri::parse(raw)?.to_string(), raw);
        }
        assert_eq!(S3Uri::parse("s3://bucket")?.to_string(), "s3://bucket/");
        Ok(())
    }

    #[test]
    fn parse_rejects_missing_scheme_and_bucket() {
        assert!(matches!(
            S3Uri::parse("https://bucket/key"),
            Err(StorageError::InvalidUri {
                reason: "missing s3:// scheme",
                ..
            })
        ));
        assert!(matches!(
            S3Uri::parse("s3:///key"),
            Err(StorageError::InvalidUri {
                reason: "missing bucket name",
                ..
            })
        ));
    }

    #[test]
    fn serde_uses_string_form() -> Result<(), Box<dyn std::error::Error>> {
        let uri = S3Uri::parse("s3://bucket/out/")?;
        let encoded = serde_json::to_string(&uri)?;
        assert_eq!(encoded, "\"s3://bucket/out/\"");
        let decoded: S3Uri = serde_json::from_str(&encoded)?;
        assert_eq!(decoded, uri);
        assert!(serde_json::from_str::<S3Uri>("\"gs://bucket/x\"").is_err());
        Ok(())
    }
}
