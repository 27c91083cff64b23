#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

//! Object-storage addressing and transfers for the germline runner.
//!
//! Layout: `uri.rs` (`s3://` URI parsing), `store.rs` (the `ObjectStore`
//! seam), `aws_cli.rs` (transfers through the `aws s3 cp` command),
//! `error.rs` (storage errors).

pub mod aws_cli;
pub mod error;
pub mod store;
pub mod uri;

pub use aws_cli::{AwsCliStore, DEFAULT_AWS_CLI, SSE_ALGORITHM};
pub use error::{StorageError, StorageResult};
pub use store::{ObjectStore, local_object_path};
pub use uri::{S3_SCHEME, S3Uri};
