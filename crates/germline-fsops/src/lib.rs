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

//! Scratch directory bookkeeping for a single germline job.
//!
//! Layout: `workdir.rs` (per-job directory lifecycle), `listing.rs` (output
//! inventory), `error.rs` (fsops errors).

pub mod error;
pub mod listing;
pub mod workdir;

pub use error::{FsOpsError, FsOpsResult};
pub use listing::{LocalFile, list_files};
pub use workdir::{CleanupOutcome, WorkingDir};
