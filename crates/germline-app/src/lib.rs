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

//! Germline job pipeline: stage inputs, run the tool, publish results.
//!
//! Layout: `pipeline.rs` (the five job steps), `steps.rs` (step bookkeeping),
//! `summary.rs` (job summary), `error.rs` (application errors).

pub mod error;
pub mod pipeline;
pub mod steps;
pub mod summary;

pub use error::{AppError, AppResult};
pub use pipeline::{FASTQ_DIR, OUTPUT_DIR, download_fastq_files, run_job, upload_output};
pub use steps::{StepKind, StepRecord, StepStatus};
pub use summary::JobSummary;
