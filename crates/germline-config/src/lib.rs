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

//! Typed job configuration for the germline runner.
//!
//! Layout: `defaults.rs` (default paths and resource counts), `model.rs`
//! (`JobConfig` and `PassthroughArgs`), `validate.rs` (field validation),
//! `error.rs` (configuration errors).

pub mod defaults;
pub mod error;
pub mod model;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{GVCF_FLAG, JobConfig, PassthroughArgs};
