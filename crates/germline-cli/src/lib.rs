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
#![allow(clippy::redundant_pub_crate)]

//! Command-line entry point for running one germline job.
//!
//! Layout:
//! - `cli.rs`: argument parsing, known/pass-through splitting and job dispatch
//! - `client.rs`: CLI error type and exit codes
//! - `output.rs`: job summary renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod output;

pub use cli::{run, run_with_args, split_known_args};
