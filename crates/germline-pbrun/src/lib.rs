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

//! `pbrun germline` invocation: output layout, argument assembly and execution.
//!
//! Layout: `layout.rs` (output file names), `invocation.rs` (argument
//! assembly and process execution), `error.rs` (execution errors).

pub mod error;
pub mod invocation;
pub mod layout;

pub use error::{PbrunError, PbrunResult};
pub use invocation::{GERMLINE_SUBCOMMAND, GermlineInvocation};
pub use layout::OutputLayout;
