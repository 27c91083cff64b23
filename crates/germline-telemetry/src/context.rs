//! Job-level span helpers.
//!
//! # Design
//! - One runner process executes exactly one job, so the job span is entered
//!   once and held for the lifetime of the process.
//! - Step names are recorded on the current span as the pipeline advances.

use tracing::{Span, span::Entered};
use uuid::Uuid;

use crate::init::build_sha;

/// Guard that keeps the job-level span entered for the lifetime of the process.
pub struct JobSpanGuard {
    _guard: Entered<'static>,
}

impl JobSpanGuard {
    /// Enter the job span, tagging every event with the job id and build SHA.
    #[must_use]
    pub fn new(job_id: Uuid) -> Self {
        let span: &'static Span = Box::leak(Box::new(tracing::info_span!(
            "job",
            job_id = %job_id,
            build_sha = %build_sha(),
            step = tracing::field::Empty,
        )));
        let guard = span.enter();
        Self { _guard: guard }
    }
}

/// Record the pipeline step currently executing on the active span.
pub fn record_job_step(step: &str) {
    Span::current().record("step", tracing::field::display(step));
}
