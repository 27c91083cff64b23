//! Job summary renderers.

use std::fmt::Write as _;

use anyhow::anyhow;
use germline_app::{JobSummary, StepStatus};
use germline_fsops::CleanupOutcome;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_summary(summary: &JobSummary, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", summary_json(summary)?),
        OutputFormat::Text => print!("{}", summary_text(summary)),
    }
    Ok(())
}

fn summary_json(summary: &JobSummary) -> CliResult<String> {
    serde_json::to_string_pretty(summary)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn summary_text(summary: &JobSummary) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "job: {}", summary.job_id);
    let _ = writeln!(text, "working dir: {}", summary.working_dir.display());
    let _ = writeln!(text, "command: {}", summary.command);
    let _ = writeln!(text, "variants: {}", summary.variants_file.display());
    let _ = writeln!(
        text,
        "uploaded: {} files ({}) to {}",
        summary.uploaded_files.len(),
        format_bytes(summary.uploaded_bytes()),
        summary.output_uri
    );
    let _ = writeln!(text, "cleanup: {}", cleanup_label(summary.cleanup));
    for record in &summary.steps {
        let elapsed = (record.finished_at - record.started_at).num_milliseconds();
        let status = match record.status {
            StepStatus::Completed => "ok",
            StepStatus::Failed => "failed",
        };
        let _ = writeln!(
            text,
            "  {:<20} {:<6} {:>8}ms",
            record.step.as_str(),
            status,
            elapsed
        );
    }
    text
}

const fn cleanup_label(outcome: CleanupOutcome) -> &'static str {
    match outcome {
        CleanupOutcome::Removed => "removed",
        CleanupOutcome::KeptBaseDirectory => "kept (shared base directory)",
        CleanupOutcome::Failed => "failed (see log)",
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;
    if value >= GIB {
        format!("{:.2} GiB", value / GIB)
    } else if value >= MIB {
        format!("{:.2} MiB", value / MIB)
    } else if value >= KIB {
        format!("{:.2} KiB", value / KIB)
    } else {
        format!("{bytes} B")
    }
}
