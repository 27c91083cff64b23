//! Output file names inside the job's `output/` directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Aligned reads.
pub const BAM_FILE: &str = "output.bam";
/// Variant calls when `--gvcf` is not requested.
pub const VCF_FILE: &str = "output.vcf";
/// Variant calls when `--gvcf` is requested.
pub const GVCF_FILE: &str = "output.g.vcf.gz";
/// Base quality recalibration report.
pub const RECAL_REPORT_FILE: &str = "report.txt";

/// Where the tool writes its results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLayout {
    /// Output directory uploaded at the end of the job.
    pub dir: PathBuf,
    /// `--out-bam` target.
    pub bam: PathBuf,
    /// `--out-variants` target.
    pub variants: PathBuf,
    /// `--out-recal-file` target.
    pub recal_report: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `dir`; `gvcf` selects the gzipped gVCF variants name.
    #[must_use]
    pub fn for_dir(dir: &Path, gvcf: bool) -> Self {
        let variants = if gvcf { GVCF_FILE } else { VCF_FILE };
        Self {
            dir: dir.to_path_buf(),
            bam: dir.join(BAM_FILE),
            variants: dir.join(variants),
            recal_report: dir.join(RECAL_REPORT_FILE),
        }
    }
}
