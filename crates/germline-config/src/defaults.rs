//! Default paths and resource counts.
//!
//! # Design
//! - Values match a `g4dn.12xlarge` host with references staged on local NVMe.
//! - Exposed as `&str`/`u32` constants so clap can use them as `default_value`s.

/// Local reference genome FASTA.
pub const REFERENCE: &str = "/mnt/disks/local/reference/Homo_sapiens_assembly38.fasta";
/// Local known-indels VCF handed to `--knownSites`.
pub const KNOWN_SITES: &str =
    "/mnt/disks/local/reference/Homo_sapiens_assembly38.known_indels.vcf.gz";
/// Location of the `pbrun` launcher.
pub const PBRUN_PATH: &str = "/opt/parabricks/pbrun";
/// Base directory that scratch directories are created under.
pub const WORKING_DIR: &str = "/mnt/disks/local";
/// CPU threads handed to the germline pipeline.
pub const NUM_CPU_THREADS: u32 = 16;
/// GPUs handed to the germline pipeline.
pub const NUM_GPUS: u32 = 4;
