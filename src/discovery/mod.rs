// src/discovery/mod.rs

//! Run discovery.
//!
//! Lists the configured parent directory and decides, entry by entry, whether
//! it is a sequencing run that is ready for analysis. Every entry produces
//! one [`Discovery`]: either `Ready` with the run descriptor, or `Skipped`
//! with the conditions that were checked.
//!
//! - [`run_id`] holds the instrument naming conventions.
//! - [`scan`] owns the lazy [`RunScan`] iterator and the eligibility policy.

use std::path::PathBuf;

use crate::types::{InstrumentType, RunField};

pub mod run_id;
pub mod scan;

pub use run_id::{classify_run_id, matches_run_id_format};
pub use scan::{find_run_dirs, scan, DiscoveryOptions, RunScan};

/// Marker written by the upstream linking process once a run directory is
/// fully populated.
pub const SYMLINKS_COMPLETE_FILE: &str = "symlinks_complete.json";

/// A run directory that is ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    pub sequencing_run_id: String,
    pub instrument_type: InstrumentType,
    /// Absolute path of the run directory.
    pub run_dir: PathBuf,
}

impl RunDirectory {
    /// Value of a descriptor field, for the fields a run directory owns.
    ///
    /// `fastq_input` and `outdir` are dispatch-time fields and return `None`.
    pub fn field(&self, field: RunField) -> Option<String> {
        match field {
            RunField::SequencingRunId => Some(self.sequencing_run_id.clone()),
            RunField::RunDir => Some(self.run_dir.display().to_string()),
            RunField::InstrumentType => Some(self.instrument_type.to_string()),
            RunField::FastqInput | RunField::Outdir => None,
        }
    }
}

/// Conditions evaluated for one directory entry during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityCheck {
    pub is_directory: bool,
    pub matches_nanopore_run_id_format: bool,
    pub analysis_not_already_initiated: bool,
    pub not_excluded: bool,
    /// `None` when the symlinks-complete check is disabled.
    pub symlinks_complete: Option<bool>,
}

impl EligibilityCheck {
    /// True iff every checked condition holds.
    pub fn is_eligible(&self) -> bool {
        self.is_directory
            && self.matches_nanopore_run_id_format
            && self.analysis_not_already_initiated
            && self.not_excluded
            && self.symlinks_complete.unwrap_or(true)
    }
}

/// An entry that was not ready, with the reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDirectory {
    pub path: PathBuf,
    pub checks: EligibilityCheck,
}

/// Outcome of evaluating a single entry of the run parent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Ready(RunDirectory),
    Skipped(SkippedDirectory),
}

impl Discovery {
    pub fn ready(self) -> Option<RunDirectory> {
        match self {
            Discovery::Ready(run) => Some(run),
            Discovery::Skipped(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Discovery::Ready(_))
    }
}
