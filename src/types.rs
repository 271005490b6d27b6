use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Instrument product line, derived from a run directory's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentType {
    Gridion,
    Promethion,
    Unknown,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::Gridion => "gridion",
            InstrumentType::Promethion => "promethion",
            InstrumentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How discovery decides that analysis of a run was already initiated.
///
/// - `PerRun`: any entry at `<analysis_output_dir>/<run_id>` blocks the run
///   for every pipeline (default).
/// - `PerPipeline`: the run stays eligible until every configured pipeline
///   has written its completion marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityMode {
    #[default]
    PerRun,
    PerPipeline,
}

impl FromStr for EligibilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per_run" => Ok(EligibilityMode::PerRun),
            "per_pipeline" => Ok(EligibilityMode::PerPipeline),
            other => Err(format!(
                "invalid eligibility: {other} (expected \"per_run\" or \"per_pipeline\")"
            )),
        }
    }
}

/// What happens to the work directory of a failed pipeline attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkDirRetention {
    /// Leave it in place for inspection (default).
    #[default]
    Keep,
    /// Delete it, the same way a successful attempt's work dir is deleted.
    Delete,
}

impl FromStr for WorkDirRetention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(WorkDirRetention::Keep),
            "delete" => Ok(WorkDirRetention::Delete),
            other => Err(format!(
                "invalid failed_work_dir_retention: {other} (expected \"keep\" or \"delete\")"
            )),
        }
    }
}

/// A field of the run descriptor that a pipeline parameter can take its
/// value from.
///
/// `FastqInput` and `Outdir` only exist at dispatch time: they resolve to the
/// run directory and to the pipeline's output directory respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunField {
    SequencingRunId,
    RunDir,
    InstrumentType,
    FastqInput,
    Outdir,
}

impl RunField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunField::SequencingRunId => "sequencing_run_id",
            RunField::RunDir => "run_dir",
            RunField::InstrumentType => "instrument_type",
            RunField::FastqInput => "fastq_input",
            RunField::Outdir => "outdir",
        }
    }
}

impl fmt::Display for RunField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sequencing_run_id" => Ok(RunField::SequencingRunId),
            "run_dir" => Ok(RunField::RunDir),
            "instrument_type" => Ok(RunField::InstrumentType),
            "fastq_input" => Ok(RunField::FastqInput),
            "outdir" => Ok(RunField::Outdir),
            other => Err(other.to_string()),
        }
    }
}
