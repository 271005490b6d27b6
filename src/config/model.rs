// src/config/model.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::types::{EligibilityMode, RunField, WorkDirRetention};

/// Configuration as read from disk, before validation.
///
/// ```toml
/// fastq_by_run_dir = "/data/fastq_symlinks_by_run"
/// analysis_output_dir = "/data/analysis_by_run"
/// analysis_work_dir = "/scratch/work"
/// excluded_runs = ["20230101_1200_X1_ABCDEFGH_abcdefgh"]
///
/// [[pipelines]]
/// pipeline_name = "BCCDC-PHL/routine-nanopore-qc-nf"
/// pipeline_version = "v0.1.1"
///
/// [pipelines.pipeline_parameters]
/// fastq_input = { from_run = "fastq_input" }
/// outdir = { from_run = "outdir" }
/// min_read_length = 500
/// ```
///
/// JSON configs use the same keys; a `null` parameter value takes the run
/// field named like the flag.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    pub fastq_by_run_dir: PathBuf,
    pub analysis_output_dir: PathBuf,
    pub analysis_work_dir: PathBuf,

    /// Pipelines, run in this order against every ready run.
    #[serde(default)]
    pub pipelines: Vec<RawPipelineConfig>,

    #[serde(default)]
    pub excluded_runs: Option<BTreeSet<String>>,

    #[serde(default)]
    pub notification_email_addresses: Option<Vec<String>>,

    #[serde(default)]
    pub send_notification_emails: Option<bool>,

    /// Seconds to sleep between scan passes.
    #[serde(default = "default_scan_interval_seconds")]
    pub scan_interval_seconds: u64,

    /// Require `symlinks_complete.json` inside a run directory.
    #[serde(default = "default_check_symlinks_complete")]
    pub check_symlinks_complete: bool,

    #[serde(default)]
    pub eligibility: EligibilityMode,

    #[serde(default)]
    pub failed_work_dir_retention: WorkDirRetention,

    /// Package cache handed to the engine; `~/.conda/envs` if unset.
    #[serde(default)]
    pub conda_cache_dir: Option<PathBuf>,

    #[serde(default = "default_nextflow_executable")]
    pub nextflow_executable: String,
}

fn default_scan_interval_seconds() -> u64 {
    3600
}

fn default_check_symlinks_complete() -> bool {
    true
}

fn default_nextflow_executable() -> String {
    "nextflow".to_string()
}

/// One `[[pipelines]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPipelineConfig {
    pub pipeline_name: String,
    pub pipeline_version: String,

    /// Flag name → value, in file order. `None` only comes from a JSON `null`.
    #[serde(default)]
    pub pipeline_parameters: IndexMap<String, Option<RawParameterValue>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawParameterValue {
    FromRun { from_run: String },
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

/// Validated application configuration.
///
/// Built once per load via `Config::try_from(raw)`; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub fastq_by_run_dir: PathBuf,
    pub analysis_output_dir: PathBuf,
    pub analysis_work_dir: PathBuf,
    pub pipelines: Vec<PipelineConfig>,
    pub excluded_runs: BTreeSet<String>,
    pub notification_email_addresses: Vec<String>,
    pub send_notification_emails: bool,
    pub scan_interval_seconds: u64,
    pub check_symlinks_complete: bool,
    pub eligibility: EligibilityMode,
    pub failed_work_dir_retention: WorkDirRetention,
    pub conda_cache_dir: PathBuf,
    pub nextflow_executable: String,
}

impl Config {
    /// Addresses to pass to the engine, or `None` when notifications are off.
    pub fn notification_recipients(&self) -> Option<&[String]> {
        if self.send_notification_emails && !self.notification_email_addresses.is_empty() {
            Some(&self.notification_email_addresses)
        } else {
            None
        }
    }
}

/// A configured analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// `<organization>/<name>`, as understood by `nextflow run`.
    pub pipeline_name: String,
    pub pipeline_version: String,
    /// Emitted as `--<flag> <value>` in this order.
    pub pipeline_parameters: IndexMap<String, PipelineParameter>,
}

impl PipelineConfig {
    /// Second path segment of the name with `_` replaced by `-`.
    pub fn short_name(&self) -> String {
        self.pipeline_name
            .split('/')
            .nth(1)
            .unwrap_or(self.pipeline_name.as_str())
            .replace('_', "-")
    }

    /// First two dot-separated components of the version (`v0.1.1` → `v0.1`).
    pub fn minor_version(&self) -> String {
        self.pipeline_version
            .split('.')
            .take(2)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Name of this pipeline's directory under `<analysis_output_dir>/<run_id>`.
    pub fn output_dir_name(&self) -> String {
        format!("{}-{}-output", self.short_name(), self.minor_version())
    }
}

/// Value of a single `--<flag>` passed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineParameter {
    Literal(String),
    FromRunField(RunField),
}
