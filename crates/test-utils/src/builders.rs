#![allow(dead_code)]

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use nanopore_qc_dispatch::config::{Config, RawConfig, RawParameterValue, RawPipelineConfig};
use nanopore_qc_dispatch::types::{EligibilityMode, WorkDirRetention};

/// Builder for `Config` rooted in a scratch directory.
///
/// Runs live in `<root>/runs`, outputs in `<root>/out`, work dirs in
/// `<root>/work`.
pub struct ConfigBuilder {
    config: RawConfig,
}

impl ConfigBuilder {
    pub fn new(root: &Path) -> Self {
        Self {
            config: RawConfig {
                fastq_by_run_dir: root.join("runs"),
                analysis_output_dir: root.join("out"),
                analysis_work_dir: root.join("work"),
                pipelines: Vec::new(),
                excluded_runs: None,
                notification_email_addresses: None,
                send_notification_emails: None,
                scan_interval_seconds: 60,
                check_symlinks_complete: true,
                eligibility: EligibilityMode::PerRun,
                failed_work_dir_retention: WorkDirRetention::Keep,
                conda_cache_dir: Some(root.join("conda")),
                nextflow_executable: "nextflow".to_string(),
            },
        }
    }

    pub fn with_pipeline(mut self, pipeline: RawPipelineConfig) -> Self {
        self.config.pipelines.push(pipeline);
        self
    }

    pub fn exclude(mut self, run_id: &str) -> Self {
        self.config
            .excluded_runs
            .get_or_insert_with(Default::default)
            .insert(run_id.to_string());
        self
    }

    pub fn check_symlinks_complete(mut self, val: bool) -> Self {
        self.config.check_symlinks_complete = val;
        self
    }

    pub fn eligibility(mut self, mode: EligibilityMode) -> Self {
        self.config.eligibility = mode;
        self
    }

    pub fn failed_work_dir_retention(mut self, retention: WorkDirRetention) -> Self {
        self.config.failed_work_dir_retention = retention;
        self
    }

    pub fn nextflow_executable(mut self, program: impl Into<String>) -> Self {
        self.config.nextflow_executable = program.into();
        self
    }

    pub fn notify(mut self, addresses: &[&str]) -> Self {
        self.config.send_notification_emails = Some(true);
        self.config.notification_email_addresses =
            Some(addresses.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn raw(self) -> RawConfig {
        self.config
    }

    pub fn build(self) -> Config {
        Config::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Builder for one `[[pipelines]]` entry.
pub struct PipelineBuilder {
    pipeline: RawPipelineConfig,
}

impl PipelineBuilder {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            pipeline: RawPipelineConfig {
                pipeline_name: name.to_string(),
                pipeline_version: version.to_string(),
                pipeline_parameters: IndexMap::new(),
            },
        }
    }

    /// The usual pair: `--fastq_input <run dir> --outdir <output dir>`.
    pub fn standard_io(self) -> Self {
        self.from_run("fastq_input", "fastq_input")
            .from_run("outdir", "outdir")
    }

    pub fn from_run(mut self, flag: &str, field: &str) -> Self {
        self.pipeline.pipeline_parameters.insert(
            flag.to_string(),
            Some(RawParameterValue::FromRun {
                from_run: field.to_string(),
            }),
        );
        self
    }

    pub fn literal(mut self, flag: &str, value: &str) -> Self {
        self.pipeline.pipeline_parameters.insert(
            flag.to_string(),
            Some(RawParameterValue::Text(value.to_string())),
        );
        self
    }

    pub fn build(self) -> RawPipelineConfig {
        self.pipeline
    }
}

/// `<out>/<run_id>/<short>-<minor>-output`, as the dispatcher lays it out.
pub fn pipeline_output_dir(cfg: &Config, run_id: &str, pipeline_index: usize) -> PathBuf {
    cfg.analysis_output_dir
        .join(run_id)
        .join(cfg.pipelines[pipeline_index].output_dir_name())
}
