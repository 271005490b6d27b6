// src/analysis/invocation.rs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::analysis::marker::COMPLETION_MARKER_FILE;
use crate::config::{Config, PipelineConfig, PipelineParameter};
use crate::discovery::RunDirectory;
use crate::errors::Result;
use crate::types::RunField;

/// Execution profile passed to the engine via `-profile`.
pub const EXECUTION_PROFILE: &str = "conda";

/// Timestamp format used in work directory names (second granularity).
const WORK_DIR_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Everything needed to run one pipeline against one run, once.
///
/// Built fresh for every attempt; the work directory name carries the
/// attempt's timestamp so attempts never share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInvocation {
    pub analysis_run_id: String,
    pub pipeline_name: String,
    pub pipeline_short_name: String,
    pub pipeline_minor_version: String,
    pub analysis_output_dir: PathBuf,
    pub analysis_work_dir: PathBuf,
    pub analysis_trace_path: PathBuf,
    pub analysis_report_path: PathBuf,
    /// Engine executable.
    pub program: String,
    /// Arguments after the executable, already rendered as text.
    pub args: Vec<String>,
}

impl AnalysisInvocation {
    /// Derive paths and the engine command line for `pipeline` on `run`.
    ///
    /// `started` picks the work directory name.
    pub fn build(
        cfg: &Config,
        pipeline: &PipelineConfig,
        run: &RunDirectory,
        started: DateTime<Local>,
    ) -> Result<Self> {
        let analysis_run_id = run.sequencing_run_id.clone();
        let pipeline_short_name = pipeline.short_name();
        let pipeline_minor_version = pipeline.minor_version();

        let analysis_output_dir = std::path::absolute(
            cfg.analysis_output_dir
                .join(&analysis_run_id)
                .join(pipeline.output_dir_name()),
        )?;

        let analysis_work_dir = std::path::absolute(cfg.analysis_work_dir.join(format!(
            "work-{}-{}-{}-{}",
            analysis_run_id,
            pipeline_short_name,
            pipeline_minor_version,
            started.format(WORK_DIR_TIMESTAMP_FORMAT)
        )))?;

        let analysis_trace_path = analysis_output_dir.join(format!("{analysis_run_id}_trace.tsv"));
        let analysis_report_path =
            analysis_output_dir.join(format!("{analysis_run_id}_nextflow_report.html"));

        let mut args: Vec<String> = vec![
            "run".to_string(),
            pipeline.pipeline_name.clone(),
            "-r".to_string(),
            pipeline.pipeline_version.clone(),
            "-profile".to_string(),
            EXECUTION_PROFILE.to_string(),
            "--cache".to_string(),
            path_arg(&cfg.conda_cache_dir),
            "-work-dir".to_string(),
            path_arg(&analysis_work_dir),
            "-with-trace".to_string(),
            path_arg(&analysis_trace_path),
            "-with-report".to_string(),
            path_arg(&analysis_report_path),
        ];

        if let Some(recipients) = cfg.notification_recipients() {
            args.push("-with-notification".to_string());
            args.push(recipients.join(","));
        }

        for (flag, parameter) in pipeline.pipeline_parameters.iter() {
            args.push(format!("--{flag}"));
            args.push(resolve_parameter(parameter, run, &analysis_output_dir));
        }

        Ok(Self {
            analysis_run_id,
            pipeline_name: pipeline.pipeline_name.clone(),
            pipeline_short_name,
            pipeline_minor_version,
            analysis_output_dir,
            analysis_work_dir,
            analysis_trace_path,
            analysis_report_path,
            program: cfg.nextflow_executable.clone(),
            args,
        })
    }

    /// The full command as a single space-separated string, for logging.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn completion_marker_path(&self) -> PathBuf {
        self.analysis_output_dir.join(COMPLETION_MARKER_FILE)
    }
}

/// Render a parameter as the text passed after its `--<flag>`.
///
/// `fastq_input` is the run directory and `outdir` the pipeline's output
/// directory; every other field comes from the run descriptor.
pub fn resolve_parameter(
    parameter: &PipelineParameter,
    run: &RunDirectory,
    analysis_output_dir: &Path,
) -> String {
    match parameter {
        PipelineParameter::Literal(value) => value.clone(),
        PipelineParameter::FromRunField(RunField::FastqInput) => path_arg(&run.run_dir),
        PipelineParameter::FromRunField(RunField::Outdir) => path_arg(analysis_output_dir),
        PipelineParameter::FromRunField(field) => run.field(*field).unwrap_or_default(),
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
