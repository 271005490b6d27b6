// src/analysis/dispatcher.rs

//! Per-run, per-pipeline invocation lifecycle.

use std::path::Path;

use chrono::Local;
use tracing::{error, info};

use crate::analysis::invocation::AnalysisInvocation;
use crate::analysis::marker::CompletionMarker;
use crate::config::{Config, PipelineConfig};
use crate::discovery::RunDirectory;
use crate::engine::ShutdownSignal;
use crate::exec::PipelineExecutor;
use crate::fs::FileSystem;
use crate::types::{EligibilityMode, WorkDirRetention};

/// Lines of engine stderr attached to `analysis_failed`.
const FAILURE_STDERR_LINES: usize = 20;

/// How one pipeline attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Marker written, work directory deleted.
    Completed,
    /// Marker written but the work directory could not be deleted.
    CompletedWithCleanupFailure,
    /// No marker written; the pipeline will be retried on a later pass if
    /// discovery yields the run again.
    Failed,
    /// A marker already existed (only in per-pipeline eligibility mode).
    AlreadyComplete,
}

impl PipelineStatus {
    pub fn is_complete(&self) -> bool {
        !matches!(self, PipelineStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub pipeline_name: String,
    pub status: PipelineStatus,
}

/// Result of dispatching every configured pipeline against one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub sequencing_run_id: String,
    pub outcomes: Vec<PipelineOutcome>,
}

impl RunReport {
    pub fn all_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_complete())
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.status.is_complete()).count()
    }
}

/// Attempt every configured pipeline against `run`, in configured order.
///
/// Attempts are independent: a failed pipeline does not stop the ones after
/// it. Nothing here returns an error; every failure is reported as a log
/// event and a [`PipelineStatus::Failed`] outcome.
pub async fn analyze_run(
    cfg: &Config,
    fs: &dyn FileSystem,
    executor: &mut dyn PipelineExecutor,
    run: &RunDirectory,
) -> RunReport {
    analyze_run_until(cfg, fs, executor, run, &ShutdownSignal::never()).await
}

/// [`analyze_run`] that starts no further pipeline once `shutdown` is
/// requested. Pipelines that were never started have no outcome in the
/// report.
pub async fn analyze_run_until(
    cfg: &Config,
    fs: &dyn FileSystem,
    executor: &mut dyn PipelineExecutor,
    run: &RunDirectory,
    shutdown: &ShutdownSignal,
) -> RunReport {
    let mut outcomes = Vec::with_capacity(cfg.pipelines.len());

    for pipeline in cfg.pipelines.iter() {
        if shutdown.is_requested() {
            info!(
                event_type = "analysis_interrupted",
                sequencing_run_id = %run.sequencing_run_id,
                pipelines_not_started = cfg.pipelines.len() - outcomes.len(),
                "shutdown requested; remaining pipelines not started"
            );
            break;
        }
        let status = analyze_with_pipeline(cfg, fs, executor, run, pipeline).await;
        outcomes.push(PipelineOutcome {
            pipeline_name: pipeline.pipeline_name.clone(),
            status,
        });
    }

    RunReport {
        sequencing_run_id: run.sequencing_run_id.clone(),
        outcomes,
    }
}

async fn analyze_with_pipeline(
    cfg: &Config,
    fs: &dyn FileSystem,
    executor: &mut dyn PipelineExecutor,
    run: &RunDirectory,
    pipeline: &PipelineConfig,
) -> PipelineStatus {
    let started = Local::now();

    let invocation = match AnalysisInvocation::build(cfg, pipeline, run, started) {
        Ok(inv) => inv,
        Err(err) => {
            error!(
                event_type = "analysis_failed",
                sequencing_run_id = %run.sequencing_run_id,
                pipeline = %pipeline.pipeline_name,
                error = %format!("{err:#}"),
                "could not build pipeline invocation"
            );
            return PipelineStatus::Failed;
        }
    };

    if cfg.eligibility == EligibilityMode::PerPipeline
        && fs.is_file(&invocation.completion_marker_path())
    {
        info!(
            event_type = "analysis_skipped_already_complete",
            sequencing_run_id = %invocation.analysis_run_id,
            pipeline = %invocation.pipeline_name,
            "pipeline already completed for this run"
        );
        return PipelineStatus::AlreadyComplete;
    }

    let pipeline_command = invocation.command_line();
    info!(
        event_type = "analysis_started",
        sequencing_run_id = %invocation.analysis_run_id,
        pipeline_command = %pipeline_command,
        "analysis started"
    );

    let outcome = match executor.execute(&invocation).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(
                event_type = "analysis_failed",
                sequencing_run_id = %invocation.analysis_run_id,
                pipeline_command = %pipeline_command,
                analysis_work_dir_path = %invocation.analysis_work_dir.display(),
                error = %format!("{err:#}"),
                "pipeline process could not be run"
            );
            apply_failure_retention(cfg, fs, &invocation);
            return PipelineStatus::Failed;
        }
    };

    if !outcome.success() {
        error!(
            event_type = "analysis_failed",
            sequencing_run_id = %invocation.analysis_run_id,
            pipeline_command = %pipeline_command,
            exit_code = ?outcome.exit_code,
            analysis_work_dir_path = %invocation.analysis_work_dir.display(),
            stderr_tail = %outcome.stderr_tail(FAILURE_STDERR_LINES),
            "analysis failed"
        );
        apply_failure_retention(cfg, fs, &invocation);
        return PipelineStatus::Failed;
    }

    let marker = CompletionMarker::new(started, Local::now());
    // The engine normally creates the output directory; `write` covers the
    // case where it did not.
    if let Err(err) = marker.write(fs, &invocation.analysis_output_dir) {
        error!(
            event_type = "write_completion_marker_failed",
            sequencing_run_id = %invocation.analysis_run_id,
            analysis_output_dir_path = %invocation.analysis_output_dir.display(),
            error = %format!("{err:#}"),
            "could not write completion marker"
        );
        return PipelineStatus::Failed;
    }

    info!(
        event_type = "analysis_completed",
        sequencing_run_id = %invocation.analysis_run_id,
        pipeline_command = %pipeline_command,
        "analysis completed"
    );

    if delete_work_dir(fs, &invocation.analysis_run_id, &invocation.analysis_work_dir) {
        PipelineStatus::Completed
    } else {
        PipelineStatus::CompletedWithCleanupFailure
    }
}

fn apply_failure_retention(cfg: &Config, fs: &dyn FileSystem, invocation: &AnalysisInvocation) {
    match cfg.failed_work_dir_retention {
        WorkDirRetention::Keep => {}
        WorkDirRetention::Delete => {
            delete_work_dir(fs, &invocation.analysis_run_id, &invocation.analysis_work_dir);
        }
    }
}

/// Remove an attempt's work directory. Returns false (after logging) if it
/// could not be removed; a directory that was never created counts as removed.
fn delete_work_dir(fs: &dyn FileSystem, run_id: &str, work_dir: &Path) -> bool {
    if fs.exists(work_dir) {
        if let Err(err) = fs.remove_dir_all(work_dir) {
            error!(
                event_type = "delete_analysis_work_dir_failed",
                sequencing_run_id = %run_id,
                analysis_work_dir_path = %work_dir.display(),
                error = %format!("{err:#}"),
                "could not delete analysis work dir"
            );
            return false;
        }
    }

    info!(
        event_type = "analysis_work_dir_deleted",
        sequencing_run_id = %run_id,
        analysis_work_dir_path = %work_dir.display(),
        "analysis work dir deleted"
    );
    true
}
