// src/engine/pass.rs

use chrono::Local;
use tracing::info;

use crate::analysis::{analyze_run_until, AnalysisInvocation, RunReport};
use crate::config::Config;
use crate::discovery::{scan, Discovery, RunDirectory};
use crate::errors::Result;
use crate::exec::PipelineExecutor;
use crate::fs::FileSystem;

use super::shutdown::ShutdownSignal;

/// Counts for one completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub entries_seen: usize,
    pub runs_ready: usize,
    pub pipelines_failed: usize,
    pub reports: Vec<RunReport>,
}

/// Scan once and dispatch every ready run, one at a time.
///
/// Only a failure to list the run parent directory is returned as an error.
pub async fn run_pass(
    cfg: &Config,
    fs: &dyn FileSystem,
    executor: &mut dyn PipelineExecutor,
) -> Result<PassSummary> {
    run_pass_until(cfg, fs, executor, &ShutdownSignal::never()).await
}

/// [`run_pass`] that stops dispatching once `shutdown` is requested. The
/// pipeline running at that moment is awaited; nothing after it starts.
pub async fn run_pass_until(
    cfg: &Config,
    fs: &dyn FileSystem,
    executor: &mut dyn PipelineExecutor,
    shutdown: &ShutdownSignal,
) -> Result<PassSummary> {
    let mut summary = PassSummary::default();

    for discovery in scan(fs, cfg)? {
        if shutdown.is_requested() {
            break;
        }
        summary.entries_seen += 1;
        let Discovery::Ready(run) = discovery else {
            continue;
        };

        summary.runs_ready += 1;
        let report = analyze_run_until(cfg, fs, executor, &run, shutdown).await;
        summary.pipelines_failed += report.failed_count();
        summary.reports.push(report);
    }

    info!(
        event_type = "scan_complete",
        entries_seen = summary.entries_seen,
        runs_ready = summary.runs_ready,
        pipelines_failed = summary.pipelines_failed,
        "scan complete"
    );

    Ok(summary)
}

/// A ready run and the invocations a pass would execute for it.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    pub run: RunDirectory,
    pub invocations: Vec<AnalysisInvocation>,
}

/// Scan once and build invocations without executing or writing anything.
pub fn plan_pass(cfg: &Config, fs: &dyn FileSystem) -> Result<Vec<PlannedRun>> {
    let now = Local::now();
    let mut planned = Vec::new();

    for run in scan(fs, cfg)?.filter_map(Discovery::ready) {
        let invocations = cfg
            .pipelines
            .iter()
            .map(|pipeline| AnalysisInvocation::build(cfg, pipeline, &run, now))
            .collect::<Result<Vec<_>>>()?;
        planned.push(PlannedRun { run, invocations });
    }

    Ok(planned)
}
