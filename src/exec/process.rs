// src/exec/process.rs

//! Runs the workflow engine as a child process.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::debug;

use crate::analysis::AnalysisInvocation;
use crate::errors::Result;
use crate::exec::backend::{ExecutionOutcome, PipelineExecutor};

/// Executor that spawns `invocation.program` with `invocation.args` (no
/// shell) and waits for it, capturing stdout and stderr.
///
/// There is no timeout: a hung engine blocks the caller until it exits.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineExecutor for ProcessExecutor {
    fn execute<'a>(
        &'a mut self,
        invocation: &'a AnalysisInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let output = Command::new(&invocation.program)
                .args(&invocation.args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await
                .with_context(|| {
                    format!(
                        "running '{}' for run '{}'",
                        invocation.program, invocation.analysis_run_id
                    )
                })?;

            let outcome = ExecutionOutcome {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };

            debug!(
                sequencing_run_id = %invocation.analysis_run_id,
                pipeline = %invocation.pipeline_name,
                exit_code = ?outcome.exit_code,
                stdout = %outcome.stdout,
                stderr = %outcome.stderr,
                "pipeline process exited"
            );

            Ok(outcome)
        })
    }
}
