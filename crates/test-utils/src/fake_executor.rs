use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use nanopore_qc_dispatch::analysis::AnalysisInvocation;
use nanopore_qc_dispatch::errors::{QcError, Result};
use nanopore_qc_dispatch::exec::{ExecutionOutcome, PipelineExecutor};

/// A fake workflow engine that:
/// - records every invocation it was asked to run
/// - creates the work and output directories like the real engine would
/// - exits 0 unless a different exit code was scripted for the pipeline.
#[derive(Default)]
pub struct FakeExecutor {
    exit_codes: HashMap<String, i32>,
    spawn_failures: HashSet<String>,
    on_execute: Option<ExecuteHook>,
    executed: Arc<Mutex<Vec<AnalysisInvocation>>>,
}

/// Called with the 1-based invocation count and the invocation, before the
/// scripted outcome is produced.
pub type ExecuteHook = Arc<dyn Fn(usize, &AnalysisInvocation) + Send + Sync>;

impl fmt::Debug for FakeExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeExecutor")
            .field("exit_codes", &self.exit_codes)
            .field("spawn_failures", &self.spawn_failures)
            .finish_non_exhaustive()
    }
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every run of `pipeline_name` exit with `code`.
    pub fn exit_code(mut self, pipeline_name: &str, code: i32) -> Self {
        self.exit_codes.insert(pipeline_name.to_string(), code);
        self
    }

    /// Make every run of `pipeline_name` fail before the process starts.
    pub fn fail_to_spawn(mut self, pipeline_name: &str) -> Self {
        self.spawn_failures.insert(pipeline_name.to_string());
        self
    }

    /// Run `hook` on every invocation, e.g. to change the run tree or request
    /// a shutdown mid-pass.
    pub fn on_execute(
        mut self,
        hook: impl Fn(usize, &AnalysisInvocation) + Send + Sync + 'static,
    ) -> Self {
        self.on_execute = Some(Arc::new(hook));
        self
    }

    /// Shared handle to the recorded invocations.
    pub fn executed(&self) -> Arc<Mutex<Vec<AnalysisInvocation>>> {
        Arc::clone(&self.executed)
    }

    pub fn invocations(&self) -> Vec<AnalysisInvocation> {
        self.executed.lock().unwrap().clone()
    }
}

impl PipelineExecutor for FakeExecutor {
    fn execute<'a>(
        &'a mut self,
        invocation: &'a AnalysisInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let count = {
                let mut executed = self.executed.lock().unwrap();
                executed.push(invocation.clone());
                executed.len()
            };
            if let Some(hook) = &self.on_execute {
                hook(count, invocation);
            }

            if self.spawn_failures.contains(&invocation.pipeline_name) {
                let not_found = std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "No such file or directory (os error 2)",
                );
                return Err(QcError::Other(
                    anyhow::Error::new(not_found)
                        .context(format!("running '{}'", invocation.program)),
                ));
            }

            std::fs::create_dir_all(invocation.analysis_work_dir.join("ab/123456"))?;
            std::fs::create_dir_all(&invocation.analysis_output_dir)?;
            std::fs::write(&invocation.analysis_trace_path, b"task_id\thash\n")?;

            let code = self
                .exit_codes
                .get(&invocation.pipeline_name)
                .copied()
                .unwrap_or(0);

            Ok(ExecutionOutcome {
                exit_code: Some(code),
                stdout: format!("N E X T F L O W  ~  {}\n", invocation.pipeline_name),
                stderr: if code == 0 {
                    String::new()
                } else {
                    "ERROR ~ Error executing process\n".to_string()
                },
            })
        })
    }
}
