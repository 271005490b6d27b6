// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! `ProcessExecutor` is what the scan loop uses in production. Tests can
//! provide their own `PipelineExecutor` that records invocations and returns
//! scripted exit codes without spawning anything.

use std::future::Future;
use std::pin::Pin;

use crate::analysis::AnalysisInvocation;
use crate::errors::Result;

/// How an external pipeline process ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last `n` lines of stderr, for failure events.
    pub fn stderr_tail(&self, n: usize) -> String {
        let lines: Vec<&str> = self.stderr.lines().collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n")
    }
}

/// Trait abstracting how a pipeline invocation is executed.
pub trait PipelineExecutor: Send {
    /// Run the invocation to completion and report how it ended.
    ///
    /// An `Err` means the process could not be run at all (e.g. the engine
    /// executable is missing); a non-zero exit is an `Ok` outcome.
    fn execute<'a>(
        &'a mut self,
        invocation: &'a AnalysisInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionOutcome>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let outcome = ExecutionOutcome {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: "one\ntwo\nthree\n".to_string(),
        };
        assert_eq!(outcome.stderr_tail(2), "two\nthree");
        assert_eq!(outcome.stderr_tail(10), "one\ntwo\nthree");
        assert!(!outcome.success());
    }
}
