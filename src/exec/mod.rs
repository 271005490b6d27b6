// src/exec/mod.rs

//! Process execution layer.
//!
//! The dispatcher never spawns processes itself; it hands each
//! [`AnalysisInvocation`](crate::analysis::AnalysisInvocation) to a
//! [`PipelineExecutor`].
//!
//! - [`backend`] defines the trait and [`ExecutionOutcome`].
//! - [`process`] provides [`ProcessExecutor`], which runs the workflow engine
//!   with `tokio::process::Command`. Tests replace it with a fake.

pub mod backend;
pub mod process;

pub use backend::{ExecutionOutcome, PipelineExecutor};
pub use process::ProcessExecutor;
