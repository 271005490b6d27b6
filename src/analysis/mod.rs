// src/analysis/mod.rs

//! Analysis dispatch.
//!
//! For one ready run, every configured pipeline is attempted in order:
//! - [`invocation`] derives output/work/trace/report paths and the engine
//!   command line.
//! - [`dispatcher`] runs each invocation through a
//!   [`PipelineExecutor`](crate::exec::PipelineExecutor) and does the
//!   success/failure bookkeeping.
//! - [`marker`] reads and writes `analysis_complete.json`.

pub mod dispatcher;
pub mod invocation;
pub mod marker;

pub use dispatcher::{analyze_run, analyze_run_until, PipelineOutcome, PipelineStatus, RunReport};
pub use invocation::AnalysisInvocation;
pub use marker::{CompletionMarker, COMPLETION_MARKER_FILE};
