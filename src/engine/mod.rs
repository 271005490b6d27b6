// src/engine/mod.rs

//! Scan loop.
//!
//! - [`pass`] runs one discovery + dispatch pass over the run parent
//!   directory and summarises it.
//! - [`runtime`] is the long-running shell around it: config reload between
//!   passes, the inter-pass sleep and `--once`.
//! - [`shutdown`] carries a Ctrl-C request to every point where the loop can
//!   stop.
//!
//! Each pass is stateless; everything that carries over between passes lives
//! on disk (output directories and completion markers).

pub mod pass;
pub mod runtime;
pub mod shutdown;

pub use pass::{plan_pass, run_pass, run_pass_until, PassSummary, PlannedRun};
pub use runtime::Runtime;
pub use shutdown::{shutdown_channel, spawn_ctrl_c_listener, ShutdownSignal, ShutdownTrigger};

/// Options for the scan loop, taken from the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Run a single pass and exit.
    pub once: bool,
}
