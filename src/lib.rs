// src/lib.rs

pub mod analysis;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{load_and_validate, Config};
use crate::engine::{
    plan_pass, shutdown_channel, spawn_ctrl_c_listener, Runtime, RuntimeOptions,
};
use crate::exec::ProcessExecutor;
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the real filesystem and process executor
/// - the scan loop (or a single dry-run pass)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg, &RealFileSystem)?;
        return Ok(());
    }

    // Ctrl-C → stop after the current pipeline.
    let (trigger, shutdown) = shutdown_channel();
    spawn_ctrl_c_listener(trigger);

    let options = RuntimeOptions { once: args.once };
    let runtime = Runtime::new(
        config_path,
        cfg,
        Box::new(RealFileSystem),
        ProcessExecutor::new(),
        options,
        shutdown,
    );
    runtime.run().await?;
    Ok(())
}

/// Dry-run output: the ready runs and the commands each pipeline would run.
fn print_dry_run(cfg: &Config, fs: &dyn FileSystem) -> Result<()> {
    println!("nanopore-qc-dispatch dry-run");
    println!("  fastq_by_run_dir = {}", cfg.fastq_by_run_dir.display());
    println!("  analysis_output_dir = {}", cfg.analysis_output_dir.display());
    println!("  analysis_work_dir = {}", cfg.analysis_work_dir.display());
    println!("  eligibility = {:?}", cfg.eligibility);
    println!();

    let planned = plan_pass(cfg, fs)?;
    println!("ready runs ({}):", planned.len());
    for plan in planned.iter() {
        println!(
            "  - {} ({})",
            plan.run.sequencing_run_id, plan.run.instrument_type
        );
        println!("      run_dir: {}", plan.run.run_dir.display());
        for invocation in plan.invocations.iter() {
            println!("      cmd: {}", invocation.command_line());
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
