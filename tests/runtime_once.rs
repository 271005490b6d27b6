// tests/runtime_once.rs

mod common;

use std::error::Error;

use common::{Workspace, GRIDION_RUN, PROMETHION_RUN, QC_PIPELINE};
use nanopore_qc_dispatch::config::load_and_validate;
use nanopore_qc_dispatch::engine::{plan_pass, run_pass, Runtime, RuntimeOptions, ShutdownSignal};
use nanopore_qc_dispatch::fs::RealFileSystem;
use nanopore_qc_test_utils::fake_executor::FakeExecutor;
use nanopore_qc_test_utils::{init_tracing, make_run_dir};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn once_runs_a_single_pass_over_ready_runs() -> TestResult {
    init_tracing();
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), GRIDION_RUN, true);
    make_run_dir(&ws.runs(), PROMETHION_RUN, false);
    let config_path = ws.write_config(1, &[QC_PIPELINE]);
    let cfg = load_and_validate(&config_path)?;

    let executor = FakeExecutor::new();
    let executed = executor.executed();
    let runtime = Runtime::new(
        config_path,
        cfg,
        Box::new(RealFileSystem),
        executor,
        RuntimeOptions { once: true },
        ShutdownSignal::never(),
    );
    runtime.run().await?;

    let runs: Vec<String> = executed
        .lock()
        .unwrap()
        .iter()
        .map(|i| i.analysis_run_id.clone())
        .collect();
    assert_eq!(runs, vec![GRIDION_RUN.to_string()]);
    assert!(ws.out().join(GRIDION_RUN).is_dir());
    assert!(!ws.out().join(PROMETHION_RUN).exists());
    Ok(())
}

#[tokio::test]
async fn second_pass_finds_nothing_new_until_a_run_completes() -> TestResult {
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), GRIDION_RUN, true);
    let promethion_dir = make_run_dir(&ws.runs(), PROMETHION_RUN, false);
    let cfg = load_and_validate(ws.write_config(1, &[QC_PIPELINE]))?;
    let mut executor = FakeExecutor::new();

    let first = run_pass(&cfg, &RealFileSystem, &mut executor).await?;
    assert_eq!(first.entries_seen, 2);
    assert_eq!(first.runs_ready, 1);
    assert_eq!(first.pipelines_failed, 0);

    let second = run_pass(&cfg, &RealFileSystem, &mut executor).await?;
    assert_eq!(second.runs_ready, 0);

    // Upstream finishes linking the PromethION run.
    std::fs::write(promethion_dir.join("symlinks_complete.json"), b"{}")?;
    let third = run_pass(&cfg, &RealFileSystem, &mut executor).await?;
    assert_eq!(third.runs_ready, 1);
    assert_eq!(third.reports[0].sequencing_run_id, PROMETHION_RUN);

    assert_eq!(executor.invocations().len(), 2);
    Ok(())
}

#[tokio::test]
async fn once_propagates_missing_run_parent() -> TestResult {
    let ws = Workspace::new();
    let config_path = ws.write_config(1, &[QC_PIPELINE]);
    let cfg = load_and_validate(&config_path)?;
    std::fs::remove_dir_all(ws.runs())?;

    let runtime = Runtime::new(
        config_path,
        cfg,
        Box::new(RealFileSystem),
        FakeExecutor::new(),
        RuntimeOptions { once: true },
        ShutdownSignal::never(),
    );
    assert!(runtime.run().await.is_err());
    Ok(())
}

#[test]
fn dry_run_plan_touches_nothing() -> TestResult {
    let ws = Workspace::new();
    let run_dir = make_run_dir(&ws.runs(), GRIDION_RUN, true);
    let cfg = load_and_validate(ws.write_config(1, &[QC_PIPELINE]))?;

    let planned = plan_pass(&cfg, &RealFileSystem)?;

    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].run.run_dir, run_dir);
    assert_eq!(planned[0].invocations.len(), 1);
    let cmd = planned[0].invocations[0].command_line();
    assert!(cmd.contains(&format!("--fastq_input {}", run_dir.display())));
    assert!(!ws.out().join(GRIDION_RUN).exists());
    assert!(ws.work_entries().is_empty());

    // Still ready on the next pass because nothing was written.
    assert_eq!(plan_pass(&cfg, &RealFileSystem)?.len(), 1);
    Ok(())
}
