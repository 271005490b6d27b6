// tests/process_executor.rs

#![cfg(unix)]

mod common;

use std::error::Error;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use common::{Workspace, GRIDION_RUN, QC_PIPELINE};
use nanopore_qc_dispatch::analysis::{analyze_run, PipelineStatus};
use nanopore_qc_dispatch::discovery::{scan, Discovery};
use nanopore_qc_dispatch::exec::ProcessExecutor;
use nanopore_qc_dispatch::fs::RealFileSystem;
use nanopore_qc_test_utils::builders::{pipeline_output_dir, ConfigBuilder, PipelineBuilder};
use nanopore_qc_test_utils::{init_tracing, make_run_dir};

type TestResult = Result<(), Box<dyn Error>>;

/// Stand-in for the workflow engine: creates the work and output
/// directories it was given and exits with the code stored in `exit_code`.
fn write_fake_engine(dir: &Path) -> std::io::Result<PathBuf> {
    let script = dir.join("fake-nextflow");
    let body = format!(
        r#"#!/bin/sh
work=""
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -work-dir) work="$2"; shift ;;
    --outdir) out="$2"; shift ;;
  esac
  shift
done
mkdir -p "$work/ab/123456" "$out"
echo "N E X T F L O W"
code=$(cat "{code_file}")
if [ "$code" -ne 0 ]; then
  echo "ERROR ~ process failed" >&2
fi
exit "$code"
"#,
        code_file = dir.join("exit_code").display()
    );
    std::fs::write(&script, body)?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    Ok(script)
}

#[tokio::test]
async fn real_process_exit_codes_drive_the_outcome() -> TestResult {
    init_tracing();
    let ws = Workspace::new();
    let engine = write_fake_engine(ws.root())?;
    make_run_dir(&ws.runs(), GRIDION_RUN, true);

    let cfg = ConfigBuilder::new(ws.root())
        .nextflow_executable(engine.display().to_string())
        .with_pipeline(PipelineBuilder::new(QC_PIPELINE, "v0.1.1").standard_io().build())
        .build();
    let run = scan(&RealFileSystem, &cfg)?
        .find_map(Discovery::ready)
        .expect("run is ready");
    let mut executor = ProcessExecutor::new();
    let marker = pipeline_output_dir(&cfg, GRIDION_RUN, 0).join("analysis_complete.json");

    std::fs::write(ws.root().join("exit_code"), "3")?;
    let report = analyze_run(&cfg, &RealFileSystem, &mut executor, &run).await;
    assert_eq!(report.outcomes[0].status, PipelineStatus::Failed);
    assert!(!marker.exists());
    assert_eq!(ws.work_entries().len(), 1);

    std::fs::write(ws.root().join("exit_code"), "0")?;
    let report = analyze_run(&cfg, &RealFileSystem, &mut executor, &run).await;
    assert_eq!(report.outcomes[0].status, PipelineStatus::Completed);
    assert!(marker.is_file());
    Ok(())
}

#[tokio::test]
async fn missing_engine_is_a_failed_attempt() -> TestResult {
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), GRIDION_RUN, true);

    let cfg = ConfigBuilder::new(ws.root())
        .nextflow_executable(ws.root().join("no-such-engine").display().to_string())
        .with_pipeline(PipelineBuilder::new(QC_PIPELINE, "v0.1.1").standard_io().build())
        .build();
    let run = scan(&RealFileSystem, &cfg)?
        .find_map(Discovery::ready)
        .expect("run is ready");

    let report = analyze_run(&cfg, &RealFileSystem, &mut ProcessExecutor::new(), &run).await;
    assert_eq!(report.outcomes[0].status, PipelineStatus::Failed);
    assert!(ws.work_entries().is_empty());
    Ok(())
}
