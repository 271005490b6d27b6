// tests/discovery_scenarios.rs

mod common;

use std::collections::BTreeSet;
use std::error::Error;

use common::{Workspace, GRIDION_RUN, PROMETHION_RUN, QC_PIPELINE};
use nanopore_qc_dispatch::discovery::{scan, Discovery, RunDirectory};
use nanopore_qc_dispatch::fs::RealFileSystem;
use nanopore_qc_dispatch::types::InstrumentType;
use nanopore_qc_test_utils::builders::{ConfigBuilder, PipelineBuilder};
use nanopore_qc_test_utils::logs::capture_logs;
use nanopore_qc_test_utils::{init_tracing, make_run_dir};

type TestResult = Result<(), Box<dyn Error>>;

fn builder(ws: &Workspace) -> ConfigBuilder {
    ConfigBuilder::new(ws.root())
        .with_pipeline(PipelineBuilder::new(QC_PIPELINE, "v0.1.1").standard_io().build())
}

fn ready_runs(b: ConfigBuilder) -> Result<Vec<RunDirectory>, Box<dyn Error>> {
    let cfg = b.build();
    Ok(scan(&RealFileSystem, &cfg)?
        .filter_map(Discovery::ready)
        .collect())
}

#[test]
fn complete_gridion_run_is_ready() -> TestResult {
    init_tracing();
    let ws = Workspace::new();
    let run_dir = make_run_dir(&ws.runs(), GRIDION_RUN, true);

    let runs = ready_runs(builder(&ws))?;

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].sequencing_run_id, GRIDION_RUN);
    assert_eq!(runs[0].instrument_type, InstrumentType::Gridion);
    assert_eq!(runs[0].run_dir, run_dir);
    assert!(runs[0].run_dir.is_absolute());
    Ok(())
}

#[test]
fn run_without_symlinks_marker_is_skipped_with_reason() -> TestResult {
    init_tracing();
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), GRIDION_RUN, false);

    let cfg = builder(&ws).build();
    let results: Vec<Discovery> = scan(&RealFileSystem, &cfg)?.collect();

    assert_eq!(results.len(), 1);
    match &results[0] {
        Discovery::Skipped(skipped) => {
            assert_eq!(skipped.checks.symlinks_complete, Some(false));
            assert!(skipped.checks.is_directory);
            assert!(skipped.checks.matches_nanopore_run_id_format);
            assert!(skipped.checks.analysis_not_already_initiated);
            assert!(skipped.checks.not_excluded);
        }
        other => panic!("expected Skipped, got {other:?}"),
    }
    Ok(())
}

#[test]
fn skipped_run_is_logged_with_failed_condition() -> TestResult {
    let ws = Workspace::new();
    let run_dir = make_run_dir(&ws.runs(), GRIDION_RUN, false);
    make_run_dir(&ws.runs(), PROMETHION_RUN, true);
    let cfg = builder(&ws).build();

    let (logs, _guard) = capture_logs();
    let ready: Vec<RunDirectory> = scan(&RealFileSystem, &cfg)?
        .filter_map(Discovery::ready)
        .collect();
    assert_eq!(ready.len(), 1);

    assert_eq!(logs.events_of("scan_start").len(), 1);

    let skipped = logs.events_of("directory_skipped");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["level"], "DEBUG");
    assert_eq!(
        skipped[0]["run_directory_path"],
        run_dir.display().to_string().as_str()
    );
    assert_eq!(skipped[0]["symlinks_complete"], false);
    assert_eq!(skipped[0]["is_directory"], true);
    assert_eq!(skipped[0]["matches_nanopore_run_id_format"], true);
    assert_eq!(skipped[0]["not_excluded"], true);

    let found = logs.events_of("run_directory_found");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["level"], "INFO");
    assert_eq!(found[0]["sequencing_run_id"], PROMETHION_RUN);
    Ok(())
}

#[test]
fn symlinks_check_can_be_disabled() -> TestResult {
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), GRIDION_RUN, false);

    let runs = ready_runs(builder(&ws).check_symlinks_complete(false))?;
    assert_eq!(runs.len(), 1);
    Ok(())
}

#[test]
fn existing_output_blocks_rediscovery() -> TestResult {
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), GRIDION_RUN, true);
    make_run_dir(&ws.runs(), PROMETHION_RUN, true);
    std::fs::create_dir_all(ws.out().join(GRIDION_RUN))?;

    let runs = ready_runs(builder(&ws))?;
    let ids: Vec<&str> = runs.iter().map(|r| r.sequencing_run_id.as_str()).collect();
    assert_eq!(ids, vec![PROMETHION_RUN]);
    assert_eq!(runs[0].instrument_type, InstrumentType::Promethion);
    Ok(())
}

#[test]
fn excluded_run_is_never_ready() -> TestResult {
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), GRIDION_RUN, true);

    let runs = ready_runs(builder(&ws).exclude(GRIDION_RUN))?;
    assert!(runs.is_empty());
    Ok(())
}

#[test]
fn non_run_entries_are_skipped() -> TestResult {
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), "MinKNOW_logs", true);
    std::fs::write(ws.runs().join(GRIDION_RUN), b"a file, not a dir")?;

    let cfg = builder(&ws).build();
    let results: Vec<Discovery> = scan(&RealFileSystem, &cfg)?.collect();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|d| !d.is_ready()));
    Ok(())
}

#[test]
fn repeated_scans_of_unchanged_tree_agree() -> TestResult {
    let ws = Workspace::new();
    make_run_dir(&ws.runs(), GRIDION_RUN, true);
    make_run_dir(&ws.runs(), PROMETHION_RUN, true);
    make_run_dir(&ws.runs(), "20230202_0800_X3_ZZZZZZZZ_zzzzzzzz", false);

    let first: BTreeSet<String> = ready_runs(builder(&ws))?
        .into_iter()
        .map(|r| r.sequencing_run_id)
        .collect();
    let second: BTreeSet<String> = ready_runs(builder(&ws))?
        .into_iter()
        .map(|r| r.sequencing_run_id)
        .collect();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn missing_parent_directory_is_an_error() {
    let ws = Workspace::new();
    std::fs::remove_dir_all(ws.runs()).unwrap();

    let cfg = builder(&ws).build();
    assert!(scan(&RealFileSystem, &cfg).is_err());
}
