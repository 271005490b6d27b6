// src/discovery/scan.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::analysis::marker::COMPLETION_MARKER_FILE;
use crate::config::Config;
use crate::discovery::run_id::{classify_run_id, matches_run_id_format};
use crate::discovery::{
    Discovery, EligibilityCheck, RunDirectory, SkippedDirectory, SYMLINKS_COMPLETE_FILE,
};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::EligibilityMode;

/// Inputs to a single discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub fastq_by_run_dir: PathBuf,
    pub analysis_output_dir: PathBuf,
    pub excluded_runs: BTreeSet<String>,
    pub check_symlinks_complete: bool,
    pub eligibility: EligibilityMode,
    /// `<short>-<minor>-output` names of the configured pipelines, used by
    /// [`EligibilityMode::PerPipeline`].
    pub pipeline_output_dirs: Vec<String>,
}

impl DiscoveryOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            fastq_by_run_dir: cfg.fastq_by_run_dir.clone(),
            analysis_output_dir: cfg.analysis_output_dir.clone(),
            excluded_runs: cfg.excluded_runs.clone(),
            check_symlinks_complete: cfg.check_symlinks_complete,
            eligibility: cfg.eligibility,
            pipeline_output_dirs: cfg.pipelines.iter().map(|p| p.output_dir_name()).collect(),
        }
    }
}

/// Lazy sequence of discovery results, one per entry of the run parent
/// directory as listed when the scan started.
#[derive(Debug)]
pub struct RunScan<'a> {
    fs: &'a dyn FileSystem,
    options: DiscoveryOptions,
    entries: std::vec::IntoIter<PathBuf>,
}

/// Start a scan pass: log `scan_start` and list the run parent directory.
pub fn scan<'a>(fs: &'a dyn FileSystem, cfg: &Config) -> Result<RunScan<'a>> {
    info!(event_type = "scan_start", "scan started");
    find_run_dirs(fs, DiscoveryOptions::from_config(cfg))
}

/// List the run parent directory and return an iterator that evaluates each
/// entry on demand.
///
/// Listing errors are returned as-is; there is no retry.
pub fn find_run_dirs(fs: &dyn FileSystem, options: DiscoveryOptions) -> Result<RunScan<'_>> {
    let parent = fs.absolute(&options.fastq_by_run_dir)?;
    let entries = fs.read_dir(&parent)?;

    Ok(RunScan {
        fs,
        options,
        entries: entries.into_iter(),
    })
}

impl RunScan<'_> {
    fn evaluate(&self, path: PathBuf) -> Discovery {
        let run_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let checks = EligibilityCheck {
            is_directory: self.fs.is_dir(&path),
            matches_nanopore_run_id_format: matches_run_id_format(&run_id),
            analysis_not_already_initiated: !self.analysis_already_initiated(&run_id),
            not_excluded: !self.options.excluded_runs.contains(&run_id),
            symlinks_complete: self
                .options
                .check_symlinks_complete
                .then(|| self.fs.exists(&path.join(SYMLINKS_COMPLETE_FILE))),
        };

        if checks.is_eligible() {
            info!(
                event_type = "run_directory_found",
                sequencing_run_id = %run_id,
                run_directory_path = %path.display(),
                "run directory found"
            );
            Discovery::Ready(RunDirectory {
                instrument_type: classify_run_id(&run_id),
                sequencing_run_id: run_id,
                run_dir: path,
            })
        } else {
            debug!(
                event_type = "directory_skipped",
                run_directory_path = %path.display(),
                is_directory = checks.is_directory,
                matches_nanopore_run_id_format = checks.matches_nanopore_run_id_format,
                analysis_not_already_initiated = checks.analysis_not_already_initiated,
                not_excluded = checks.not_excluded,
                symlinks_complete = checks.symlinks_complete,
                "directory skipped"
            );
            Discovery::Skipped(SkippedDirectory { path, checks })
        }
    }

    fn analysis_already_initiated(&self, run_id: &str) -> bool {
        let run_output_dir = self.options.analysis_output_dir.join(run_id);
        match self.options.eligibility {
            EligibilityMode::PerRun => self.fs.exists(&run_output_dir),
            EligibilityMode::PerPipeline => self
                .options
                .pipeline_output_dirs
                .iter()
                .all(|dir| self.fs.is_file(&completion_marker_path(&run_output_dir, dir))),
        }
    }
}

fn completion_marker_path(run_output_dir: &Path, pipeline_output_dir: &str) -> PathBuf {
    run_output_dir
        .join(pipeline_output_dir)
        .join(COMPLETION_MARKER_FILE)
}

impl Iterator for RunScan<'_> {
    type Item = Discovery;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.entries.next()?;
        Some(self.evaluate(path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}
