#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const GRIDION_RUN: &str = "20230101_1200_X1_ABCDEFGH_abcdefgh";
pub const PROMETHION_RUN: &str = "20240315_0931_P2S_01234-A_PAQ12345_1a2b3c4d";

pub const QC_PIPELINE: &str = "BCCDC-PHL/routine_nanopore_qc";
pub const AMR_PIPELINE: &str = "BCCDC-PHL/nanopore-amr";

/// Scratch tree with `runs/`, `out/` and `work/` directories.
pub struct Workspace {
    pub tmp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("creating temp dir");
        for dir in ["runs", "out", "work"] {
            std::fs::create_dir_all(tmp.path().join(dir)).expect("creating workspace dir");
        }
        Self { tmp }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn runs(&self) -> PathBuf {
        self.root().join("runs")
    }

    pub fn out(&self) -> PathBuf {
        self.root().join("out")
    }

    pub fn work(&self) -> PathBuf {
        self.root().join("work")
    }

    /// Write a TOML config for this workspace and return its path. Every
    /// pipeline takes `--fastq_input` and `--outdir` from the run.
    pub fn write_config(&self, scan_interval_seconds: u64, pipelines: &[&str]) -> PathBuf {
        let mut contents = format!(
            "fastq_by_run_dir = \"{}\"\n\
             analysis_output_dir = \"{}\"\n\
             analysis_work_dir = \"{}\"\n\
             conda_cache_dir = \"{}\"\n\
             scan_interval_seconds = {scan_interval_seconds}\n",
            toml_path(&self.runs()),
            toml_path(&self.out()),
            toml_path(&self.work()),
            toml_path(&self.root().join("conda")),
        );
        for name in pipelines {
            contents.push_str(&format!(
                "\n[[pipelines]]\n\
                 pipeline_name = \"{name}\"\n\
                 pipeline_version = \"v0.1.1\"\n\
                 \n[pipelines.pipeline_parameters]\n\
                 fastq_input = {{ from_run = \"fastq_input\" }}\n\
                 outdir = {{ from_run = \"outdir\" }}\n"
            ));
        }

        let path = self.root().join("nanopore-qc.toml");
        std::fs::write(&path, contents).expect("writing config");
        path
    }

    /// Entries currently under `work/`.
    pub fn work_entries(&self) -> Vec<PathBuf> {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(self.work())
            .expect("listing work dir")
            .map(|e| e.expect("work dir entry").path())
            .collect();
        entries.sort();
        entries
    }
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
