// src/analysis/marker.rs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::fs::FileSystem;

/// File name of the completion marker inside a pipeline's output directory.
pub const COMPLETION_MARKER_FILE: &str = "analysis_complete.json";

/// Proof that one (run, pipeline) analysis finished successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMarker {
    pub timestamp_analysis_start: DateTime<Local>,
    pub timestamp_analysis_complete: DateTime<Local>,
}

impl CompletionMarker {
    pub fn new(start: DateTime<Local>, complete: DateTime<Local>) -> Self {
        Self {
            timestamp_analysis_start: start,
            timestamp_analysis_complete: complete,
        }
    }

    /// Write the marker into `output_dir`, returning the marker's path.
    pub fn write(&self, fs: &dyn FileSystem, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(COMPLETION_MARKER_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs.write(&path, json.as_bytes())?;
        Ok(path)
    }

    pub fn read(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let contents = fs.read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use chrono::TimeDelta;

    #[test]
    fn marker_is_written_with_both_timestamps() {
        let fs = MockFileSystem::new();
        let start = Local::now();
        let marker = CompletionMarker::new(start, start + TimeDelta::minutes(5));

        let path = marker.write(&fs, Path::new("/out/run/qc-v0.1-output")).unwrap();
        assert_eq!(path, PathBuf::from("/out/run/qc-v0.1-output/analysis_complete.json"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs.read_to_string(&path).unwrap()).unwrap();
        assert!(raw["timestamp_analysis_start"].is_string());
        assert!(raw["timestamp_analysis_complete"].is_string());

        assert_eq!(CompletionMarker::read(&fs, &path).unwrap(), marker);
    }
}
