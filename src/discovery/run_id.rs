// src/discovery/run_id.rs

//! Run-id naming conventions for GridION and PromethION instruments.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::InstrumentType;

/// `<date>_<time>_X<n>_<flowcell id>_<run hash>`
pub const GRIDION_RUN_ID_PATTERN: &str = r"^\d{8}_\d{4}_X\d_[A-Z0-9]{8}_[a-z0-9]{8}$";

/// `<date>_<time>_P2S_<position>_<flowcell id>_<run hash>`
pub const PROMETHION_RUN_ID_PATTERN: &str =
    r"^\d{8}_\d{4}_P2S_\d+-\w_[A-Z0-9]{8}_[a-z0-9]{8}$";

static GRIDION_RUN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(GRIDION_RUN_ID_PATTERN).expect("GridION pattern compiles"));

static PROMETHION_RUN_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(PROMETHION_RUN_ID_PATTERN).expect("PromethION pattern compiles")
});

pub fn is_gridion_run_id(name: &str) -> bool {
    GRIDION_RUN_ID.is_match(name)
}

pub fn is_promethion_run_id(name: &str) -> bool {
    PROMETHION_RUN_ID.is_match(name)
}

/// Instrument type implied by a directory name. GridION wins if both match.
pub fn classify_run_id(name: &str) -> InstrumentType {
    if is_gridion_run_id(name) {
        InstrumentType::Gridion
    } else if is_promethion_run_id(name) {
        InstrumentType::Promethion
    } else {
        InstrumentType::Unknown
    }
}

pub fn matches_run_id_format(name: &str) -> bool {
    is_gridion_run_id(name) || is_promethion_run_id(name)
}
