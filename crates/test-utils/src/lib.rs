pub mod builders;
pub mod fake_executor;
pub mod logs;

use std::path::{Path, PathBuf};
use std::sync::Once;

use nanopore_qc_dispatch::discovery::SYMLINKS_COMPLETE_FILE;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Create `<runs_dir>/<run_id>`, optionally with its symlinks-complete marker.
pub fn make_run_dir(runs_dir: &Path, run_id: &str, symlinks_complete: bool) -> PathBuf {
    let dir = runs_dir.join(run_id);
    std::fs::create_dir_all(&dir).expect("creating run dir");
    std::fs::write(dir.join("reads.fastq.gz"), b"").expect("writing fastq");
    if symlinks_complete {
        std::fs::write(dir.join(SYMLINKS_COMPLETE_FILE), b"{}").expect("writing marker");
    }
    dir
}
