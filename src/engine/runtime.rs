// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::{load_and_validate, Config};
use crate::errors::Result;
use crate::exec::PipelineExecutor;
use crate::fs::FileSystem;

use super::pass::run_pass_until;
use super::shutdown::ShutdownSignal;
use super::RuntimeOptions;

/// Repeats scan passes until shutdown is requested (or after one pass with
/// `--once`).
///
/// Shutdown is checked before each pass, between runs and pipelines inside a
/// pass, and during the sleep between passes.
///
/// The config file is re-read before every pass after the first, so edits
/// to the pipeline list or exclusions take effect without a restart. A
/// config that fails to load is logged and the previous one is kept.
pub struct Runtime<E: PipelineExecutor> {
    config_path: PathBuf,
    config: Config,
    fs: Box<dyn FileSystem>,
    executor: E,
    options: RuntimeOptions,
    shutdown: ShutdownSignal,
}

impl<E: PipelineExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config_path", &self.config_path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: PipelineExecutor> Runtime<E> {
    pub fn new(
        config_path: PathBuf,
        config: Config,
        fs: Box<dyn FileSystem>,
        executor: E,
        options: RuntimeOptions,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            config_path,
            config,
            fs,
            executor,
            options,
            shutdown,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(mut self) -> Result<()> {
        info!(config = %self.config_path.display(), once = self.options.once, "runtime started");

        let mut first_pass = true;
        loop {
            if self.shutdown.is_requested() {
                info!("shutdown requested; exiting");
                return Ok(());
            }
            if !first_pass {
                self.reload_config();
            }
            first_pass = false;

            let result = run_pass_until(
                &self.config,
                self.fs.as_ref(),
                &mut self.executor,
                &self.shutdown,
            )
            .await;

            if self.options.once {
                return result.map(|_| ());
            }

            if let Err(err) = result {
                error!(
                    event_type = "scan_failed",
                    fastq_by_run_dir = %self.config.fastq_by_run_dir.display(),
                    error = %format!("{err:#}"),
                    "scan failed"
                );
            }

            let interval = Duration::from_secs(self.config.scan_interval_seconds);
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = self.shutdown.wait() => {}
            }
        }
    }

    fn reload_config(&mut self) {
        match load_and_validate(&self.config_path) {
            Ok(cfg) => self.config = cfg,
            Err(err) => warn!(
                event_type = "config_reload_failed",
                config = %self.config_path.display(),
                error = %format!("{err:#}"),
                "config reload failed; keeping previous config"
            ),
        }
    }
}
