// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `nanopore-qc-dispatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nanopore-qc-dispatch",
    version,
    about = "Detect completed nanopore sequencing runs and launch QC pipelines against them.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML, or JSON if it ends in `.json`).
    #[arg(short, long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Run a single scan pass and exit.
    #[arg(long)]
    pub once: bool,

    /// Scan once and print the pipeline commands that would run, without
    /// running them.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `NANOPORE_QC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log output format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "json")]
    pub log_format: LogFormat,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// One JSON object per line, or human-readable text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Text,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["nanopore-qc-dispatch"]).unwrap();
        assert_eq!(args.config, PathBuf::from("nanopore-qc.toml"));
        assert!(!args.once);
        assert!(!args.dry_run);
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn flags() {
        let args = CliArgs::try_parse_from([
            "nanopore-qc-dispatch",
            "-c",
            "/etc/qc.json",
            "--once",
            "--log-level",
            "debug",
            "--log-format",
            "text",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("/etc/qc.json"));
        assert!(args.once);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert_eq!(args.log_format, LogFormat::Text);
    }
}
