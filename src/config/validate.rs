// src/config/validate.rs

use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::config::model::{
    Config, PipelineConfig, PipelineParameter, RawConfig, RawParameterValue, RawPipelineConfig,
};
use crate::errors::{QcError, Result};
use crate::types::RunField;

impl TryFrom<RawConfig> for Config {
    type Error = QcError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        let pipelines = raw
            .pipelines
            .iter()
            .map(convert_pipeline)
            .collect::<Result<Vec<_>>>()?;

        let conda_cache_dir = match raw.conda_cache_dir {
            Some(dir) => dir,
            None => default_conda_cache_dir()?,
        };

        Ok(Config {
            fastq_by_run_dir: raw.fastq_by_run_dir,
            analysis_output_dir: raw.analysis_output_dir,
            analysis_work_dir: raw.analysis_work_dir,
            pipelines,
            excluded_runs: raw.excluded_runs.unwrap_or_default(),
            notification_email_addresses: raw.notification_email_addresses.unwrap_or_default(),
            send_notification_emails: raw.send_notification_emails.unwrap_or(false),
            scan_interval_seconds: raw.scan_interval_seconds,
            check_symlinks_complete: raw.check_symlinks_complete,
            eligibility: raw.eligibility,
            failed_work_dir_retention: raw.failed_work_dir_retention,
            conda_cache_dir,
            nextflow_executable: raw.nextflow_executable,
        })
    }
}

/// Check the invariants that serde cannot express.
pub fn validate_raw_config(cfg: &RawConfig) -> Result<()> {
    ensure_has_pipelines(cfg)?;
    validate_global_config(cfg)?;
    validate_notifications(cfg)?;
    for pipeline in cfg.pipelines.iter() {
        validate_pipeline_identity(pipeline)?;
    }
    Ok(())
}

fn ensure_has_pipelines(cfg: &RawConfig) -> Result<()> {
    if cfg.pipelines.is_empty() {
        return Err(QcError::ConfigError(
            "config must contain at least one [[pipelines]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfig) -> Result<()> {
    if cfg.scan_interval_seconds == 0 {
        return Err(QcError::ConfigError(
            "scan_interval_seconds must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.nextflow_executable.trim().is_empty() {
        return Err(QcError::ConfigError(
            "nextflow_executable must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_notifications(cfg: &RawConfig) -> Result<()> {
    let enabled = cfg.send_notification_emails.unwrap_or(false);
    let has_addresses = cfg
        .notification_email_addresses
        .as_ref()
        .is_some_and(|a| !a.is_empty());

    if enabled && !has_addresses {
        return Err(QcError::ConfigError(
            "send_notification_emails is true but notification_email_addresses is empty"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_pipeline_identity(pipeline: &RawPipelineConfig) -> Result<()> {
    let mut segments = pipeline.pipeline_name.split('/');
    let org = segments.next().unwrap_or_default();
    let name = segments.next().unwrap_or_default();
    if org.is_empty() || name.is_empty() {
        return Err(QcError::ConfigError(format!(
            "pipeline_name '{}' must have the form '<organization>/<name>'",
            pipeline.pipeline_name
        )));
    }

    if pipeline.pipeline_version.trim().is_empty() {
        return Err(QcError::ConfigError(format!(
            "pipeline '{}' has an empty pipeline_version",
            pipeline.pipeline_name
        )));
    }
    Ok(())
}

fn convert_pipeline(raw: &RawPipelineConfig) -> Result<PipelineConfig> {
    let mut pipeline_parameters = IndexMap::new();

    for (flag, value) in raw.pipeline_parameters.iter() {
        let parameter = match value {
            // JSON `null`: inherit the run field with the flag's own name.
            None => PipelineParameter::FromRunField(parse_run_field(&raw.pipeline_name, flag)?),
            Some(RawParameterValue::FromRun { from_run }) => {
                PipelineParameter::FromRunField(parse_run_field(&raw.pipeline_name, from_run)?)
            }
            Some(RawParameterValue::Text(s)) => PipelineParameter::Literal(s.clone()),
            Some(RawParameterValue::Integer(i)) => PipelineParameter::Literal(i.to_string()),
            Some(RawParameterValue::Float(f)) => PipelineParameter::Literal(f.to_string()),
            Some(RawParameterValue::Bool(b)) => PipelineParameter::Literal(b.to_string()),
        };
        pipeline_parameters.insert(flag.clone(), parameter);
    }

    Ok(PipelineConfig {
        pipeline_name: raw.pipeline_name.clone(),
        pipeline_version: raw.pipeline_version.clone(),
        pipeline_parameters,
    })
}

fn parse_run_field(pipeline_name: &str, field: &str) -> Result<RunField> {
    RunField::from_str(field).map_err(|unknown| {
        QcError::RunField(format!(
            "pipeline '{pipeline_name}' takes a parameter from unknown run field '{unknown}'"
        ))
    })
}

fn default_conda_cache_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".conda/envs"))
        .ok_or_else(|| {
            QcError::ConfigError(
                "conda_cache_dir is unset and the home directory could not be determined"
                    .to_string(),
            )
        })
}
