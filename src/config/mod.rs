// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the on-disk data model and the validated [`Config`] (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it and convert parameters to typed values (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    Config, PipelineConfig, PipelineParameter, RawConfig, RawParameterValue, RawPipelineConfig,
};
pub use validate::validate_raw_config;
