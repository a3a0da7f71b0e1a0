//! Configuration for the wayfinder
//!
//! Supports loading configuration from:
//! - YAML files (gazetteer and trigger tables)
//! - Environment variables (WAYFINDER_ prefix)
//! - Compiled-in defaults, so the system runs with no files present
//!
//! Every table carries a `validate()` that runs at load time; malformed
//! configuration fails fast before any session begins.

pub mod gazetteer;
pub mod settings;
pub mod triggers;

pub use gazetteer::{GazetteerConfig, GazetteerEntry};
pub use settings::{load_settings, EstimatorSettings, LoggingSettings, ResolverSettings, Settings};
pub use triggers::TriggerConfig;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
