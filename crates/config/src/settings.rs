//! Runtime settings
//!
//! Layered loading: `config/default.yaml`,
//! then an optional environment-specific file, then `WAYFINDER__`-prefixed
//! environment variables on top. All knobs have compiled-in defaults.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Entity resolver tuning
    #[serde(default)]
    pub resolver: ResolverSettings,

    /// Distance estimator tuning
    #[serde(default)]
    pub estimator: EstimatorSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Optional path to a gazetteer YAML; built-in table when absent
    #[serde(default)]
    pub gazetteer_path: Option<String>,

    /// Optional path to a trigger-table YAML; built-in tables when absent
    #[serde(default)]
    pub triggers_path: Option<String>,
}

/// Entity resolver tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Maximum Levenshtein distance accepted for fuzzy alias matches
    #[serde(default = "default_fuzzy_max_distance")]
    pub fuzzy_max_distance: usize,

    /// Aliases shorter than this only allow distance 1
    #[serde(default = "default_fuzzy_min_alias_len")]
    pub fuzzy_min_alias_len: usize,

    /// How many characters after a numbered-family alias to scan for the
    /// mandatory number
    #[serde(default = "default_number_window_chars")]
    pub number_window_chars: usize,
}

fn default_fuzzy_max_distance() -> usize {
    2
}
fn default_fuzzy_min_alias_len() -> usize {
    6
}
fn default_number_window_chars() -> usize {
    12
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            fuzzy_max_distance: default_fuzzy_max_distance(),
            fuzzy_min_alias_len: default_fuzzy_min_alias_len(),
            number_window_chars: default_number_window_chars(),
        }
    }
}

/// Distance estimator tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorSettings {
    /// Metres per step when converting route length to a step count
    #[serde(default = "default_step_length_m")]
    pub step_length_m: f64,
}

fn default_step_length_m() -> f64 {
    0.75
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            step_length_m: default_step_length_m(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON-formatted logs
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a single YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let config = Config::builder()
            .add_source(File::from(path))
            .build()?;
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate numeric bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=3).contains(&self.resolver.fuzzy_max_distance) {
            return Err(ConfigError::InvalidValue {
                field: "resolver.fuzzy_max_distance".to_string(),
                message: format!(
                    "Must be between 1 and 3, got {}",
                    self.resolver.fuzzy_max_distance
                ),
            });
        }

        if self.resolver.fuzzy_min_alias_len == 0 {
            return Err(ConfigError::InvalidValue {
                field: "resolver.fuzzy_min_alias_len".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if !(1..=64).contains(&self.resolver.number_window_chars) {
            return Err(ConfigError::InvalidValue {
                field: "resolver.number_window_chars".to_string(),
                message: format!(
                    "Must be between 1 and 64, got {}",
                    self.resolver.number_window_chars
                ),
            });
        }

        if !self.estimator.step_length_m.is_finite() || self.estimator.step_length_m <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "estimator.step_length_m".to_string(),
                message: format!("Must be positive, got {}", self.estimator.step_length_m),
            });
        }

        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (WAYFINDER__ prefix, `__` separator)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("WAYFINDER")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;

    tracing::info!(
        fuzzy_max_distance = settings.resolver.fuzzy_max_distance,
        step_length_m = settings.estimator.step_length_m,
        "settings loaded"
    );

    Ok(settings)
}
