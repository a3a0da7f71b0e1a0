//! Gazetteer configuration
//!
//! The static alias -> canonical lookup table driving entity resolution.
//! Entries are kept as an ordered `Vec` rather than a map: when two aliases
//! of equal length both match an utterance, declaration order decides, and
//! that order must survive loading.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::ConfigError;

/// Single alias -> canonical mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerEntry {
    /// Free-text alias, lowercase
    pub alias: String,
    /// Canonical display/lookup name this alias resolves to
    pub canonical: String,
    /// The alias is a numbered-family prefix ("bathroom", "security
    /// checkpoint"); a trailing number is mandatory to form a valid name
    #[serde(default)]
    pub requires_number: bool,
}

/// Gazetteer table loaded from gazetteer.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerConfig {
    #[serde(default)]
    pub entries: Vec<GazetteerEntry>,
}

impl GazetteerConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.as_ref().display(),
            entries = config.entries.len(),
            "gazetteer loaded"
        );
        Ok(config)
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Compiled-in default table covering the common facility vocabulary
    pub fn builtin() -> Self {
        fn entry(alias: &str, canonical: &str, requires_number: bool) -> GazetteerEntry {
            GazetteerEntry {
                alias: alias.to_string(),
                canonical: canonical.to_string(),
                requires_number,
            }
        }

        Self {
            entries: vec![
                entry("main entrance", "Main Entrance", false),
                entry("entrance", "Main Entrance", false),
                entry("front door", "Main Entrance", false),
                entry("security checkpoint", "Security Checkpoint", true),
                entry("checkpoint", "Security Checkpoint", true),
                entry("security", "Security Checkpoint", true),
                entry("bathroom", "Bathroom", true),
                entry("restroom", "Bathroom", true),
                entry("washroom", "Bathroom", true),
                entry("toilet", "Bathroom", true),
                entry("second floor exit", "Second Floor Exit", false),
                entry("north exit", "North Exit", false),
                entry("south exit", "South Exit", false),
                entry("food court", "Food Court", false),
                entry("baggage claim", "Baggage Claim", false),
                entry("help desk", "Help Desk", false),
                entry("information desk", "Help Desk", false),
            ],
        }
    }

    /// Reject empty aliases/canonicals and duplicate aliases
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "entries".to_string(),
                message: "gazetteer has no entries".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.alias.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("entries[{}].alias", i),
                    message: "alias is empty".to_string(),
                });
            }
            if entry.canonical.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("entries[{}].canonical", i),
                    message: "canonical name is empty".to_string(),
                });
            }
            if entry.alias != entry.alias.to_lowercase() {
                return Err(ConfigError::InvalidValue {
                    field: format!("entries[{}].alias", i),
                    message: format!("alias '{}' must be lowercase", entry.alias),
                });
            }
            if !seen.insert(entry.alias.clone()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("entries[{}].alias", i),
                    message: format!("duplicate alias '{}'", entry.alias),
                });
            }
        }

        Ok(())
    }
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
