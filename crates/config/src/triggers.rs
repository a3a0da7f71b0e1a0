//! Trigger-phrase tables for intent classification
//!
//! One ordered phrase list per intent category, plus the keyword families
//! the navigation intent special-cases. Order matters twice: categories are
//! checked in the classifier's fixed priority order, and within a category
//! an equal-length trigger tie breaks by table order.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Trigger tables loaded from triggers.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// "I am lost" family; maps to Localize with no entity extraction
    #[serde(default = "default_lost")]
    pub lost: Vec<String>,

    /// Remaining-distance questions
    #[serde(default = "default_distance")]
    pub distance: Vec<String>,

    /// Navigation requests; the text after the trigger names the target
    #[serde(default = "default_navigation")]
    pub navigation: Vec<String>,

    /// Location announcements; the text after the trigger names the place
    #[serde(default = "default_update_location")]
    pub update_location: Vec<String>,

    /// "What now" family; reply depends on what the session already knows
    #[serde(default = "default_confused")]
    pub confused: Vec<String>,

    /// Bare keywords that mean "any bathroom", resolved nearest-of-type
    #[serde(default = "default_bathroom_keywords")]
    pub bathroom_keywords: Vec<String>,

    /// Bare keywords that mean "any exit", resolved nearest-of-type
    #[serde(default = "default_exit_keywords")]
    pub exit_keywords: Vec<String>,

    /// Phrases referring to the user's own gate
    #[serde(default = "default_my_gate")]
    pub my_gate_phrases: Vec<String>,
}

fn default_lost() -> Vec<String> {
    to_strings(&["i am lost", "i'm lost", "i got lost", "where am i"])
}

fn default_distance() -> Vec<String> {
    to_strings(&[
        "how far",
        "how much further",
        "how much longer",
        "how many steps",
    ])
}

fn default_navigation() -> Vec<String> {
    to_strings(&[
        "how do i get to",
        "i want to go to",
        "take me to",
        "navigate to",
        "guide me to",
        "bring me to",
        "go to",
        "where is",
    ])
}

fn default_update_location() -> Vec<String> {
    to_strings(&[
        "my location is",
        "i am standing at",
        "i am at",
        "i'm at",
        "i am near",
        "i'm near",
        "i am by",
    ])
}

fn default_confused() -> Vec<String> {
    to_strings(&["what now", "what next", "now what", "what do i do"])
}

fn default_bathroom_keywords() -> Vec<String> {
    to_strings(&["bathroom", "restroom", "washroom", "toilet"])
}

fn default_exit_keywords() -> Vec<String> {
    to_strings(&["emergency exit", "way out", "exit"])
}

fn default_my_gate() -> Vec<String> {
    to_strings(&["my gate", "my boarding gate", "my flight"])
}

fn to_strings(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|s| s.to_string()).collect()
}

impl TriggerConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(path = %path.as_ref().display(), "trigger tables loaded");
        Ok(config)
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Compiled-in default tables
    pub fn builtin() -> Self {
        Self {
            lost: default_lost(),
            distance: default_distance(),
            navigation: default_navigation(),
            update_location: default_update_location(),
            confused: default_confused(),
            bathroom_keywords: default_bathroom_keywords(),
            exit_keywords: default_exit_keywords(),
            my_gate_phrases: default_my_gate(),
        }
    }

    /// Reject empty tables and non-lowercase or blank phrases
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tables: [(&str, &[String]); 8] = [
            ("lost", &self.lost),
            ("distance", &self.distance),
            ("navigation", &self.navigation),
            ("update_location", &self.update_location),
            ("confused", &self.confused),
            ("bathroom_keywords", &self.bathroom_keywords),
            ("exit_keywords", &self.exit_keywords),
            ("my_gate_phrases", &self.my_gate_phrases),
        ];

        for (name, phrases) in tables {
            if phrases.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: name.to_string(),
                    message: "trigger table is empty".to_string(),
                });
            }
            for phrase in phrases {
                if phrase.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: name.to_string(),
                        message: "trigger phrase is blank".to_string(),
                    });
                }
                if phrase != &phrase.to_lowercase() {
                    return Err(ConfigError::InvalidValue {
                        field: name.to_string(),
                        message: format!("trigger '{}' must be lowercase", phrase),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_validates() {
        assert!(TriggerConfig::builtin().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
navigation:
  - "walk me to"
  - "take me to"
"#;
        let config = TriggerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.navigation, vec!["walk me to", "take me to"]);
        // Unspecified tables fall back to the built-ins
        assert_eq!(config.lost, TriggerConfig::builtin().lost);
    }

    #[test]
    fn test_empty_table_rejected() {
        let yaml = "lost: []\n";
        assert!(TriggerConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_uppercase_trigger_rejected() {
        let yaml = "lost:\n  - \"I am lost\"\n";
        assert!(TriggerConfig::from_yaml_str(yaml).is_err());
    }
}
