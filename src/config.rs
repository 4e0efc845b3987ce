use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigurationError;

/// How destination field names are matched against source field names by the
/// convention layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatching {
    /// Names must be byte-for-byte identical.
    #[default]
    Exact,
    /// Case and underscores are ignored, so `first_name` matches `firstName`.
    Normalized,
}

impl NameMatching {
    pub fn matches(&self, source: &str, destination: &str) -> bool {
        match self {
            NameMatching::Exact => source == destination,
            NameMatching::Normalized => normalize(source) == normalize(destination),
        }
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Engine-wide settings applied to every type map created by a `Registry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Generate identity rules for same-named, same-typed fields.
    pub implicit_mapping: bool,
    pub name_matching: NameMatching,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            implicit_mapping: true,
            name_matching: NameMatching::Exact,
        }
    }
}

impl MapperConfig {
    /// Convention layer disabled; only explicit rules run.
    pub fn explicit_only() -> Self {
        Self {
            implicit_mapping: false,
            ..Default::default()
        }
    }

    /// Load config from a JSON file. Missing keys take their default value.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)?;
        let config: MapperConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigurationError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
