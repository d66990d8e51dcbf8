//! Explorer configuration
//!
//! Settings are read-only to the core: the driver (CLI or UI shell) loads
//! them, applies `HELLION_*` environment overrides and validates them
//! before opening a session.

use crate::services::SearchFlags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound accepted for `max_celestial_depth`
const MAX_SUPPORTED_CELESTIAL_DEPTH: usize = 64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Environment override {key}={value:?} is not valid")]
    InvalidOverride { key: String, value: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Where the solar-system record sets live inside the loaded documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLayout {
    /// File name of the static celestial-bodies document
    pub celestial_bodies: String,
    /// JSON pointers into the save document
    pub ships: String,
    pub asteroids: String,
    pub players: String,
    pub dynamic_objects: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            celestial_bodies: "CelestialBodies.json".to_string(),
            ships: "/Ships".to_string(),
            asteroids: "/Asteroids".to_string(),
            players: "/Players".to_string(),
            dynamic_objects: "/DynamicObjects".to_string(),
        }
    }
}

/// Settings consumed by [`GameSession`](crate::services::GameSession)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Levels of each static data file materialised on load
    pub static_data_depth: usize,

    /// Levels of the save file materialised on load
    pub save_depth: usize,

    /// Levels built by each on-demand expansion
    pub expansion_depth: usize,

    /// Guard on celestial-body nesting
    pub max_celestial_depth: usize,

    /// Collapse single-container arrays in the Game Data view
    pub collapse_arrays: bool,

    /// Default flags for new searches
    pub search: SearchFlags,

    pub sources: SourceLayout,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            static_data_depth: 1,
            save_depth: 4,
            expansion_depth: 1,
            max_celestial_depth: 10,
            collapse_arrays: false,
            search: SearchFlags::default(),
            sources: SourceLayout::default(),
        }
    }
}

impl ExplorerConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `HELLION_*` overrides looked up through `lookup`.
    ///
    /// Recognised keys: `HELLION_STATIC_DATA_DEPTH`, `HELLION_SAVE_DEPTH`,
    /// `HELLION_EXPANSION_DEPTH`, `HELLION_MAX_CELESTIAL_DEPTH`,
    /// `HELLION_COLLAPSE_ARRAYS`, `HELLION_MATCH_CASE`, `HELLION_BY_PATH`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_value(&lookup, "HELLION_STATIC_DATA_DEPTH", &mut self.static_data_depth)?;
        override_value(&lookup, "HELLION_SAVE_DEPTH", &mut self.save_depth)?;
        override_value(&lookup, "HELLION_EXPANSION_DEPTH", &mut self.expansion_depth)?;
        override_value(&lookup, "HELLION_MAX_CELESTIAL_DEPTH", &mut self.max_celestial_depth)?;
        override_value(&lookup, "HELLION_COLLAPSE_ARRAYS", &mut self.collapse_arrays)?;
        override_value(&lookup, "HELLION_MATCH_CASE", &mut self.search.match_case)?;
        override_value(&lookup, "HELLION_BY_PATH", &mut self.search.by_path)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expansion_depth == 0 {
            return Err(ConfigError::invalid(
                "expansion_depth",
                "must be greater than 0",
            ));
        }

        if self.max_celestial_depth == 0 {
            return Err(ConfigError::invalid(
                "max_celestial_depth",
                "must be greater than 0",
            ));
        }

        if self.max_celestial_depth > MAX_SUPPORTED_CELESTIAL_DEPTH {
            return Err(ConfigError::invalid(
                "max_celestial_depth",
                format!("cannot exceed {}", MAX_SUPPORTED_CELESTIAL_DEPTH),
            ));
        }

        if self.sources.celestial_bodies.trim().is_empty() {
            return Err(ConfigError::invalid(
                "sources.celestial_bodies",
                "cannot be empty",
            ));
        }

        let pointers = [
            ("sources.ships", &self.sources.ships),
            ("sources.asteroids", &self.sources.asteroids),
            ("sources.players", &self.sources.players),
            ("sources.dynamic_objects", &self.sources.dynamic_objects),
        ];
        for (field, pointer) in pointers {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                return Err(ConfigError::invalid(
                    field,
                    format!("'{}' is not a JSON pointer", pointer),
                ));
            }
        }

        Ok(())
    }
}

fn override_value<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    *target = raw.trim().parse().map_err(|_| ConfigError::InvalidOverride {
        key: key.to_string(),
        value: raw.clone(),
    })?;
    tracing::debug!("Configuration override {}={}", key, raw);
    Ok(())
}
