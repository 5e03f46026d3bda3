//! Engine settings files.
//!
//! ```toml
//! [engine]
//! sample_rate = 44100
//! command_capacity = 1
//! status_capacity = 16
//!
//! [scope]
//! enabled = true
//! interval_blocks = 8
//! capacity = 4
//! ```
//!
//! Every key is optional; unknown keys are rejected so typos surface.

use std::path::Path;

use patchbay_engine::{EngineConfig, ScopeConfig};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// `[engine]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Sample rate in Hz used until the host reports one.
    pub sample_rate: u32,
    /// Pending graph loads the command queue holds.
    pub command_capacity: usize,
    /// Status replies buffered before new ones are dropped.
    pub status_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            sample_rate: config.sample_rate as u32,
            command_capacity: config.command_capacity,
            status_capacity: config.status_capacity,
        }
    }
}

/// A complete settings file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Engine sizes and rate.
    pub engine: EngineSettings,
    /// Scope tap.
    pub scope: ScopeConfig,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parse and check settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(toml_str)?;
        settings.check()?;
        Ok(settings)
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Engine construction settings.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            sample_rate: self.engine.sample_rate as f32,
            command_capacity: self.engine.command_capacity,
            status_capacity: self.engine.status_capacity,
            scope: self.scope.clone(),
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        let positive = |key, value: usize| {
            if value == 0 {
                Err(ConfigError::InvalidSetting {
                    key,
                    reason: "must be at least 1".to_string(),
                })
            } else {
                Ok(())
            }
        };
        positive("engine.sample_rate", self.engine.sample_rate as usize)?;
        positive("engine.command_capacity", self.engine.command_capacity)?;
        positive("engine.status_capacity", self.engine.status_capacity)?;
        positive("scope.interval_blocks", self.scope.interval_blocks as usize)?;
        positive("scope.capacity", self.scope.capacity)
    }
}
