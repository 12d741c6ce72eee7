//! Flight computer settings.
//!
//! Persisting settings is the host's job; this module only parses and
//! validates a TOML document handed to it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-computer tuning, typically loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightComputerSettings {
    /// Configured round-trip budget (seconds). Plain commands are held until
    /// at least this much time passed, even on faster links.
    pub total_delay: f64,
    /// Step time warp down instead of skipping over command deadlines.
    pub throttle_time_warp: bool,
    /// Optional cap on pending commands. Unbounded when unset.
    pub max_pending_commands: Option<usize>,
}

impl Default for FlightComputerSettings {
    fn default() -> Self {
        Self {
            total_delay: 0.0,
            throttle_time_warp: true,
            max_pending_commands: None,
        }
    }
}

impl FlightComputerSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.total_delay.is_finite() || self.total_delay < 0.0 {
            return Err(ConfigError::Invalid {
                field: "total_delay",
                reason: format!("must be a finite, non-negative number, got {}", self.total_delay),
            });
        }
        if self.max_pending_commands == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_pending_commands",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
