//! Scheduler configuration
//!
//! Read from `config.toml` in the data directory. Every field is optional;
//! a missing file or key falls back to the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scheduling::profiles::DEFAULT_MAX_INTERVAL_DAYS;
use crate::scheduling::ProjectionOptions;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {key} must be at most {max} (got {value})")]
    OutOfRange { key: &'static str, value: u64, max: u64 },
}

/// Upper bound for every day count in the config, about a century
pub const MAX_CONFIG_DAYS: u32 = 36_500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// How far ahead timeline projections look, in days
    pub horizon_days: u32,
    /// Maximum simulated reviews per projection
    pub max_projection_steps: usize,
    /// Days a snooze pushes a card out when none are given
    pub default_snooze_days: u32,
    /// Largest interval a profile may use
    pub max_interval_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let projection = ProjectionOptions::default();
        Self {
            horizon_days: projection.horizon_days,
            max_projection_steps: projection.max_steps,
            default_snooze_days: 1,
            max_interval_days: DEFAULT_MAX_INTERVAL_DAYS,
        }
    }
}

impl SchedulerConfig {
    /// Load `config.toml` from `data_dir`, or defaults if it does not exist
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config: SchedulerConfig = toml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded scheduler config from {:?}", path);
        Ok(config)
    }

    /// Keep every day count small enough that date arithmetic cannot overflow
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("horizon_days", self.horizon_days, MAX_CONFIG_DAYS),
            ("max_interval_days", self.max_interval_days, MAX_CONFIG_DAYS),
            ("default_snooze_days", self.default_snooze_days, self.max_interval_days),
        ];
        for (key, value, max) in limits {
            if value > max {
                return Err(ConfigError::OutOfRange {
                    key,
                    value: u64::from(value),
                    max: u64::from(max),
                });
            }
        }
        Ok(())
    }

    pub fn projection(&self) -> ProjectionOptions {
        ProjectionOptions {
            horizon_days: self.horizon_days,
            max_steps: self.max_projection_steps,
        }
    }
}
