// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for the reservation coordinator and the lock service
//!
//! Every section is optional in the TOML file:
//!
//! ```toml
//! [coordinator]
//! key_prefix = "ticket-lock-"
//! wait_budget = "5s"
//! lease_duration = "30s"
//!
//! [lock_service]
//! poll_interval = "50ms"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the coordinator uses the lock service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Namespace prepended to ticket ids to form lock keys
    pub key_prefix: String,
    /// How long to queue for a lease before reporting a timeout
    #[serde(with = "humantime_serde")]
    pub wait_budget: Duration,
    /// How long a granted lease lives if never released
    #[serde(with = "humantime_serde")]
    pub lease_duration: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            key_prefix: "ticket-lock-".to_string(),
            wait_budget: Duration::from_secs(5),
            lease_duration: Duration::from_secs(30),
        }
    }
}

impl CoordinatorConfig {
    pub fn with_wait_budget(mut self, wait: Duration) -> Self {
        self.wait_budget = wait;
        self
    }

    pub fn with_lease_duration(mut self, lease: Duration) -> Self {
        self.lease_duration = lease;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// A zero wait budget is a plain try-lock; a zero lease never holds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lease_duration.is_zero() {
            return Err(ConfigError::Invalid(
                "coordinator.lease_duration must be greater than zero".to_string(),
            ));
        }
        if self.key_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "coordinator.key_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tuning for the in-process lease lock service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockServiceConfig {
    /// Upper bound between retries while waiting, so lapsed leases are noticed
    /// even when no holder releases
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for LockServiceConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// Top-level configuration file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub coordinator: CoordinatorConfig,
    pub lock_service: LockServiceConfig,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.coordinator.validate()?;
        if self.lock_service.poll_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "lock_service.poll_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
