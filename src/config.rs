// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Process-level plugin settings.
//!
//! Resolution order: built-in defaults, then the TOML file named by
//! `ROUTE_PLUGIN_CONFIG`, then individual environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "ROUTE_PLUGIN_CONFIG";
pub const LOG_LEVEL_ENV: &str = "ROUTE_PLUGIN_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "ROUTE_PLUGIN_LOG_FORMAT";
pub const FAILURE_POLICY_ENV: &str = "ROUTE_PLUGIN_FAILURE_POLICY";
pub const DEFAULT_NAMESPACE_ENV: &str = "ROUTE_PLUGIN_DEFAULT_NAMESPACE";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// How `set_weight` proceeds after one of several routes fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failing route.
    #[default]
    FailFast,
    /// Keep reconciling the remaining routes, then report the first failure.
    #[serde(alias = "continue")]
    ContinueOnError,
}

impl std::str::FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "failfast" => Ok(Self::FailFast),
            "continue" | "continue-on-error" => Ok(Self::ContinueOnError),
            _ => Err(ConfigError::InvalidValue {
                key: FAILURE_POLICY_ENV.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: LOG_FORMAT_ENV.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter level; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Settings shared by every reconciliation in this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    pub log: LogSettings,
    pub failure_policy: FailurePolicy,
    /// Namespace used when a rollout carries none.
    pub default_namespace: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            log: LogSettings::default(),
            failure_policy: FailurePolicy::FailFast,
            default_namespace: "default".to_string(),
        }
    }
}

impl PluginSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log.level".to_string(),
                value: self.log.level.clone(),
            });
        }
        if self.default_namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "default_namespace".to_string(),
                value: self.default_namespace.clone(),
            });
        }
        Ok(())
    }
}

/// Read settings from a TOML file. Missing keys keep their defaults.
pub fn load_file(path: &Path) -> Result<PluginSettings, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Resolve settings using `lookup` for environment access.
pub fn load_with<F>(lookup: F) -> Result<PluginSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = match lookup(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        Some(path) => load_file(Path::new(&path))?,
        None => PluginSettings::default(),
    };

    if let Some(level) = lookup(LOG_LEVEL_ENV) {
        settings.log.level = level.trim().to_ascii_lowercase();
    }
    if let Some(format) = lookup(LOG_FORMAT_ENV) {
        settings.log.format = format.parse()?;
    }
    if let Some(policy) = lookup(FAILURE_POLICY_ENV) {
        settings.failure_policy = policy.parse()?;
    }
    if let Some(namespace) = lookup(DEFAULT_NAMESPACE_ENV) {
        settings.default_namespace = namespace.trim().to_string();
    }

    settings.validate()?;
    Ok(settings)
}

/// Resolve settings from the process environment.
pub fn load() -> Result<PluginSettings, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
