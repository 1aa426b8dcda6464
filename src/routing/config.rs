// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-rollout routing configuration.
//!
//! Parsed fresh from the rollout on every call; nothing here is cached.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PluginError;
use crate::k8s::validation::{validate_resource_name, validate_service_name};
use crate::k8s::Rollout;

/// Key under which the host stores this plugin's configuration block.
pub const PLUGIN_CONFIG_KEY: &str = "argoproj-labs/openshift";

/// `{"routes": ["<route-name>", ...]}`; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub routes: Vec<String>,
}

impl RoutingConfig {
    /// Extract and validate the configuration block from a rollout.
    pub fn from_rollout(rollout: &Rollout) -> Result<Self, PluginError> {
        let raw = rollout.plugin_config(PLUGIN_CONFIG_KEY).ok_or_else(|| {
            PluginError::ConfigParse(format!(
                "rollout has no traffic routing configuration for plugin '{}'",
                PLUGIN_CONFIG_KEY
            ))
        })?;
        Self::from_value(raw)
    }

    /// Parse a configuration block.
    ///
    /// The host may hand the block over either as a JSON object or as a JSON
    /// string holding the encoded object.
    pub fn from_value(raw: &Value) -> Result<Self, PluginError> {
        let config: RoutingConfig = match raw {
            Value::String(encoded) => serde_json::from_str(encoded),
            other => serde_json::from_value(other.clone()),
        }
        .map_err(|e| PluginError::ConfigParse(format!("malformed plugin configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PluginError> {
        if self.routes.is_empty() {
            return Err(PluginError::ConfigParse(
                "'routes' must list at least one route".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (i, route) in self.routes.iter().enumerate() {
            validate_resource_name(route, &format!("routes[{}]", i))?;
            if !seen.insert(route.as_str()) {
                return Err(PluginError::ConfigParse(format!(
                    "route '{}' is listed more than once",
                    route
                )));
            }
        }
        Ok(())
    }
}

/// The stable/canary service pair taken from the rollout's canary strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanaryServices {
    pub stable: String,
    pub canary: String,
}

impl CanaryServices {
    pub fn from_rollout(rollout: &Rollout) -> Result<Self, PluginError> {
        let canary = rollout.canary_strategy().ok_or_else(|| {
            PluginError::ConfigParse("rollout does not use a canary strategy".to_string())
        })?;

        validate_service_name(&canary.stable_service, "stableService")?;
        validate_service_name(&canary.canary_service, "canaryService")?;

        if canary.stable_service == canary.canary_service {
            return Err(PluginError::ConfigParse(format!(
                "stableService and canaryService must differ, both are '{}'",
                canary.stable_service
            )));
        }

        Ok(Self {
            stable: canary.stable_service.clone(),
            canary: canary.canary_service.clone(),
        })
    }

    pub fn is_reserved(&self, service: &str) -> bool {
        service == self.stable || service == self.canary
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
