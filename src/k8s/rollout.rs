// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host-side Rollout types.
//!
//! The progressive-delivery controller owns the Rollout; the plugin only reads
//! the canary services and its own configuration block from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::route::ObjectMeta;

/// Rollout CRD (only the fields this plugin consumes are typed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rollout {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RolloutSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutSpec {
    #[serde(default)]
    pub strategy: RolloutStrategy,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutStrategy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canary: Option<CanaryStrategy>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canary strategy: the two services the plugin splits traffic between.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanaryStrategy {
    #[serde(default)]
    pub stable_service: String,
    #[serde(default)]
    pub canary_service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_routing: Option<RolloutTrafficRouting>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Traffic routing block; plugin configuration is keyed by plugin identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutTrafficRouting {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugins: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An extra backend receiving a slice of the canary share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightDestination {
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_template_hash: Option<String>,
    pub weight: i32,
}

impl WeightDestination {
    pub fn new(service_name: impl Into<String>, weight: i32) -> Self {
        Self {
            service_name: service_name.into(),
            pod_template_hash: None,
            weight,
        }
    }

    pub fn with_pod_template_hash(mut self, hash: impl Into<String>) -> Self {
        self.pod_template_hash = Some(hash.into());
        self
    }
}

/// Header-based route request from the host. OpenShift Routes cannot match
/// on headers, so the plugin only logs these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetHeaderRoute {
    pub name: String,
    #[serde(default, rename = "match", skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<Value>,
}

/// Traffic mirroring request from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMirrorRoute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<i32>,
    #[serde(default, rename = "match", skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<Value>,
}

impl Rollout {
    /// Build a canary Rollout splitting between `stable` and `canary`.
    pub fn canary(namespace: &str, name: &str, stable: &str, canary: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: RolloutSpec {
                strategy: RolloutStrategy {
                    canary: Some(CanaryStrategy {
                        stable_service: stable.to_string(),
                        canary_service: canary.to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    /// Attach a plugin configuration block under `key`.
    pub fn with_plugin_config(mut self, key: &str, config: Value) -> Self {
        if let Some(canary) = self.spec.strategy.canary.as_mut() {
            canary
                .traffic_routing
                .get_or_insert_with(Default::default)
                .plugins
                .insert(key.to_string(), config);
        }
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
    }

    pub fn canary_strategy(&self) -> Option<&CanaryStrategy> {
        self.spec.strategy.canary.as_ref()
    }

    /// Raw configuration block registered for `key`, if any.
    pub fn plugin_config(&self, key: &str) -> Option<&Value> {
        self.canary_strategy()?
            .traffic_routing
            .as_ref()?
            .plugins
            .get(key)
    }
}
