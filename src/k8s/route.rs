// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! OpenShift Route resource model.
//!
//! Only the fields the plugin reads or writes are typed. Everything else
//! (host, tls, port, status, managed fields...) is carried through the
//! flattened `extra` maps so a decode/encode cycle never drops data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PluginError;

pub const ROUTE_API_VERSION: &str = "route.openshift.io/v1";
pub const ROUTE_KIND: &str = "Route";
pub const SERVICE_KIND: &str = "Service";

fn default_api_version() -> String {
    ROUTE_API_VERSION.to_string()
}

fn default_route_kind() -> String {
    ROUTE_KIND.to_string()
}

fn default_backend_kind() -> String {
    SERVICE_KIND.to_string()
}

/// Route CRD (`route.openshift.io/v1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_route_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RouteSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Subset of Kubernetes object metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Opaque optimistic-concurrency token owned by the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Desired state of a Route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// Primary backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<RouteTargetReference>,
    /// Additional weighted backends.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_backends: Vec<RouteTargetReference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A weighted backend reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTargetReference {
    #[serde(default = "default_backend_kind")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

impl RouteTargetReference {
    /// Reference a Service with the given weight.
    pub fn service(name: impl Into<String>, weight: i32) -> Self {
        Self {
            kind: SERVICE_KIND.to_string(),
            name: name.into(),
            weight: Some(weight),
        }
    }
}

impl Route {
    /// Build a minimal Route whose primary backend is `service`.
    pub fn new(namespace: &str, name: &str, service: &str) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_route_kind(),
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: RouteSpec {
                to: Some(RouteTargetReference::service(service, 100)),
                ..Default::default()
            },
            status: None,
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    pub fn resource_version(&self) -> Option<&str> {
        self.metadata.resource_version.as_deref()
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata.annotations.get(key).map(String::as_str)
    }

    /// Weight of the first alternate backend named `name`.
    pub fn alternate_weight(&self, name: &str) -> Option<i32> {
        self.spec
            .alternate_backends
            .iter()
            .find(|b| b.name == name)
            .and_then(|b| b.weight)
    }

    /// Sum of every backend weight on the Route, primary included.
    pub fn total_weight(&self) -> i32 {
        let primary = self.spec.to.as_ref().and_then(|t| t.weight).unwrap_or(0);
        primary
            + self
                .spec
                .alternate_backends
                .iter()
                .filter_map(|b| b.weight)
                .sum::<i32>()
    }

    /// Decode a Route from a generic JSON object.
    pub fn from_value(value: Value) -> Result<Self, PluginError> {
        let name = value
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        serde_json::from_value(value).map_err(|e| PluginError::Decode {
            name,
            message: e.to_string(),
        })
    }

    /// Encode the Route as a generic JSON object.
    pub fn to_value(&self) -> Result<Value, PluginError> {
        serde_json::to_value(self).map_err(|e| PluginError::Decode {
            name: self.metadata.name.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
