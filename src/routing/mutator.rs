// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Merges a [`WeightPlan`] into a Route's backend list.
//!
//! Resulting alternate backends are ordered stable, canary, additional
//! destinations (input order), then backends this plugin does not manage
//! (original order, untouched). The primary backend keeps its target but its
//! weight is pinned to 0 so the managed entries carry the whole split.
//!
//! Additional destinations written by the plugin are recorded in the
//! [`MANAGED_BACKENDS_ANNOTATION`] so that a later call can drop the ones no
//! longer requested without touching anything else. A destination that names
//! a backend already on the Route is recorded as adopted together with its
//! original weight; once no longer requested it is handed back with that
//! weight instead of being removed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::calculator::WeightPlan;
use super::config::CanaryServices;
use crate::error::PluginError;
use crate::k8s::route::SERVICE_KIND;
use crate::k8s::{Route, RouteTargetReference};

/// Route annotation listing the additional destinations this plugin created.
pub const MANAGED_BACKENDS_ANNOTATION: &str =
    "rollouts-plugin-trafficrouter-openshift/managed-backends";

/// One entry of the ownership annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedBackend {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_template_hash: Option<String>,
    /// Present when the backend existed before the plugin managed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopted: Option<AdoptedBackend>,
}

/// Weight an adopted backend carried before the plugin took it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptedBackend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// Additional destinations previously written to `route` by this plugin.
///
/// An unreadable annotation is treated as empty.
pub fn managed_backends(route: &Route) -> Vec<ManagedBackend> {
    let Some(raw) = route.annotation(MANAGED_BACKENDS_ANNOTATION) else {
        return Vec::new();
    };
    match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                route = %route.name(),
                annotation = MANAGED_BACKENDS_ANNOTATION,
                error = %e,
                "ignoring unreadable ownership annotation"
            );
            Vec::new()
        }
    }
}

fn managed_entry(existing: &[RouteTargetReference], name: &str, weight: i32) -> RouteTargetReference {
    let kind = existing
        .iter()
        .find(|b| b.name == name)
        .map(|b| b.kind.clone())
        .unwrap_or_else(|| SERVICE_KIND.to_string());
    RouteTargetReference {
        kind,
        name: name.to_string(),
        weight: Some(weight),
    }
}

/// Produce the Route with `plan` applied.
///
/// Applying the same plan to the result again yields an identical Route.
/// `resourceVersion` and every field the plugin does not own pass through.
pub fn apply_weight_plan(
    mut route: Route,
    services: &CanaryServices,
    plan: &WeightPlan,
) -> Result<Route, PluginError> {
    let previously_owned = managed_backends(&route);
    let existing = std::mem::take(&mut route.spec.alternate_backends);

    let mut backends = Vec::with_capacity(existing.len() + plan.additional.len() + 2);
    backends.push(managed_entry(&existing, &services.stable, plan.stable_weight));
    backends.push(managed_entry(&existing, &services.canary, plan.canary_weight));
    for destination in &plan.additional {
        backends.push(managed_entry(&existing, &destination.service_name, destination.weight));
    }

    let owned_before: HashMap<&str, &ManagedBackend> = previously_owned
        .iter()
        .map(|b| (b.name.as_str(), b))
        .collect();

    let managed: HashSet<&str> = backends.iter().map(|b| b.name.as_str()).collect();
    let mut foreign = Vec::new();
    for backend in &existing {
        if managed.contains(backend.name.as_str()) {
            continue;
        }
        match owned_before.get(backend.name.as_str()) {
            Some(ManagedBackend {
                adopted: Some(adopted),
                ..
            }) => {
                debug!(
                    route = %route.name(),
                    backend = %backend.name,
                    weight = ?adopted.weight,
                    "releasing adopted backend"
                );
                foreign.push(RouteTargetReference {
                    weight: adopted.weight,
                    ..backend.clone()
                });
            }
            Some(_) => {
                debug!(route = %route.name(), backend = %backend.name, "removing stale backend");
            }
            None => foreign.push(backend.clone()),
        }
    }
    backends.extend(foreign);
    route.spec.alternate_backends = backends;

    if let Some(primary) = route.spec.to.as_mut() {
        primary.weight = Some(0);
    }

    if plan.additional.is_empty() {
        route.metadata.annotations.remove(MANAGED_BACKENDS_ANNOTATION);
    } else {
        let owned: Vec<ManagedBackend> = plan
            .additional
            .iter()
            .map(|d| {
                let adopted = match owned_before.get(d.service_name.as_str()) {
                    Some(previous) => previous.adopted.clone(),
                    None => existing
                        .iter()
                        .find(|b| b.name == d.service_name)
                        .map(|b| AdoptedBackend { weight: b.weight }),
                };
                ManagedBackend {
                    name: d.service_name.clone(),
                    pod_template_hash: d.pod_template_hash.clone(),
                    adopted,
                }
            })
            .collect();
        let encoded = serde_json::to_string(&owned).map_err(|e| PluginError::Decode {
            name: route.name().to_string(),
            message: e.to_string(),
        })?;
        route
            .metadata
            .annotations
            .insert(MANAGED_BACKENDS_ANNOTATION.to_string(), encoded);
    }

    Ok(route)
}

#[cfg(test)]
#[path = "mutator_tests.rs"]
mod tests;
