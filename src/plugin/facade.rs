// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Plugin facade: the operations the progressive-delivery host invokes.
//!
//! For each route named in the rollout's plugin block: fetch, compute the
//! weight plan, mutate, persist. Routes are processed sequentially; writes
//! already committed to earlier routes stay in place when a later one fails.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use super::status::RpcStatus;
use crate::accessor::RouteAccessor;
use crate::config::{FailurePolicy, PluginSettings};
use crate::error::PluginError;
use crate::k8s::{Rollout, Route, SetHeaderRoute, SetMirrorRoute, WeightDestination};
use crate::routing::{
    apply_weight_plan, compute_weights, weight_imbalance, weight_mismatches, CanaryServices,
    RoutingConfig, Verification, WeightPlan,
};
use crate::telemetry::{log_route_event, RouteEvent};

/// Identifier reported to the host.
pub const PLUGIN_TYPE: &str = "OpenshiftRoute";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Uninitialized,
    Initialized,
}

impl PluginState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginState::Uninitialized => "uninitialized",
            PluginState::Initialized => "initialized",
        }
    }
}

/// Inputs shared by every route of one call.
struct Reconciliation<'a> {
    namespace: &'a str,
    config: RoutingConfig,
    services: CanaryServices,
    plan: WeightPlan,
}

/// Traffic router for OpenShift Routes.
pub struct RoutePlugin {
    accessor: Arc<dyn RouteAccessor>,
    settings: PluginSettings,
    state: RwLock<PluginState>,
    updated_route: Mutex<Option<Route>>,
}

impl RoutePlugin {
    pub fn new(accessor: Arc<dyn RouteAccessor>, settings: PluginSettings) -> Self {
        Self {
            accessor,
            settings,
            state: RwLock::new(PluginState::Uninitialized),
            updated_route: Mutex::new(None),
        }
    }

    /// Plugin with default settings.
    pub fn with_accessor(accessor: Arc<dyn RouteAccessor>) -> Self {
        Self::new(accessor, PluginSettings::default())
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn state(&self) -> PluginState {
        *self.state.read()
    }

    pub fn plugin_type(&self) -> &'static str {
        PLUGIN_TYPE
    }

    /// Last Route persisted (or confirmed unchanged) by a weight call.
    pub fn updated_route(&self) -> Option<Route> {
        self.updated_route.lock().clone()
    }

    /// Validate connectivity to the route store. Safe to call repeatedly.
    pub async fn init_plugin(&self) -> RpcStatus {
        match self.accessor.check_connection().await {
            Ok(()) => {
                let previous =
                    std::mem::replace(&mut *self.state.write(), PluginState::Initialized);
                info!(
                    plugin = PLUGIN_TYPE,
                    previous_state = previous.as_str(),
                    "plugin initialized"
                );
                RpcStatus::ok()
            }
            Err(err) => {
                error!(plugin = PLUGIN_TYPE, error = %err, "plugin initialization failed");
                err.into()
            }
        }
    }

    /// Split traffic so the canary receives `desired_weight` percent, part of
    /// which goes to `additional` destinations.
    pub async fn set_weight(
        &self,
        rollout: &Rollout,
        desired_weight: i32,
        additional: &[WeightDestination],
    ) -> RpcStatus {
        self.apply(rollout, desired_weight, additional).await.into()
    }

    /// Send all traffic back to the stable service and drop every additional
    /// backend this plugin created.
    pub async fn remove_managed_routes(&self, rollout: &Rollout) -> RpcStatus {
        self.apply(rollout, 0, &[]).await.into()
    }

    /// Check whether every route already carries the requested split.
    pub async fn verify_weight(
        &self,
        rollout: &Rollout,
        desired_weight: i32,
        additional: &[WeightDestination],
    ) -> (Verification, RpcStatus) {
        match self.verify(rollout, desired_weight, additional).await {
            Ok(verification) => (verification, RpcStatus::ok()),
            Err(err) => (Verification::Unknown, err.into()),
        }
    }

    /// OpenShift Routes cannot match on request headers; accepted as a no-op.
    pub async fn set_header_route(
        &self,
        rollout: &Rollout,
        header_route: &SetHeaderRoute,
    ) -> RpcStatus {
        log_route_event(
            RouteEvent::Unsupported,
            &header_route.name,
            &[("operation", "set_header_route"), ("rollout", rollout.metadata.name.as_str())],
        );
        RpcStatus::ok()
    }

    /// OpenShift Routes cannot mirror traffic; accepted as a no-op.
    pub async fn set_mirror_route(
        &self,
        rollout: &Rollout,
        mirror_route: &SetMirrorRoute,
    ) -> RpcStatus {
        log_route_event(
            RouteEvent::Unsupported,
            &mirror_route.name,
            &[("operation", "set_mirror_route"), ("rollout", rollout.metadata.name.as_str())],
        );
        RpcStatus::ok()
    }

    fn ensure_initialized(&self) -> Result<(), PluginError> {
        match self.state() {
            PluginState::Initialized => Ok(()),
            PluginState::Uninitialized => Err(PluginError::Connection(
                "plugin not initialized".to_string(),
            )),
        }
    }

    fn prepare<'a>(
        &'a self,
        rollout: &'a Rollout,
        desired_weight: i32,
        additional: &[WeightDestination],
    ) -> Result<Reconciliation<'a>, PluginError> {
        self.ensure_initialized()?;

        let config = RoutingConfig::from_rollout(rollout)?;
        let services = CanaryServices::from_rollout(rollout)?;
        let plan = compute_weights(desired_weight, additional)?;
        plan.ensure_distinct_from(&services)?;

        let namespace = rollout
            .namespace()
            .unwrap_or(self.settings.default_namespace.as_str());

        Ok(Reconciliation {
            namespace,
            config,
            services,
            plan,
        })
    }

    async fn apply(
        &self,
        rollout: &Rollout,
        desired_weight: i32,
        additional: &[WeightDestination],
    ) -> Result<(), PluginError> {
        let step = self.prepare(rollout, desired_weight, additional)?;
        debug!(
            rollout = %rollout.metadata.name,
            namespace = %step.namespace,
            routes = step.config.routes.len(),
            stable = step.plan.stable_weight,
            canary = step.plan.canary_weight,
            "reconciling route weights"
        );

        let mut first_error = None;
        for route_name in &step.config.routes {
            match self.reconcile_route(&step, route_name).await {
                Ok(route) => *self.updated_route.lock() = Some(route),
                Err(err) => {
                    let err = err.for_route(route_name);
                    let message = err.to_string();
                    log_route_event(
                        RouteEvent::RouteFailed,
                        route_name,
                        &[("error", message.as_str()), ("kind", err.kind().as_str())],
                    );
                    match self.settings.failure_policy {
                        FailurePolicy::FailFast => return Err(err),
                        FailurePolicy::ContinueOnError => {
                            first_error.get_or_insert(err);
                        }
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn reconcile_route(
        &self,
        step: &Reconciliation<'_>,
        route_name: &str,
    ) -> Result<Route, PluginError> {
        let current = self.accessor.get_route(step.namespace, route_name).await?;
        let desired = apply_weight_plan(current.clone(), &step.services, &step.plan)?;

        let stable = step.plan.stable_weight.to_string();
        let canary = step.plan.canary_weight.to_string();
        let fields = [("stable", stable.as_str()), ("canary", canary.as_str())];

        if let Some(delta) = weight_imbalance(&desired) {
            let total = desired.total_weight().to_string();
            let delta = delta.to_string();
            log_route_event(
                RouteEvent::WeightImbalance,
                route_name,
                &[("total", total.as_str()), ("unmanaged_delta", delta.as_str())],
            );
        }

        if desired == current {
            log_route_event(RouteEvent::WeightUnchanged, route_name, &fields);
            return Ok(current);
        }

        let persisted = self.accessor.update_route(&desired).await?;
        log_route_event(RouteEvent::WeightApplied, route_name, &fields);
        Ok(persisted)
    }

    async fn verify(
        &self,
        rollout: &Rollout,
        desired_weight: i32,
        additional: &[WeightDestination],
    ) -> Result<Verification, PluginError> {
        let step = self.prepare(rollout, desired_weight, additional)?;

        for route_name in &step.config.routes {
            let route = self
                .accessor
                .get_route(step.namespace, route_name)
                .await
                .map_err(|e| e.for_route(route_name))?;

            let mismatches = weight_mismatches(&route, &step.services, &step.plan);
            if let Some(first) = mismatches.first() {
                let expected = first.expected.to_string();
                let actual = first
                    .actual
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| "missing".to_string());
                log_route_event(
                    RouteEvent::NotVerified,
                    route_name,
                    &[
                        ("backend", first.backend.as_str()),
                        ("expected", expected.as_str()),
                        ("actual", actual.as_str()),
                    ],
                );
                return Ok(Verification::NotVerified);
            }
            log_route_event(RouteEvent::Verified, route_name, &[]);
        }

        Ok(Verification::Verified)
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
