// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! OpenShift Route traffic router for canary rollouts.
//!
//! Reconciles the stable/canary weight split on the `alternateBackends` of
//! OpenShift Route objects. The host drives a [`RoutePlugin`] with a desired
//! canary weight; the plugin computes a [`WeightPlan`], merges it into every
//! configured Route and writes each one back through a [`RouteAccessor`].
//!
//! # Modules
//! - [`k8s`]: Route and Rollout resource models, name and weight validation
//! - [`routing`]: weight calculation, Route mutation and verification
//! - [`accessor`]: Route storage backends
//! - [`plugin`]: the facade invoked by the host
//! - [`config`] / [`telemetry`]: process settings and logging

pub mod accessor;
pub mod config;
pub mod error;
pub mod k8s;
pub mod plugin;
pub mod routing;
pub mod telemetry;

pub use accessor::{InMemoryRouteStore, RouteAccessor};
pub use config::{FailurePolicy, PluginSettings};
pub use error::{ErrorKind, PluginError};
pub use k8s::{Rollout, Route, WeightDestination};
pub use plugin::{RoutePlugin, RpcStatus};
pub use routing::{Verification, WeightPlan};
