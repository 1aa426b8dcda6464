// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes resource types.
//!
//! Defines Rust types matching the OpenShift Route and Argo Rollout resources
//! the plugin reads and writes.

pub mod rollout;
pub mod route;
pub mod validation;

pub use rollout::{
    CanaryStrategy, Rollout, RolloutTrafficRouting, SetHeaderRoute, SetMirrorRoute, WeightDestination,
};
pub use route::{ObjectMeta, Route, RouteSpec, RouteTargetReference};
