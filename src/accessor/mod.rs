// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Route access: reading and replacing Route objects in an object store.
//!
//! Each update is a single whole-object replace guarded by the store's
//! optimistic concurrency (`resourceVersion`). Conflicts are reported as
//! [`PluginError::Conflict`], distinct from [`PluginError::NotFound`], and
//! are never retried here.

use async_trait::async_trait;

use crate::error::PluginError;
use crate::k8s::Route;

mod memory;
#[cfg(feature = "kube")]
mod kube_client;

pub use memory::InMemoryRouteStore;
#[cfg(feature = "kube")]
pub use kube_client::KubeRouteAccessor;

/// Trait abstracting Route reads and writes so the plugin can run against a
/// live cluster or an in-process store.
#[async_trait]
pub trait RouteAccessor: Send + Sync {
    /// Fetch the named Route.
    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, PluginError>;

    /// Replace a Route, returning the object as persisted.
    async fn update_route(&self, route: &Route) -> Result<Route, PluginError>;

    /// Confirm the backing store is reachable.
    async fn check_connection(&self) -> Result<(), PluginError>;
}
