// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-process Route store with cluster-like optimistic concurrency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RouteAccessor;
use crate::error::PluginError;
use crate::k8s::Route;

type RouteKey = (String, String);

/// Thread-safe namespaced Route store.
///
/// Every write bumps a store-wide `resourceVersion`. A replace carrying a
/// stale `resourceVersion` is rejected with a conflict.
pub struct InMemoryRouteStore {
    routes: Arc<RwLock<HashMap<RouteKey, Route>>>,
    next_version: AtomicU64,
    updates: AtomicU64,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self {
            routes: Arc::new(RwLock::new(HashMap::new())),
            next_version: AtomicU64::new(1),
            updates: AtomicU64::new(0),
        }
    }

    fn key(namespace: &str, name: &str) -> RouteKey {
        (namespace.to_string(), name.to_string())
    }

    fn stamp(&self, route: &mut Route) {
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        route.metadata.resource_version = Some(version.to_string());
    }

    /// Create or overwrite a Route unconditionally, returning the stored copy.
    ///
    /// Routes without a namespace are stored under `default`.
    pub async fn insert(&self, mut route: Route) -> Route {
        let namespace = route.namespace().unwrap_or("default").to_string();
        route.metadata.namespace = Some(namespace.clone());
        self.stamp(&mut route);

        let key = Self::key(&namespace, route.name());
        self.routes.write().await.insert(key, route.clone());
        route
    }

    /// Stored copy of a Route, if present.
    pub async fn get(&self, namespace: &str, name: &str) -> Option<Route> {
        self.routes
            .read()
            .await
            .get(&Self::key(namespace, name))
            .cloned()
    }

    /// Number of stored Routes.
    pub async fn len(&self) -> usize {
        self.routes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.routes.read().await.is_empty()
    }

    /// Number of successful `update_route` calls.
    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryRouteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouteAccessor for InMemoryRouteStore {
    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, PluginError> {
        self.get(namespace, name)
            .await
            .ok_or_else(|| PluginError::not_found(namespace, name))
    }

    async fn update_route(&self, route: &Route) -> Result<Route, PluginError> {
        let namespace = route.namespace().unwrap_or_default();
        let key = Self::key(namespace, route.name());

        let mut routes = self.routes.write().await;
        let stored = routes
            .get_mut(&key)
            .ok_or_else(|| PluginError::not_found(namespace, route.name()))?;

        if let Some(expected) = route.resource_version() {
            if stored.resource_version() != Some(expected) {
                return Err(PluginError::Conflict {
                    namespace: namespace.to_string(),
                    name: route.name().to_string(),
                    message: format!(
                        "resourceVersion {} is stale, current is {}",
                        expected,
                        stored.resource_version().unwrap_or("<none>")
                    ),
                });
            }
        }

        let mut updated = route.clone();
        self.stamp(&mut updated);
        *stored = updated.clone();
        self.updates.fetch_add(1, Ordering::Relaxed);
        Ok(updated)
    }

    async fn check_connection(&self) -> Result<(), PluginError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_insert_assigns_version_and_namespace() {
        let store = InMemoryRouteStore::new();
        let mut route = Route::new("default", "my-route", "stable-svc");
        route.metadata.namespace = None;

        let stored = store.insert(route).await;
        assert_eq!(stored.namespace(), Some("default"));
        assert_eq!(stored.resource_version(), Some("1"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_route() {
        let store = InMemoryRouteStore::new();
        let err = store.get_route("default", "absent").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let store = InMemoryRouteStore::new();
        store.insert(Route::new("default", "r", "svc")).await;

        let fetched = store.get_route("default", "r").await.unwrap();
        let updated = store.update_route(&fetched).await.unwrap();
        assert_eq!(updated.resource_version(), Some("2"));
        assert_eq!(store.update_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_update_conflicts() {
        let store = InMemoryRouteStore::new();
        store.insert(Route::new("default", "r", "svc")).await;

        let first = store.get_route("default", "r").await.unwrap();
        let second = first.clone();
        store.update_route(&first).await.unwrap();

        let err = store.update_route(&second).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.update_count(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_route() {
        let store = InMemoryRouteStore::new();
        let err = store
            .update_route(&Route::new("default", "ghost", "svc"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
