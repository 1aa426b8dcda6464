// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end weight reconciliation over the in-memory Route store.
//!
//! Drives `RoutePlugin` the way the host does across a full canary
//! progression and checks what lands in the store.

use std::sync::Arc;

use serde_json::json;

use openshift_route_plugin::routing::{MANAGED_BACKENDS_ANNOTATION, PLUGIN_CONFIG_KEY};
use openshift_route_plugin::{
    ErrorKind, FailurePolicy, InMemoryRouteStore, PluginSettings, Rollout, Route, RoutePlugin,
    Verification, WeightDestination,
};

fn rollout(routes: &[&str]) -> Rollout {
    Rollout::canary("default", "my-rollout", "stable-svc", "canary-svc")
        .with_plugin_config(PLUGIN_CONFIG_KEY, json!({ "routes": routes }))
}

fn backends(route: &Route) -> Vec<(&str, i32)> {
    route
        .spec
        .alternate_backends
        .iter()
        .map(|b| (b.name.as_str(), b.weight.unwrap_or(-1)))
        .collect()
}

async fn setup(routes: &[&str], settings: PluginSettings) -> (Arc<InMemoryRouteStore>, RoutePlugin) {
    let store = Arc::new(InMemoryRouteStore::new());
    for name in routes {
        store.insert(Route::new("default", name, "stable-svc")).await;
    }
    let plugin = RoutePlugin::new(store.clone(), settings);
    let status = plugin.init_plugin().await;
    assert!(!status.has_error(), "{}", status.error_string());
    (store, plugin)
}

// ============================================================================
// Canary progression
// ============================================================================

#[tokio::test]
async fn progression_through_canary_steps() {
    let (store, plugin) = setup(&["my-route"], PluginSettings::default()).await;
    let rollout = rollout(&["my-route"]);

    for step in [0, 10, 30, 50, 100] {
        let status = plugin.set_weight(&rollout, step, &[]).await;
        assert!(!status.has_error(), "step {}: {}", step, status.error_string());

        let route = store.get("default", "my-route").await.unwrap();
        assert_eq!(
            backends(&route),
            vec![("stable-svc", 100 - step), ("canary-svc", step)],
            "step {}",
            step
        );
        assert_eq!(route.total_weight(), 100);

        let (verification, status) = plugin.verify_weight(&rollout, step, &[]).await;
        assert!(!status.has_error());
        assert_eq!(verification, Verification::Verified);
    }

    assert!(!plugin.remove_managed_routes(&rollout).await.has_error());
    let route = store.get("default", "my-route").await.unwrap();
    assert_eq!(backends(&route), vec![("stable-svc", 100), ("canary-svc", 0)]);
}

#[tokio::test]
async fn weight_thirty_matches_reference_scenario() {
    let (_store, plugin) = setup(&["my-route"], PluginSettings::default()).await;

    let status = plugin.set_weight(&rollout(&["my-route"]), 30, &[]).await;
    assert!(!status.has_error());

    let updated = plugin.updated_route().unwrap();
    assert_eq!(updated.spec.alternate_backends[0].weight, Some(70));
    assert_eq!(updated.spec.alternate_backends[1].weight, Some(30));
}

#[tokio::test]
async fn repeated_call_is_a_no_op() {
    let (store, plugin) = setup(&["my-route"], PluginSettings::default()).await;
    let rollout = rollout(&["my-route"]);
    let extra = [WeightDestination::new("preview-svc", 5).with_pod_template_hash("7d9f")];

    assert!(!plugin.set_weight(&rollout, 25, &extra).await.has_error());
    let first = store.get("default", "my-route").await.unwrap();
    let writes = store.update_count();

    assert!(!plugin.set_weight(&rollout, 25, &extra).await.has_error());
    assert_eq!(store.update_count(), writes);
    assert_eq!(store.get("default", "my-route").await.unwrap(), first);
}

// ============================================================================
// Additional destinations
// ============================================================================

#[tokio::test]
async fn additional_destinations_come_out_of_canary_share() {
    let (store, plugin) = setup(&["my-route"], PluginSettings::default()).await;
    let extra = [
        WeightDestination::new("preview-a", 10),
        WeightDestination::new("preview-b", 15),
    ];

    let status = plugin.set_weight(&rollout(&["my-route"]), 50, &extra).await;
    assert!(!status.has_error(), "{}", status.error_string());

    let route = store.get("default", "my-route").await.unwrap();
    assert_eq!(
        backends(&route),
        vec![
            ("stable-svc", 50),
            ("canary-svc", 25),
            ("preview-a", 10),
            ("preview-b", 15),
        ]
    );
}

#[tokio::test]
async fn dropped_destination_is_cleaned_up() {
    let (store, plugin) = setup(&["my-route"], PluginSettings::default()).await;
    let rollout = rollout(&["my-route"]);

    let both = [
        WeightDestination::new("preview-a", 10),
        WeightDestination::new("preview-b", 10),
    ];
    assert!(!plugin.set_weight(&rollout, 40, &both).await.has_error());

    let one = [WeightDestination::new("preview-b", 10)];
    assert!(!plugin.set_weight(&rollout, 40, &one).await.has_error());

    let route = store.get("default", "my-route").await.unwrap();
    assert_eq!(
        backends(&route),
        vec![("stable-svc", 60), ("canary-svc", 30), ("preview-b", 10)]
    );

    assert!(!plugin.set_weight(&rollout, 40, &[]).await.has_error());
    let route = store.get("default", "my-route").await.unwrap();
    assert_eq!(backends(&route), vec![("stable-svc", 60), ("canary-svc", 40)]);
    assert!(route.annotation(MANAGED_BACKENDS_ANNOTATION).is_none());
}

#[tokio::test]
async fn budget_overflow_leaves_route_untouched() {
    let (store, plugin) = setup(&["my-route"], PluginSettings::default()).await;
    let before = store.get("default", "my-route").await.unwrap();

    let extra = [
        WeightDestination::new("preview-a", 15),
        WeightDestination::new("preview-b", 10),
    ];
    let status = plugin.set_weight(&rollout(&["my-route"]), 20, &extra).await;
    assert_eq!(status.kind(), Some(ErrorKind::InvalidWeight));
    assert!(!status.is_retryable());

    assert_eq!(store.update_count(), 0);
    assert_eq!(store.get("default", "my-route").await.unwrap(), before);
}

// ============================================================================
// Multiple routes
// ============================================================================

#[tokio::test]
async fn every_configured_route_is_updated() {
    let names = ["route-a", "route-b", "route-c"];
    let (store, plugin) = setup(&names, PluginSettings::default()).await;

    assert!(!plugin.set_weight(&rollout(&names), 20, &[]).await.has_error());
    for name in names {
        let route = store.get("default", name).await.unwrap();
        assert_eq!(backends(&route), vec![("stable-svc", 80), ("canary-svc", 20)]);
    }
    assert_eq!(plugin.updated_route().unwrap().name(), "route-c");
}

#[tokio::test]
async fn missing_route_under_each_policy() {
    let names = ["route-a", "route-missing", "route-c"];

    let (store, plugin) = setup(&["route-a", "route-c"], PluginSettings::default()).await;
    let status = plugin.set_weight(&rollout(&names), 20, &[]).await;
    assert_eq!(status.kind(), Some(ErrorKind::NotFound));
    assert_eq!(store.update_count(), 1);

    let continuing = PluginSettings {
        failure_policy: FailurePolicy::ContinueOnError,
        ..Default::default()
    };
    let (store, plugin) = setup(&["route-a", "route-c"], continuing).await;
    let status = plugin.set_weight(&rollout(&names), 20, &[]).await;
    assert_eq!(status.kind(), Some(ErrorKind::NotFound));
    assert!(status.error_string().contains("route-missing"));
    assert_eq!(store.update_count(), 2);
}
