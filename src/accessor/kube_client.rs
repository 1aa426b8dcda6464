// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Live-cluster Route access through the Kubernetes API.
//!
//! Routes are handled as `DynamicObject`s of `route.openshift.io/v1` so no
//! generated OpenShift bindings are needed.

use async_trait::async_trait;
use kube::api::{Api, PostParams};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::Client;
use tracing::debug;

use super::RouteAccessor;
use crate::error::PluginError;
use crate::k8s::Route;

const ROUTE_GROUP: &str = "route.openshift.io";
const ROUTE_VERSION: &str = "v1";

/// Real Kubernetes client implementation.
pub struct KubeRouteAccessor {
    client: Client,
    resource: ApiResource,
}

impl KubeRouteAccessor {
    /// Build a client from the ambient kubeconfig or in-cluster service account.
    pub async fn connect() -> Result<Self, PluginError> {
        let client = Client::try_default()
            .await
            .map_err(|e| PluginError::Connection(e.to_string()))?;
        Ok(Self::new(client))
    }

    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        let gvk = GroupVersionKind::gvk(ROUTE_GROUP, ROUTE_VERSION, crate::k8s::route::ROUTE_KIND);
        Self {
            client,
            resource: ApiResource::from_gvk(&gvk),
        }
    }

    fn api(&self, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &self.resource)
    }
}

fn map_kube_error(err: kube::Error, namespace: &str, name: &str) -> PluginError {
    match err {
        kube::Error::Api(ae) if ae.code == 404 => PluginError::not_found(namespace, name),
        kube::Error::Api(ae) if ae.code == 409 => PluginError::Conflict {
            namespace: namespace.to_string(),
            name: name.to_string(),
            message: ae.message,
        },
        kube::Error::Api(ae) if ae.code == 401 || ae.code == 403 => PluginError::Permission {
            namespace: namespace.to_string(),
            name: name.to_string(),
            message: ae.message,
        },
        other => PluginError::Connection(other.to_string()),
    }
}

fn decode_error(name: &str, err: serde_json::Error) -> PluginError {
    PluginError::Decode {
        name: name.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl RouteAccessor for KubeRouteAccessor {
    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route, PluginError> {
        let object = self
            .api(namespace)
            .get(name)
            .await
            .map_err(|e| map_kube_error(e, namespace, name))?;
        let value = serde_json::to_value(&object).map_err(|e| decode_error(name, e))?;
        Route::from_value(value)
    }

    async fn update_route(&self, route: &Route) -> Result<Route, PluginError> {
        let namespace = route.namespace().unwrap_or_default();
        let name = route.name();

        let object: DynamicObject =
            serde_json::from_value(route.to_value()?).map_err(|e| decode_error(name, e))?;
        let persisted = self
            .api(namespace)
            .replace(name, &PostParams::default(), &object)
            .await
            .map_err(|e| map_kube_error(e, namespace, name))?;

        debug!(
            route = %name,
            namespace = %namespace,
            resource_version = ?persisted.metadata.resource_version,
            "route replaced"
        );
        let value = serde_json::to_value(&persisted).map_err(|e| decode_error(name, e))?;
        Route::from_value(value)
    }

    async fn check_connection(&self) -> Result<(), PluginError> {
        self.client
            .apiserver_version()
            .await
            .map(|_| ())
            .map_err(|e| PluginError::Connection(e.to_string()))
    }
}

#[cfg(all(test, feature = "kube"))]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("routes.route.openshift.io \"my-route\" {}", reason),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_status_codes_map_to_error_kinds() {
        let cases = [
            (404, "NotFound", ErrorKind::NotFound),
            (409, "Conflict", ErrorKind::Conflict),
            (401, "Unauthorized", ErrorKind::Permission),
            (403, "Forbidden", ErrorKind::Permission),
            (500, "InternalError", ErrorKind::Connection),
        ];
        for (code, reason, kind) in cases {
            let err = map_kube_error(api_error(code, reason), "default", "my-route");
            assert_eq!(err.kind(), kind, "HTTP {}", code);
        }
    }

    #[test]
    fn test_conflict_keeps_server_message() {
        match map_kube_error(api_error(409, "Conflict"), "default", "my-route") {
            PluginError::Conflict {
                namespace,
                name,
                message,
            } => {
                assert_eq!(namespace, "default");
                assert_eq!(name, "my-route");
                assert!(message.contains("Conflict"));
            }
            other => panic!("expected conflict, got {:?}", other),
        }
        assert!(map_kube_error(api_error(409, "Conflict"), "default", "my-route").is_retryable());
    }

    #[test]
    fn test_resource_targets_openshift_routes() {
        let gvk = GroupVersionKind::gvk(ROUTE_GROUP, ROUTE_VERSION, crate::k8s::route::ROUTE_KIND);
        let resource = ApiResource::from_gvk(&gvk);
        assert_eq!(resource.api_version, "route.openshift.io/v1");
        assert_eq!(resource.plural, "routes");
    }
}
