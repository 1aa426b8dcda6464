// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for route reconciliation.
//!
//! Every component returns `Result<_, PluginError>`; the facade converts the
//! outcome into an [`RpcStatus`](crate::plugin::RpcStatus) for the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::k8s::validation::ValidationError;

pub type Result<T, E = PluginError> = std::result::Result<T, E>;

/// Coarse classification of a failure, stable across wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigParse,
    NotFound,
    Conflict,
    Permission,
    InvalidWeight,
    Connection,
    Decode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigParse => "config_parse",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Permission => "permission",
            ErrorKind::InvalidWeight => "invalid_weight",
            ErrorKind::Connection => "connection",
            ErrorKind::Decode => "decode",
        }
    }

    /// Whether the host may succeed by retrying on its next reconciliation tick.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Conflict | ErrorKind::Connection)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("invalid plugin configuration: {0}")]
    ConfigParse(String),

    #[error("route {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("route {namespace}/{name} was modified concurrently: {message}")]
    Conflict {
        namespace: String,
        name: String,
        message: String,
    },

    #[error("not permitted to update route {namespace}/{name}: {message}")]
    Permission {
        namespace: String,
        name: String,
        message: String,
    },

    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    #[error("cluster connection failed: {0}")]
    Connection(String),

    #[error("route {name} could not be decoded: {message}")]
    Decode { name: String, message: String },

    #[error("route {route}: {source}")]
    Route {
        route: String,
        #[source]
        source: Box<PluginError>,
    },
}

impl PluginError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PluginError::ConfigParse(_) => ErrorKind::ConfigParse,
            PluginError::NotFound { .. } => ErrorKind::NotFound,
            PluginError::Conflict { .. } => ErrorKind::Conflict,
            PluginError::Permission { .. } => ErrorKind::Permission,
            PluginError::InvalidWeight(_) => ErrorKind::InvalidWeight,
            PluginError::Connection(_) => ErrorKind::Connection,
            PluginError::Decode { .. } => ErrorKind::Decode,
            PluginError::Route { source, .. } => source.kind(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Attach the name of the route being processed.
    ///
    /// Already-wrapped errors are returned unchanged so context is never doubled.
    pub fn for_route(self, route: &str) -> Self {
        match self {
            wrapped @ PluginError::Route { .. } => wrapped,
            other => PluginError::Route {
                route: route.to_string(),
                source: Box::new(other),
            },
        }
    }

    pub fn not_found(namespace: &str, name: &str) -> Self {
        PluginError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl From<ValidationError> for PluginError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::WeightOutOfRange { .. } | ValidationError::WeightBudgetExceeded { .. } => {
                PluginError::InvalidWeight(err.to_string())
            }
            ValidationError::DuplicateDestination(_) | ValidationError::ReservedDestination(_) => {
                PluginError::InvalidWeight(err.to_string())
            }
            _ => PluginError::ConfigParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_context_keeps_kind() {
        let err = PluginError::not_found("default", "my-route").for_route("my-route");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "route my-route: route default/my-route not found");
    }

    #[test]
    fn test_route_context_not_doubled() {
        let err = PluginError::Connection("refused".into())
            .for_route("a")
            .for_route("b");
        assert_eq!(err.to_string(), "route a: cluster connection failed: refused");
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::Conflict.is_retryable());
        assert!(ErrorKind::Connection.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::InvalidWeight.is_retryable());
        assert!(!ErrorKind::ConfigParse.is_retryable());
        assert!(!ErrorKind::Permission.is_retryable());
    }

    #[test]
    fn test_validation_error_mapping() {
        let weight: PluginError = ValidationError::WeightOutOfRange {
            field: "desiredWeight".into(),
            value: 101,
        }
        .into();
        assert_eq!(weight.kind(), ErrorKind::InvalidWeight);

        let name: PluginError = ValidationError::EmptyField("routes[0]".into()).into();
        assert_eq!(name.kind(), ErrorKind::ConfigParse);
    }
}
