// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host-facing call result.
//!
//! Plugin operations never fail through control flow; they return an
//! [`RpcStatus`] that the caller inspects with [`RpcStatus::has_error`].

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, PluginError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    error_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
}

impl RpcStatus {
    /// A status carrying no error.
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn has_error(&self) -> bool {
        self.kind.is_some() || !self.error_string.is_empty()
    }

    /// Error message to surface verbatim in rollout status; empty when ok.
    pub fn error_string(&self) -> &str {
        &self.error_string
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.map(|k| k.is_retryable()).unwrap_or(false)
    }
}

impl From<PluginError> for RpcStatus {
    fn from(err: PluginError) -> Self {
        Self {
            error_string: err.to_string(),
            kind: Some(err.kind()),
        }
    }
}

impl From<Result<(), PluginError>> for RpcStatus {
    fn from(result: Result<(), PluginError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_status() {
        let status = RpcStatus::ok();
        assert!(!status.has_error());
        assert_eq!(status.error_string(), "");
        assert_eq!(status.kind(), None);
        assert!(!status.is_retryable());
    }

    #[test]
    fn test_error_status() {
        let status: RpcStatus = Err(PluginError::Conflict {
            namespace: "default".into(),
            name: "r".into(),
            message: "stale".into(),
        })
        .into();
        assert!(status.has_error());
        assert_eq!(status.kind(), Some(ErrorKind::Conflict));
        assert!(status.is_retryable());
        assert_eq!(
            status.error_string(),
            "route default/r was modified concurrently: stale"
        );
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(RpcStatus::ok()).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let status: RpcStatus = PluginError::InvalidWeight("too much".into()).into();
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"errorString": "invalid weight: too much", "kind": "invalid_weight"})
        );
        let back: RpcStatus = serde_json::from_value(json).unwrap();
        assert_eq!(back, status);
    }
}
