// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Logging setup and structured route events.
//!
//! Logs go to stderr; stdout belongs to the host transport.

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, LogFormat, LogSettings};

/// Target used for every route event.
pub const ROUTE_EVENT_TARGET: &str = "route_plugin";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured level. Returns `Ok(false)` when a
/// subscriber was already installed.
pub fn init_logging(settings: &LogSettings) -> Result<bool, ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|_| ConfigError::InvalidValue {
            key: "log.level".to_string(),
            value: settings.level.clone(),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    Ok(installed.is_ok())
}

/// Route lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEvent {
    WeightApplied,
    WeightUnchanged,
    /// Backends outside the plugin's control push the total away from 100.
    WeightImbalance,
    RouteFailed,
    Verified,
    NotVerified,
    Unsupported,
}

impl RouteEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteEvent::WeightApplied => "weight_applied",
            RouteEvent::WeightUnchanged => "weight_unchanged",
            RouteEvent::WeightImbalance => "weight_imbalance",
            RouteEvent::RouteFailed => "route_failed",
            RouteEvent::Verified => "verified",
            RouteEvent::NotVerified => "not_verified",
            RouteEvent::Unsupported => "unsupported",
        }
    }
}

fn format_details(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Emit a route event with a uniform field layout.
pub fn log_route_event(event: RouteEvent, route: &str, fields: &[(&str, &str)]) {
    let details = format_details(fields);
    match event {
        RouteEvent::WeightApplied | RouteEvent::Verified => tracing::info!(
            target: ROUTE_EVENT_TARGET,
            event = event.as_str(),
            route = %route,
            details = %details
        ),
        RouteEvent::RouteFailed => tracing::error!(
            target: ROUTE_EVENT_TARGET,
            event = event.as_str(),
            route = %route,
            details = %details
        ),
        RouteEvent::NotVerified | RouteEvent::WeightImbalance => tracing::warn!(
            target: ROUTE_EVENT_TARGET,
            event = event.as_str(),
            route = %route,
            details = %details
        ),
        RouteEvent::WeightUnchanged | RouteEvent::Unsupported => tracing::debug!(
            target: ROUTE_EVENT_TARGET,
            event = event.as_str(),
            route = %route,
            details = %details
        ),
    }
}
