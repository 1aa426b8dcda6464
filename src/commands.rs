// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command implementations for route-plugin-cli.

use std::process::ExitCode;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use openshift_route_plugin::config::{self, ConfigError, PluginSettings};
use openshift_route_plugin::routing::{compute_weights, PLUGIN_CONFIG_KEY};
use openshift_route_plugin::telemetry::init_logging;
use openshift_route_plugin::{InMemoryRouteStore, Rollout, Route, RoutePlugin};

use crate::cli_parser::{self, parse_plan_args, parse_preview_args};

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE.into()
        }
    }
}

fn load_settings() -> Result<PluginSettings, ConfigError> {
    let settings = config::load()?;
    init_logging(&settings.log)?;
    Ok(settings)
}

/// `plan`: print the weight plan for the requested split.
pub fn run_plan(args: &[String]) -> ExitCode {
    let parsed = match parse_plan_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            cli_parser::print_command_help("plan");
            return EXIT_USAGE.into();
        }
    };

    match compute_weights(parsed.weight, &parsed.destinations) {
        Ok(plan) => print_json(&plan),
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE.into()
        }
    }
}

/// `preview`: reconcile a Route read from disk and print the result.
pub async fn run_preview(args: &[String]) -> ExitCode {
    let parsed = match parse_preview_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            cli_parser::print_command_help("preview");
            return EXIT_USAGE.into();
        }
    };

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return EXIT_USAGE.into();
        }
    };

    let route = match read_route(&parsed.route) {
        Ok(route) => route,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE.into();
        }
    };

    let store = Arc::new(InMemoryRouteStore::new());
    let stored = store.insert(route).await;
    let namespace = stored.namespace().unwrap_or_default().to_string();
    let rollout = Rollout::canary(&namespace, "preview", &parsed.stable, &parsed.canary)
        .with_plugin_config(PLUGIN_CONFIG_KEY, json!({ "routes": [stored.name()] }));

    let plugin = RoutePlugin::new(store, settings);
    let status = plugin.init_plugin().await;
    if status.has_error() {
        eprintln!("Error: {}", status.error_string());
        return EXIT_FAILURE.into();
    }

    let status = plugin
        .set_weight(&rollout, parsed.weights.weight, &parsed.weights.destinations)
        .await;
    if status.has_error() {
        eprintln!("Error: {}", status.error_string());
        return EXIT_FAILURE.into();
    }

    match plugin.updated_route() {
        Some(route) => print_json(&route),
        None => print_json(&stored),
    }
}

fn read_route(path: &std::path::Path) -> Result<Route, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    Route::from_value(value).map_err(|e| e.to_string())
}

/// `config show`: print effective settings as JSON.
pub fn run_config_show() -> ExitCode {
    match config::load() {
        Ok(settings) => print_json(&settings),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            EXIT_USAGE.into()
        }
    }
}

/// `config validate`: exit 0 when settings resolve cleanly.
pub fn run_config_validate() -> ExitCode {
    match config::load() {
        Ok(_) => {
            println!("Configuration valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            EXIT_USAGE.into()
        }
    }
}
