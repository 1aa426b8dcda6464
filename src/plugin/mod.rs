// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host-facing plugin surface.

mod facade;
mod status;

pub use facade::{PluginState, RoutePlugin, PLUGIN_TYPE};
pub use status::RpcStatus;
