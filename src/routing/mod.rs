// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Weight reconciliation core: configuration, calculation, mutation and
//! verification of Route backend weights.

pub mod calculator;
pub mod config;
pub mod mutator;
pub mod verify;

pub use calculator::{compute_weights, WeightPlan};
pub use config::{CanaryServices, RoutingConfig, PLUGIN_CONFIG_KEY};
pub use mutator::{
    apply_weight_plan, managed_backends, AdoptedBackend, ManagedBackend, MANAGED_BACKENDS_ANNOTATION,
};
pub use verify::{weight_imbalance, weight_mismatches, Verification, WeightMismatch};
