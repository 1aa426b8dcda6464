// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Checks whether a Route already carries a weight plan.

use serde::{Deserialize, Serialize};

use super::calculator::WeightPlan;
use super::config::CanaryServices;
use crate::k8s::validation::TOTAL_WEIGHT;
use crate::k8s::Route;

/// Outcome of a weight verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    Verified,
    NotVerified,
    /// Verification could not run (see the accompanying status).
    Unknown,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified)
    }
}

/// A managed backend whose weight differs from the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightMismatch {
    pub backend: String,
    pub expected: i32,
    pub actual: Option<i32>,
}

/// List every managed backend on `route` whose weight differs from `plan`.
pub fn weight_mismatches(
    route: &Route,
    services: &CanaryServices,
    plan: &WeightPlan,
) -> Vec<WeightMismatch> {
    let expected = [
        (services.stable.as_str(), plan.stable_weight),
        (services.canary.as_str(), plan.canary_weight),
    ]
    .into_iter()
    .chain(
        plan.additional
            .iter()
            .map(|d| (d.service_name.as_str(), d.weight)),
    );

    expected
        .filter_map(|(backend, weight)| {
            let actual = route.alternate_weight(backend);
            (actual != Some(weight)).then(|| WeightMismatch {
                backend: backend.to_string(),
                expected: weight,
                actual,
            })
        })
        .collect()
}

/// How far the Route's total backend weight is from 100, if at all.
///
/// Non-zero when backends the plugin does not manage still carry weight.
pub fn weight_imbalance(route: &Route) -> Option<i32> {
    let delta = route.total_weight() - TOTAL_WEIGHT;
    (delta != 0).then_some(delta)
}
