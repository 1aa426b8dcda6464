// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Backend weight calculation.
//!
//! Additional destinations carve their share out of the canary slice, never
//! out of the stable slice:
//!
//! ```text
//! stable = 100 - desired
//! canary = desired - sum(additional)
//! ```

use std::collections::HashSet;

use serde::Serialize;

use super::config::CanaryServices;
use crate::error::PluginError;
use crate::k8s::validation::{validate_service_name, validate_weight, ValidationError, TOTAL_WEIGHT};
use crate::k8s::WeightDestination;

/// Target weights for one reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPlan {
    pub desired_weight: i32,
    pub stable_weight: i32,
    pub canary_weight: i32,
    /// Additional destinations in input order, weights unchanged.
    pub additional: Vec<WeightDestination>,
}

impl WeightPlan {
    /// Sum of every weight in the plan; always [`TOTAL_WEIGHT`].
    pub fn total(&self) -> i32 {
        self.stable_weight
            + self.canary_weight
            + self.additional.iter().map(|d| d.weight).sum::<i32>()
    }

    /// Reject destinations that alias the stable or canary service.
    pub fn ensure_distinct_from(&self, services: &CanaryServices) -> Result<(), PluginError> {
        if let Some(clash) = self
            .additional
            .iter()
            .find(|d| services.is_reserved(&d.service_name))
        {
            return Err(ValidationError::ReservedDestination(clash.service_name.clone()).into());
        }
        Ok(())
    }
}

/// Compute the weight plan for `desired_weight` and `additional` destinations.
///
/// Pure: identical inputs always produce identical plans.
pub fn compute_weights(
    desired_weight: i32,
    additional: &[WeightDestination],
) -> Result<WeightPlan, PluginError> {
    validate_weight(desired_weight, "desiredWeight")?;

    let mut seen = HashSet::new();
    let mut requested: i64 = 0;
    for (i, destination) in additional.iter().enumerate() {
        validate_service_name(
            &destination.service_name,
            &format!("additionalDestinations[{}].serviceName", i),
        )?;
        validate_weight(
            destination.weight,
            &format!("additionalDestinations[{}].weight", i),
        )?;
        if !seen.insert(destination.service_name.as_str()) {
            return Err(ValidationError::DuplicateDestination(destination.service_name.clone()).into());
        }
        requested += i64::from(destination.weight);
    }

    if requested > i64::from(desired_weight) {
        return Err(ValidationError::WeightBudgetExceeded {
            requested: i32::try_from(requested).unwrap_or(i32::MAX),
            available: desired_weight,
        }
        .into());
    }

    // requested <= desired_weight <= 100 here, so the narrowing is lossless.
    let carved = requested as i32;

    Ok(WeightPlan {
        desired_weight,
        stable_weight: TOTAL_WEIGHT - desired_weight,
        canary_weight: desired_weight - carved,
        additional: additional.to_vec(),
    })
}

#[cfg(test)]
#[path = "calculator_tests.rs"]
mod tests;
