// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for the weight calculator.

use super::*;
use crate::error::ErrorKind;
use proptest::prelude::*;

#[test]
fn test_every_weight_without_destinations() {
    for w in 0..=100 {
        let plan = compute_weights(w, &[]).unwrap();
        assert_eq!(plan.stable_weight, 100 - w);
        assert_eq!(plan.canary_weight, w);
        assert_eq!(plan.total(), 100);
    }
}

#[test]
fn test_zero_and_full_weights() {
    let zero = compute_weights(0, &[]).unwrap();
    assert_eq!((zero.stable_weight, zero.canary_weight), (100, 0));

    let full = compute_weights(100, &[]).unwrap();
    assert_eq!((full.stable_weight, full.canary_weight), (0, 100));
}

#[test]
fn test_destinations_carve_canary_share() {
    let extras = vec![
        WeightDestination::new("extra-a", 10),
        WeightDestination::new("extra-b", 5).with_pod_template_hash("7f9c"),
    ];
    let plan = compute_weights(40, &extras).unwrap();
    assert_eq!(plan.stable_weight, 60);
    assert_eq!(plan.canary_weight, 25);
    assert_eq!(plan.additional, extras);
    assert_eq!(plan.total(), 100);
}

#[test]
fn test_destinations_may_take_whole_canary_share() {
    let plan = compute_weights(20, &[WeightDestination::new("extra", 20)]).unwrap();
    assert_eq!(plan.canary_weight, 0);
    assert_eq!(plan.stable_weight, 80);
}

#[test]
fn test_destinations_exceeding_canary_share_rejected() {
    let err = compute_weights(
        30,
        &[WeightDestination::new("a", 20), WeightDestination::new("b", 11)],
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidWeight);
    assert!(err.to_string().contains("request 31"));
}

#[test]
fn test_out_of_range_weights_rejected() {
    for w in [-1, 101, i32::MIN, i32::MAX] {
        assert_eq!(compute_weights(w, &[]).unwrap_err().kind(), ErrorKind::InvalidWeight);
    }
    let err = compute_weights(50, &[WeightDestination::new("a", -5)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidWeight);
}

#[test]
fn test_duplicate_destination_rejected() {
    let err = compute_weights(
        50,
        &[
            WeightDestination::new("extra", 5).with_pod_template_hash("aaa"),
            WeightDestination::new("extra", 5).with_pod_template_hash("bbb"),
        ],
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidWeight);
}

#[test]
fn test_invalid_destination_name_rejected() {
    let err = compute_weights(50, &[WeightDestination::new("Extra_Svc", 5)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigParse);
}

#[test]
fn test_destination_cannot_alias_canary_pair() {
    let services = CanaryServices {
        stable: "stable-svc".to_string(),
        canary: "canary-svc".to_string(),
    };
    let plan = compute_weights(50, &[WeightDestination::new("stable-svc", 5)]).unwrap();
    let err = plan.ensure_distinct_from(&services).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidWeight);

    let plan = compute_weights(50, &[WeightDestination::new("extra", 5)]).unwrap();
    assert!(plan.ensure_distinct_from(&services).is_ok());
}

proptest! {
    #[test]
    fn prop_plan_always_sums_to_total(
        desired in 0i32..=100,
        raw in proptest::collection::vec(0i32..=100, 0..5),
    ) {
        let destinations: Vec<_> = raw
            .iter()
            .enumerate()
            .map(|(i, w)| WeightDestination::new(format!("extra-{}", i), *w))
            .collect();
        let requested: i32 = raw.iter().sum();

        match compute_weights(desired, &destinations) {
            Ok(plan) => {
                prop_assert!(requested <= desired);
                prop_assert_eq!(plan.total(), 100);
                prop_assert_eq!(plan.stable_weight, 100 - desired);
                prop_assert_eq!(plan.canary_weight, desired - requested);
                prop_assert!(plan.canary_weight >= 0);
            }
            Err(err) => {
                prop_assert!(requested > desired);
                prop_assert_eq!(err.kind(), ErrorKind::InvalidWeight);
            }
        }
    }

    #[test]
    fn prop_plan_is_deterministic(desired in 0i32..=100, extra in 0i32..=100) {
        let destinations = vec![WeightDestination::new("extra", extra.min(desired))];
        prop_assert_eq!(
            compute_weights(desired, &destinations).unwrap(),
            compute_weights(desired, &destinations).unwrap()
        );
    }
}
