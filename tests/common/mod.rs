// Shared helpers for n2s-estimator integration tests
#![allow(dead_code)]

use n2s_estimator::config::Configuration;
use n2s_estimator::core::{
    DeliverySplit, DeliveryType, EstimationInputs, Locale, Product, SizeBand,
};
use n2s_estimator::{estimate, EstimationResult};

pub const EPSILON: f64 = 1e-6;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

pub fn baseline_result(inputs: &EstimationInputs) -> EstimationResult {
    estimate(inputs, &Configuration::baseline()).expect("baseline estimate should succeed")
}

pub fn inputs_for(product: Product, size: SizeBand) -> EstimationInputs {
    EstimationInputs::new(product, DeliveryType::NetNew, size, Locale::Us)
}

/// Inputs with every add-on switched on at its default volume.
pub fn all_addons(mut inputs: EstimationInputs) -> EstimationInputs {
    inputs.include_integrations = true;
    inputs.include_reports = true;
    inputs.include_degree_works = true;
    inputs.degree_works.majors = 10;
    inputs
}

pub fn split_hours(result: &EstimationResult, split: DeliverySplit) -> f64 {
    result
        .all_role_costs()
        .filter(|rc| rc.split == split)
        .map(|rc| rc.hours)
        .sum()
}
