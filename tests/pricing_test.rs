//! Rate lookup, delivery-mix precedence and missing-rate policy.

mod common;

use common::{assert_close, baseline_result, split_hours};
use n2s_estimator::config::{DeliveryMix, RateCard};
use n2s_estimator::core::{DeliverySplit, EstimationInputs, Locale, SplitMix};
use n2s_estimator::{estimate, Configuration};

fn start_pm(inputs: &EstimationInputs, split: DeliverySplit) -> (f64, f64) {
    let result = baseline_result(inputs);
    result
        .base_role_costs
        .iter()
        .find(|rc| rc.stage == "Start" && rc.role == "Project Manager" && rc.split == split)
        .map(|rc| (rc.hours, rc.rate))
        .unwrap_or((0.0, 0.0))
}

#[test]
fn test_locale_selects_regional_rates() {
    let mut inputs = EstimationInputs::default();
    inputs.locale = Locale::Uk;
    let (_, onshore_rate) = start_pm(&inputs, DeliverySplit::Onshore);
    let (_, offshore_rate) = start_pm(&inputs, DeliverySplit::Offshore);
    assert_close(onshore_rate, 165.0);
    assert_close(offshore_rate, 82.0);
}

#[test]
fn test_rate_override_replaces_configured_row() {
    let mut inputs = EstimationInputs::default();
    inputs.rate_overrides.push(RateCard {
        role: "Project Manager".into(),
        locale: Locale::Us,
        onshore: 200.0,
        offshore: 100.0,
        partner: 150.0,
    });
    let (_, rate) = start_pm(&inputs, DeliverySplit::Onshore);
    assert_close(rate, 200.0);
}

#[test]
fn test_role_mix_override_beats_configured_role_mix() {
    let mut inputs = EstimationInputs::default();
    inputs.role_mix_overrides.push(DeliveryMix {
        role: Some("Project Manager".into()),
        onshore: 1.0,
        offshore: 0.0,
        partner: 0.0,
    });
    let (hours, _) = start_pm(&inputs, DeliverySplit::Onshore);
    assert_close(hours, 67.0 * 0.20);
    assert_eq!(start_pm(&inputs, DeliverySplit::Offshore).0, 0.0);
}

#[test]
fn test_global_override_leaves_role_specific_mix() {
    let mut inputs = EstimationInputs::default();
    inputs.global_mix_override = Some(SplitMix::new(0.0, 1.0, 0.0));

    // Project Manager keeps its configured 0.80 onshore share
    let (pm_hours, _) = start_pm(&inputs, DeliverySplit::Onshore);
    assert_close(pm_hours, 67.0 * 0.20 * 0.80);

    let result = baseline_result(&inputs);
    let tl_onshore = result
        .base_role_costs
        .iter()
        .filter(|rc| rc.role == "Technical Lead" && rc.split == DeliverySplit::Onshore)
        .count();
    assert_eq!(tl_onshore, 0);
}

#[test]
fn test_zero_share_splits_are_omitted() {
    let mut inputs = EstimationInputs::default();
    inputs.global_mix_override = Some(SplitMix::new(1.0, 0.0, 0.0));
    let result = baseline_result(&inputs);
    assert!(result
        .base_role_costs
        .iter()
        .filter(|rc| rc.role == "QA Engineer")
        .all(|rc| rc.split == DeliverySplit::Onshore));
    assert!(split_hours(&result, DeliverySplit::Partner) > 0.0);
}

#[test]
fn test_missing_rate_is_configuration_error() {
    let mut config = Configuration::baseline();
    config
        .rates
        .retain(|r| !(r.role == "QA Engineer" && r.locale == Locale::Us));
    let err = estimate(&EstimationInputs::default(), &config).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.key(), "rates[QA Engineer/US]");
}

#[test]
fn test_missing_rate_in_other_locale_does_not_matter() {
    let mut config = Configuration::baseline();
    config
        .rates
        .retain(|r| !(r.role == "QA Engineer" && r.locale == Locale::Mena));
    assert!(estimate(&EstimationInputs::default(), &config).is_ok());
}
