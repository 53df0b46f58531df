//! Configuration validation with error accumulation.
//!
//! [`validate_configuration`] walks every table and collects ALL problems
//! using stillwater's `Validation`, so `n2s-estimator validate` can report a
//! broken workbook in one pass. The pipeline uses
//! [`validate_configuration_result`], which fails fast on the first error.
//!
//! Mixes are never renormalized here: a set that misses 1.0 is an error.
//!
//! # Example
//!
//! ```rust
//! use n2s_estimator::config::validation::validate_configuration;
//! use n2s_estimator::config::Configuration;
//!
//! let validation = validate_configuration(&Configuration::baseline());
//! assert!(validation.is_success());
//! ```

use std::collections::BTreeMap;

use stillwater::{NonEmptyVec, Validation};

use crate::config::tables::Configuration;
use crate::core::mix::{fraction_sum, is_fraction, sums_to_one, MIX_EPSILON};
use crate::core::types::{Package, Tier};
use crate::errors::{EstimationError, Result};

/// Accumulated validation over a configuration snapshot.
pub type ConfigValidation = Validation<(), NonEmptyVec<EstimationError>>;

/// Validate every table, accumulating all errors.
pub fn validate_configuration(config: &Configuration) -> ConfigValidation {
    let errors: Vec<EstimationError> = [
        validate_scalars(config),
        validate_stage_weights(config),
        validate_presales_tables(config),
        validate_role_mix(config),
        validate_rates(config),
        validate_delivery_mix(config),
        validate_addon_catalog(config),
        validate_multiplier_tables(config),
    ]
    .into_iter()
    .flatten()
    .collect();

    match NonEmptyVec::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(()),
    }
}

/// Fail-fast wrapper: the first accumulated error, if any.
pub fn validate_configuration_result(config: &Configuration) -> Result<()> {
    match validate_configuration(config) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => match errors.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        },
    }
}

/// Every accumulated error as a plain list. Empty when valid.
pub fn configuration_errors(config: &Configuration) -> Vec<EstimationError> {
    match validate_configuration(config) {
        Validation::Success(()) => Vec::new(),
        Validation::Failure(errors) => errors.into_iter().collect(),
    }
}

fn validate_scalars(config: &Configuration) -> Vec<EstimationError> {
    let mut errors = Vec::new();
    if !(config.baseline_hours.is_finite() && config.baseline_hours > 0.0) {
        errors.push(EstimationError::configuration(
            "baseline_hours",
            format!("must be positive, got {}", config.baseline_hours),
        ));
    }
    if !(config.drift_threshold.is_finite() && config.drift_threshold >= 0.0) {
        errors.push(EstimationError::configuration(
            "drift_threshold",
            format!("must be non-negative, got {}", config.drift_threshold),
        ));
    }
    errors
}

fn validate_stage_weights(config: &Configuration) -> Vec<EstimationError> {
    let mut errors = Vec::new();
    if config.stage_weights.is_empty() {
        errors.push(EstimationError::configuration(
            "stage_weights",
            "no stages configured",
        ));
        return errors;
    }

    let mut seen: Vec<&str> = Vec::new();
    for sw in &config.stage_weights {
        if seen.contains(&sw.stage.as_str()) {
            errors.push(EstimationError::configuration(
                format!("stage_weights[{}]", sw.stage),
                "duplicate stage",
            ));
        }
        seen.push(&sw.stage);
        if !is_fraction(sw.weight) {
            errors.push(EstimationError::configuration(
                format!("stage_weights[{}]", sw.stage),
                format!("weight must be within 0..=1, got {}", sw.weight),
            ));
        }
    }

    let total = fraction_sum(config.stage_weights.iter().map(|sw| sw.weight));
    if (total - 1.0).abs() > MIX_EPSILON {
        errors.push(EstimationError::configuration(
            "stage_weights",
            format!("weights must sum to 1.0, got {:.6}", total),
        ));
    }
    errors
}

fn validate_presales_tables(config: &Configuration) -> Vec<EstimationError> {
    let mut errors = Vec::new();
    for sp in &config.stage_presales {
        let key = format!("stage_presales[{}]", sp.stage);
        if config.stage_weight(&sp.stage).is_none() {
            errors.push(EstimationError::configuration(key.clone(), "unknown stage"));
        }
        if !is_fraction(sp.default_fraction) {
            errors.push(EstimationError::configuration(
                key,
                format!("fraction must be within 0..=1, got {}", sp.default_fraction),
            ));
        }
    }

    for activity in &config.activities {
        let key = format!("activities[{}/{}]", activity.stage, activity.activity);
        if config.stage_weight(&activity.stage).is_none() {
            errors.push(EstimationError::configuration(key.clone(), "unknown stage"));
        }
        if !(activity.weight.is_finite() && activity.weight >= 0.0) {
            errors.push(EstimationError::configuration(
                key,
                format!("weight must be non-negative, got {}", activity.weight),
            ));
        }
    }

    for stage in config.stage_names() {
        let mut activities = config.activities_for(stage).peekable();
        if activities.peek().is_some() {
            let total = fraction_sum(activities.map(|a| a.weight));
            if total <= 0.0 {
                errors.push(EstimationError::configuration(
                    format!("activities[{}]", stage),
                    "activity weights sum to zero",
                ));
            }
        }
    }
    errors
}

fn validate_role_mix(config: &Configuration) -> Vec<EstimationError> {
    let mut errors = Vec::new();
    for rm in &config.role_mix {
        let key = format!("role_mix[{}/{}]", rm.stage, rm.role);
        if config.stage_weight(&rm.stage).is_none() {
            errors.push(EstimationError::configuration(key.clone(), "unknown stage"));
        }
        if !is_fraction(rm.fraction) {
            errors.push(EstimationError::configuration(
                key,
                format!("fraction must be within 0..=1, got {}", rm.fraction),
            ));
        }
    }

    for stage in config.stage_names() {
        let fractions: Vec<f64> = config.role_mix_for(stage).map(|rm| rm.fraction).collect();
        if fractions.is_empty() {
            errors.push(EstimationError::configuration(
                format!("role_mix[{}]", stage),
                "stage has no role mix",
            ));
        } else if !sums_to_one(fractions.iter().copied()) {
            errors.push(EstimationError::configuration(
                format!("role_mix[{}]", stage),
                format!("fractions must sum to 1.0, got {:.6}", fraction_sum(fractions)),
            ));
        }
    }
    errors
}

fn validate_rates(config: &Configuration) -> Vec<EstimationError> {
    config
        .rates
        .iter()
        .filter(|rate| !rate.is_valid())
        .map(|rate| {
            EstimationError::configuration(
                format!("rates[{}/{}]", rate.role, rate.locale),
                "rates must be positive",
            )
        })
        .collect()
}

fn validate_delivery_mix(config: &Configuration) -> Vec<EstimationError> {
    let mut errors = Vec::new();
    if config.global_delivery_mix().is_none() {
        errors.push(EstimationError::configuration(
            "delivery_mix[global]",
            "no global delivery mix row",
        ));
    }
    for dm in &config.delivery_mix {
        if !dm.mix().is_valid() {
            let label = dm.role.as_deref().unwrap_or("global");
            errors.push(EstimationError::configuration(
                format!("delivery_mix[{}]", label),
                format!(
                    "onshore/offshore/partner must be fractions summing to 1.0, got {:.6}",
                    dm.mix().total()
                ),
            ));
        }
    }
    errors
}

fn validate_addon_catalog(config: &Configuration) -> Vec<EstimationError> {
    let mut errors = Vec::new();
    let mut groups: BTreeMap<(Package, Tier), Vec<(f64, f64)>> = BTreeMap::new();
    for entry in &config.addon_catalog {
        groups
            .entry((entry.package, entry.tier))
            .or_default()
            .push((entry.unit_hours, entry.role_fraction));
    }

    for ((package, tier), rows) in &groups {
        let key = format!("addon_catalog[{}/{}]", package, tier);
        let unit_hours = rows[0].0;
        if !(unit_hours.is_finite() && unit_hours >= 0.0) {
            errors.push(EstimationError::configuration(
                key.clone(),
                format!("unit hours must be non-negative, got {}", unit_hours),
            ));
        }
        if rows.iter().any(|(h, _)| (h - unit_hours).abs() > MIX_EPSILON) {
            errors.push(EstimationError::configuration(
                key.clone(),
                "rows disagree on unit hours",
            ));
        }
        if rows.iter().any(|(_, f)| !is_fraction(*f)) {
            errors.push(EstimationError::configuration(
                key.clone(),
                "role fractions must be within 0..=1",
            ));
        }
        let total = fraction_sum(rows.iter().map(|(_, f)| *f));
        if (total - 1.0).abs() > MIX_EPSILON {
            errors.push(EstimationError::configuration(
                key,
                format!("role fractions must sum to 1.0, got {:.6}", total),
            ));
        }
    }
    errors
}

fn validate_multiplier_tables(config: &Configuration) -> Vec<EstimationError> {
    let non_negative = |v: f64| v.is_finite() && v >= 0.0;
    let mut errors = Vec::new();

    for t in &config.product_role_map {
        if !non_negative(t.multiplier) {
            errors.push(EstimationError::configuration(
                format!("product_role_map[{}]", t.role),
                format!("multiplier must be non-negative, got {}", t.multiplier),
            ));
        }
    }
    for m in &config.size_multipliers {
        if !(m.multiplier.is_finite() && m.multiplier > 0.0) {
            errors.push(EstimationError::configuration(
                format!("size_multipliers[{}]", m.size),
                format!("multiplier must be positive, got {}", m.multiplier),
            ));
        }
    }
    for m in &config.product_multipliers {
        if !(m.multiplier.is_finite() && m.multiplier > 0.0) {
            errors.push(EstimationError::configuration(
                format!("product_multipliers[{}/{}]", m.product, m.delivery_type),
                format!("multiplier must be positive, got {}", m.multiplier),
            ));
        }
    }
    for m in &config.product_package_multipliers {
        if !non_negative(m.multiplier) {
            errors.push(EstimationError::configuration(
                format!("product_package_multipliers[{}/{}]", m.product, m.package),
                format!("multiplier must be non-negative, got {}", m.multiplier),
            ));
        }
    }
    for cap in &config.addon_caps {
        if !(cap.cap_hours.is_finite() && cap.cap_hours > 0.0) {
            errors.push(EstimationError::configuration(
                format!("addon_caps[{}/{}]", cap.package, cap.size),
                format!("cap must be positive, got {}", cap.cap_hours),
            ));
        }
    }
    errors
}
