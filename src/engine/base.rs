//! Base estimator: adjusted total hours, Sprint-0 uplift, stage allocation.

use tracing::debug;

use crate::config::multipliers::{LayeredMultipliers, MultiplierSource};
use crate::config::tables::{Configuration, StageWeight};
use crate::core::inputs::EstimationInputs;
use crate::core::mix::{fraction_sum, sums_to_one};
use crate::core::types::{CONFIGURE_STAGE, PLAN_STAGE, SPRINT_ZERO_STAGE};
use crate::errors::{EstimationError, EstimationWarning, Result};

/// Hours allocated to one stage before the presales split.
#[derive(Debug, Clone, PartialEq)]
pub struct StageAllocation {
    pub phase: String,
    pub stage: String,
    pub weight: f64,
    pub hours: f64,
}

/// Adjusted total and its per-stage allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseAllocation {
    pub baseline_hours: f64,
    pub size_multiplier: f64,
    pub delivery_type_multiplier: f64,
    pub maturity_factor: f64,
    pub sprint0_uplift: f64,
    pub adjusted_total_hours: f64,
    pub stages: Vec<StageAllocation>,
}

/// Stage weights after moving `uplift` into Sprint 0.
///
/// Plan and Configure fund the uplift in proportion to their own pre-uplift
/// weights. Output order matches `weights`.
pub fn apply_sprint0_uplift(weights: &[StageWeight], uplift: f64) -> Result<Vec<f64>> {
    if !uplift.is_finite() || uplift < 0.0 {
        return Err(EstimationError::validation(
            "sprint0_uplift",
            format!("uplift must be a non-negative fraction, got {}", uplift),
        ));
    }
    let mut adjusted: Vec<f64> = weights.iter().map(|sw| sw.weight).collect();

    if uplift != 0.0 {
        let position = |name: &str| {
            weights.iter().position(|sw| sw.stage == name).ok_or_else(|| {
                EstimationError::configuration(
                    format!("stage_weights[{}]", name),
                    "stage required for Sprint-0 uplift is missing",
                )
            })
        };
        let sprint0 = position(SPRINT_ZERO_STAGE)?;
        let plan = position(PLAN_STAGE)?;
        let configure = position(CONFIGURE_STAGE)?;

        let w_plan = weights[plan].weight;
        let w_configure = weights[configure].weight;
        let reducible = w_plan + w_configure;
        if uplift > reducible {
            return Err(EstimationError::validation(
                "sprint0_uplift",
                format!(
                    "uplift {} exceeds the combined Plan and Configure weight {}",
                    uplift, reducible
                ),
            ));
        }

        adjusted[sprint0] += uplift;
        adjusted[plan] -= uplift * w_plan / reducible;
        adjusted[configure] -= uplift * w_configure / reducible;
    }

    if !sums_to_one(adjusted.iter().copied()) {
        return Err(EstimationError::configuration(
            "stage_weights",
            format!(
                "weights must sum to 1.0 after uplift, got {:.6}",
                fraction_sum(adjusted.iter().copied())
            ),
        ));
    }
    Ok(adjusted)
}

/// Compute the adjusted total and allocate it across stages.
pub fn compute_base<P, F>(
    inputs: &EstimationInputs,
    config: &Configuration,
    multipliers: &LayeredMultipliers<P, F>,
    warnings: &mut Vec<EstimationWarning>,
) -> Result<BaseAllocation>
where
    P: MultiplierSource,
    F: MultiplierSource,
{
    let size_multiplier = multipliers.resolve_size(inputs.size_band, warnings)?;
    let delivery_type_multiplier =
        multipliers.resolve_delivery_type(inputs.product, inputs.delivery_type, warnings)?;

    let adjusted_total_hours = config.baseline_hours
        * size_multiplier
        * delivery_type_multiplier
        * inputs.maturity_factor;
    if !adjusted_total_hours.is_finite() || adjusted_total_hours <= 0.0 {
        return Err(EstimationError::validation(
            "adjusted_total_hours",
            format!("must be positive, got {}", adjusted_total_hours),
        ));
    }

    let weights = apply_sprint0_uplift(&config.stage_weights, inputs.sprint0_uplift)?;
    let stages: Vec<StageAllocation> = config
        .stage_weights
        .iter()
        .zip(weights)
        .map(|(sw, weight)| StageAllocation {
            phase: sw.phase.clone(),
            stage: sw.stage.clone(),
            weight,
            hours: adjusted_total_hours * weight,
        })
        .collect();

    debug!(
        adjusted_total_hours,
        size_multiplier,
        delivery_type_multiplier,
        maturity_factor = inputs.maturity_factor,
        stages = stages.len(),
        "base allocation computed"
    );

    Ok(BaseAllocation {
        baseline_hours: config.baseline_hours,
        size_multiplier,
        delivery_type_multiplier,
        maturity_factor: inputs.maturity_factor,
        sprint0_uplift: inputs.sprint0_uplift,
        adjusted_total_hours,
        stages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DeliveryType, Locale, Product, SizeBand};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_baseline_stage_hours() {
        let config = Configuration::baseline();
        let inputs = EstimationInputs::default();
        let mut warnings = Vec::new();
        let base = compute_base(
            &inputs,
            &config,
            &LayeredMultipliers::for_config(&config),
            &mut warnings,
        )
        .unwrap();

        assert!(close(base.adjusted_total_hours, 6700.0));
        let hours: Vec<f64> = base.stages.iter().map(|s| s.hours).collect();
        let expected = [167.5, 167.5, 402.0, 670.0, 2278.0, 1340.0, 670.0, 402.0, 603.0];
        for (got, want) in hours.iter().zip(expected) {
            assert!(close(*got, want), "{} != {}", got, want);
        }
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_uplift_reduces_plan_and_configure_proportionally() {
        let config = Configuration::baseline();
        let weights = apply_sprint0_uplift(&config.stage_weights, 0.02).unwrap();
        // Plan 0.10 and Configure 0.34 share the 0.02 as 10:34.
        assert!(close(weights[2], 0.08));
        assert!(close(weights[3], 0.10 - 0.02 * 0.10 / 0.44));
        assert!(close(weights[4], 0.34 - 0.02 * 0.34 / 0.44));
        assert!(sums_to_one(weights));
    }

    #[test]
    fn test_zero_uplift_leaves_weights_untouched() {
        let config = Configuration::baseline();
        let weights = apply_sprint0_uplift(&config.stage_weights, 0.0).unwrap();
        let original: Vec<f64> = config.stage_weights.iter().map(|s| s.weight).collect();
        assert_eq!(weights, original);
    }

    #[test]
    fn test_uplift_without_sprint0_stage_is_configuration_error() {
        let mut config = Configuration::baseline();
        config.stage_weights.retain(|s| s.stage != "Sprint 0");
        let err = apply_sprint0_uplift(&config.stage_weights, 0.01).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.key(), "stage_weights[Sprint 0]");
    }

    #[test]
    fn test_uplift_larger_than_reducible_weight_is_validation_error() {
        let config = Configuration::baseline();
        let err = apply_sprint0_uplift(&config.stage_weights, 0.5).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_uplift_is_validation_error() {
        let config = Configuration::baseline();
        for uplift in [-0.08, f64::NAN] {
            let err = apply_sprint0_uplift(&config.stage_weights, uplift).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.key(), "sprint0_uplift");
        }
    }

    #[test]
    fn test_multipliers_compound() {
        let config = Configuration::baseline();
        let mut inputs = EstimationInputs::new(
            Product::Colleague,
            DeliveryType::Modernization,
            SizeBand::Large,
            Locale::Uk,
        );
        inputs.maturity_factor = 1.2;
        let base = compute_base(
            &inputs,
            &config,
            &LayeredMultipliers::for_config(&config),
            &mut Vec::new(),
        )
        .unwrap();
        assert!(close(base.adjusted_total_hours, 6700.0 * 1.25 * 0.75 * 1.2));
    }
}
