//! Pipeline orchestration.
//!
//! Order is fixed: base estimate, presales split, role pricing, add-ons,
//! aggregation. The Sprint-0 uplift changes the stage weights consumed by
//! every later step, so nothing may run before the base estimate.

use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::config::drift::check_drift;
use crate::config::multipliers::LayeredMultipliers;
use crate::config::tables::Configuration;
use crate::config::validation::validate_configuration_result;
use crate::core::inputs::EstimationInputs;
use crate::core::results::EstimationResult;
use crate::engine::addons::estimate_addons;
use crate::engine::base::compute_base;
use crate::engine::presales::split_presales;
use crate::engine::pricing::{expand_and_price, PricingContext};
use crate::engine::summary;
use crate::errors::{EstimationWarning, Result};

/// Validate inputs and configuration, then run the full pipeline.
///
/// Fails fast on the first fatal error; no partial result is returned.
pub fn estimate(inputs: &EstimationInputs, config: &Configuration) -> Result<EstimationResult> {
    validate_configuration_result(config)?;
    run(inputs, config, check_drift(config))
}

fn run(
    inputs: &EstimationInputs,
    config: &Configuration,
    config_warnings: Vec<EstimationWarning>,
) -> Result<EstimationResult> {
    let _span = debug_span!(
        "estimate",
        product = %inputs.product,
        delivery_type = %inputs.delivery_type,
        size = %inputs.size_band,
        locale = %inputs.locale
    )
    .entered();

    let mut warnings = config_warnings;
    warnings.extend(inputs.validate()?);

    let multipliers = LayeredMultipliers::for_config(config);
    let allocation = compute_base(inputs, config, &multipliers, &mut warnings)?;
    let base = split_presales(allocation, config);

    let pricing = PricingContext::new(inputs, config);
    let base_role_costs = expand_and_price(&base.stages, &pricing)?;
    let addons = estimate_addons(inputs, &pricing, &multipliers, &mut warnings)?;

    let kpis = summary::compute_kpis(&base, &base_role_costs, &addons);
    let stage_summary = summary::stage_summary(&base, &base_role_costs);
    let all_stage_summary = summary::all_stage_summary(&stage_summary, &addons);
    let package_summary = summary::package_summary(inputs, &base, &base_role_costs, &addons);
    let all_costs = || {
        base_role_costs
            .iter()
            .chain(addons.iter().flat_map(|a| a.role_costs.iter()))
    };
    let role_summary = summary::role_summary(all_costs());
    let delivery_split_summary = summary::delivery_split_summary(all_costs());
    let stage_role_matrix = summary::stage_role_matrix(&base, &base_role_costs);

    debug!(
        total_hours = kpis.total_hours,
        total_cost = kpis.total_cost,
        warnings = warnings.len(),
        "estimate complete"
    );

    Ok(EstimationResult {
        inputs: inputs.clone(),
        base,
        base_role_costs,
        addons,
        kpis,
        role_summary,
        stage_summary,
        all_stage_summary,
        package_summary,
        delivery_split_summary,
        stage_role_matrix,
        warnings,
    })
}

/// Holds a validated configuration snapshot for repeated estimates.
///
/// Cloning is cheap and clones share the snapshot. Publishing new
/// configuration means building a new `Estimator`.
#[derive(Debug, Clone)]
pub struct Estimator {
    config: Arc<Configuration>,
    drift: Arc<Vec<EstimationWarning>>,
}

impl Estimator {
    /// Validate `config` once and keep it.
    pub fn new(config: Configuration) -> Result<Self> {
        Self::from_shared(Arc::new(config))
    }

    pub fn from_shared(config: Arc<Configuration>) -> Result<Self> {
        validate_configuration_result(&config)?;
        let drift = Arc::new(check_drift(&config));
        Ok(Self { config, drift })
    }

    /// Estimator over the compiled baseline.
    pub fn baseline() -> Result<Self> {
        Self::new(Configuration::baseline())
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn estimate(&self, inputs: &EstimationInputs) -> Result<EstimationResult> {
        run(inputs, &self.config, self.drift.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Package, Product, DeliveryType, Locale, SizeBand};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_base_scenario_kpis() {
        let result = estimate(&EstimationInputs::default(), &Configuration::baseline()).unwrap();
        assert!(close(result.kpis.total_hours, 6700.0));
        assert!(close(result.kpis.presales_hours, 150.75));
        assert!(close(result.kpis.delivery_hours, 6549.25));
        assert!(close(
            result.kpis.blended_rate,
            result.kpis.total_cost / result.kpis.total_hours
        ));
        assert_eq!(result.kpis.presales_cost, 0.0);
        assert!(result.warnings.is_empty());
        assert!(result.addons.is_empty());
    }

    #[test]
    fn test_estimator_matches_free_function() {
        let estimator = Estimator::baseline().unwrap();
        let inputs = EstimationInputs::default();
        let a = estimator.estimate(&inputs).unwrap();
        let b = estimate(&inputs, &Configuration::baseline()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_configuration_fails_before_pipeline() {
        let mut config = Configuration::baseline();
        config.stage_weights[0].weight = 0.3;
        let err = estimate(&EstimationInputs::default(), &config).unwrap_err();
        assert!(err.is_configuration());
        assert!(Estimator::new(config).is_err());
    }

    #[test]
    fn test_addons_included_in_totals() {
        let mut inputs = EstimationInputs::default();
        inputs.include_integrations = true;
        inputs.include_reports = true;
        let result = estimate(&inputs, &Configuration::baseline()).unwrap();
        assert!(close(result.kpis.total_hours, 6700.0 + 3840.0 + 2448.0));
        assert_eq!(result.all_stage_summary.len(), 11);
        assert!(result.addon(Package::Reports).is_some());
    }

    #[test]
    fn test_colleague_degree_works_is_disabled() {
        let mut inputs = EstimationInputs::new(
            Product::Colleague,
            DeliveryType::NetNew,
            SizeBand::Small,
            Locale::Us,
        );
        inputs.include_degree_works = true;
        inputs.degree_works.majors = 20;
        let result = estimate(&inputs, &Configuration::baseline()).unwrap();
        let dw = result.addon(Package::DegreeWorks).unwrap();
        assert!(dw.disabled);
        let row = result
            .package_summary
            .iter()
            .find(|p| p.package == "Degree Works")
            .unwrap();
        assert!(!row.enabled);
    }
}
