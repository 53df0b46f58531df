//! Count-driven packages (Integrations, Reports).

use crate::core::mix::TierMix;
use crate::core::results::{AddonResult, TierBreakdown};
use crate::core::types::{Package, Tier};
use crate::engine::addons::{catalog_rows, expand_tier};
use crate::engine::pricing::PricingContext;
use crate::errors::{EstimationError, Result};

/// raw hours = count × Σ(tier share × unit hours).
pub fn estimate_tiered(
    package: Package,
    count: u32,
    mix: &TierMix,
    package_multiplier: f64,
    pricing: &PricingContext<'_>,
) -> Result<AddonResult> {
    if !mix.is_valid() {
        return Err(EstimationError::validation(
            format!("{}.mix", package),
            format!("tier fractions must sum to 1.0, got {:.6}", mix.total()),
        ));
    }

    let disabled = package_multiplier == 0.0;
    let mut tiers = Vec::with_capacity(Tier::COMPLEXITY.len());
    let mut role_costs = Vec::new();

    for tier in Tier::COMPLEXITY {
        let rows = catalog_rows(pricing, package, tier)?;
        let unit_hours = rows[0].unit_hours;
        let items = f64::from(count) * mix.share(tier);
        let raw_hours = items * unit_hours;

        let hours = if disabled {
            0.0
        } else {
            let (hours, costs) =
                expand_tier(package, tier, raw_hours, &rows, package_multiplier, pricing)?;
            role_costs.extend(costs);
            hours
        };

        tiers.push(TierBreakdown {
            tier,
            items,
            unit_hours,
            raw_hours,
            hours,
        });
    }

    Ok(AddonResult {
        package,
        raw_hours: tiers.iter().map(|t| t.raw_hours).sum(),
        package_multiplier,
        total_hours: tiers.iter().map(|t| t.hours).sum(),
        cost: role_costs.iter().map(|c| c.cost).sum(),
        disabled,
        tiers,
        role_costs,
        cap: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tables::Configuration;
    use crate::core::inputs::EstimationInputs;
    use crate::core::types::{DeliveryType, Locale, Product, SizeBand};

    #[test]
    fn test_integrations_reference_hours() {
        let config = Configuration::baseline();
        let inputs = EstimationInputs::default();
        let pricing = PricingContext::new(&inputs, &config);
        let result = estimate_tiered(
            Package::Integrations,
            30,
            &TierMix::new(0.6, 0.3, 0.1),
            1.0,
            &pricing,
        )
        .unwrap();
        assert!((result.raw_hours - 3840.0).abs() < 1e-9);
        assert!((result.total_hours - 3840.0).abs() < 1e-9);
        assert!(result.cost > 0.0);
        assert_eq!(result.tiers.len(), 3);
    }

    #[test]
    fn test_reports_reference_hours() {
        let config = Configuration::baseline();
        let inputs = EstimationInputs::default();
        let pricing = PricingContext::new(&inputs, &config);
        let result = estimate_tiered(
            Package::Reports,
            40,
            &TierMix::new(0.5, 0.35, 0.15),
            1.0,
            &pricing,
        )
        .unwrap();
        assert!((result.total_hours - 2448.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_mix_rejected_not_renormalized() {
        let config = Configuration::baseline();
        let inputs = EstimationInputs::default();
        let pricing = PricingContext::new(&inputs, &config);
        let err = estimate_tiered(
            Package::Reports,
            40,
            &TierMix::new(0.5, 0.5, 0.5),
            1.0,
            &pricing,
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.key(), "Reports.mix");
    }

    #[test]
    fn test_zero_multiplier_disables_package() {
        let config = Configuration::baseline();
        let inputs = EstimationInputs::default();
        let pricing = PricingContext::new(&inputs, &config);
        let result = estimate_tiered(
            Package::Integrations,
            30,
            &TierMix::new(0.6, 0.3, 0.1),
            0.0,
            &pricing,
        )
        .unwrap();
        assert!(result.disabled);
        assert_eq!(result.total_hours, 0.0);
        assert_eq!(result.cost, 0.0);
        assert!(result.role_costs.is_empty());
        assert!((result.raw_hours - 3840.0).abs() < 1e-9);
    }

    #[test]
    fn test_colleague_drops_integration_engineering_roles() {
        let config = Configuration::baseline();
        let inputs = EstimationInputs::new(
            Product::Colleague,
            DeliveryType::NetNew,
            SizeBand::Medium,
            Locale::Us,
        );
        let pricing = PricingContext::new(&inputs, &config);
        let result = estimate_tiered(
            Package::Integrations,
            30,
            &TierMix::new(0.6, 0.3, 0.1),
            1.0,
            &pricing,
        )
        .unwrap();
        assert!(result
            .role_costs
            .iter()
            .all(|c| c.role != "Integration Engineer" && c.role != "Integration Lead"));
        // Simple 1440 × 0.40 + Standard 1440 × 0.50 + Complex 960 × 0.40
        assert!((result.total_hours - (576.0 + 720.0 + 384.0)).abs() < 1e-9);
    }

    #[test]
    fn test_missing_catalog_tier_is_configuration_error() {
        let mut config = Configuration::baseline();
        config
            .addon_catalog
            .retain(|e| !(e.package == Package::Reports && e.tier == Tier::Complex));
        let inputs = EstimationInputs::default();
        let pricing = PricingContext::new(&inputs, &config);
        let err = estimate_tiered(
            Package::Reports,
            40,
            &TierMix::new(0.5, 0.35, 0.15),
            1.0,
            &pricing,
        )
        .unwrap_err();
        assert_eq!(err.key(), "addon_catalog[Reports/Complex]");
    }
}
