//! Degree Works / PVE package: setup block plus complexity-scored program
//! variant evaluations, clamped to a size-band cap.

use tracing::debug;

use crate::core::inputs::DegreeWorksInputs;
use crate::core::results::{AddonResult, CapSummary, TierBreakdown};
use crate::core::types::{Package, SizeBand, Tier};
use crate::engine::addons::{catalog_rows, expand_tier};
use crate::engine::pricing::PricingContext;
use crate::errors::{EstimationError, Result};

const PACKAGE: Package = Package::DegreeWorks;

struct TierHours {
    tier: Tier,
    items: f64,
    unit_hours: f64,
    raw_hours: f64,
    capped_hours: f64,
}

/// Effective cap for this size band, or `None` when capping is off.
fn resolve_cap(
    dw: &DegreeWorksInputs,
    size: SizeBand,
    pricing: &PricingContext<'_>,
) -> Result<Option<f64>> {
    if !dw.cap_enabled {
        return Ok(None);
    }
    match dw.cap_hours {
        Some(cap) => Ok(Some(cap)),
        None => pricing
            .config
            .addon_cap(PACKAGE, size)
            .map(Some)
            .ok_or_else(|| {
                EstimationError::configuration(
                    format!("addon_caps[{}/{}]", PACKAGE, size),
                    "no default cap for size band",
                )
            }),
    }
}

pub fn estimate_degree_works(
    dw: &DegreeWorksInputs,
    size: SizeBand,
    package_multiplier: f64,
    pricing: &PricingContext<'_>,
) -> Result<AddonResult> {
    if !dw.mix.is_valid() {
        return Err(EstimationError::validation(
            "degree_works.mix",
            format!(
                "complexity fractions must sum to 1.0, got {:.6}",
                dw.mix.total()
            ),
        ));
    }

    let setup_rows = if dw.include_setup {
        catalog_rows(pricing, PACKAGE, Tier::Setup)?
    } else {
        Vec::new()
    };
    let setup_hours = setup_rows.first().map_or(0.0, |row| row.unit_hours);

    let pve_count = dw.effective_pve_count() as f64;
    let mut pve_tiers = Vec::with_capacity(Tier::COMPLEXITY.len());
    for tier in Tier::COMPLEXITY {
        let rows = catalog_rows(pricing, PACKAGE, tier)?;
        let unit_hours = rows[0].unit_hours;
        let items = pve_count * dw.mix.share(tier);
        let raw_hours = items * unit_hours;
        pve_tiers.push((
            rows,
            TierHours {
                tier,
                items,
                unit_hours,
                raw_hours,
                capped_hours: raw_hours,
            },
        ));
    }

    let pve_raw: f64 = pve_tiers.iter().map(|(_, t)| t.raw_hours).sum();
    let pre_cap_hours = setup_hours + pve_raw;

    let cap_hours = resolve_cap(dw, size, pricing)?;
    let mut cap_applied = false;
    if let Some(cap) = cap_hours {
        if cap < setup_hours {
            return Err(EstimationError::validation(
                "degree_works.cap_hours",
                format!("cap {} is below the setup hours {}", cap, setup_hours),
            ));
        }
        if pre_cap_hours > cap {
            // Setup is never reduced; only the PVE portion is clamped.
            let scale = (cap - setup_hours) / pve_raw;
            for (_, t) in pve_tiers.iter_mut() {
                t.capped_hours = t.raw_hours * scale;
            }
            cap_applied = true;
            debug!(pre_cap_hours, cap, scale, "Degree Works cap applied");
        }
    }
    let pve_hours: f64 = pve_tiers.iter().map(|(_, t)| t.capped_hours).sum();

    let disabled = package_multiplier == 0.0;
    let mut tiers = Vec::with_capacity(pve_tiers.len() + 1);
    let mut role_costs = Vec::new();

    if dw.include_setup {
        let hours = if disabled {
            0.0
        } else {
            let (hours, costs) = expand_tier(
                PACKAGE,
                Tier::Setup,
                setup_hours,
                &setup_rows,
                package_multiplier,
                pricing,
            )?;
            role_costs.extend(costs);
            hours
        };
        tiers.push(TierBreakdown {
            tier: Tier::Setup,
            items: 1.0,
            unit_hours: setup_hours,
            raw_hours: setup_hours,
            hours,
        });
    }

    for (rows, t) in &pve_tiers {
        let hours = if disabled {
            0.0
        } else {
            let (hours, costs) = expand_tier(
                PACKAGE,
                t.tier,
                t.capped_hours,
                rows,
                package_multiplier,
                pricing,
            )?;
            role_costs.extend(costs);
            hours
        };
        tiers.push(TierBreakdown {
            tier: t.tier,
            items: t.items,
            unit_hours: t.unit_hours,
            raw_hours: t.raw_hours,
            hours,
        });
    }

    Ok(AddonResult {
        package: PACKAGE,
        raw_hours: pre_cap_hours,
        package_multiplier,
        total_hours: tiers.iter().map(|t| t.hours).sum(),
        cost: role_costs.iter().map(|c| c.cost).sum(),
        disabled,
        tiers,
        role_costs,
        cap: Some(CapSummary {
            setup_hours,
            pve_hours,
            pre_cap_hours,
            cap_hours,
            cap_applied,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tables::Configuration;
    use crate::core::inputs::EstimationInputs;

    fn inputs_with_majors(majors: u32) -> DegreeWorksInputs {
        DegreeWorksInputs {
            majors,
            ..DegreeWorksInputs::default()
        }
    }

    fn run(dw: &DegreeWorksInputs, size: SizeBand, multiplier: f64) -> Result<AddonResult> {
        let config = Configuration::baseline();
        let inputs = EstimationInputs::default();
        let pricing = PricingContext::new(&inputs, &config);
        estimate_degree_works(dw, size, multiplier, &pricing)
    }

    #[test]
    fn test_under_cap_keeps_raw_hours() {
        // 10 PVEs: 5 × 6 + 3.5 × 12 + 1.5 × 24 = 108, plus 120 setup.
        let result = run(&inputs_with_majors(10), SizeBand::Medium, 1.0).unwrap();
        let cap = result.cap.unwrap();
        assert!(!cap.cap_applied);
        assert!((cap.pre_cap_hours - 228.0).abs() < 1e-9);
        assert!((result.total_hours - 228.0).abs() < 1e-9);
        assert_eq!(cap.cap_hours, Some(400.0));
    }

    #[test]
    fn test_cap_clamps_pve_and_preserves_setup() {
        let result = run(&inputs_with_majors(100), SizeBand::Small, 1.0).unwrap();
        let cap = result.cap.unwrap();
        assert!(cap.cap_applied);
        assert_eq!(cap.setup_hours, 120.0);
        assert!((cap.setup_hours + cap.pve_hours - 300.0).abs() < 1e-9);
        assert!((result.total_hours - 300.0).abs() < 1e-9);
        assert!((cap.pre_cap_hours - (120.0 + 1080.0)).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_cap_overrides_size_default() {
        let dw = DegreeWorksInputs {
            cap_hours: Some(200.0),
            ..inputs_with_majors(100)
        };
        let result = run(&dw, SizeBand::VeryLarge, 1.0).unwrap();
        assert!((result.total_hours - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_below_setup_is_validation_error() {
        let dw = DegreeWorksInputs {
            cap_hours: Some(100.0),
            ..inputs_with_majors(5)
        };
        let err = run(&dw, SizeBand::Medium, 1.0).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.key(), "degree_works.cap_hours");
    }

    #[test]
    fn test_cap_disabled_reports_no_cap() {
        let dw = DegreeWorksInputs {
            cap_enabled: false,
            ..inputs_with_majors(100)
        };
        let result = run(&dw, SizeBand::Small, 1.0).unwrap();
        let cap = result.cap.unwrap();
        assert_eq!(cap.cap_hours, None);
        assert!((result.total_hours - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_pve_count_bypasses_calculator() {
        let dw = DegreeWorksInputs {
            use_pve_calculator: false,
            pve_count: 10,
            include_setup: false,
            ..inputs_with_majors(999)
        };
        let result = run(&dw, SizeBand::Medium, 1.0).unwrap();
        assert!((result.total_hours - 108.0).abs() < 1e-9);
        assert!(result.tiers.iter().all(|t| t.tier != Tier::Setup));
    }

    #[test]
    fn test_zero_multiplier_disables_package() {
        let result = run(&inputs_with_majors(10), SizeBand::Medium, 0.0).unwrap();
        assert!(result.disabled);
        assert_eq!(result.total_hours, 0.0);
        assert!((result.raw_hours - 228.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_cap_default_is_configuration_error() {
        let mut config = Configuration::baseline();
        config.addon_caps.clear();
        let inputs = EstimationInputs::default();
        let pricing = PricingContext::new(&inputs, &config);
        let err =
            estimate_degree_works(&inputs_with_majors(1), SizeBand::Large, 1.0, &pricing)
                .unwrap_err();
        assert_eq!(err.key(), "addon_caps[Degree Works/Large]");
    }
}
