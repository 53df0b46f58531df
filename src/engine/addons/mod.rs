//! Add-on package calculators.
//!
//! Each add-on is independent of the base package and of the other add-ons.
//! They share only the pricing context (product, locale, rates, mixes).

pub mod degree_works;
pub mod tiered;

use tracing::debug;

use crate::config::multipliers::{LayeredMultipliers, MultiplierSource};
use crate::config::tables::AddonCatalogEntry;
use crate::core::inputs::EstimationInputs;
use crate::core::results::{AddonResult, RoleCost};
use crate::core::types::{Package, Tier};
use crate::engine::pricing::{price_role_hours, PricingContext};
use crate::errors::{EstimationError, EstimationWarning, Result};

pub use degree_works::estimate_degree_works;
pub use tiered::estimate_tiered;

/// Catalog rows for one tier, failing when the tier is not configured.
pub(crate) fn catalog_rows<'a>(
    pricing: &PricingContext<'a>,
    package: Package,
    tier: Tier,
) -> Result<Vec<&'a AddonCatalogEntry>> {
    let rows = pricing.config.catalog_tier(package, tier);
    if rows.is_empty() {
        return Err(EstimationError::configuration(
            format!("addon_catalog[{}/{}]", package, tier),
            "no catalog rows for package tier",
        ));
    }
    Ok(rows)
}

/// Distribute `tier_hours` across the tier's catalog roles and price them.
///
/// Applies the product role filter, then the package multiplier. Returns the
/// hours actually priced and the role costs.
pub(crate) fn expand_tier(
    package: Package,
    tier: Tier,
    tier_hours: f64,
    rows: &[&AddonCatalogEntry],
    package_multiplier: f64,
    pricing: &PricingContext<'_>,
) -> Result<(f64, Vec<RoleCost>)> {
    let mut priced_hours = 0.0;
    let mut costs = Vec::new();
    for row in rows {
        let Some(factor) = pricing.role_factor(&row.role)? else {
            continue;
        };
        let hours = tier_hours * row.role_fraction * factor * package_multiplier;
        priced_hours += hours;
        costs.extend(price_role_hours(
            package.as_str(),
            tier.as_str(),
            &row.role,
            hours,
            pricing,
        )?);
    }
    Ok((priced_hours, costs))
}

/// Run every enabled add-on in package order.
///
/// Package multipliers are resolved for all enabled packages before any
/// add-on is priced.
pub fn estimate_addons<P, F>(
    inputs: &EstimationInputs,
    pricing: &PricingContext<'_>,
    multipliers: &LayeredMultipliers<P, F>,
    warnings: &mut Vec<EstimationWarning>,
) -> Result<Vec<AddonResult>>
where
    P: MultiplierSource,
    F: MultiplierSource,
{
    let enabled: Vec<Package> = Package::ALL
        .iter()
        .copied()
        .filter(|package| match package {
            Package::Integrations => inputs.include_integrations,
            Package::Reports => inputs.include_reports,
            Package::DegreeWorks => inputs.include_degree_works,
        })
        .collect();

    let mut resolved = Vec::with_capacity(enabled.len());
    for package in enabled {
        let multiplier = multipliers.resolve_package(inputs.product, package, warnings)?;
        resolved.push((package, multiplier));
    }

    let mut results = Vec::with_capacity(resolved.len());
    for (package, multiplier) in resolved {
        let result = match package {
            Package::Integrations => estimate_tiered(
                package,
                inputs.integrations_count,
                &inputs.integrations_mix,
                multiplier,
                pricing,
            )?,
            Package::Reports => estimate_tiered(
                package,
                inputs.reports_count,
                &inputs.reports_mix,
                multiplier,
                pricing,
            )?,
            Package::DegreeWorks => estimate_degree_works(
                &inputs.degree_works,
                inputs.size_band,
                multiplier,
                pricing,
            )?,
        };
        debug!(
            package = %package,
            raw_hours = result.raw_hours,
            total_hours = result.total_hours,
            disabled = result.disabled,
            "add-on estimated"
        );
        results.push(result);
    }
    Ok(results)
}
