//! Role expansion and pricing.
//!
//! [`price_role_hours`] is the only place hours become money. The base
//! package and every add-on route through it, so delivery-mix precedence,
//! rate overrides and the missing-rate policy are identical everywhere.

use tracing::debug;

use crate::config::tables::{Configuration, DeliveryMix, RateCard};
use crate::core::inputs::EstimationInputs;
use crate::core::mix::SplitMix;
use crate::core::results::{RoleCost, StageResult};
use crate::core::types::{DeliverySplit, Locale, Product, BASE_PACKAGE};
use crate::errors::{EstimationError, Result};

/// Everything pricing needs besides the hours themselves.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    pub config: &'a Configuration,
    pub product: Product,
    pub locale: Locale,
    rate_overrides: &'a [RateCard],
    global_mix_override: Option<SplitMix>,
    role_mix_overrides: &'a [DeliveryMix],
}

impl<'a> PricingContext<'a> {
    pub fn new(inputs: &'a EstimationInputs, config: &'a Configuration) -> Self {
        Self {
            config,
            product: inputs.product,
            locale: inputs.locale,
            rate_overrides: &inputs.rate_overrides,
            global_mix_override: inputs.global_mix_override,
            role_mix_overrides: &inputs.role_mix_overrides,
        }
    }

    /// Effective delivery mix for a role.
    ///
    /// Precedence: input role override, configured role mix, input global
    /// override, configured global mix.
    pub fn delivery_mix(&self, role: &str) -> Result<SplitMix> {
        if let Some(dm) = self
            .role_mix_overrides
            .iter()
            .find(|dm| dm.role.as_deref() == Some(role))
        {
            return Ok(dm.mix());
        }
        if let Some(dm) = self.config.role_delivery_mix(role) {
            return Ok(dm.mix());
        }
        if let Some(mix) = self.global_mix_override {
            return Ok(mix);
        }
        self.config
            .global_delivery_mix()
            .map(DeliveryMix::mix)
            .ok_or_else(|| {
                EstimationError::configuration("delivery_mix[global]", "no global delivery mix row")
            })
    }

    /// Rate card for a role in the active locale. Overrides win.
    pub fn rate_card(&self, role: &str) -> Result<&'a RateCard> {
        self.rate_overrides
            .iter()
            .find(|r| r.role == role && r.locale == self.locale)
            .or_else(|| self.config.rate(role, self.locale))
            .ok_or_else(|| {
                EstimationError::configuration(
                    format!("rates[{}/{}]", role, self.locale),
                    "no rate card row for role and locale",
                )
            })
    }

    /// Product role multiplier, or `None` when the role is disabled for the
    /// active product. An empty role map enables every role at 1.0.
    pub fn role_factor(&self, role: &str) -> Result<Option<f64>> {
        if self.config.product_role_map.is_empty() {
            return Ok(Some(1.0));
        }
        let toggle = self.config.product_role(role).ok_or_else(|| {
            EstimationError::configuration(
                format!("product_role_map[{}]", role),
                "role is not listed in the product role map",
            )
        })?;
        Ok(toggle
            .is_enabled(self.product)
            .then_some(toggle.multiplier))
    }
}

/// Price `hours` of `role` across the delivery splits.
///
/// Zero-hour splits are omitted. A missing rate fails even when `hours` is zero.
pub fn price_role_hours(
    package: &str,
    stage: &str,
    role: &str,
    hours: f64,
    pricing: &PricingContext<'_>,
) -> Result<Vec<RoleCost>> {
    let card = pricing.rate_card(role)?;
    let mix = pricing.delivery_mix(role)?;

    Ok(DeliverySplit::ALL
        .iter()
        .filter_map(|split| {
            let split_hours = hours * mix.share(*split);
            if split_hours == 0.0 {
                return None;
            }
            let rate = card.rate(*split);
            Some(RoleCost {
                package: package.to_string(),
                stage: stage.to_string(),
                role: role.to_string(),
                locale: pricing.locale,
                split: *split,
                hours: split_hours,
                rate,
                cost: split_hours * rate,
            })
        })
        .collect())
}

/// Expand each stage's delivery hours to roles and price them.
///
/// Roles disabled for the product are dropped, not redistributed.
pub fn expand_and_price(
    stages: &[StageResult],
    pricing: &PricingContext<'_>,
) -> Result<Vec<RoleCost>> {
    let mut costs = Vec::new();
    for stage in stages {
        for rm in pricing.config.role_mix_for(&stage.stage) {
            let Some(factor) = pricing.role_factor(&rm.role)? else {
                debug!(role = %rm.role, product = %pricing.product, "role disabled for product");
                continue;
            };
            let hours = stage.delivery_hours * rm.fraction * factor;
            costs.extend(price_role_hours(
                BASE_PACKAGE,
                &stage.stage,
                &rm.role,
                hours,
                pricing,
            )?);
        }
    }
    debug!(rows = costs.len(), "base package priced");
    Ok(costs)
}
