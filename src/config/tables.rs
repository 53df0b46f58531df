//! The configuration snapshot consumed by the estimation core.
//!
//! A [`Configuration`] is built once by the loader (or from the compiled
//! baseline), validated, and then shared read-only by every estimate. Nothing
//! in the core mutates it; refreshing configuration means publishing a new
//! snapshot.
//!
//! Fractions are stored as 0-1 values. Aggregate "Total" rows are removed at
//! the loader boundary and never reach these tables.

use serde::{Deserialize, Serialize};

use crate::core::mix::SplitMix;
use crate::core::types::{DeliveryType, DeliverySplit, Locale, Package, Product, SizeBand, Tier};

/// Default relative/absolute deviation that triggers a drift warning.
pub fn default_drift_threshold() -> f64 {
    0.10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Hours of the reference engagement before any multiplier
    pub baseline_hours: f64,

    #[serde(default = "default_drift_threshold")]
    pub drift_threshold: f64,

    pub stage_weights: Vec<StageWeight>,

    #[serde(default)]
    pub stage_presales: Vec<StagePresales>,

    #[serde(default)]
    pub activities: Vec<Activity>,

    pub role_mix: Vec<RoleMix>,

    pub rates: Vec<RateCard>,

    pub delivery_mix: Vec<DeliveryMix>,

    #[serde(default)]
    pub addon_catalog: Vec<AddonCatalogEntry>,

    #[serde(default)]
    pub product_role_map: Vec<ProductRoleToggle>,

    #[serde(default)]
    pub size_multipliers: Vec<SizeMultiplier>,

    #[serde(default)]
    pub product_multipliers: Vec<ProductMultiplier>,

    #[serde(default)]
    pub product_package_multipliers: Vec<ProductPackageMultiplier>,

    #[serde(default)]
    pub addon_caps: Vec<AddonCap>,

    /// Alternate role spellings, resolved by the loader
    #[serde(default)]
    pub role_aliases: Vec<RoleAlias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageWeight {
    pub phase: String,
    pub stage: String,
    pub weight: f64,
}

/// Presales fraction used when a stage has no activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagePresales {
    pub stage: String,
    pub default_fraction: f64,
}

/// Weighted activity within a stage, flagged presales or delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub stage: String,
    pub activity: String,
    pub weight: f64,
    pub is_presales: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMix {
    pub stage: String,
    pub role: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    pub role: String,
    pub locale: Locale,
    pub onshore: f64,
    pub offshore: f64,
    pub partner: f64,
}

impl RateCard {
    pub fn rate(&self, split: DeliverySplit) -> f64 {
        match split {
            DeliverySplit::Onshore => self.onshore,
            DeliverySplit::Offshore => self.offshore,
            DeliverySplit::Partner => self.partner,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.onshore, self.offshore, self.partner]
            .iter()
            .all(|r| r.is_finite() && *r > 0.0)
    }
}

/// Delivery mix row. `role == None` is the global mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMix {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub onshore: f64,
    pub offshore: f64,
    pub partner: f64,
}

impl DeliveryMix {
    pub fn mix(&self) -> SplitMix {
        SplitMix::new(self.onshore, self.offshore, self.partner)
    }
}

/// One role's share of one add-on tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonCatalogEntry {
    pub package: Package,
    pub tier: Tier,
    pub unit_hours: f64,
    pub role: String,
    pub role_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRoleToggle {
    pub role: String,
    /// Products this role is staffed on
    pub enabled_for: Vec<Product>,
    #[serde(default = "unit_multiplier")]
    pub multiplier: f64,
}

impl ProductRoleToggle {
    pub fn is_enabled(&self, product: Product) -> bool {
        self.enabled_for.contains(&product)
    }
}

fn unit_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeMultiplier {
    pub size: SizeBand,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMultiplier {
    pub product: Product,
    pub delivery_type: DeliveryType,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPackageMultiplier {
    pub product: Product,
    pub package: Package,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonCap {
    pub package: Package,
    pub size: SizeBand,
    pub cap_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAlias {
    pub alias: String,
    pub canonical: String,
}

// Read-only lookups. Linear scans are fine: tables hold tens of rows.
impl Configuration {
    /// Stage names in configured order.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stage_weights.iter().map(|sw| sw.stage.as_str())
    }

    pub fn stage_weight(&self, stage: &str) -> Option<&StageWeight> {
        self.stage_weights.iter().find(|sw| sw.stage == stage)
    }

    pub fn role_mix_for<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a RoleMix> + 'a {
        self.role_mix.iter().filter(move |rm| rm.stage == stage)
    }

    pub fn activities_for<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a Activity> + 'a {
        self.activities.iter().filter(move |a| a.stage == stage)
    }

    pub fn stage_presales_default(&self, stage: &str) -> Option<f64> {
        self.stage_presales
            .iter()
            .find(|sp| sp.stage == stage)
            .map(|sp| sp.default_fraction)
    }

    pub fn rate(&self, role: &str, locale: Locale) -> Option<&RateCard> {
        self.rates
            .iter()
            .find(|r| r.role == role && r.locale == locale)
    }

    pub fn global_delivery_mix(&self) -> Option<&DeliveryMix> {
        self.delivery_mix.iter().find(|dm| dm.role.is_none())
    }

    pub fn role_delivery_mix(&self, role: &str) -> Option<&DeliveryMix> {
        self.delivery_mix
            .iter()
            .find(|dm| dm.role.as_deref() == Some(role))
    }

    pub fn product_role(&self, role: &str) -> Option<&ProductRoleToggle> {
        self.product_role_map.iter().find(|t| t.role == role)
    }

    /// Catalog rows for one (package, tier), in table order.
    pub fn catalog_tier(&self, package: Package, tier: Tier) -> Vec<&AddonCatalogEntry> {
        self.addon_catalog
            .iter()
            .filter(|e| e.package == package && e.tier == tier)
            .collect()
    }

    pub fn addon_cap(&self, package: Package, size: SizeBand) -> Option<f64> {
        self.addon_caps
            .iter()
            .find(|c| c.package == package && c.size == size)
            .map(|c| c.cap_hours)
    }
}
