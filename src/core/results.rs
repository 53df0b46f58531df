//! Result structures produced by the estimation pipeline.
//!
//! Everything here is plain data: built once per `estimate` call, serializable,
//! and never mutated afterwards. Reporting collaborators read these tables
//! directly instead of re-deriving numbers.

use serde::{Deserialize, Serialize};

use crate::core::inputs::EstimationInputs;
use crate::core::types::{DeliverySplit, Locale, Package, Tier};
use crate::errors::EstimationWarning;

/// Hours allocated to one stage, split into presales and delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub phase: String,
    pub stage: String,
    /// Stage weight after the Sprint-0 uplift
    pub weight: f64,
    pub hours: f64,
    pub presales_fraction: f64,
    pub presales_hours: f64,
    pub delivery_hours: f64,
}

/// Output of the base estimator and presales splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseEstimate {
    pub baseline_hours: f64,
    pub size_multiplier: f64,
    pub delivery_type_multiplier: f64,
    pub maturity_factor: f64,
    pub sprint0_uplift: f64,
    pub adjusted_total_hours: f64,
    pub stages: Vec<StageResult>,
}

impl BaseEstimate {
    pub fn presales_hours(&self) -> f64 {
        self.stages.iter().map(|s| s.presales_hours).sum()
    }

    pub fn delivery_hours(&self) -> f64 {
        self.stages.iter().map(|s| s.delivery_hours).sum()
    }

    pub fn stage(&self, name: &str) -> Option<&StageResult> {
        self.stages.iter().find(|s| s.stage == name)
    }
}

/// Priced hours for one (package, stage, role, split).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCost {
    /// "Base N2S" or the add-on package label
    pub package: String,
    /// Stage name for the base package, tier label for add-ons
    pub stage: String,
    pub role: String,
    pub locale: Locale,
    pub split: DeliverySplit,
    pub hours: f64,
    pub rate: f64,
    pub cost: f64,
}

/// Hours contributed by one add-on tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub tier: Tier,
    /// Items attributed to this tier (count × tier share; 1 for setup)
    pub items: f64,
    pub unit_hours: f64,
    /// Before cap and package multiplier
    pub raw_hours: f64,
    /// After cap and package multiplier
    pub hours: f64,
}

/// Cap bookkeeping for complexity-scored packages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapSummary {
    pub setup_hours: f64,
    /// PVE hours after clamping
    pub pve_hours: f64,
    pub pre_cap_hours: f64,
    /// Effective cap; `None` when capping is disabled
    pub cap_hours: Option<f64>,
    pub cap_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonResult {
    pub package: Package,
    /// Before cap and package multiplier
    pub raw_hours: f64,
    pub package_multiplier: f64,
    pub total_hours: f64,
    pub cost: f64,
    /// Package multiplier is zero for this product
    pub disabled: bool,
    pub tiers: Vec<TierBreakdown>,
    pub role_costs: Vec<RoleCost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<CapSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_hours: f64,
    pub total_cost: f64,
    pub presales_hours: f64,
    pub delivery_hours: f64,
    pub presales_cost: f64,
    pub delivery_cost: f64,
    /// total_cost / total_hours, reporting only
    pub blended_rate: f64,
    pub presales_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub role: String,
    pub hours: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: String,
    pub hours: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub package: String,
    pub hours: f64,
    pub cost: f64,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySplitSummary {
    pub split: DeliverySplit,
    pub hours: f64,
    pub cost: f64,
    pub hour_share: f64,
    pub cost_share: f64,
}

/// Stage × role grid of base-package hours and costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageRoleMatrix {
    pub stages: Vec<String>,
    pub roles: Vec<String>,
    /// `hours[stage][role]`
    pub hours: Vec<Vec<f64>>,
    /// `cost[stage][role]`
    pub cost: Vec<Vec<f64>>,
}

impl StageRoleMatrix {
    pub fn hours_at(&self, stage: &str, role: &str) -> Option<f64> {
        let s = self.stages.iter().position(|x| x == stage)?;
        let r = self.roles.iter().position(|x| x == role)?;
        Some(self.hours[s][r])
    }

    pub fn cost_at(&self, stage: &str, role: &str) -> Option<f64> {
        let s = self.stages.iter().position(|x| x == stage)?;
        let r = self.roles.iter().position(|x| x == role)?;
        Some(self.cost[s][r])
    }
}

/// Complete output of one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub inputs: EstimationInputs,
    pub base: BaseEstimate,
    pub base_role_costs: Vec<RoleCost>,
    pub addons: Vec<AddonResult>,
    pub kpis: Kpis,
    /// Sorted by cost, descending
    pub role_summary: Vec<RoleSummary>,
    /// Base package stages only
    pub stage_summary: Vec<StageSummary>,
    /// Base stages followed by one row per enabled add-on
    pub all_stage_summary: Vec<StageSummary>,
    pub package_summary: Vec<PackageSummary>,
    pub delivery_split_summary: Vec<DeliverySplitSummary>,
    pub stage_role_matrix: StageRoleMatrix,
    pub warnings: Vec<EstimationWarning>,
}

impl EstimationResult {
    pub fn addon(&self, package: Package) -> Option<&AddonResult> {
        self.addons.iter().find(|a| a.package == package)
    }

    /// Base and add-on role costs, in pipeline order.
    pub fn all_role_costs(&self) -> impl Iterator<Item = &RoleCost> {
        self.base_role_costs
            .iter()
            .chain(self.addons.iter().flat_map(|a| a.role_costs.iter()))
    }
}
