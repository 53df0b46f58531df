//! Data contracts of the estimator: vocabularies, mixes, inputs and results.

pub mod inputs;
pub mod mix;
pub mod results;
pub mod types;

pub use inputs::{default_sprint0_uplift, DegreeWorksInputs, EstimationInputs};
pub use mix::{SplitMix, TierMix, MIX_EPSILON};
pub use results::{
    AddonResult, BaseEstimate, CapSummary, DeliverySplitSummary, EstimationResult, Kpis,
    PackageSummary, RoleCost, RoleSummary, StageResult, StageRoleMatrix, StageSummary,
    TierBreakdown,
};
pub use types::{DeliverySplit, DeliveryType, Locale, Package, Product, SizeBand, Tier};
