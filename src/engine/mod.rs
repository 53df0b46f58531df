//! The estimation pipeline.
//!
//! ```rust
//! use n2s_estimator::config::Configuration;
//! use n2s_estimator::core::EstimationInputs;
//! use n2s_estimator::engine::estimate;
//!
//! let result = estimate(&EstimationInputs::default(), &Configuration::baseline()).unwrap();
//! assert!((result.kpis.total_hours - 6700.0).abs() < 1e-6);
//! ```

pub mod addons;
pub mod base;
pub mod orchestrator;
pub mod presales;
pub mod pricing;
pub mod summary;

pub use base::{apply_sprint0_uplift, compute_base, BaseAllocation, StageAllocation};
pub use orchestrator::{estimate, Estimator};
pub use presales::{presales_fraction, split_presales};
pub use pricing::{expand_and_price, price_role_hours, PricingContext};
