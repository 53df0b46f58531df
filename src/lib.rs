//! Labor-hours and cost estimator for N2S delivery engagements.
//!
//! A pure pipeline turns [`EstimationInputs`] and an immutable
//! [`Configuration`] snapshot into an [`EstimationResult`]: stage hours,
//! presales split, role and delivery-split pricing, add-on packages and
//! summary views.

// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod formatting;
pub mod io;

// Re-export commonly used types
pub use crate::config::Configuration;
pub use crate::core::{
    DeliverySplit, DeliveryType, EstimationInputs, EstimationResult, Locale, Package, Product,
    SizeBand, Tier,
};
pub use crate::engine::{estimate, Estimator};
pub use crate::errors::{EstimationError, EstimationWarning, Result, WarningKind};
