//! Configuration tables and their boundary: compiled baseline, file loader,
//! validation, drift check and multiplier resolution.

pub mod defaults;
pub mod drift;
pub mod loader;
pub mod multipliers;
pub mod tables;
pub mod validation;

pub use drift::check_drift;
pub use loader::{find_config_file, load_configuration, load_or_baseline, load_scenario};
pub use multipliers::{
    ConfiguredMultipliers, DefaultMultipliers, LayeredMultipliers, MultiplierSource,
};
pub use tables::{
    Activity, AddonCap, AddonCatalogEntry, Configuration, DeliveryMix, ProductMultiplier,
    ProductPackageMultiplier, ProductRoleToggle, RateCard, RoleAlias, RoleMix, SizeMultiplier,
    StagePresales, StageWeight,
};
pub use validation::{validate_configuration, validate_configuration_result};
