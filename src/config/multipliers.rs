//! Multiplier resolution.
//!
//! The base estimate and the add-ons never read multiplier tables directly.
//! They ask a [`MultiplierSource`]; the pipeline uses [`LayeredMultipliers`]
//! over the loaded snapshot and the compiled defaults, so a missing table row
//! falls back to the methodology value and the fallback is reported.

use tracing::warn;

use crate::config::defaults::{
    default_delivery_type_multiplier, default_package_multiplier, default_size_multiplier,
};
use crate::config::tables::Configuration;
use crate::core::types::{DeliveryType, Package, Product, SizeBand};
use crate::errors::{EstimationError, EstimationWarning, Result};

/// A lookup table of estimation multipliers.
pub trait MultiplierSource {
    fn multiplier_for(&self, product: Product, delivery_type: DeliveryType) -> Option<f64>;

    fn size_multiplier(&self, size: SizeBand) -> Option<f64>;

    fn package_multiplier(&self, product: Product, package: Package) -> Option<f64>;
}

/// Reads the loaded configuration snapshot.
pub struct ConfiguredMultipliers<'a> {
    config: &'a Configuration,
}

impl<'a> ConfiguredMultipliers<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }
}

impl MultiplierSource for ConfiguredMultipliers<'_> {
    fn multiplier_for(&self, product: Product, delivery_type: DeliveryType) -> Option<f64> {
        self.config
            .product_multipliers
            .iter()
            .find(|m| m.product == product && m.delivery_type == delivery_type)
            .map(|m| m.multiplier)
    }

    fn size_multiplier(&self, size: SizeBand) -> Option<f64> {
        self.config
            .size_multipliers
            .iter()
            .find(|m| m.size == size)
            .map(|m| m.multiplier)
    }

    fn package_multiplier(&self, product: Product, package: Package) -> Option<f64> {
        self.config
            .product_package_multipliers
            .iter()
            .find(|m| m.product == product && m.package == package)
            .map(|m| m.multiplier)
    }
}

/// Compiled methodology defaults. Total over every key.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMultipliers;

impl MultiplierSource for DefaultMultipliers {
    fn multiplier_for(&self, product: Product, delivery_type: DeliveryType) -> Option<f64> {
        Some(default_delivery_type_multiplier(product, delivery_type))
    }

    fn size_multiplier(&self, size: SizeBand) -> Option<f64> {
        Some(default_size_multiplier(size))
    }

    fn package_multiplier(&self, product: Product, package: Package) -> Option<f64> {
        Some(default_package_multiplier(product, package))
    }
}

/// Tries `primary`, then `fallback`. Every fallback is logged and recorded.
pub struct LayeredMultipliers<P, F> {
    primary: P,
    fallback: F,
}

impl<'a> LayeredMultipliers<ConfiguredMultipliers<'a>, DefaultMultipliers> {
    /// The pipeline's standard resolution: configured table, then defaults.
    pub fn for_config(config: &'a Configuration) -> Self {
        Self::new(ConfiguredMultipliers::new(config), DefaultMultipliers)
    }
}

impl<P: MultiplierSource, F: MultiplierSource> LayeredMultipliers<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn resolve_delivery_type(
        &self,
        product: Product,
        delivery_type: DeliveryType,
        warnings: &mut Vec<EstimationWarning>,
    ) -> Result<f64> {
        let key = format!("product_multipliers[{}/{}]", product, delivery_type);
        self.resolve(
            key,
            self.primary.multiplier_for(product, delivery_type),
            || self.fallback.multiplier_for(product, delivery_type),
            warnings,
        )
    }

    pub fn resolve_size(
        &self,
        size: SizeBand,
        warnings: &mut Vec<EstimationWarning>,
    ) -> Result<f64> {
        let key = format!("size_multipliers[{}]", size);
        self.resolve(
            key,
            self.primary.size_multiplier(size),
            || self.fallback.size_multiplier(size),
            warnings,
        )
    }

    pub fn resolve_package(
        &self,
        product: Product,
        package: Package,
        warnings: &mut Vec<EstimationWarning>,
    ) -> Result<f64> {
        let key = format!("product_package_multipliers[{}/{}]", product, package);
        self.resolve(
            key,
            self.primary.package_multiplier(product, package),
            || self.fallback.package_multiplier(product, package),
            warnings,
        )
    }

    fn resolve(
        &self,
        key: String,
        primary: Option<f64>,
        fallback: impl FnOnce() -> Option<f64>,
        warnings: &mut Vec<EstimationWarning>,
    ) -> Result<f64> {
        if let Some(value) = primary {
            return checked(key, value);
        }
        match fallback() {
            Some(value) => {
                warn!(key = %key, value, "multiplier missing from configuration, using default");
                warnings.push(EstimationWarning::default_applied(
                    key.clone(),
                    format!("not configured; using default {}", value),
                ));
                checked(key, value)
            }
            None => Err(EstimationError::configuration(
                key,
                "no configured or default multiplier",
            )),
        }
    }
}

fn checked(key: String, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EstimationError::configuration(
            key,
            format!("multiplier must be finite and non-negative, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WarningKind;

    #[test]
    fn test_configured_value_wins_without_warning() {
        let mut config = Configuration::baseline();
        config.size_multipliers[1].multiplier = 1.1;
        let layered = LayeredMultipliers::for_config(&config);
        let mut warnings = Vec::new();
        let m = layered.resolve_size(SizeBand::Medium, &mut warnings).unwrap();
        assert_eq!(m, 1.1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_row_falls_back_with_warning() {
        let mut config = Configuration::baseline();
        config.product_package_multipliers.clear();
        let layered = LayeredMultipliers::for_config(&config);
        let mut warnings = Vec::new();
        let m = layered
            .resolve_package(Product::Colleague, Package::Reports, &mut warnings)
            .unwrap();
        assert_eq!(m, 0.90);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::DefaultApplied);
        assert_eq!(
            warnings[0].subject,
            "product_package_multipliers[Colleague/Reports]"
        );
    }

    struct Empty;

    impl MultiplierSource for Empty {
        fn multiplier_for(&self, _: Product, _: DeliveryType) -> Option<f64> {
            None
        }
        fn size_multiplier(&self, _: SizeBand) -> Option<f64> {
            None
        }
        fn package_multiplier(&self, _: Product, _: Package) -> Option<f64> {
            None
        }
    }

    #[test]
    fn test_no_source_is_configuration_error() {
        let layered = LayeredMultipliers::new(Empty, Empty);
        let mut warnings = Vec::new();
        let err = layered
            .resolve_delivery_type(Product::Banner, DeliveryType::NetNew, &mut warnings)
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.key(), "product_multipliers[Banner/Net New]");
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let mut config = Configuration::baseline();
        config.size_multipliers[0].multiplier = -1.0;
        let layered = LayeredMultipliers::for_config(&config);
        assert!(layered
            .resolve_size(SizeBand::Small, &mut Vec::new())
            .is_err());
    }
}
