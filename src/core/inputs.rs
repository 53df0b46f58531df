//! Caller-supplied estimation parameters.
//!
//! `product`, `delivery_type`, `size_band` and `locale` are required when
//! deserializing; every other field carries a documented default so older or
//! partial scenario files still load. Anything that does not deserialize is
//! rejected with a serde error rather than guessed at.

use serde::{Deserialize, Serialize};

use crate::config::tables::{DeliveryMix, RateCard};
use crate::core::mix::{SplitMix, TierMix};
use crate::core::types::{DeliveryType, Locale, Product, SizeBand};
use crate::errors::{EstimationError, EstimationWarning, Result};

/// Smallest accepted maturity factor.
pub const MIN_MATURITY_FACTOR: f64 = 0.5;
/// Largest accepted maturity factor.
pub const MAX_MATURITY_FACTOR: f64 = 2.0;
/// Largest accepted Sprint-0 uplift (as a fraction of total weight).
pub const MAX_SPRINT_ZERO_UPLIFT: f64 = 0.10;
/// Counts above this are legal but flagged.
pub const ADVISORY_COUNT: u32 = 1000;

/// Uplift a UI should preselect for the delivery type.
///
/// The input field itself defaults to zero so that the business baseline
/// reproduces unchanged; collaborators that want the methodology default call
/// this or [`EstimationInputs::with_default_uplift`].
pub fn default_sprint0_uplift(delivery_type: DeliveryType) -> f64 {
    match delivery_type {
        DeliveryType::NetNew => 0.02,
        DeliveryType::Modernization => 0.01,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationInputs {
    pub product: Product,
    pub delivery_type: DeliveryType,
    pub size_band: SizeBand,
    pub locale: Locale,

    /// Fraction added to the Sprint 0 stage weight (0.0-0.10)
    #[serde(default)]
    pub sprint0_uplift: f64,

    /// Team maturity scaling applied to the adjusted total (0.5-2.0)
    #[serde(default = "default_maturity_factor")]
    pub maturity_factor: f64,

    #[serde(default)]
    pub include_integrations: bool,
    #[serde(default = "default_integrations_count")]
    pub integrations_count: u32,
    #[serde(default = "default_integrations_mix")]
    pub integrations_mix: TierMix,

    #[serde(default)]
    pub include_reports: bool,
    #[serde(default = "default_reports_count")]
    pub reports_count: u32,
    #[serde(default = "default_reports_mix")]
    pub reports_mix: TierMix,

    #[serde(default)]
    pub include_degree_works: bool,
    #[serde(default)]
    pub degree_works: DegreeWorksInputs,

    /// Replace configured rate rows for the same (role, locale)
    #[serde(default)]
    pub rate_overrides: Vec<RateCard>,

    /// Replaces the configured global delivery mix
    #[serde(default)]
    pub global_mix_override: Option<SplitMix>,

    /// Per-role delivery mix, taking precedence over every other mix
    #[serde(default)]
    pub role_mix_overrides: Vec<DeliveryMix>,
}

/// Degree Works / PVE parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeWorksInputs {
    pub include_setup: bool,
    /// Derive the PVE count from program counts instead of `pve_count`
    pub use_pve_calculator: bool,
    pub majors: u32,
    pub minors: u32,
    pub certificates: u32,
    pub concentrations: u32,
    pub catalog_years: u32,
    pub pve_count: u32,
    pub mix: TierMix,
    pub cap_enabled: bool,
    /// Explicit cap; `None` uses the size-band default
    pub cap_hours: Option<f64>,
}

impl Default for DegreeWorksInputs {
    fn default() -> Self {
        Self {
            include_setup: true,
            use_pve_calculator: true,
            majors: 0,
            minors: 0,
            certificates: 0,
            concentrations: 0,
            catalog_years: 1,
            pve_count: 0,
            mix: TierMix::new(0.50, 0.35, 0.15),
            cap_enabled: true,
            cap_hours: None,
        }
    }
}

impl DegreeWorksInputs {
    /// Number of program variant evaluations to build.
    pub fn effective_pve_count(&self) -> u64 {
        if self.use_pve_calculator {
            let programs = u64::from(self.majors)
                + u64::from(self.minors)
                + u64::from(self.certificates)
                + u64::from(self.concentrations);
            programs * u64::from(self.catalog_years)
        } else {
            u64::from(self.pve_count)
        }
    }
}

fn default_maturity_factor() -> f64 {
    1.0
}
fn default_integrations_count() -> u32 {
    30
}
fn default_integrations_mix() -> TierMix {
    TierMix::new(0.60, 0.30, 0.10)
}
fn default_reports_count() -> u32 {
    40
}
fn default_reports_mix() -> TierMix {
    TierMix::new(0.50, 0.35, 0.15)
}

impl Default for EstimationInputs {
    fn default() -> Self {
        Self::new(
            Product::Banner,
            DeliveryType::NetNew,
            SizeBand::Medium,
            Locale::Us,
        )
    }
}

impl EstimationInputs {
    /// Inputs for the required fields with every optional field at its default.
    pub fn new(
        product: Product,
        delivery_type: DeliveryType,
        size_band: SizeBand,
        locale: Locale,
    ) -> Self {
        Self {
            product,
            delivery_type,
            size_band,
            locale,
            sprint0_uplift: 0.0,
            maturity_factor: default_maturity_factor(),
            include_integrations: false,
            integrations_count: default_integrations_count(),
            integrations_mix: default_integrations_mix(),
            include_reports: false,
            reports_count: default_reports_count(),
            reports_mix: default_reports_mix(),
            include_degree_works: false,
            degree_works: DegreeWorksInputs::default(),
            rate_overrides: Vec::new(),
            global_mix_override: None,
            role_mix_overrides: Vec::new(),
        }
    }

    /// Apply the delivery-type methodology uplift.
    pub fn with_default_uplift(mut self) -> Self {
        self.sprint0_uplift = default_sprint0_uplift(self.delivery_type);
        self
    }

    /// Check every input invariant, failing on the first violation.
    ///
    /// Returns advisories for legal but unusual values.
    pub fn validate(&self) -> Result<Vec<EstimationWarning>> {
        validate_range(
            "maturity_factor",
            self.maturity_factor,
            MIN_MATURITY_FACTOR,
            MAX_MATURITY_FACTOR,
        )?;
        validate_range(
            "sprint0_uplift",
            self.sprint0_uplift,
            0.0,
            MAX_SPRINT_ZERO_UPLIFT,
        )?;

        validate_tier_mix("integrations_mix", &self.integrations_mix)?;
        validate_tier_mix("reports_mix", &self.reports_mix)?;
        validate_degree_works(&self.degree_works)?;

        for rate in &self.rate_overrides {
            let field = format!("rate_overrides[{}/{}]", rate.role, rate.locale);
            if !rate.is_valid() {
                return Err(EstimationError::validation(
                    field,
                    "rates must be finite and greater than 0",
                ));
            }
        }

        if let Some(global) = &self.global_mix_override {
            validate_split_mix("global_mix_override", global)?;
        }
        for dm in &self.role_mix_overrides {
            let field = match &dm.role {
                Some(role) => format!("role_mix_overrides[{}]", role),
                None => "role_mix_overrides[global]".to_string(),
            };
            if dm.role.is_none() {
                return Err(EstimationError::validation(
                    field,
                    "role override must name a role; use global_mix_override instead",
                ));
            }
            validate_split_mix(&field, &dm.mix())?;
        }

        Ok(self.advisories())
    }

    fn advisories(&self) -> Vec<EstimationWarning> {
        let counts = [
            ("integrations_count", self.integrations_count),
            ("reports_count", self.reports_count),
        ];
        counts
            .into_iter()
            .filter(|(_, count)| *count > ADVISORY_COUNT)
            .map(|(field, count)| {
                EstimationWarning::advisory(field, format!("count ({}) seems very high", count))
            })
            .collect()
    }
}

fn validate_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EstimationError::validation(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ))
    }
}

fn validate_tier_mix(field: &str, mix: &TierMix) -> Result<()> {
    if mix.is_valid() {
        Ok(())
    } else {
        Err(EstimationError::validation(
            field,
            format!(
                "tier fractions must each be in [0, 1] and sum to 1.0, got {:.6}",
                mix.total()
            ),
        ))
    }
}

fn validate_split_mix(field: &str, mix: &SplitMix) -> Result<()> {
    if mix.is_valid() {
        Ok(())
    } else {
        Err(EstimationError::validation(
            field,
            format!(
                "onshore + offshore + partner must each be in [0, 1] and sum to 1.0, got {:.6}",
                mix.total()
            ),
        ))
    }
}

fn validate_degree_works(dw: &DegreeWorksInputs) -> Result<()> {
    validate_tier_mix("degree_works.mix", &dw.mix)?;

    if dw.use_pve_calculator && dw.catalog_years == 0 {
        return Err(EstimationError::validation(
            "degree_works.catalog_years",
            "must be at least 1 when the PVE calculator is used",
        ));
    }

    if let Some(cap) = dw.cap_hours {
        if !cap.is_finite() || cap <= 0.0 {
            return Err(EstimationError::validation(
                "degree_works.cap_hours",
                format!("must be greater than 0, got {}", cap),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let inputs = EstimationInputs::default();
        assert_eq!(inputs.validate(), Ok(vec![]));
        assert_eq!(inputs.sprint0_uplift, 0.0);
    }

    #[test]
    fn test_default_uplift_follows_delivery_type() {
        let net_new = EstimationInputs::default().with_default_uplift();
        assert_eq!(net_new.sprint0_uplift, 0.02);

        let mut modernization = EstimationInputs::default();
        modernization.delivery_type = DeliveryType::Modernization;
        assert_eq!(modernization.with_default_uplift().sprint0_uplift, 0.01);
    }

    #[test]
    fn test_tier_mix_not_summing_to_one_is_rejected() {
        let mut inputs = EstimationInputs::default();
        inputs.reports_mix = TierMix::new(0.5, 0.35, 0.25);
        let err = inputs.validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.key(), "reports_mix");
    }

    #[test]
    fn test_maturity_factor_out_of_range_is_rejected() {
        let mut inputs = EstimationInputs::default();
        inputs.maturity_factor = 2.5;
        assert_eq!(inputs.validate().unwrap_err().key(), "maturity_factor");

        inputs.maturity_factor = f64::NAN;
        assert_eq!(inputs.validate().unwrap_err().key(), "maturity_factor");
    }

    #[test]
    fn test_large_counts_produce_advisories() {
        let mut inputs = EstimationInputs::default();
        inputs.integrations_count = 1500;
        let warnings = inputs.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].subject, "integrations_count");
    }

    #[test]
    fn test_role_override_without_role_is_rejected() {
        let mut inputs = EstimationInputs::default();
        inputs.role_mix_overrides.push(DeliveryMix {
            role: None,
            onshore: 0.7,
            offshore: 0.2,
            partner: 0.1,
        });
        assert!(inputs.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_pve_calculator_multiplies_programs_by_catalog_years() {
        let dw = DegreeWorksInputs {
            majors: 20,
            minors: 10,
            certificates: 5,
            concentrations: 3,
            catalog_years: 2,
            pve_count: 7,
            ..DegreeWorksInputs::default()
        };
        assert_eq!(dw.effective_pve_count(), 76);

        let explicit = DegreeWorksInputs {
            use_pve_calculator: false,
            ..dw
        };
        assert_eq!(explicit.effective_pve_count(), 7);
    }

    #[test]
    fn test_partial_json_applies_field_defaults() {
        let json = r#"{
            "product": "Colleague",
            "delivery_type": "Modernization",
            "size_band": "Large",
            "locale": "UK",
            "include_reports": true
        }"#;
        let inputs: EstimationInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.reports_count, 40);
        assert_eq!(inputs.reports_mix, TierMix::new(0.50, 0.35, 0.15));
        assert_eq!(inputs.maturity_factor, 1.0);
        assert!(inputs.degree_works.cap_enabled);
    }

    #[test]
    fn test_missing_required_field_is_rejected_not_defaulted() {
        let json = r#"{ "product": "Banner", "size_band": "Medium", "locale": "US" }"#;
        let parsed: std::result::Result<EstimationInputs, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }
}
