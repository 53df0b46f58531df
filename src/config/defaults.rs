//! Compiled business baseline.
//!
//! These tables are the methodology reference: `Configuration::baseline()`
//! builds a complete snapshot from them, the drift check compares loaded
//! configuration against them, and `DefaultMultipliers` serves the multiplier
//! tables when a loaded configuration omits an entry.

use crate::config::tables::{
    default_drift_threshold, Activity, AddonCap, AddonCatalogEntry, Configuration, DeliveryMix,
    ProductMultiplier, ProductPackageMultiplier, ProductRoleToggle, RateCard, RoleMix,
    SizeMultiplier, StagePresales, StageWeight,
};
use crate::core::types::{DeliveryType, Locale, Package, Product, SizeBand, Tier};

pub const BASELINE_HOURS: f64 = 6700.0;

// (phase, stage, weight, default presales fraction)
const STAGES: &[(&str, &str, f64, f64)] = &[
    ("Discovery", "Start", 0.025, 0.6),
    ("Discovery", "Prepare", 0.025, 0.3),
    ("Build", "Sprint 0", 0.060, 0.0),
    ("Build", "Plan", 0.100, 0.0),
    ("Build", "Configure", 0.340, 0.0),
    ("Build", "Test", 0.200, 0.0),
    ("Build", "Deploy", 0.100, 0.0),
    ("Optimize", "Go-Live", 0.060, 0.0),
    ("Optimize", "Post Go-Live (Care)", 0.090, 0.0),
];

const ACTIVITIES: &[(&str, &str, f64, bool)] = &[
    ("Start", "Discovery Planning", 0.6, true),
    ("Start", "Initial Assessment", 0.4, false),
    ("Prepare", "Requirements Gathering", 0.3, true),
    ("Prepare", "Solution Design", 0.7, false),
];

const DELIVERY_ROLES: [&str; 5] = [
    "Project Manager",
    "Solution Architect",
    "Technical Lead",
    "Business Analyst",
    "QA Engineer",
];

// Per stage, fractions in DELIVERY_ROLES order.
const ROLE_MIX: &[(&str, [f64; 5])] = &[
    ("Start", [0.20, 0.30, 0.25, 0.15, 0.10]),
    ("Prepare", [0.15, 0.35, 0.25, 0.20, 0.05]),
    ("Sprint 0", [0.15, 0.25, 0.35, 0.15, 0.10]),
    ("Plan", [0.25, 0.20, 0.30, 0.15, 0.10]),
    ("Configure", [0.10, 0.15, 0.45, 0.20, 0.10]),
    ("Test", [0.15, 0.10, 0.20, 0.15, 0.40]),
    ("Deploy", [0.20, 0.15, 0.35, 0.10, 0.20]),
    ("Go-Live", [0.25, 0.20, 0.30, 0.15, 0.10]),
    ("Post Go-Live (Care)", [0.30, 0.25, 0.20, 0.15, 0.10]),
];

// US rate card: (role, onshore, offshore, partner)
const US_RATES: &[(&str, f64, f64, f64)] = &[
    ("Project Manager", 150.0, 75.0, 120.0),
    ("Solution Architect", 175.0, 90.0, 140.0),
    ("Technical Lead", 160.0, 85.0, 130.0),
    ("Business Analyst", 140.0, 70.0, 110.0),
    ("QA Engineer", 130.0, 65.0, 100.0),
    ("Integration Engineer", 170.0, 85.0, 135.0),
    ("Technical Architect", 180.0, 95.0, 145.0),
    ("Integration Lead", 165.0, 80.0, 125.0),
    ("Reporting Consultant", 155.0, 80.0, 125.0),
];

/// Regional uplift applied to the US card.
pub fn locale_rate_multiplier(locale: Locale) -> f64 {
    match locale {
        Locale::Us => 1.0,
        Locale::Canada => 0.95,
        Locale::Uk => 1.1,
        Locale::Eu => 1.05,
        Locale::Anz => 1.15,
        Locale::Mena => 0.85,
    }
}

// (role or global, onshore, offshore, partner)
const DELIVERY_MIX: &[(Option<&str>, f64, f64, f64)] = &[
    (None, 0.70, 0.20, 0.10),
    (Some("Project Manager"), 0.80, 0.15, 0.05),
    (Some("Solution Architect"), 0.75, 0.20, 0.05),
];

// (package, tier, unit hours, [(role, fraction)])
type CatalogTier = (Package, Tier, f64, &'static [(&'static str, f64)]);

const ADDON_CATALOG: &[CatalogTier] = &[
    (
        Package::Integrations,
        Tier::Simple,
        80.0,
        &[
            ("Integration Engineer", 0.60),
            ("Technical Architect", 0.25),
            ("QA Engineer", 0.10),
            ("Project Manager", 0.05),
        ],
    ),
    (
        Package::Integrations,
        Tier::Standard,
        160.0,
        &[
            ("Integration Engineer", 0.50),
            ("Technical Architect", 0.30),
            ("QA Engineer", 0.15),
            ("Project Manager", 0.05),
        ],
    ),
    (
        Package::Integrations,
        Tier::Complex,
        320.0,
        &[
            ("Integration Engineer", 0.45),
            ("Technical Architect", 0.30),
            ("Integration Lead", 0.15),
            ("QA Engineer", 0.10),
        ],
    ),
    (
        Package::Reports,
        Tier::Simple,
        24.0,
        &[
            ("Reporting Consultant", 0.70),
            ("Solution Architect", 0.20),
            ("QA Engineer", 0.05),
            ("Project Manager", 0.05),
        ],
    ),
    (
        Package::Reports,
        Tier::Standard,
        72.0,
        &[
            ("Reporting Consultant", 0.60),
            ("Solution Architect", 0.25),
            ("QA Engineer", 0.10),
            ("Project Manager", 0.05),
        ],
    ),
    (
        Package::Reports,
        Tier::Complex,
        160.0,
        &[
            ("Reporting Consultant", 0.55),
            ("Solution Architect", 0.25),
            ("Technical Lead", 0.15),
            ("QA Engineer", 0.05),
        ],
    ),
    (
        Package::DegreeWorks,
        Tier::Setup,
        120.0,
        &[
            ("Technical Architect", 0.40),
            ("Solution Architect", 0.30),
            ("Project Manager", 0.20),
            ("QA Engineer", 0.10),
        ],
    ),
    (
        Package::DegreeWorks,
        Tier::Simple,
        6.0,
        &[
            ("Business Analyst", 0.50),
            ("Technical Lead", 0.30),
            ("QA Engineer", 0.20),
        ],
    ),
    (
        Package::DegreeWorks,
        Tier::Standard,
        12.0,
        &[
            ("Business Analyst", 0.50),
            ("Technical Lead", 0.30),
            ("QA Engineer", 0.20),
        ],
    ),
    (
        Package::DegreeWorks,
        Tier::Complex,
        24.0,
        &[
            ("Business Analyst", 0.45),
            ("Technical Lead", 0.35),
            ("QA Engineer", 0.20),
        ],
    ),
];

// Roles not staffed on Colleague engagements.
const COLLEAGUE_DISABLED_ROLES: [&str; 2] = ["Integration Engineer", "Integration Lead"];

const DEGREE_WORKS_CAPS: [(SizeBand, f64); 4] = [
    (SizeBand::Small, 300.0),
    (SizeBand::Medium, 400.0),
    (SizeBand::Large, 500.0),
    (SizeBand::VeryLarge, 600.0),
];

pub fn default_size_multiplier(size: SizeBand) -> f64 {
    match size {
        SizeBand::Small => 0.85,
        SizeBand::Medium => 1.0,
        SizeBand::Large => 1.25,
        SizeBand::VeryLarge => 1.50,
    }
}

pub fn default_delivery_type_multiplier(product: Product, delivery_type: DeliveryType) -> f64 {
    match (product, delivery_type) {
        (Product::Banner, DeliveryType::NetNew) => 1.00,
        (Product::Banner, DeliveryType::Modernization) => 0.90,
        (Product::Colleague, DeliveryType::NetNew) => 0.85,
        (Product::Colleague, DeliveryType::Modernization) => 0.75,
    }
}

pub fn default_package_multiplier(product: Product, package: Package) -> f64 {
    match (product, package) {
        (Product::Banner, _) => 1.00,
        (Product::Colleague, Package::DegreeWorks) => 0.0,
        (Product::Colleague, _) => 0.90,
    }
}

impl Configuration {
    /// The business baseline: every table populated, every invariant holding.
    pub fn baseline() -> Self {
        let stage_weights = STAGES
            .iter()
            .map(|(phase, stage, weight, _)| StageWeight {
                phase: (*phase).to_string(),
                stage: (*stage).to_string(),
                weight: *weight,
            })
            .collect();

        let stage_presales = STAGES
            .iter()
            .map(|(_, stage, _, fraction)| StagePresales {
                stage: (*stage).to_string(),
                default_fraction: *fraction,
            })
            .collect();

        let activities = ACTIVITIES
            .iter()
            .map(|(stage, activity, weight, is_presales)| Activity {
                stage: (*stage).to_string(),
                activity: (*activity).to_string(),
                weight: *weight,
                is_presales: *is_presales,
            })
            .collect();

        let role_mix = ROLE_MIX
            .iter()
            .flat_map(|(stage, fractions)| {
                DELIVERY_ROLES
                    .iter()
                    .zip(fractions.iter())
                    .map(move |(role, fraction)| RoleMix {
                        stage: (*stage).to_string(),
                        role: (*role).to_string(),
                        fraction: *fraction,
                    })
            })
            .collect();

        // Whole currency units, truncated.
        let rates = Locale::ALL
            .iter()
            .flat_map(|locale| {
                let m = locale_rate_multiplier(*locale);
                US_RATES
                    .iter()
                    .map(move |(role, onshore, offshore, partner)| RateCard {
                        role: (*role).to_string(),
                        locale: *locale,
                        onshore: (onshore * m).trunc(),
                        offshore: (offshore * m).trunc(),
                        partner: (partner * m).trunc(),
                    })
            })
            .collect();

        let delivery_mix = DELIVERY_MIX
            .iter()
            .map(|(role, onshore, offshore, partner)| DeliveryMix {
                role: role.map(str::to_string),
                onshore: *onshore,
                offshore: *offshore,
                partner: *partner,
            })
            .collect();

        let addon_catalog = ADDON_CATALOG
            .iter()
            .flat_map(|(package, tier, unit_hours, roles)| {
                roles.iter().map(move |(role, fraction)| AddonCatalogEntry {
                    package: *package,
                    tier: *tier,
                    unit_hours: *unit_hours,
                    role: (*role).to_string(),
                    role_fraction: *fraction,
                })
            })
            .collect();

        let product_role_map = US_RATES
            .iter()
            .map(|(role, ..)| {
                let enabled_for = Product::ALL
                    .iter()
                    .copied()
                    .filter(|p| *p != Product::Colleague || !COLLEAGUE_DISABLED_ROLES.contains(role))
                    .collect();
                ProductRoleToggle {
                    role: (*role).to_string(),
                    enabled_for,
                    multiplier: 1.0,
                }
            })
            .collect();

        let size_multipliers = SizeBand::ALL
            .iter()
            .map(|size| SizeMultiplier {
                size: *size,
                multiplier: default_size_multiplier(*size),
            })
            .collect();

        let product_multipliers = Product::ALL
            .iter()
            .flat_map(|product| {
                DeliveryType::ALL.iter().map(move |dt| ProductMultiplier {
                    product: *product,
                    delivery_type: *dt,
                    multiplier: default_delivery_type_multiplier(*product, *dt),
                })
            })
            .collect();

        let product_package_multipliers = Product::ALL
            .iter()
            .flat_map(|product| {
                Package::ALL.iter().map(move |package| ProductPackageMultiplier {
                    product: *product,
                    package: *package,
                    multiplier: default_package_multiplier(*product, *package),
                })
            })
            .collect();

        let addon_caps = DEGREE_WORKS_CAPS
            .iter()
            .map(|(size, cap_hours)| AddonCap {
                package: Package::DegreeWorks,
                size: *size,
                cap_hours: *cap_hours,
            })
            .collect();

        Configuration {
            baseline_hours: BASELINE_HOURS,
            drift_threshold: default_drift_threshold(),
            stage_weights,
            stage_presales,
            activities,
            role_mix,
            rates,
            delivery_mix,
            addon_catalog,
            product_role_map,
            size_multipliers,
            product_multipliers,
            product_package_multipliers,
            addon_caps,
            role_aliases: Vec::new(),
        }
    }
}
