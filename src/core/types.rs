//! Closed vocabularies shared by the configuration tables and the inputs.
//!
//! Every enum serializes to the label used in the business workbook
//! ("Net New", "Very Large", "Degree Works", ...) and parses from that label
//! case-insensitively, so scenario files and CLI flags accept either form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $label $(, alias = $alias)*)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Workbook label for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_label(s);
                $(
                    if normalize_label($label) == wanted $(|| normalize_label($alias) == wanted)* {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!(
                    "unknown {} '{}' (expected one of: {})",
                    stringify!($name),
                    s,
                    $name::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
                ))
            }
        }
    };
}

// Lowercase and drop separators so "Net New", "net-new" and "net_new" agree.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

labeled_enum! {
    /// Product line being implemented.
    pub enum Product {
        Banner => "Banner" | "ProductA",
        Colleague => "Colleague" | "ProductB",
    }
}

labeled_enum! {
    /// Whether the engagement is a fresh implementation or a modernization.
    pub enum DeliveryType {
        NetNew => "Net New",
        Modernization => "Modernization",
    }
}

labeled_enum! {
    /// Institution size band driving the base size multiplier and add-on caps.
    pub enum SizeBand {
        Small => "Small",
        Medium => "Medium",
        Large => "Large",
        VeryLarge => "Very Large",
    }
}

labeled_enum! {
    /// Supported rate-card regions.
    pub enum Locale {
        Us => "US",
        Canada => "Canada",
        Uk => "UK",
        Eu => "EU",
        Anz => "ANZ",
        Mena => "MENA",
    }
}

labeled_enum! {
    /// Delivery location a share of role hours is staffed from.
    pub enum DeliverySplit {
        Onshore => "Onshore",
        Offshore => "Offshore",
        Partner => "Partner",
    }
}

labeled_enum! {
    /// Add-on packages priced independently of the base package.
    pub enum Package {
        Integrations => "Integrations",
        Reports => "Reports",
        DegreeWorks => "Degree Works",
    }
}

labeled_enum! {
    /// Catalog tier. `Setup` is a one-off block used by complexity-scored packages.
    pub enum Tier {
        Setup => "Setup",
        Simple => "Simple",
        Standard => "Standard",
        Complex => "Complex",
    }
}

impl Tier {
    /// Tiers that scale with an item count.
    pub const COMPLEXITY: [Tier; 3] = [Tier::Simple, Tier::Standard, Tier::Complex];
}

/// Name of the base package in summaries.
pub const BASE_PACKAGE: &str = "Base N2S";

/// Stage receiving the Sprint-0 uplift.
pub const SPRINT_ZERO_STAGE: &str = "Sprint 0";
/// Stage reduced to fund the uplift.
pub const PLAN_STAGE: &str = "Plan";
/// Stage reduced to fund the uplift.
pub const CONFIGURE_STAGE: &str = "Configure";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_workbook_labels_and_cli_forms() {
        assert_eq!("Net New".parse::<DeliveryType>(), Ok(DeliveryType::NetNew));
        assert_eq!("net-new".parse::<DeliveryType>(), Ok(DeliveryType::NetNew));
        assert_eq!("very_large".parse::<SizeBand>(), Ok(SizeBand::VeryLarge));
        assert_eq!("degree works".parse::<Package>(), Ok(Package::DegreeWorks));
        assert_eq!("us".parse::<Locale>(), Ok(Locale::Us));
    }

    #[test]
    fn test_parse_accepts_product_aliases() {
        assert_eq!("ProductA".parse::<Product>(), Ok(Product::Banner));
        assert_eq!("productb".parse::<Product>(), Ok(Product::Colleague));
    }

    #[test]
    fn test_parse_rejects_unknown_value() {
        let err = "Huge".parse::<SizeBand>().unwrap_err();
        assert!(err.contains("Very Large"), "{}", err);
    }

    #[test]
    fn test_serde_uses_workbook_labels() {
        let json = serde_json::to_string(&SizeBand::VeryLarge).unwrap();
        assert_eq!(json, "\"Very Large\"");
        let parsed: Product = serde_json::from_str("\"ProductB\"").unwrap();
        assert_eq!(parsed, Product::Colleague);
    }
}
