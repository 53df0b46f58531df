//! Fraction-set helpers.
//!
//! Mixes are validated, never renormalized: a set that misses 1.0 by more
//! than [`MIX_EPSILON`] is rejected by the caller with the field name.

use serde::{Deserialize, Serialize};

use crate::core::types::{DeliverySplit, Tier};

/// Tolerance for "sums to one" checks on mixes and weights.
pub const MIX_EPSILON: f64 = 1e-6;

/// Pure function: does the iterator of fractions sum to 1.0 within epsilon?
pub fn sums_to_one<I>(fractions: I) -> bool
where
    I: IntoIterator<Item = f64>,
{
    (fraction_sum(fractions) - 1.0).abs() <= MIX_EPSILON
}

/// Sum in iteration order. Order is significant for reproducible totals.
pub fn fraction_sum<I>(fractions: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    fractions.into_iter().fold(0.0, |acc, f| acc + f)
}

/// Pure function: is a single value a usable fraction?
pub fn is_fraction(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Onshore / offshore / partner shares of role hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitMix {
    pub onshore: f64,
    pub offshore: f64,
    pub partner: f64,
}

impl SplitMix {
    pub fn new(onshore: f64, offshore: f64, partner: f64) -> Self {
        Self {
            onshore,
            offshore,
            partner,
        }
    }

    pub fn share(&self, split: DeliverySplit) -> f64 {
        match split {
            DeliverySplit::Onshore => self.onshore,
            DeliverySplit::Offshore => self.offshore,
            DeliverySplit::Partner => self.partner,
        }
    }

    pub fn total(&self) -> f64 {
        self.onshore + self.offshore + self.partner
    }

    pub fn is_valid(&self) -> bool {
        [self.onshore, self.offshore, self.partner]
            .iter()
            .all(|f| is_fraction(*f))
            && sums_to_one([self.onshore, self.offshore, self.partner])
    }
}

/// Simple / standard / complex shares of an item count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierMix {
    pub simple: f64,
    pub standard: f64,
    pub complex: f64,
}

impl TierMix {
    pub fn new(simple: f64, standard: f64, complex: f64) -> Self {
        Self {
            simple,
            standard,
            complex,
        }
    }

    pub fn share(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Simple => self.simple,
            Tier::Standard => self.standard,
            Tier::Complex => self.complex,
            Tier::Setup => 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.simple + self.standard + self.complex
    }

    pub fn is_valid(&self) -> bool {
        [self.simple, self.standard, self.complex]
            .iter()
            .all(|f| is_fraction(*f))
            && sums_to_one([self.simple, self.standard, self.complex])
    }
}
