//! Methodology drift detection.
//!
//! Compares a loaded snapshot against the compiled baseline and reports every
//! value whose relative deviation exceeds `config.drift_threshold`. Drift never
//! blocks an estimate; findings travel on the result as warnings.

use tracing::warn;

use crate::config::tables::Configuration;
use crate::core::types::DeliverySplit;
use crate::errors::EstimationWarning;

/// Relative deviation. A zero baseline drifts on any non-zero value.
fn relative_deviation(configured: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        if configured == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((configured - baseline) / baseline).abs()
    }
}

struct DriftCollector {
    threshold: f64,
    findings: Vec<EstimationWarning>,
}

impl DriftCollector {
    fn compare(&mut self, subject: String, configured: f64, baseline: f64) {
        let deviation = relative_deviation(configured, baseline);
        if deviation > self.threshold {
            warn!(subject = %subject, configured, baseline, "methodology drift");
            let message = if deviation.is_finite() {
                format!(
                    "{} deviates {:.1}% from baseline {}",
                    configured,
                    deviation * 100.0,
                    baseline
                )
            } else {
                format!("{} deviates from baseline {}", configured, baseline)
            };
            self.findings.push(EstimationWarning::drift(subject, message));
        }
    }
}

/// Check `config` against the compiled baseline.
pub fn check_drift(config: &Configuration) -> Vec<EstimationWarning> {
    check_drift_against(config, &Configuration::baseline())
}

/// Check `config` against an arbitrary reference snapshot.
pub fn check_drift_against(
    config: &Configuration,
    reference: &Configuration,
) -> Vec<EstimationWarning> {
    let mut collector = DriftCollector {
        threshold: config.drift_threshold,
        findings: Vec::new(),
    };

    collector.compare(
        "baseline_hours".to_string(),
        config.baseline_hours,
        reference.baseline_hours,
    );

    for sw in &config.stage_weights {
        if let Some(base) = reference.stage_weight(&sw.stage) {
            collector.compare(
                format!("stage_weights[{}]", sw.stage),
                sw.weight,
                base.weight,
            );
        }
    }

    for rm in &config.role_mix {
        let base = reference
            .role_mix
            .iter()
            .find(|b| b.stage == rm.stage && b.role == rm.role);
        if let Some(base) = base {
            collector.compare(
                format!("role_mix[{}/{}]", rm.stage, rm.role),
                rm.fraction,
                base.fraction,
            );
        }
    }

    for m in &config.size_multipliers {
        if let Some(base) = reference.size_multipliers.iter().find(|b| b.size == m.size) {
            collector.compare(
                format!("size_multipliers[{}]", m.size),
                m.multiplier,
                base.multiplier,
            );
        }
    }

    for m in &config.product_multipliers {
        let base = reference
            .product_multipliers
            .iter()
            .find(|b| b.product == m.product && b.delivery_type == m.delivery_type);
        if let Some(base) = base {
            collector.compare(
                format!("product_multipliers[{}/{}]", m.product, m.delivery_type),
                m.multiplier,
                base.multiplier,
            );
        }
    }

    for m in &config.product_package_multipliers {
        let base = reference
            .product_package_multipliers
            .iter()
            .find(|b| b.product == m.product && b.package == m.package);
        if let Some(base) = base {
            collector.compare(
                format!("product_package_multipliers[{}/{}]", m.product, m.package),
                m.multiplier,
                base.multiplier,
            );
        }
    }

    for card in &config.rates {
        if let Some(base) = reference.rate(&card.role, card.locale) {
            for &split in DeliverySplit::ALL {
                collector.compare(
                    format!("rates[{}/{}/{}]", card.role, card.locale, split),
                    card.rate(split),
                    base.rate(split),
                );
            }
        }
    }

    for entry in &config.addon_catalog {
        let base = reference.addon_catalog.iter().find(|b| {
            b.package == entry.package && b.tier == entry.tier && b.role == entry.role
        });
        if let Some(base) = base {
            let key = format!("{}/{}/{}", entry.package, entry.tier, entry.role);
            collector.compare(
                format!("addon_catalog[{}].unit_hours", key),
                entry.unit_hours,
                base.unit_hours,
            );
            collector.compare(
                format!("addon_catalog[{}].role_fraction", key),
                entry.role_fraction,
                base.role_fraction,
            );
        }
    }

    for cap in &config.addon_caps {
        if let Some(base) = reference.addon_cap(cap.package, cap.size) {
            collector.compare(
                format!("addon_caps[{}/{}]", cap.package, cap.size),
                cap.cap_hours,
                base,
            );
        }
    }

    collector.findings
}
