//! Presales/delivery split.
//!
//! A stage's presales fraction comes from its activities' binary presales
//! flags, weighted by activity weight. Stages without activities use the
//! configured stage default, or zero.

use tracing::debug;

use crate::config::tables::Configuration;
use crate::core::results::{BaseEstimate, StageResult};
use crate::engine::base::BaseAllocation;

/// Presales fraction for `stage`, in 0..=1.
pub fn presales_fraction(config: &Configuration, stage: &str) -> f64 {
    let (presales, total) = config
        .activities_for(stage)
        .fold((0.0, 0.0), |(presales, total), activity| {
            let presales = if activity.is_presales {
                presales + activity.weight
            } else {
                presales
            };
            (presales, total + activity.weight)
        });

    if total > 0.0 {
        presales / total
    } else {
        config.stage_presales_default(stage).unwrap_or(0.0)
    }
}

/// Split every stage's hours into presales and delivery.
pub fn split_presales(allocation: BaseAllocation, config: &Configuration) -> BaseEstimate {
    let stages: Vec<StageResult> = allocation
        .stages
        .into_iter()
        .map(|stage| {
            let presales_fraction = presales_fraction(config, &stage.stage);
            let presales_hours = stage.hours * presales_fraction;
            StageResult {
                phase: stage.phase,
                stage: stage.stage,
                weight: stage.weight,
                hours: stage.hours,
                presales_fraction,
                presales_hours,
                delivery_hours: stage.hours - presales_hours,
            }
        })
        .collect();

    let estimate = BaseEstimate {
        baseline_hours: allocation.baseline_hours,
        size_multiplier: allocation.size_multiplier,
        delivery_type_multiplier: allocation.delivery_type_multiplier,
        maturity_factor: allocation.maturity_factor,
        sprint0_uplift: allocation.sprint0_uplift,
        adjusted_total_hours: allocation.adjusted_total_hours,
        stages,
    };
    debug!(
        presales_hours = estimate.presales_hours(),
        delivery_hours = estimate.delivery_hours(),
        "presales split"
    );
    estimate
}
