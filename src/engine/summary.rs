//! Aggregation: KPIs and reporting tables.
//!
//! Every total is summed from priced `RoleCost` rows. The blended rate is
//! derived here and nowhere else.

use std::collections::BTreeMap;

use crate::core::inputs::EstimationInputs;
use crate::core::results::{
    AddonResult, BaseEstimate, DeliverySplitSummary, Kpis, PackageSummary, RoleCost,
    RoleSummary, StageRoleMatrix, StageSummary,
};
use crate::core::types::{DeliverySplit, Package, BASE_PACKAGE};

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn compute_kpis(base: &BaseEstimate, base_costs: &[RoleCost], addons: &[AddonResult]) -> Kpis {
    let presales_hours = base.presales_hours();
    let base_delivery_hours: f64 = base_costs.iter().map(|c| c.hours).sum();
    let addon_hours: f64 = addons.iter().map(|a| a.total_hours).sum();
    let delivery_hours = base_delivery_hours + addon_hours;

    let delivery_cost: f64 = base_costs.iter().map(|c| c.cost).sum::<f64>()
        + addons.iter().map(|a| a.cost).sum::<f64>();
    // Presales effort is not billed.
    let presales_cost = 0.0;

    let total_hours = presales_hours + delivery_hours;
    let total_cost = presales_cost + delivery_cost;

    Kpis {
        total_hours,
        total_cost,
        presales_hours,
        delivery_hours,
        presales_cost,
        delivery_cost,
        blended_rate: ratio(total_cost, total_hours),
        presales_ratio: ratio(presales_hours, total_hours),
    }
}

/// Per-role hours and cost across every package, most expensive first.
pub fn role_summary<'a>(costs: impl Iterator<Item = &'a RoleCost>) -> Vec<RoleSummary> {
    let mut by_role: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for c in costs {
        let entry = by_role.entry(c.role.as_str()).or_insert((0.0, 0.0));
        entry.0 += c.hours;
        entry.1 += c.cost;
    }
    let mut summary: Vec<RoleSummary> = by_role
        .into_iter()
        .map(|(role, (hours, cost))| RoleSummary {
            role: role.to_string(),
            hours,
            cost,
        })
        .collect();
    // Stable sort keeps the alphabetical order for ties.
    summary.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    summary
}

/// Base stages in configured order: total stage hours and delivery cost.
pub fn stage_summary(base: &BaseEstimate, base_costs: &[RoleCost]) -> Vec<StageSummary> {
    base.stages
        .iter()
        .map(|stage| StageSummary {
            stage: stage.stage.clone(),
            hours: stage.hours,
            cost: base_costs
                .iter()
                .filter(|c| c.stage == stage.stage)
                .map(|c| c.cost)
                .sum(),
        })
        .collect()
}

/// Base stages followed by one row per add-on that contributed hours.
pub fn all_stage_summary(stages: &[StageSummary], addons: &[AddonResult]) -> Vec<StageSummary> {
    stages
        .iter()
        .cloned()
        .chain(
            addons
                .iter()
                .filter(|a| !a.disabled && a.total_hours > 0.0)
                .map(|a| StageSummary {
                    stage: a.package.to_string(),
                    hours: a.total_hours,
                    cost: a.cost,
                }),
        )
        .collect()
}

/// Base package plus every add-on package, included or not.
pub fn package_summary(
    inputs: &EstimationInputs,
    base: &BaseEstimate,
    base_costs: &[RoleCost],
    addons: &[AddonResult],
) -> Vec<PackageSummary> {
    let mut rows = vec![PackageSummary {
        package: BASE_PACKAGE.to_string(),
        hours: base.presales_hours() + base_costs.iter().map(|c| c.hours).sum::<f64>(),
        cost: base_costs.iter().map(|c| c.cost).sum(),
        enabled: true,
    }];
    for package in Package::ALL {
        let included = match package {
            Package::Integrations => inputs.include_integrations,
            Package::Reports => inputs.include_reports,
            Package::DegreeWorks => inputs.include_degree_works,
        };
        let result = addons.iter().find(|a| a.package == *package);
        rows.push(PackageSummary {
            package: package.to_string(),
            hours: result.map_or(0.0, |a| a.total_hours),
            cost: result.map_or(0.0, |a| a.cost),
            enabled: included && result.is_some_and(|a| !a.disabled),
        });
    }
    rows
}

/// Hours and cost per delivery split, with shares of the priced totals.
pub fn delivery_split_summary<'a>(
    costs: impl Iterator<Item = &'a RoleCost>,
) -> Vec<DeliverySplitSummary> {
    let mut totals: BTreeMap<DeliverySplit, (f64, f64)> = BTreeMap::new();
    for c in costs {
        let entry = totals.entry(c.split).or_insert((0.0, 0.0));
        entry.0 += c.hours;
        entry.1 += c.cost;
    }
    let all_hours: f64 = totals.values().map(|(h, _)| h).sum();
    let all_cost: f64 = totals.values().map(|(_, c)| c).sum();

    DeliverySplit::ALL
        .iter()
        .map(|split| {
            let (hours, cost) = totals.get(split).copied().unwrap_or((0.0, 0.0));
            DeliverySplitSummary {
                split: *split,
                hours,
                cost,
                hour_share: ratio(hours, all_hours),
                cost_share: ratio(cost, all_cost),
            }
        })
        .collect()
}

/// Stage × role grid over the base package. Roles in first-priced order.
pub fn stage_role_matrix(base: &BaseEstimate, base_costs: &[RoleCost]) -> StageRoleMatrix {
    let stages: Vec<String> = base.stages.iter().map(|s| s.stage.clone()).collect();
    let mut roles: Vec<String> = Vec::new();
    for c in base_costs {
        if !roles.contains(&c.role) {
            roles.push(c.role.clone());
        }
    }

    let mut hours = vec![vec![0.0; roles.len()]; stages.len()];
    let mut cost = vec![vec![0.0; roles.len()]; stages.len()];
    for c in base_costs {
        let s = stages.iter().position(|x| *x == c.stage);
        let r = roles.iter().position(|x| *x == c.role);
        if let (Some(s), Some(r)) = (s, r) {
            hours[s][r] += c.hours;
            cost[s][r] += c.cost;
        }
    }

    StageRoleMatrix {
        stages,
        roles,
        hours,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Locale;

    fn cost(stage: &str, role: &str, split: DeliverySplit, hours: f64, rate: f64) -> RoleCost {
        RoleCost {
            package: BASE_PACKAGE.into(),
            stage: stage.into(),
            role: role.into(),
            locale: Locale::Us,
            split,
            hours,
            rate,
            cost: hours * rate,
        }
    }

    #[test]
    fn test_role_summary_sorted_by_cost() {
        let rows = [
            cost("Plan", "A", DeliverySplit::Onshore, 10.0, 100.0),
            cost("Plan", "B", DeliverySplit::Onshore, 10.0, 200.0),
            cost("Test", "A", DeliverySplit::Offshore, 10.0, 50.0),
        ];
        let summary = role_summary(rows.iter());
        assert_eq!(summary[0].role, "B");
        assert_eq!(summary[1].role, "A");
        assert_eq!(summary[1].hours, 20.0);
        assert_eq!(summary[1].cost, 1500.0);
    }

    #[test]
    fn test_delivery_split_shares() {
        let rows = [
            cost("Plan", "A", DeliverySplit::Onshore, 30.0, 100.0),
            cost("Plan", "A", DeliverySplit::Partner, 10.0, 100.0),
        ];
        let summary = delivery_split_summary(rows.iter());
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].hour_share, 0.75);
        assert_eq!(summary[1].hours, 0.0);
        assert_eq!(summary[2].cost_share, 0.25);
    }

    #[test]
    fn test_ratio_handles_zero_denominator() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
    }
}
