use anyhow::{Context, Result};
use tracing::info;

use crate::cli::EstimateArgs;
use crate::config::loader::{load_or_baseline, load_scenario};
use crate::core::inputs::{default_sprint0_uplift, EstimationInputs};
use crate::engine::estimate;
use crate::formatting::FormattingConfig;
use crate::io::create_writer;

/// Scenario file if given, else the default inputs; then flag overrides.
pub fn build_inputs(args: &EstimateArgs) -> Result<EstimationInputs> {
    let inputs = match &args.scenario {
        Some(path) => load_scenario(path)?,
        None => EstimationInputs::default(),
    };
    Ok(apply_overrides(inputs, args))
}

/// Pure function: flags win over scenario fields.
pub fn apply_overrides(mut inputs: EstimationInputs, args: &EstimateArgs) -> EstimationInputs {
    if let Some(product) = args.product {
        inputs.product = product;
    }
    if let Some(delivery_type) = args.delivery_type {
        inputs.delivery_type = delivery_type;
    }
    if let Some(size) = args.size {
        inputs.size_band = size;
    }
    if let Some(locale) = args.locale {
        inputs.locale = locale;
    }
    if let Some(uplift) = args.uplift {
        inputs.sprint0_uplift = uplift;
    } else if args.default_uplift {
        inputs.sprint0_uplift = default_sprint0_uplift(inputs.delivery_type);
    }
    if let Some(maturity) = args.maturity {
        inputs.maturity_factor = maturity;
    }
    if let Some(count) = args.integrations {
        inputs.include_integrations = true;
        inputs.integrations_count = count;
    }
    if let Some(count) = args.reports {
        inputs.include_reports = true;
        inputs.reports_count = count;
    }
    if let Some(majors) = args.degree_works_majors {
        inputs.include_degree_works = true;
        inputs.degree_works.majors = majors;
    }
    inputs
}

fn formatting_for(args: &EstimateArgs) -> FormattingConfig {
    if args.plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}

pub fn run_estimate(args: EstimateArgs) -> Result<()> {
    let config = load_or_baseline(args.config.as_deref())?;
    let inputs = build_inputs(&args)?;

    let result = estimate(&inputs, &config).context("Estimation failed")?;
    info!(
        total_hours = result.kpis.total_hours,
        total_cost = result.kpis.total_cost,
        "estimate ready"
    );

    let mut writer = create_writer(args.format, args.output.as_deref(), formatting_for(&args))?;
    writer.write_estimate(&result)?;
    if let Some(path) = &args.output {
        eprintln!("Wrote estimate to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DeliveryType, Product};

    #[test]
    fn test_flags_override_scenario_fields() {
        let args = EstimateArgs {
            product: Some(Product::Colleague),
            reports: Some(12),
            ..EstimateArgs::default()
        };
        let inputs = apply_overrides(EstimationInputs::default(), &args);
        assert_eq!(inputs.product, Product::Colleague);
        assert!(inputs.include_reports);
        assert_eq!(inputs.reports_count, 12);
        assert!(!inputs.include_integrations);
    }

    #[test]
    fn test_default_uplift_follows_delivery_type() {
        let args = EstimateArgs {
            delivery_type: Some(DeliveryType::Modernization),
            default_uplift: true,
            ..EstimateArgs::default()
        };
        let inputs = apply_overrides(EstimationInputs::default(), &args);
        assert_eq!(inputs.sprint0_uplift, 0.01);
    }
}
