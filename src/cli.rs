use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::{DeliveryType, Locale, Product, SizeBand};
use crate::io::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "n2s-estimator")]
#[command(about = "Labor hours and cost estimator for N2S implementations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate hours and cost for a scenario
    Estimate(EstimateArgs),

    /// Check a configuration file and report every problem
    Validate {
        /// Configuration file (defaults to the nearest estimator.toml, then the baseline)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the baseline configuration to estimator.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Destination path
        #[arg(long, default_value = "estimator.toml")]
        path: PathBuf,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct EstimateArgs {
    /// Configuration file (defaults to the nearest estimator.toml, then the baseline)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scenario file (TOML or JSON estimation inputs)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Product (Banner, Colleague)
    #[arg(long)]
    pub product: Option<Product>,

    /// Delivery type (net-new, modernization)
    #[arg(long)]
    pub delivery_type: Option<DeliveryType>,

    /// Size band (small, medium, large, very-large)
    #[arg(long)]
    pub size: Option<SizeBand>,

    /// Rate-card locale (US, Canada, UK, EU, ANZ, MENA)
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Sprint-0 uplift as a fraction (e.g. 0.02)
    #[arg(long)]
    pub uplift: Option<f64>,

    /// Use the delivery-type default Sprint-0 uplift
    #[arg(long, conflicts_with = "uplift")]
    pub default_uplift: bool,

    /// Maturity factor (0.5-2.0)
    #[arg(long)]
    pub maturity: Option<f64>,

    /// Include the Integrations package with this many items
    #[arg(long)]
    pub integrations: Option<u32>,

    /// Include the Reports package with this many items
    #[arg(long)]
    pub reports: Option<u32>,

    /// Include Degree Works with this many majors
    #[arg(long)]
    pub degree_works_majors: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Plain output: no color, ASCII tables
    #[arg(long)]
    pub plain: bool,
}
