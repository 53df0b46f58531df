use anyhow::Result;
use clap::Parser;
use n2s_estimator::cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Estimate(args) => n2s_estimator::commands::run_estimate(args),
        Commands::Validate { config } => n2s_estimator::commands::validate_config_file(config),
        Commands::Init { force, path } => n2s_estimator::commands::init_config(&path, force),
    }
}

// RUST_LOG wins over -v
fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
