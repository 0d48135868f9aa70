use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use station_network::{
    app::{self, AppError},
    config::AppConfig,
    logging::init_logging,
};
use tracing::error;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Shortest path, connectivity and critical station analysis for a station network"
)]
struct Args {
    /// Path to a TOML config (defaults to res/config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Route file to load instead of the configured candidates.
    #[arg(long)]
    network: Option<PathBuf>,
    #[arg(long)]
    origin: Option<String>,
    #[arg(long)]
    destination: Option<String>,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
    /// Skip removing the configured blocked routes.
    #[arg(long)]
    no_blocked: bool,
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match AppConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(&mut config, &args);
    init_logging(&config.logging.level);

    match execute(&config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Analysis failed");
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(network) = &args.network {
        config.network.candidates = vec![network.clone()];
    }
    if let Some(origin) = &args.origin {
        config.analysis.origin = origin.clone();
    }
    if let Some(destination) = &args.destination {
        config.analysis.destination = destination.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
}

fn execute(config: &AppConfig, args: &Args) -> Result<(), AppError> {
    config.validate()?;
    let report = app::run(config, !args.no_blocked)?;
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }
    Ok(())
}
