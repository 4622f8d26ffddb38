//! Parcurve CLI - LIBOR and ratio curves, bond yields and OAS from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Bootstrap the LIBOR curve from a market file and check the fit
//! parcurve --config market.toml curve --check
//!
//! # Par ratios, and the ratio at a bond's maturity
//! parcurve --config market.toml ratio --maturity 2040-01-15
//!
//! # Price a callable municipal bond to the worst call
//! parcurve price --coupon 5.0 --maturity 2040-01-15 --call-date 2030-01-15 \
//!     --conventions municipal --yield 3.5
//!
//! # Solve the asset swap spread for every bond in the market file
//! parcurve --config market.toml oas --vol 12
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};
use config::Config;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so table/json/csv output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Curve(args) => commands::curve::execute(args, config, format, quiet)?,
        Commands::Ratio(args) => commands::ratio::execute(args, config, format, quiet)?,
        Commands::Price(args) => commands::price::execute(args, config, format, quiet)?,
        Commands::Oas(args) => commands::oas::execute(args, config, format, quiet)?,
    }

    Ok(())
}
