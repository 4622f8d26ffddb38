//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{CurveArgs, OasArgs, PriceArgs, RatioArgs};

/// Parcurve - LIBOR and ratio curves, bond yields and OAS
#[derive(Parser)]
#[command(name = "parcurve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Market file (TOML). Defaults to ./parcurve.toml when present.
    #[arg(long, global = true, env = "PARCURVE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Bootstrap the LIBOR curve and show its pillars
    Curve(CurveArgs),

    /// Bootstrap the ratio curve and show par ratios
    Ratio(RatioArgs),

    /// Price a bond from yield or yield from price, to the worst call
    Price(PriceArgs),

    /// Asset swap and OAS valuation of callable bonds
    Oas(OasArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
