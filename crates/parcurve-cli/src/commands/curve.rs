//! Curve command implementation.
//!
//! Bootstraps the LIBOR curve and shows its pillars.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use parcurve_curves::{Curve, TermStructureModel};

use crate::cli::OutputFormat;
use crate::commands::{build_libor, parse_date};
use crate::config::Config;
use crate::output::print_section;

/// Arguments for the curve command.
#[derive(Args, Debug)]
pub struct CurveArgs {
    /// Curve date (YYYY-MM-DD), overriding the market file
    #[arg(short, long)]
    pub date: Option<String>,

    /// Also show par residuals for each quote
    #[arg(long)]
    pub check: bool,
}

/// One curve pillar.
#[derive(Debug, Serialize, Tabled)]
pub struct PillarRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Years")]
    #[tabled(display_with = "fmt4")]
    pub years: f64,
    #[tabled(rename = "Discount")]
    #[tabled(display_with = "fmt8")]
    pub discount_factor: f64,
    #[tabled(rename = "Zero %")]
    #[tabled(display_with = "fmt4")]
    pub zero_rate: f64,
}

/// Par rate minus quote for one tenor.
#[derive(Debug, Serialize, Tabled)]
pub struct ResidualRow {
    #[tabled(rename = "Tenor")]
    pub tenor: String,
    #[tabled(rename = "Quote %")]
    #[tabled(display_with = "fmt4")]
    pub quote: f64,
    #[tabled(rename = "Residual bp")]
    #[tabled(display_with = "fmt4")]
    pub residual_bp: f64,
}

fn fmt4(v: &f64) -> String {
    format!("{v:.4}")
}

fn fmt8(v: &f64) -> String {
    format!("{v:.8}")
}

/// Pillar rows with continuously compounded zero rates in percent.
pub fn pillar_rows(model: &TermStructureModel) -> Result<Vec<PillarRow>> {
    let curve = model.curve()?;
    Ok(curve
        .pillars()
        .map(|(date, df)| {
            let years = model.year_fraction(date);
            let zero_rate = if years > 0.0 { -df.ln() / years * 100.0 } else { 0.0 };
            PillarRow {
                date: date.to_string(),
                years,
                discount_factor: df,
                zero_rate,
            }
        })
        .collect())
}

/// Residual rows for every quote, in tenor order.
pub fn residual_rows(model: &TermStructureModel) -> Result<Vec<ResidualRow>> {
    let residuals = model.check_curve()?;
    Ok(residuals
        .into_iter()
        .map(|(tenor, residual)| {
            let quote = model.quotes().get(&tenor).copied().unwrap_or_default() * 100.0;
            ResidualRow {
                tenor,
                quote,
                residual_bp: residual * 100.0,
            }
        })
        .collect())
}

/// Execute the curve command.
pub fn execute(args: CurveArgs, mut config: Config, format: OutputFormat, quiet: bool) -> Result<()> {
    if let Some(date) = &args.date {
        config.curve_date = Some(parse_date(date)?);
    }
    let model = build_libor(&config)?;

    let title = match model.settlement() {
        Some(settle) => format!("LIBOR curve settling {settle}"),
        None => "LIBOR curve".to_string(),
    };
    print_section(&title, &pillar_rows(&model)?, format, quiet)?;

    if args.check {
        print_section("Par residuals", &residual_rows(&model)?, format, quiet)?;
    }
    Ok(())
}
