//! OAS command implementation.
//!
//! Values bonds as asset swap packages against the configured LIBOR curve:
//! solves spreads, ratios or implied volatility, and reports DV01.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use parcurve_analytics::{AssetSwap, BondValues, OasRequest, SpreadType};
use parcurve_bonds::ModelKind;
use parcurve_curves::{RatioCurve, TermStructureModel};

use crate::cli::OutputFormat;
use crate::commands::{build_libor, build_ratio, BondArgs};
use crate::config::{BondEntry, Config};
use crate::error::CliError;
use crate::output::{print_section, print_success, print_warning};

/// Arguments for the OAS command.
#[derive(Args, Debug)]
pub struct OasArgs {
    #[command(flatten)]
    pub bond: BondArgs,

    /// Bond from the market file, by name. Without a bond, every bond in the file is valued.
    #[arg(short, long, conflicts_with_all = ["coupon", "maturity"])]
    pub name: Option<String>,

    /// Market yield (as percentage)
    #[arg(short, long = "yield")]
    pub yield_value: Option<f64>,

    /// Market clean price
    #[arg(short, long)]
    pub price: Option<f64>,

    /// Spread in basis points
    #[arg(long)]
    pub spread: Option<f64>,

    /// LIBOR ratio
    #[arg(short, long)]
    pub ratio: Option<f64>,

    /// Short rate volatility (as percentage)
    #[arg(long)]
    pub vol: Option<f64>,

    /// Spread type: S (asset swap) or O (OAS)
    #[arg(short = 't', long, default_value = "S")]
    pub spread_type: SpreadType,

    /// Short rate model: BK or HW
    #[arg(long, default_value = "BK")]
    pub model: ModelKind,

    /// Solve the spread over the ratio curve's ratio at maturity
    #[arg(long)]
    pub basis: bool,
}

/// Valuation results for one bond.
#[derive(Debug, Serialize, Tabled)]
pub struct OasRow {
    #[tabled(rename = "Bond")]
    pub bond: String,
    #[tabled(rename = "Price")]
    #[tabled(display_with = "fmt3")]
    pub price: f64,
    #[tabled(rename = "Yield %")]
    #[tabled(display_with = "fmt3")]
    pub bond_yield: f64,
    #[tabled(rename = "Spread bp")]
    #[tabled(display_with = "fmt2")]
    pub spread_bp: f64,
    #[tabled(rename = "Ratio")]
    #[tabled(display_with = "fmt4")]
    pub ratio: f64,
    #[tabled(rename = "Geared bp")]
    #[tabled(display_with = "fmt2")]
    pub geared_bp: f64,
    #[tabled(rename = "Vol %")]
    #[tabled(display_with = "fmt2")]
    pub vol: f64,
    #[tabled(rename = "Call")]
    #[tabled(display_with = "fmt3")]
    pub call_value: f64,
    #[tabled(rename = "OAS Price")]
    #[tabled(display_with = "fmt3")]
    pub oas_price: f64,
    #[tabled(rename = "OAS Yield %")]
    #[tabled(display_with = "fmt3")]
    pub oas_yield: f64,
    #[tabled(rename = "DV01")]
    #[tabled(display_with = "display_dv01")]
    pub dv01: Option<f64>,
    #[tabled(rename = "Type")]
    pub spread_type: SpreadType,
    #[tabled(rename = "Model")]
    pub model: ModelKind,
}

impl OasRow {
    fn new(bond: String, values: &BondValues) -> Self {
        Self {
            bond,
            price: values.price,
            bond_yield: values.bond_yield * 100.0,
            spread_bp: values.spread * 10_000.0,
            ratio: values.ratio,
            geared_bp: values.geared_spread * 10_000.0,
            vol: values.vol * 100.0,
            call_value: values.call_value,
            oas_price: values.oas_price,
            oas_yield: values.oas_yield * 100.0,
            dv01: values.dv01,
            spread_type: values.spread_type,
            model: values.model,
        }
    }
}

fn fmt2(v: &f64) -> String {
    format!("{v:.2}")
}

fn fmt3(v: &f64) -> String {
    format!("{v:.3}")
}

fn fmt4(v: &f64) -> String {
    format!("{v:.4}")
}

fn display_dv01(v: &Option<f64>) -> String {
    v.map_or_else(String::new, |d| format!("{d:.4}"))
}

/// Request for `entry`, with command-line values taking precedence.
pub fn request_for(args: &OasArgs, entry: &BondEntry) -> OasRequest {
    OasRequest {
        price: args.price.or(entry.price),
        bond_yield: args.yield_value.or(entry.bond_yield).map(|y| y / 100.0),
        spread: args.spread.or(entry.spread).map(|s| s / 10_000.0),
        ratio: args.ratio.or(entry.ratio),
        vol: args.vol.or(entry.vol).map(|v| v / 100.0),
        spread_type: args.spread_type,
        model: args.model,
    }
}

/// Values one bond.
pub fn value_entry(
    args: &OasArgs,
    entry: &BondEntry,
    libor: &TermStructureModel,
    ratio_curve: Option<&RatioCurve>,
) -> Result<BondValues> {
    let bond = entry.build(libor.settlement())?;
    let asw = AssetSwap::new(bond).with_fixings(libor.fixings().clone());
    let request = request_for(args, entry);

    match ratio_curve {
        Some(curve) => {
            let price = asw.bond().calc_from(request.price, request.bond_yield)?.price;
            Ok(asw.basis_swap_spread(libor, curve, price, &request.terms())?)
        }
        None => Ok(asw.evaluate(libor, &request)?),
    }
}

/// Execute the OAS command.
pub fn execute(args: OasArgs, config: Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let entries: Vec<BondEntry> = if let Some(name) = &args.name {
        let entry = config
            .bond(name)
            .cloned()
            .ok_or_else(|| CliError::Config(format!("no bond named '{name}' in the market file")))?;
        vec![entry]
    } else if args.bond.is_given() {
        vec![args.bond.to_entry()?]
    } else if config.bonds.is_empty() {
        return Err(CliError::MissingArgument("--coupon and --maturity, or [[bonds]] in the market file".into()).into());
    } else {
        config.bonds.clone()
    };

    let libor = build_libor(&config)?;
    let ratio_curve = if args.basis {
        Some(build_ratio(&config, &libor)?)
    } else {
        None
    };

    let mut rows = Vec::with_capacity(entries.len());
    for entry in &entries {
        let _span = tracing::info_span!("oas", bond = %entry.label()).entered();
        match value_entry(&args, entry, &libor, ratio_curve.as_ref()) {
            Ok(values) => {
                tracing::info!(%values, "valued");
                rows.push(OasRow::new(entry.label(), &values));
            }
            Err(err) if entries.len() > 1 => {
                print_warning(&format!("{}: {err:#}", entry.label()));
            }
            Err(err) => return Err(err),
        }
    }

    print_section("Asset swap valuation", &rows, format, quiet)?;
    if !quiet && format == OutputFormat::Table {
        print_success(&format!("valued {} of {} bonds", rows.len(), entries.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use parcurve_core::Date;

    fn parse(argv: &[&str]) -> OasArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Oas(args) => args,
            _ => unreachable!(),
        }
    }

    fn config() -> Config {
        toml::from_str(
            r#"
curve_date = "2025-01-13"

[libor]
"3M" = 4.50
"1Y" = 4.35
"5Y" = 4.05
"10Y" = 4.10
"30Y" = 4.30

[ratios]
"1Y" = 0.70
"10Y" = 0.75
"30Y" = 0.80

[[bonds]]
name = "callable"
coupon = 5.0
maturity = "2040-01-15"
call_date = "2030-01-15"
price = 103.0
vol = 12.0
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_request_scaling_and_precedence() {
        let args = parse(&["parcurve", "oas", "--spread", "25", "--vol", "15", "-t", "O"]);
        let entry = &config().bonds[0];
        let request = request_for(&args, entry);
        assert_eq!(request.price, Some(103.0));
        assert_eq!(request.spread, Some(0.0025));
        assert_eq!(request.vol, Some(0.15));
        assert_eq!(request.spread_type, SpreadType::Oas);
    }

    #[test]
    fn test_value_entry_solves_spread() {
        let config = config();
        let args = parse(&["parcurve", "oas"]);
        let libor = build_libor(&config).unwrap();
        let values = value_entry(&args, &config.bonds[0], &libor, None).unwrap();
        assert!((values.price - 103.0).abs() < 1e-6);
        assert!(values.call_value > 0.0);
        assert!(values.dv01.is_some());
    }

    #[test]
    fn test_value_entry_basis() {
        let config = config();
        let args = parse(&["parcurve", "oas", "--basis"]);
        let libor = build_libor(&config).unwrap();
        let ratios = build_ratio(&config, &libor).unwrap();
        let values = value_entry(&args, &config.bonds[0], &libor, Some(&ratios)).unwrap();

        let maturity = Date::from_ymd(2040, 1, 15).unwrap();
        let expected = ratios.maturity_ratio(&libor, maturity).unwrap();
        assert!((values.ratio - expected).abs() < 1e-12);
        assert!((values.price - 103.0).abs() < 1e-6);
    }
}
