//! Ratio command implementation.
//!
//! Bootstraps the ratio curve against LIBOR and shows par ratios.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use parcurve_core::Tenor;
use parcurve_curves::{RatioCurve, TermStructureModel};

use crate::cli::OutputFormat;
use crate::commands::{build_libor, build_ratio, parse_date};
use crate::config::Config;
use crate::output::{print_section, KeyValue};

/// Arguments for the ratio command.
#[derive(Args, Debug)]
pub struct RatioArgs {
    /// Tenors to show (comma-separated, e.g. "1Y,5Y,10Y"). Defaults to the quoted tenors.
    #[arg(short, long, value_delimiter = ',')]
    pub tenors: Vec<String>,

    /// Also show the ratio at this maturity date (YYYY-MM-DD)
    #[arg(short, long)]
    pub maturity: Option<String>,
}

/// Par ratio at one tenor.
#[derive(Debug, Serialize, Tabled)]
pub struct RatioRow {
    #[tabled(rename = "Tenor")]
    pub tenor: String,
    #[tabled(rename = "Quote")]
    #[tabled(display_with = "display_quote")]
    pub quote: Option<f64>,
    #[tabled(rename = "Par Ratio")]
    #[tabled(display_with = "fmt6")]
    pub par_ratio: f64,
}

fn display_quote(q: &Option<f64>) -> String {
    q.map_or_else(String::new, |v| format!("{v:.6}"))
}

fn fmt6(v: &f64) -> String {
    format!("{v:.6}")
}

/// Par ratios for `tenors`, or for every quoted tenor in term order.
pub fn ratio_rows(curve: &RatioCurve, libor: &TermStructureModel, tenors: &[String]) -> Result<Vec<RatioRow>> {
    let mut labels: Vec<String> = if tenors.is_empty() {
        curve.quotes().keys().cloned().collect()
    } else {
        tenors.to_vec()
    };
    labels.sort_by(|a, b| Tenor::parse(a).cmp_term(&Tenor::parse(b)));

    labels
        .into_iter()
        .map(|label| {
            let par_ratio = curve.par_ratio(libor, &Tenor::parse(&label))?;
            Ok(RatioRow {
                quote: curve.quotes().get(&label).copied(),
                tenor: label,
                par_ratio,
            })
        })
        .collect()
}

/// Execute the ratio command.
pub fn execute(args: RatioArgs, config: Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let libor = build_libor(&config)?;
    let curve = build_ratio(&config, &libor)?;

    print_section("Par ratios", &ratio_rows(&curve, &libor, &args.tenors)?, format, quiet)?;

    if let Some(maturity) = &args.maturity {
        let date = parse_date(maturity)?;
        let ratio = curve.maturity_ratio(&libor, date)?;
        let rows = [KeyValue::new(format!("Ratio to {date}"), format!("{ratio:.6}"))];
        print_section("Maturity ratio", &rows, format, quiet)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcurve_core::Date;

    fn config() -> Config {
        Config {
            curve_date: Some(Date::from_ymd(2025, 1, 13).unwrap()),
            libor: [("3M", 4.50), ("1Y", 4.35), ("5Y", 4.05), ("10Y", 4.10), ("30Y", 4.30)]
                .into_iter()
                .map(|(t, q)| (t.to_string(), q))
                .collect(),
            ratios: [("1Y", 0.68), ("5Y", 0.70), ("10Y", 0.74)]
                .into_iter()
                .map(|(t, q)| (t.to_string(), q))
                .collect(),
            ..Config::default()
        }
    }

    #[test]
    fn test_quoted_tenors_reprice() {
        let config = config();
        let libor = build_libor(&config).unwrap();
        let curve = build_ratio(&config, &libor).unwrap();
        let rows = ratio_rows(&curve, &libor, &[]).unwrap();

        assert_eq!(rows.iter().map(|r| r.tenor.as_str()).collect::<Vec<_>>(), ["1Y", "5Y", "10Y"]);
        for row in rows {
            let quote = row.quote.unwrap();
            assert!((row.par_ratio - quote).abs() < 1e-8, "{}: {} vs {quote}", row.tenor, row.par_ratio);
        }
    }

    #[test]
    fn test_unquoted_tenor() {
        let config = config();
        let libor = build_libor(&config).unwrap();
        let curve = build_ratio(&config, &libor).unwrap();
        let rows = ratio_rows(&curve, &libor, &["3Y".to_string()]).unwrap();
        assert!(rows[0].quote.is_none());
        assert!(rows[0].par_ratio > 0.68 && rows[0].par_ratio < 0.74);
    }
}
