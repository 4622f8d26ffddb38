//! CLI command implementations.

pub mod curve;
pub mod oas;
pub mod price;
pub mod ratio;

pub use curve::CurveArgs;
pub use oas::OasArgs;
pub use price::PriceArgs;
pub use ratio::RatioArgs;

use anyhow::{Context, Result};
use clap::Args;
use parcurve_core::Date;
use parcurve_curves::{RatioCurve, TermStructureModel};

use crate::config::{BondEntry, Config};
use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Validates a yield value in percent.
pub fn validate_yield(yield_value: f64) -> CliResult<f64> {
    if !(-10.0..=100.0).contains(&yield_value) {
        return Err(CliError::InvalidYield(yield_value));
    }
    Ok(yield_value)
}

/// Validates a price value.
pub fn validate_price(price: f64) -> CliResult<f64> {
    if price <= 0.0 || !price.is_finite() {
        return Err(CliError::InvalidPrice(price));
    }
    Ok(price)
}

/// Bond terms given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct BondArgs {
    /// Annual coupon rate (as percentage, e.g., 5.0 for 5%)
    #[arg(long)]
    pub coupon: Option<f64>,

    /// Maturity date (YYYY-MM-DD)
    #[arg(short, long)]
    pub maturity: Option<String>,

    /// Settlement date (YYYY-MM-DD)
    #[arg(short, long)]
    pub settlement: Option<String>,

    /// Conventions preset: simple, municipal, treasury or bill
    #[arg(long, default_value = "simple")]
    pub conventions: String,

    /// First call date (YYYY-MM-DD)
    #[arg(long)]
    pub call_date: Option<String>,

    /// Call price
    #[arg(long, default_value = "100")]
    pub call_price: f64,
}

impl BondArgs {
    /// True when a bond is described on the command line.
    pub fn is_given(&self) -> bool {
        self.coupon.is_some() || self.maturity.is_some()
    }

    /// Converts to a market file entry.
    pub fn to_entry(&self) -> CliResult<BondEntry> {
        let coupon = self
            .coupon
            .ok_or_else(|| CliError::MissingArgument("--coupon".into()))?;
        let maturity = self
            .maturity
            .as_deref()
            .ok_or_else(|| CliError::MissingArgument("--maturity".into()))
            .and_then(parse_date)?;
        Ok(BondEntry {
            name: String::new(),
            coupon,
            maturity,
            settlement: self.settlement.as_deref().map(parse_date).transpose()?,
            conventions: self.conventions.clone(),
            call_date: self.call_date.as_deref().map(parse_date).transpose()?,
            call_price: self.call_price,
            price: None,
            bond_yield: None,
            spread: None,
            ratio: None,
            vol: None,
        })
    }
}

/// Bootstraps the LIBOR curve from the market file.
pub fn build_libor(config: &Config) -> Result<TermStructureModel> {
    if config.libor.is_empty() {
        return Err(CliError::Config("no [libor] quotes in the market file".into()).into());
    }
    let span = tracing::info_span!("libor", quotes = config.libor.len());
    let _guard = span.enter();

    let mut model = TermStructureModel::new("LIBOR").with_data_divisor(config.data_divisor);
    for fixing in &config.fixings {
        if !model
            .fixings_mut()
            .add_fixing_f64(&fixing.index, fixing.date, fixing.rate / config.data_divisor)
        {
            log::warn!("skipping fixing {} on {}: rate {}", fixing.index, fixing.date, fixing.rate);
        }
    }
    model.set_scenario_shock(config.scenario_shock);
    model
        .update(&config.libor, config.curve_date)
        .context("bootstrapping LIBOR curve")?;

    tracing::info!(
        settlement = ?model.settlement(),
        version = model.version(),
        "LIBOR curve built"
    );
    Ok(model)
}

/// Bootstraps the ratio curve against `libor`.
pub fn build_ratio(config: &Config, libor: &TermStructureModel) -> Result<RatioCurve> {
    if config.ratios.is_empty() {
        return Err(CliError::Config("no [ratios] quotes in the market file".into()).into());
    }
    let span = tracing::info_span!("ratio", quotes = config.ratios.len());
    let _guard = span.enter();

    let mut curve = RatioCurve::new("RATIO").with_data_divisor(config.ratio_divisor);
    curve
        .update(libor, &config.ratios)
        .context("bootstrapping ratio curve")?;
    tracing::info!("ratio curve built");
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2030-01-15").unwrap(), Date::from_ymd(2030, 1, 15).unwrap());
        assert!(matches!(parse_date("15/01/2030"), Err(CliError::InvalidDate(_))));
    }

    #[test]
    fn test_validation() {
        assert!(validate_yield(4.5).is_ok());
        assert!(validate_yield(150.0).is_err());
        assert!(validate_price(0.0).is_err());
    }

    #[test]
    fn test_bond_args_entry() {
        let args = BondArgs {
            coupon: Some(5.0),
            maturity: Some("2040-01-15".into()),
            call_date: Some("2030-01-15".into()),
            call_price: 100.0,
            conventions: "municipal".into(),
            ..BondArgs::default()
        };
        assert!(args.is_given());
        let entry = args.to_entry().unwrap();
        assert_eq!(entry.call_date, Some(Date::from_ymd(2030, 1, 15).unwrap()));

        let missing = BondArgs {
            coupon: Some(5.0),
            ..BondArgs::default()
        };
        assert!(matches!(missing.to_entry(), Err(CliError::MissingArgument(_))));
    }

    #[test]
    fn test_build_libor_requires_quotes() {
        assert!(build_libor(&Config::default()).is_err());
    }
}
