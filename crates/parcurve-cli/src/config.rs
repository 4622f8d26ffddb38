//! Market file loading.
//!
//! A market file is TOML:
//!
//! ```toml
//! curve_date = "2025-01-13"
//! data_divisor = 100.0
//!
//! [libor]
//! "3M" = 4.50
//! "2Y" = 4.20
//! "10Y" = 4.10
//!
//! [ratios]
//! "5Y" = 0.72
//!
//! [[fixings]]
//! date = "2025-01-10"
//! rate = 4.52
//!
//! [[bonds]]
//! name = "NYC 5s 2040"
//! coupon = 5.0
//! maturity = "2040-01-15"
//! conventions = "municipal"
//! call_date = "2030-01-15"
//! price = 103.25
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use parcurve_bonds::{Bond, BondConventions, CallFeature};
use parcurve_core::Date;
use parcurve_curves::fixings::LIBOR_3M;

use crate::error::{CliError, CliResult};

/// Market file looked for in the working directory when none is given.
pub const DEFAULT_MARKET_FILE: &str = "parcurve.toml";

fn default_data_divisor() -> f64 {
    100.0
}

fn default_ratio_divisor() -> f64 {
    1.0
}

fn default_scenario_shock() -> f64 {
    parcurve_curves::term_structure::DEFAULT_SCENARIO_SHOCK
}

fn default_index() -> String {
    LIBOR_3M.to_string()
}

fn default_conventions() -> String {
    "simple".to_string()
}

fn default_call_price() -> f64 {
    100.0
}

/// Market data and bonds read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Curve date; quotes settle two business days later. Today if absent.
    #[serde(default)]
    pub curve_date: Option<Date>,

    /// Divisor applied to LIBOR quotes and fixings (100 for percent).
    #[serde(default = "default_data_divisor")]
    pub data_divisor: f64,

    /// Divisor applied to ratio quotes.
    #[serde(default = "default_ratio_divisor")]
    pub ratio_divisor: f64,

    /// Parallel shift for DV01 scenarios, in rate units.
    #[serde(default = "default_scenario_shock")]
    pub scenario_shock: f64,

    /// LIBOR deposit and swap quotes by tenor.
    #[serde(default)]
    pub libor: BTreeMap<String, f64>,

    /// Par ratio quotes by tenor.
    #[serde(default)]
    pub ratios: BTreeMap<String, f64>,

    /// Historical index fixings.
    #[serde(default)]
    pub fixings: Vec<FixingEntry>,

    /// Bonds to value.
    #[serde(default)]
    pub bonds: Vec<BondEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            curve_date: None,
            data_divisor: default_data_divisor(),
            ratio_divisor: default_ratio_divisor(),
            scenario_shock: default_scenario_shock(),
            libor: BTreeMap::new(),
            ratios: BTreeMap::new(),
            fixings: Vec::new(),
            bonds: Vec::new(),
        }
    }
}

impl Config {
    /// Reads a market file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| CliError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or [`DEFAULT_MARKET_FILE`] if present, or falls back to
    /// an empty market.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let fallback = PathBuf::from(DEFAULT_MARKET_FILE);
        if fallback.is_file() {
            tracing::debug!(path = %fallback.display(), "using market file from working directory");
            return Self::from_file(&fallback);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_divisor == 0.0 || self.ratio_divisor == 0.0 {
            return Err(CliError::Config("divisors must be non-zero".into()));
        }
        if !self.scenario_shock.is_finite() {
            return Err(CliError::Config("scenario_shock must be finite".into()));
        }
        Ok(())
    }

    /// Looks up a bond by name.
    pub fn bond(&self, name: &str) -> Option<&BondEntry> {
        self.bonds.iter().find(|b| b.name.eq_ignore_ascii_case(name))
    }
}

/// One historical fixing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixingEntry {
    /// Index name.
    #[serde(default = "default_index")]
    pub index: String,
    /// Fixing date.
    pub date: Date,
    /// Rate, scaled like the LIBOR quotes.
    pub rate: f64,
}

/// A bond description with optional market inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondEntry {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Coupon in percent.
    pub coupon: f64,
    /// Maturity date.
    pub maturity: Date,
    /// Settlement date; the curve settlement if absent.
    #[serde(default)]
    pub settlement: Option<Date>,
    /// Conventions preset: simple, municipal, treasury or bill.
    #[serde(default = "default_conventions")]
    pub conventions: String,
    /// First call date.
    #[serde(default)]
    pub call_date: Option<Date>,
    /// Call price.
    #[serde(default = "default_call_price")]
    pub call_price: f64,
    /// Market clean price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Market yield in percent.
    #[serde(default, rename = "yield")]
    pub bond_yield: Option<f64>,
    /// Spread in basis points.
    #[serde(default)]
    pub spread: Option<f64>,
    /// LIBOR ratio.
    #[serde(default)]
    pub ratio: Option<f64>,
    /// Short rate volatility in percent.
    #[serde(default)]
    pub vol: Option<f64>,
}

impl BondEntry {
    /// Builds the bond, settling on `settlement` unless the entry has its own.
    pub fn build(&self, settlement: Option<Date>) -> anyhow::Result<Bond> {
        if !(0.0..=100.0).contains(&self.coupon) {
            return Err(CliError::InvalidCoupon(self.coupon).into());
        }
        let conventions = BondConventions::preset(&self.conventions)
            .ok_or_else(|| CliError::UnknownConventions(self.conventions.clone()))?;
        let call = self.call_date.map(|date| CallFeature::new(date, self.call_price));

        let mut builder = Bond::builder()
            .coupon(self.coupon / 100.0)
            .maturity(self.maturity)
            .conventions(conventions)
            .maybe_call(call);
        if let Some(date) = self.settlement.or(settlement) {
            builder = builder.settlement(date);
        }
        Ok(builder.build()?)
    }

    /// Label for output rows.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            format!("{:.3} {}", self.coupon, self.maturity)
        } else {
            self.name.clone()
        }
    }
}
