//! Inputs and results of asset swap and OAS valuation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use parcurve_bonds::ModelKind;

use crate::error::AnalyticsError;

/// Volatility standing in for "no optionality".
pub const MIN_VOL: f64 = 1e-7;

/// Ceiling on implied volatility (1000%).
pub const MAX_VOL: f64 = 10.0;

/// How a spread is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpreadType {
    /// Spread over LIBOR on the floating leg of the asset swap.
    #[default]
    #[serde(rename = "S", alias = "asset_swap")]
    AssetSwap,
    /// Zero spread over the whole discount curve.
    #[serde(rename = "O", alias = "oas")]
    Oas,
}

impl SpreadType {
    /// One-letter code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::AssetSwap => "S",
            Self::Oas => "O",
        }
    }
}

impl fmt::Display for SpreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SpreadType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "asw" | "asset_swap" | "assetswap" => Ok(Self::AssetSwap),
            "o" | "oas" => Ok(Self::Oas),
            _ => Err(AnalyticsError::invalid_input(format!("unknown spread type: {s}"))),
        }
    }
}

/// Spread, ratio, volatility and model for one valuation.
///
/// Defaults to a zero spread at a ratio of one, minimal volatility,
/// asset swap spreads and Black-Karasinski.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AswTerms {
    /// Spread (decimal).
    pub spread: f64,
    /// LIBOR ratio applied to the swap.
    pub ratio: f64,
    /// Short rate volatility.
    pub vol: f64,
    /// How the spread is applied.
    pub spread_type: SpreadType,
    /// Short rate model for the call.
    pub model: ModelKind,
}

impl Default for AswTerms {
    fn default() -> Self {
        Self {
            spread: 0.0,
            ratio: 1.0,
            vol: MIN_VOL,
            spread_type: SpreadType::AssetSwap,
            model: ModelKind::BlackKarasinski,
        }
    }
}

impl AswTerms {
    /// Terms with the given spread type and defaults otherwise.
    #[must_use]
    pub fn new(spread_type: SpreadType) -> Self {
        Self {
            spread_type,
            ..Self::default()
        }
    }

    /// Sets the spread.
    #[must_use]
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Sets the ratio.
    #[must_use]
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Sets the volatility.
    #[must_use]
    pub fn with_vol(mut self, vol: f64) -> Self {
        self.vol = vol;
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }
}

/// Full set of values for a bond at one spread, ratio and volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondValues {
    /// Yield to worst at `price`.
    pub bond_yield: f64,
    /// Model price.
    pub price: f64,
    /// Yield to maturity of the option-free price.
    pub oas_yield: f64,
    /// Value of the call, in points.
    pub call_value: f64,
    /// Price without the call: `price + call_value`.
    pub oas_price: f64,
    /// Spread used.
    pub spread: f64,
    /// Ratio used.
    pub ratio: f64,
    /// `spread * ratio`.
    pub geared_spread: f64,
    /// Volatility used.
    pub vol: f64,
    /// How the spread was applied.
    pub spread_type: SpreadType,
    /// Short rate model used.
    pub model: ModelKind,
    /// Symmetric price change for a one basis point curve shift.
    pub dv01: Option<f64>,
}

impl fmt::Display for BondValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:.3}, {:.3}>", self.price, 100.0 * self.bond_yield)
    }
}

/// A valuation request: two of price-or-yield, spread-or-ratio and vol.
///
/// - price/yield and vol: solve the spread (or the ratio, when only a
///   spread is given)
/// - price/yield and spread/ratio: solve the implied volatility
/// - spread/ratio and vol: value the bond
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OasRequest {
    /// Market price.
    pub price: Option<f64>,
    /// Market yield.
    pub bond_yield: Option<f64>,
    /// Spread (decimal).
    pub spread: Option<f64>,
    /// LIBOR ratio.
    pub ratio: Option<f64>,
    /// Volatility.
    pub vol: Option<f64>,
    /// How the spread is applied.
    pub spread_type: SpreadType,
    /// Short rate model.
    pub model: ModelKind,
}

impl OasRequest {
    /// True when a price or yield is given.
    #[must_use]
    pub fn has_market(&self) -> bool {
        self.price.is_some() || self.bond_yield.is_some()
    }

    /// True when a spread or ratio is given.
    #[must_use]
    pub fn has_spread(&self) -> bool {
        self.spread.is_some() || self.ratio.is_some()
    }

    /// Base terms with defaults for anything missing.
    #[must_use]
    pub fn terms(&self) -> AswTerms {
        AswTerms {
            spread: self.spread.unwrap_or(0.0),
            ratio: self.ratio.unwrap_or(1.0),
            vol: self.vol.unwrap_or(MIN_VOL),
            spread_type: self.spread_type,
            model: self.model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_type_codes() {
        assert_eq!("S".parse::<SpreadType>().unwrap(), SpreadType::AssetSwap);
        assert_eq!("oas".parse::<SpreadType>().unwrap(), SpreadType::Oas);
        assert!("Z".parse::<SpreadType>().is_err());
        assert_eq!(serde_json::to_string(&SpreadType::Oas).unwrap(), "\"O\"");
    }

    #[test]
    fn test_request_defaults() {
        let request = OasRequest {
            price: Some(101.0),
            spread: Some(0.002),
            ..OasRequest::default()
        };
        assert!(request.has_market());
        assert!(request.has_spread());
        let terms = request.terms();
        assert_eq!(terms.ratio, 1.0);
        assert_eq!(terms.vol, MIN_VOL);
    }

    #[test]
    fn test_values_display() {
        let values = BondValues {
            bond_yield: 0.0425,
            price: 101.5,
            oas_yield: 0.04,
            call_value: 0.5,
            oas_price: 102.0,
            spread: 0.001,
            ratio: 1.0,
            geared_spread: 0.001,
            vol: 0.1,
            spread_type: SpreadType::AssetSwap,
            model: ModelKind::BlackKarasinski,
            dv01: None,
        };
        assert_eq!(values.to_string(), "<101.500, 4.250>");
    }
}
