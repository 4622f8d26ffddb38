//! Tax analytics for tax-exempt municipal bonds.
//!
//! A municipal bond bought at a market discount is taxed on the accreted
//! discount at redemption. Discounts smaller than the de minimis threshold
//! (a quarter point per full year to maturity) are taxed as capital gains,
//! larger ones as ordinary income.

use log::warn;
use serde::{Deserialize, Serialize};

use parcurve_core::Date;

use crate::error::BondResult;
use crate::instruments::bond::{Bond, CalcInput, PAR};

/// De minimis points per full year to maturity.
pub const DE_MINIMIS_POINTS_PER_YEAR: f64 = 0.25;

/// Investor tax rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRates {
    /// Rate on discounts within the de minimis threshold.
    pub capital_gains: f64,
    /// Rate on discounts beyond it.
    pub ordinary_income: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            capital_gains: 0.15,
            ordinary_income: 0.35,
        }
    }
}

/// Qualified-tax cutoff for market discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualifiedTax {
    /// Accretion basis: the OID price when issued at a discount, else par.
    pub redemption: f64,
    /// De minimis discount in points.
    pub de_minimis: f64,
    /// Yield at the de minimis price.
    pub bond_yield: f64,
}

/// After-tax yield of a municipal bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AfterTaxYield {
    /// After-tax yield.
    pub bond_yield: f64,
    /// Whether the price carries taxable market discount.
    pub market_discount_taxed: bool,
    /// Redemption date priced to.
    pub to_date: Date,
    /// Effective redemption after tax.
    pub to_price: f64,
}

impl Bond {
    /// Qualified-tax cutoff at the standard quarter point per year.
    #[must_use]
    pub fn qtax(&self) -> QualifiedTax {
        self.qtax_with_points(DE_MINIMIS_POINTS_PER_YEAR)
    }

    /// Qualified-tax cutoff with `points_per_year` of de minimis.
    ///
    /// When the yield solve fails the coupon is reported.
    #[must_use]
    pub fn qtax_with_points(&self, points_per_year: f64) -> QualifiedTax {
        let redemption = match self.oid() {
            Some(oid) if oid > self.coupon() => self.ytm_to_price(oid),
            _ => PAR,
        };
        let years = (f64::from(self.nper()) / self.periods_per_year()).floor();
        let de_minimis = years * points_per_year;
        let bond_yield = self.to_ytm(redemption - de_minimis).unwrap_or_else(|e| {
            warn!("qtax yield failed for {self}: {e}");
            self.coupon()
        });
        QualifiedTax {
            redemption,
            de_minimis,
            bond_yield,
        }
    }

    /// After-tax yield at a clean price.
    ///
    /// At or below the qualified-tax redemption the discount is taxed at
    /// redemption; above it the ordinary yield to worst applies.
    pub fn after_tax_yield(&self, price: f64, rates: &TaxRates) -> BondResult<AfterTaxYield> {
        let qtax = self.qtax();
        if price <= qtax.redemption {
            let discount = (qtax.redemption - price).max(0.0);
            let rate = if discount < qtax.de_minimis {
                rates.capital_gains
            } else {
                rates.ordinary_income
            };
            let redemption = PAR - discount * rate;
            let bond_yield = self.to_ytm_with_redemption(price, redemption)?;
            return Ok(AfterTaxYield {
                bond_yield,
                market_discount_taxed: true,
                to_date: self.maturity(),
                to_price: redemption,
            });
        }

        let calc = self.calc(CalcInput::Price(price))?;
        Ok(AfterTaxYield {
            bond_yield: calc.bond_yield,
            market_discount_taxed: false,
            to_date: calc.to_date,
            to_price: calc.to_price,
        })
    }
}
