//! US Treasury bills.
//!
//! Bills are quoted on a bank discount basis (ACT/360) and compared on a
//! money-market yield (ACT/ACT). Beyond six months the yield is the
//! semiannual bond-equivalent yield of a zero-coupon bond.

use serde::{Deserialize, Serialize};

use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::Frequency;
use parcurve_core::Date;

use crate::conventions::BondConventions;
use crate::error::{BondError, BondResult};
use crate::instruments::bond::{Bond, BondCalc, PAR};

/// Known side of a bill calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillInput {
    /// Bank discount rate as a decimal.
    Discount(f64),
    /// Money-market or bond-equivalent yield as a decimal.
    Yield(f64),
    /// Price per 100.
    Price(f64),
}

/// A Treasury bill.
///
/// # Example
///
/// ```rust
/// use parcurve_bonds::instruments::{BillInput, TreasuryBill};
/// use parcurve_core::Date;
///
/// let bill = TreasuryBill::new(
///     Date::from_ymd(2025, 4, 17).unwrap(),
///     Date::from_ymd(2025, 1, 16).unwrap(),
/// )
/// .unwrap();
///
/// // 91 days at a 4.20% discount
/// let calc = bill.calc(BillInput::Discount(0.042)).unwrap();
/// assert!((calc.price - (100.0 - 4.2 * 91.0 / 360.0)).abs() < 1e-12);
/// assert!(calc.bond_yield > 0.042);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TreasuryBill {
    bond: Bond,
}

impl TreasuryBill {
    /// Creates a bill settling on `settlement`.
    pub fn new(maturity: Date, settlement: Date) -> BondResult<Self> {
        // Periodic twin used for the bond-equivalent yield past six months
        let conventions = BondConventions::builder()
            .settlement_days(BondConventions::us_treasury_bill().settlement_days())
            .day_count(DayCountConvention::Act360)
            .frequency(Frequency::SemiAnnual)
            .payment_convention(BusinessDayConvention::ModifiedFollowing)
            .calendar(CalendarId::UsGovernmentBond)
            .build();
        let bond = Bond::builder()
            .coupon(0.0)
            .maturity(maturity)
            .conventions(conventions)
            .settlement(settlement)
            .build()?;
        Ok(Self { bond })
    }

    /// Moves the bill to a new settlement date.
    pub fn set_settlement(&mut self, settlement: Date) -> BondResult<()> {
        self.bond.set_settlement(settlement)
    }

    /// Maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.bond.maturity()
    }

    /// Settlement date.
    #[must_use]
    pub fn settlement(&self) -> Date {
        self.bond.settlement()
    }

    /// Bill conventions.
    #[must_use]
    pub fn conventions(&self) -> BondConventions {
        BondConventions::us_treasury_bill()
    }

    fn discount_fraction(&self) -> f64 {
        DayCountConvention::Act360.year_fraction(self.settlement(), self.maturity())
    }

    fn yield_fraction(&self) -> f64 {
        DayCountConvention::ActActIsda.year_fraction(self.settlement(), self.maturity())
    }

    /// Price per 100 from a bank discount rate.
    #[must_use]
    pub fn discount_to_price(&self, discount: f64) -> f64 {
        PAR * (1.0 - discount * self.discount_fraction())
    }

    /// Money-market yield from a price.
    pub fn to_yield(&self, price: f64) -> BondResult<f64> {
        let yf = self.yield_fraction();
        if !price.is_finite() || price <= 0.0 {
            return Err(BondError::invalid_input(format!("price must be positive, got {price}")));
        }
        if yf <= 0.0 {
            return Err(BondError::invalid_input("bill settles on its maturity"));
        }
        Ok((PAR - price) / (price * yf))
    }

    /// Price from a yield: simple interest inside six months, else the
    /// semiannual zero-coupon formula.
    #[must_use]
    pub fn to_price(&self, bond_yield: f64) -> f64 {
        let yf = self.yield_fraction();
        if yf < 0.5 {
            PAR / (1.0 + bond_yield * yf)
        } else {
            self.bond.ytm_to_price(bond_yield)
        }
    }

    /// Price and yield from any one of discount, yield or price.
    pub fn calc(&self, input: BillInput) -> BondResult<BondCalc> {
        let (price, bond_yield) = match input {
            BillInput::Discount(discount) => {
                let price = self.discount_to_price(discount);
                (price, self.to_yield(price)?)
            }
            BillInput::Price(price) => (price, self.to_yield(price)?),
            BillInput::Yield(y) => (self.to_price(y), y),
        };
        Ok(BondCalc {
            bond_yield,
            price,
            to_date: self.maturity(),
            to_price: PAR,
        })
    }
}
