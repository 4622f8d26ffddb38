//! Fixed-coupon bond with price/yield conversion and yield-to-worst.
//!
//! Pricing works in settlement terms: the time to maturity is measured in
//! coupon periods (`term = f * yf(settlement, maturity)`), split into whole
//! periods `nper` and the fraction `frac` up to the next coupon. Prices are
//! clean, per 100 of face.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use parcurve_core::calendars::{BusinessDayConvention, Calendar};
use parcurve_core::types::{Frequency, TimeUnit};
use parcurve_core::Date;
use parcurve_math::solvers::{try_secant, SolverConfig};

use crate::conventions::BondConventions;
use crate::error::{BondError, BondResult};
use crate::instruments::call::{CallEntry, CallFeature};

/// Par redemption per 100 of face.
pub const PAR: f64 = 100.0;

/// Yield used for [`Bond::max_price`].
pub const MIN_YIELD: f64 = 1e-6;

/// Yield tolerance for price-to-yield solves.
pub const YIELD_TOLERANCE: f64 = 1e-8;

/// Iteration cap for price-to-yield solves.
pub const MAX_ITERATIONS: u32 = 24;

/// Seed yield when the coupon gives no current-yield estimate.
const ZERO_COUPON_SEED: f64 = 0.05;

/// Second seed offset for zero-coupon solves.
const ZERO_COUPON_STEP: f64 = 1e-4;

/// Price differences below this are treated as par.
const PAR_EPSILON: f64 = 5e-7;

fn is_par(value: f64) -> bool {
    (value - PAR).abs() < PAR_EPSILON
}

/// Which side of the price/yield pair is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcInput {
    /// Clean price per 100; solve for yield.
    Price(f64),
    /// Annual yield as a decimal; solve for price.
    Yield(f64),
}

/// Result of a yield-to-worst calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondCalc {
    /// Yield to the worst redemption.
    pub bond_yield: f64,
    /// Clean price per 100.
    pub price: f64,
    /// Redemption date priced to (maturity or a call date).
    pub to_date: Date,
    /// Redemption price at `to_date`.
    pub to_price: f64,
}

/// A fixed-coupon bond with an optional call feature.
///
/// # Example
///
/// ```rust
/// use parcurve_bonds::instruments::{Bond, CalcInput};
/// use parcurve_core::Date;
///
/// let bond = Bond::builder()
///     .coupon(0.05)
///     .maturity(Date::from_ymd(2035, 1, 15).unwrap())
///     .settlement(Date::from_ymd(2025, 1, 15).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(bond.ytm_to_price(0.05), 100.0);
/// let calc = bond.calc(CalcInput::Yield(0.06)).unwrap();
/// assert!(calc.price < 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    coupon: f64,
    maturity: Date,
    issue_date: Option<Date>,
    oid: Option<f64>,
    redemption: f64,
    call: Option<CallFeature>,
    conventions: BondConventions,
    settlement: Date,
    term: f64,
    nper: u32,
    frac: f64,
    call_list: Vec<CallEntry>,
}

impl Bond {
    /// Creates a new `BondBuilder`.
    #[must_use]
    pub fn builder() -> BondBuilder {
        BondBuilder::default()
    }

    /// A non-callable bond with the default conventions.
    pub fn new(coupon: f64, maturity: Date, settlement: Date) -> BondResult<Self> {
        Self::builder()
            .coupon(coupon)
            .maturity(maturity)
            .settlement(settlement)
            .build()
    }

    /// Moves the bond to a new settlement date.
    ///
    /// Recomputes the period split and regenerates the call list.
    pub fn set_settlement(&mut self, settlement: Date) -> BondResult<()> {
        if settlement > self.maturity {
            return Err(BondError::SettlementAfterMaturity {
                settlement,
                maturity: self.maturity,
            });
        }

        let f = self.periods_per_year();
        let term = f * self.conventions.day_count().year_fraction(settlement, self.maturity);
        let whole = term.floor();
        if !(0.0..=f64::from(u32::MAX)).contains(&whole) {
            return Err(BondError::invalid_spec(format!("term {term} out of range")));
        }

        self.call_list = match &self.call {
            Some(call) => call.call_list(
                self.maturity,
                self.conventions.face(),
                self.conventions.day_count(),
                self.conventions.calendar(),
            )?,
            None => Vec::new(),
        };
        self.settlement = settlement;
        self.term = term;
        self.nper = whole as u32;
        self.frac = term - whole;
        Ok(())
    }

    /// Returns a copy settled on `settlement`.
    pub fn with_settlement(mut self, settlement: Date) -> BondResult<Self> {
        self.set_settlement(settlement)?;
        Ok(self)
    }

    /// Accrued interest per 1 of face.
    #[must_use]
    pub fn accrued_interest(&self) -> f64 {
        if self.frac == 0.0 {
            0.0
        } else {
            (1.0 - self.frac) * self.coupon / self.periods_per_year()
        }
    }

    /// Clean price per 100 at yield `y`, redeeming at the bond's redemption.
    #[must_use]
    pub fn ytm_to_price(&self, y: f64) -> f64 {
        self.ytm_to_price_with_redemption(y, self.redemption)
    }

    /// Clean price per 100 at yield `y`, redeeming at `redemption`.
    ///
    /// A yield equal to the coupon with par redemption prices at exactly 100.
    #[must_use]
    pub fn ytm_to_price_with_redemption(&self, y: f64, redemption: f64) -> f64 {
        if y < 0.0 {
            warn!("negative yield {y} for {self}");
        }
        if y == self.coupon && is_par(redemption) {
            return PAR;
        }

        let f = self.periods_per_year();
        let cpn = self.coupon / f;
        let yp = y / f;
        let nper = f64::from(self.nper);
        let z = (1.0 + yp).powf(-nper);
        let t = (1.0 + yp).powf(-self.frac);
        let annuity = if yp.abs() < f64::EPSILON {
            nper * cpn
        } else {
            cpn / yp * (1.0 - z)
        };
        let next_coupon = if self.frac > 0.0 { cpn } else { 0.0 };

        (t * (annuity + z * redemption / PAR + next_coupon) - self.accrued_interest()) * PAR
    }

    /// Yield to maturity from a clean price.
    pub fn to_ytm(&self, price: f64) -> BondResult<f64> {
        self.to_ytm_with_redemption(price, self.redemption)
    }

    /// Yield from a clean price, redeeming at `redemption`.
    ///
    /// Solved by secant to `1e-8` in at most 24 iterations; the error carries
    /// the last iterate on non-convergence.
    pub fn to_ytm_with_redemption(&self, price: f64, redemption: f64) -> BondResult<f64> {
        if !price.is_finite() || price <= 0.0 {
            return Err(BondError::invalid_input(format!("price must be positive, got {price}")));
        }
        if is_par(price) && is_par(redemption) {
            return Ok(self.coupon);
        }

        let (y0, mut y1) = if self.coupon > 0.0 {
            (self.coupon, PAR * self.coupon / price)
        } else {
            (ZERO_COUPON_SEED, ZERO_COUPON_SEED + ZERO_COUPON_STEP)
        };
        if y1 == y0 {
            y1 = y0 + ZERO_COUPON_STEP;
        }

        let config = SolverConfig::new(YIELD_TOLERANCE, MAX_ITERATIONS);
        let result = try_secant(
            |y| Ok::<f64, BondError>(self.ytm_to_price_with_redemption(y, redemption)),
            y0,
            y1,
            price,
            &config,
        )?;
        Ok(result.root)
    }

    /// The equivalent bullet bond redeemed at a call.
    pub fn to_call(&self, entry: &CallEntry) -> BondResult<Bond> {
        let mut bond = self.clone();
        bond.maturity = entry.date;
        bond.redemption = entry.price;
        bond.call = None;
        bond.set_settlement(self.settlement)?;
        Ok(bond)
    }

    /// Yield-to-worst price/yield conversion.
    ///
    /// Candidates are maturity plus every call at least one coupon period
    /// after settlement; from a price, only calls at or below that price are
    /// considered. The lowest resulting yield (or price) wins.
    pub fn calc(&self, input: CalcInput) -> BondResult<BondCalc> {
        let (level, from_price) = match input {
            CalcInput::Price(price) => (price, true),
            CalcInput::Yield(y) => (y, false),
        };
        let evaluate = |bond: &Bond| -> BondResult<f64> {
            if from_price {
                bond.to_ytm(level)
            } else {
                Ok(bond.ytm_to_price(level))
            }
        };

        let mut worst = evaluate(self)?;
        let mut to_date = self.maturity;
        let mut to_price = self.redemption;

        if !self.call_list.is_empty() {
            let months = i32::try_from(self.frequency().months_per_period())
                .map_err(|_| BondError::invalid_spec("frequency out of range"))?;
            let earliest = self.conventions.calendar().advance(
                self.settlement,
                months,
                TimeUnit::Months,
                BusinessDayConvention::Unadjusted,
            )?;

            for entry in &self.call_list {
                let eligible = entry.date >= earliest
                    && (!from_price || entry.price <= level)
                    && (entry.date < to_date || entry.price < to_price);
                if !eligible {
                    continue;
                }
                let value = evaluate(&self.to_call(entry)?)?;
                if value <= worst {
                    worst = value;
                    to_date = entry.date;
                    to_price = entry.price;
                }
            }
        }

        Ok(match input {
            CalcInput::Price(price) => BondCalc {
                bond_yield: worst,
                price,
                to_date,
                to_price,
            },
            CalcInput::Yield(y) => BondCalc {
                bond_yield: y,
                price: worst,
                to_date,
                to_price,
            },
        })
    }

    /// [`calc`](Self::calc) from optional inputs; exactly one must be given.
    pub fn calc_from(&self, price: Option<f64>, bond_yield: Option<f64>) -> BondResult<BondCalc> {
        match (price, bond_yield) {
            (Some(price), None) => self.calc(CalcInput::Price(price)),
            (None, Some(y)) => self.calc(CalcInput::Yield(y)),
            (Some(_), Some(_)) => Err(BondError::invalid_input("both price and yield given")),
            (None, None) => Err(BondError::invalid_input("either price or yield is required")),
        }
    }

    /// Yield-to-worst price.
    pub fn to_price(&self, y: f64) -> BondResult<f64> {
        Ok(self.calc(CalcInput::Yield(y))?.price)
    }

    /// Yield to worst from a price.
    pub fn to_yield(&self, price: f64) -> BondResult<f64> {
        Ok(self.calc(CalcInput::Price(price))?.bond_yield)
    }

    /// Highest meaningful price: the yield-to-worst price at a near-zero yield.
    pub fn max_price(&self) -> BondResult<f64> {
        self.to_price(MIN_YIELD)
    }

    /// Annual coupon rate.
    #[must_use]
    pub fn coupon(&self) -> f64 {
        self.coupon
    }

    /// Maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Issue date, when known.
    #[must_use]
    pub fn issue_date(&self) -> Option<Date> {
        self.issue_date
    }

    /// Original issue yield, when known.
    #[must_use]
    pub fn oid(&self) -> Option<f64> {
        self.oid
    }

    /// Redemption per 100 at maturity.
    #[must_use]
    pub fn redemption(&self) -> f64 {
        self.redemption
    }

    /// Call feature.
    #[must_use]
    pub fn call_feature(&self) -> Option<&CallFeature> {
        self.call.as_ref()
    }

    /// Generated call schedule.
    #[must_use]
    pub fn call_list(&self) -> &[CallEntry] {
        &self.call_list
    }

    /// Whether the bond has any calls before maturity.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        !self.call_list.is_empty()
    }

    /// Market conventions.
    #[must_use]
    pub fn conventions(&self) -> &BondConventions {
        &self.conventions
    }

    /// Coupon frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.conventions.frequency()
    }

    /// Coupons per year.
    #[must_use]
    pub fn periods_per_year(&self) -> f64 {
        self.conventions.frequency().as_f64()
    }

    /// Settlement date.
    #[must_use]
    pub fn settlement(&self) -> Date {
        self.settlement
    }

    /// Coupon periods from settlement to maturity.
    #[must_use]
    pub fn term(&self) -> f64 {
        self.term
    }

    /// Whole coupon periods to maturity.
    #[must_use]
    pub fn nper(&self) -> u32 {
        self.nper
    }

    /// Fraction of a period to the next coupon.
    #[must_use]
    pub fn frac(&self) -> f64 {
        self.frac
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}% {}", self.coupon * 100.0, self.maturity)?;
        if let Some(call) = &self.call {
            write!(f, " callable {} @ {}", call.first_call, call.call_price)?;
        }
        Ok(())
    }
}

/// Builder for [`Bond`].
#[derive(Debug, Clone, Default)]
pub struct BondBuilder {
    coupon: Option<f64>,
    maturity: Option<Date>,
    issue_date: Option<Date>,
    oid: Option<f64>,
    redemption: Option<f64>,
    call: Option<CallFeature>,
    conventions: Option<BondConventions>,
    settlement: Option<Date>,
}

impl BondBuilder {
    /// Sets the annual coupon rate (0.05 for 5%).
    #[must_use]
    pub fn coupon(mut self, coupon: f64) -> Self {
        self.coupon = Some(coupon);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity(mut self, maturity: Date) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Sets the issue date.
    #[must_use]
    pub fn issue_date(mut self, issue_date: Date) -> Self {
        self.issue_date = Some(issue_date);
        self
    }

    /// Sets the original issue yield.
    #[must_use]
    pub fn oid(mut self, oid: f64) -> Self {
        self.oid = Some(oid);
        self
    }

    /// Sets the redemption per 100.
    #[must_use]
    pub fn redemption(mut self, redemption: f64) -> Self {
        self.redemption = Some(redemption);
        self
    }

    /// Sets the call feature.
    #[must_use]
    pub fn call(mut self, call: CallFeature) -> Self {
        self.call = Some(call);
        self
    }

    /// Sets the call feature when present.
    #[must_use]
    pub fn maybe_call(mut self, call: Option<CallFeature>) -> Self {
        self.call = call;
        self
    }

    /// Sets the market conventions.
    #[must_use]
    pub fn conventions(mut self, conventions: BondConventions) -> Self {
        self.conventions = Some(conventions);
        self
    }

    /// Uses municipal conventions.
    #[must_use]
    pub fn municipal(self) -> Self {
        self.conventions(BondConventions::municipal())
    }

    /// Uses US Treasury conventions.
    #[must_use]
    pub fn us_treasury(self) -> Self {
        self.conventions(BondConventions::us_treasury())
    }

    /// Sets the settlement date.
    #[must_use]
    pub fn settlement(mut self, settlement: Date) -> Self {
        self.settlement = Some(settlement);
        self
    }

    /// Builds the bond.
    ///
    /// Without an explicit settlement, settles from today under the
    /// conventions' settlement lag.
    pub fn build(self) -> BondResult<Bond> {
        let coupon = self
            .coupon
            .ok_or_else(|| BondError::invalid_spec("coupon is required"))?;
        let maturity = self
            .maturity
            .ok_or_else(|| BondError::invalid_spec("maturity is required"))?;
        let conventions = self.conventions.unwrap_or_default();
        let redemption = self.redemption.unwrap_or(PAR);

        if !coupon.is_finite() || coupon < 0.0 {
            return Err(BondError::invalid_spec(format!("coupon {coupon} must be non-negative")));
        }
        if !redemption.is_finite() || redemption <= 0.0 {
            return Err(BondError::invalid_spec(format!(
                "redemption {redemption} must be positive"
            )));
        }
        if conventions.frequency().is_zero() {
            return Err(BondError::invalid_spec("bond needs a periodic coupon frequency"));
        }
        if let Some(issue) = self.issue_date {
            if maturity <= issue {
                return Err(BondError::invalid_spec(format!(
                    "maturity {maturity} must be after issue {issue}"
                )));
            }
        }

        let settlement = match self.settlement {
            Some(date) => date,
            None => conventions.settlement_date(Date::today())?,
        };

        let mut bond = Bond {
            coupon,
            maturity,
            issue_date: self.issue_date,
            oid: self.oid,
            redemption,
            call: self.call,
            conventions,
            settlement,
            term: 0.0,
            nper: 0,
            frac: 0.0,
            call_list: Vec::new(),
        };
        bond.set_settlement(settlement)?;
        Ok(bond)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn ten_year() -> Bond {
        Bond::new(0.05, d(2035, 1, 15), d(2025, 1, 15)).unwrap()
    }

    #[test]
    fn test_period_split() {
        let bond = ten_year();
        assert_relative_eq!(bond.term(), 20.0, epsilon = 1e-12);
        assert_eq!(bond.nper(), 20);
        assert_eq!(bond.frac(), 0.0);
        assert_eq!(bond.accrued_interest(), 0.0);

        // 30/360: 2 months before the 2025-03-15 coupon
        let odd = Bond::new(0.06, d(2030, 3, 15), d(2025, 1, 15)).unwrap();
        assert_eq!(odd.nper(), 10);
        assert_relative_eq!(odd.frac(), 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(odd.accrued_interest(), 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_par_invariant() {
        let bond = ten_year();
        assert_eq!(bond.ytm_to_price(0.05), 100.0);
        assert_eq!(bond.to_ytm(100.0).unwrap(), 0.05);
    }

    #[test]
    fn test_known_price() {
        // 20 periods at 3%: 2.5 * a(20, 3%) + 100 * v^20
        let bond = ten_year();
        let v20 = 1.03_f64.powi(-20);
        let expected = 2.5 * (1.0 - v20) / 0.03 + 100.0 * v20;
        assert_relative_eq!(bond.ytm_to_price(0.06), expected, epsilon = 1e-10);
        assert!(bond.ytm_to_price(0.06) < 100.0);
    }

    #[test]
    fn test_zero_yield_prices_undiscounted() {
        let bond = ten_year();
        assert_relative_eq!(bond.ytm_to_price(0.0), 150.0, epsilon = 1e-10);
    }

    #[test]
    fn test_negative_yield_proceeds() {
        let bond = ten_year();
        assert!(bond.ytm_to_price(-0.005) > 150.0);
    }

    #[test]
    fn test_round_trip_with_stub() {
        let bond = Bond::new(0.045, d(2033, 5, 1), d(2025, 2, 20)).unwrap();
        for y in [0.01, 0.045, 0.07, 0.15] {
            let price = bond.ytm_to_price(y);
            assert_relative_eq!(bond.to_ytm(price).unwrap(), y, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_zero_coupon_solve() {
        let bond = Bond::new(0.0, d(2035, 1, 15), d(2025, 1, 15)).unwrap();
        let price = bond.ytm_to_price(0.04);
        assert_relative_eq!(price, 100.0 * 1.02_f64.powi(-20), epsilon = 1e-10);
        assert_relative_eq!(bond.to_ytm(price).unwrap(), 0.04, epsilon = 1e-7);
    }

    #[test]
    fn test_premium_bond_prices_to_call() {
        let call = CallFeature::new(d(2030, 1, 15), 100.0);
        let bond = Bond::builder()
            .coupon(0.06)
            .maturity(d(2035, 1, 15))
            .settlement(d(2025, 1, 15))
            .call(call)
            .build()
            .unwrap();

        let calc = bond.calc(CalcInput::Price(102.0)).unwrap();
        assert_eq!(calc.to_date, d(2030, 1, 15));
        assert_eq!(calc.to_price, 100.0);
        assert!(calc.bond_yield < ten_year_yield(&bond, 102.0));

        let calc = bond.calc(CalcInput::Yield(0.05)).unwrap();
        assert_eq!(calc.to_date, d(2030, 1, 15));
        assert!(calc.price < bond.ytm_to_price(0.05));
    }

    fn ten_year_yield(bond: &Bond, price: f64) -> f64 {
        bond.to_ytm(price).unwrap()
    }

    #[test]
    fn test_discount_bond_prices_to_maturity() {
        let call = CallFeature::new(d(2030, 1, 15), 100.0);
        let bond = Bond::builder()
            .coupon(0.04)
            .maturity(d(2035, 1, 15))
            .settlement(d(2025, 1, 15))
            .call(call)
            .build()
            .unwrap();

        let calc = bond.calc(CalcInput::Price(95.0)).unwrap();
        assert_eq!(calc.to_date, d(2035, 1, 15));
        assert_eq!(calc.to_price, 100.0);
    }

    #[test]
    fn test_calls_inside_first_period_are_skipped() {
        let call = CallFeature::new(d(2025, 3, 1), 100.0);
        let bond = Bond::builder()
            .coupon(0.06)
            .maturity(d(2026, 1, 15))
            .settlement(d(2025, 1, 15))
            .call(call)
            .build()
            .unwrap();
        assert_eq!(bond.call_list()[0].date, d(2025, 3, 1));

        let calc = bond.calc(CalcInput::Price(101.0)).unwrap();
        assert_eq!(calc.to_date, d(2025, 9, 1));
    }

    #[test]
    fn test_calc_from_requires_exactly_one() {
        let bond = ten_year();
        assert!(matches!(
            bond.calc_from(Some(100.0), Some(0.05)),
            Err(BondError::InvalidInput { .. })
        ));
        assert!(matches!(bond.calc_from(None, None), Err(BondError::InvalidInput { .. })));
        let calc = bond.calc_from(Some(100.0), None).unwrap();
        assert_relative_eq!(calc.bond_yield, 0.05);
    }

    #[test]
    fn test_settlement_after_maturity() {
        let mut bond = ten_year();
        assert!(matches!(
            bond.set_settlement(d(2035, 2, 1)),
            Err(BondError::SettlementAfterMaturity { .. })
        ));
        assert_eq!(bond.settlement(), d(2025, 1, 15));
    }

    #[test]
    fn test_to_call_tracks_settlement() {
        let call = CallFeature::new(d(2030, 1, 15), 101.0);
        let mut bond = Bond::builder()
            .coupon(0.05)
            .maturity(d(2035, 1, 15))
            .settlement(d(2025, 1, 15))
            .call(call)
            .build()
            .unwrap();
        bond.set_settlement(d(2026, 1, 15)).unwrap();

        let to_call = bond.to_call(&bond.call_list()[0]).unwrap();
        assert_eq!(to_call.settlement(), d(2026, 1, 15));
        assert_eq!(to_call.nper(), 8);
        assert_eq!(to_call.redemption(), 101.0);
        assert!(!to_call.is_callable());
    }

    #[test]
    fn test_builder_validation() {
        assert!(Bond::builder().coupon(0.05).build().is_err());
        assert!(Bond::builder()
            .coupon(0.05)
            .maturity(d(2030, 1, 1))
            .issue_date(d(2031, 1, 1))
            .settlement(d(2025, 1, 1))
            .build()
            .is_err());
        assert!(Bond::builder()
            .coupon(0.05)
            .maturity(d(2030, 1, 1))
            .conventions(BondConventions::us_treasury_bill())
            .settlement(d(2025, 1, 1))
            .build()
            .is_err());
    }

    #[test]
    fn test_max_price() {
        let bond = ten_year();
        assert!(bond.max_price().unwrap() > 149.9);
    }
}
