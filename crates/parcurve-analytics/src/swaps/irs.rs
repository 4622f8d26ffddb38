//! USD LIBOR vanilla interest rate swap.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::{Date, Tenor};
use parcurve_curves::fixings::{FixingStore, LIBOR_3M};
use parcurve_curves::{Curve, CurveServices};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Notional of every swap built here.
pub const SWAP_NOTIONAL: f64 = 100.0;

/// Fixed leg: semiannual, 30/360, unadjusted.
const FIXED_LEG_MONTHS: u32 = 6;
const FIXED_DAY_COUNT: DayCountConvention = DayCountConvention::Thirty360;
const FIXED_ADJUSTMENT: BusinessDayConvention = BusinessDayConvention::Unadjusted;

/// Floating leg: quarterly 3M LIBOR, ACT/360, modified following.
const FLOAT_LEG_MONTHS: u32 = 3;
const FLOAT_DAY_COUNT: DayCountConvention = DayCountConvention::Act360;
const FLOAT_ADJUSTMENT: BusinessDayConvention = BusinessDayConvention::ModifiedFollowing;

/// Which side of the fixed leg the holder is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Pays fixed, receives floating.
    #[default]
    Payer,
    /// Receives fixed, pays floating.
    Receiver,
}

impl SwapDirection {
    fn sign(self) -> f64 {
        match self {
            Self::Payer => 1.0,
            Self::Receiver => -1.0,
        }
    }
}

/// A fixed-for-floating swap on 3M LIBOR with notional 100.
///
/// Schedules are generated back from maturity, so a broken period falls at
/// the start. Periods paying on or before the curve's reference date are
/// ignored when valuing.
///
/// # Example
///
/// ```rust
/// use parcurve_analytics::swaps::{InterestRateSwap, SwapDirection};
/// use parcurve_core::Date;
///
/// let start = Date::from_ymd(2025, 1, 15).unwrap();
/// let swap = InterestRateSwap::new(
///     start,
///     start.add_years(5).unwrap(),
///     0.04,
///     0.0,
///     SwapDirection::Payer,
/// )
/// .unwrap();
/// assert_eq!(swap.fixed_schedule().len(), 11);
/// assert_eq!(swap.float_schedule().len(), 21);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRateSwap {
    start: Date,
    maturity: Date,
    fixed_rate: f64,
    spread: f64,
    direction: SwapDirection,
    calendar: CalendarId,
    fixed_schedule: Vec<Date>,
    float_schedule: Vec<Date>,
}

impl InterestRateSwap {
    /// Creates a swap on the TARGET calendar.
    pub fn new(
        start: Date,
        maturity: Date,
        fixed_rate: f64,
        spread: f64,
        direction: SwapDirection,
    ) -> AnalyticsResult<Self> {
        Self::with_calendar(start, maturity, fixed_rate, spread, direction, CalendarId::Target)
    }

    /// Creates a swap whose floating dates roll on `calendar`.
    pub fn with_calendar(
        start: Date,
        maturity: Date,
        fixed_rate: f64,
        spread: f64,
        direction: SwapDirection,
        calendar: CalendarId,
    ) -> AnalyticsResult<Self> {
        if maturity <= start {
            return Err(AnalyticsError::invalid_swap(format!(
                "maturity {maturity} is not after start {start}"
            )));
        }
        if !fixed_rate.is_finite() || !spread.is_finite() {
            return Err(AnalyticsError::invalid_swap(format!(
                "non-finite rate {fixed_rate} or spread {spread}"
            )));
        }
        let fixed_schedule =
            Tenor::months(FIXED_LEG_MONTHS).schedule(start, maturity, FIXED_ADJUSTMENT, &calendar)?;
        let float_schedule =
            Tenor::months(FLOAT_LEG_MONTHS).schedule(start, maturity, FLOAT_ADJUSTMENT, &calendar)?;
        Ok(Self {
            start,
            maturity,
            fixed_rate,
            spread,
            direction,
            calendar,
            fixed_schedule,
            float_schedule,
        })
    }

    /// Start (effective) date.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Maturity date.
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Fixed coupon rate.
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    /// Spread over LIBOR on the floating leg.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Payer or receiver.
    pub fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Calendar for floating dates.
    pub fn calendar(&self) -> CalendarId {
        self.calendar
    }

    /// Fixed leg dates, starting with the start date.
    pub fn fixed_schedule(&self) -> &[Date] {
        &self.fixed_schedule
    }

    /// Floating leg dates, starting with the start date.
    pub fn float_schedule(&self) -> &[Date] {
        &self.float_schedule
    }

    /// Fixed leg accrual periods `(start, end)` paying after `after`.
    pub fn fixed_periods(&self, after: Date) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.fixed_schedule
            .windows(2)
            .map(|w| (w[0], w[1]))
            .filter(move |(_, end)| *end > after)
    }

    /// Floating leg accrual periods `(start, end)` paying after `after`.
    pub fn float_periods(&self, after: Date) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.float_schedule
            .windows(2)
            .map(|w| (w[0], w[1]))
            .filter(move |(_, end)| *end > after)
    }

    /// Fixed coupon amount for an accrual period.
    pub fn fixed_amount(&self, start: Date, end: Date) -> f64 {
        self.fixed_rate * FIXED_DAY_COUNT.year_fraction(start, end) * SWAP_NOTIONAL
    }

    /// Spread-only amount for a floating accrual period.
    pub fn spread_amount(&self, start: Date, end: Date) -> f64 {
        self.spread * FLOAT_DAY_COUNT.year_fraction(start, end) * SWAP_NOTIONAL
    }

    /// Fixed leg value per unit of rate: `sum(yf * df) * 100`.
    pub fn annuity<C: Curve + ?Sized>(&self, curve: &C) -> AnalyticsResult<f64> {
        let reference = curve.reference_date();
        let mut annuity = 0.0;
        for (start, end) in self.fixed_periods(reference) {
            annuity += FIXED_DAY_COUNT.year_fraction(start, end) * curve.discount(end, true)?;
        }
        Ok(annuity * SWAP_NOTIONAL)
    }

    /// Present value of the fixed coupons.
    pub fn fixed_leg_pv<C: Curve + ?Sized>(&self, curve: &C) -> AnalyticsResult<f64> {
        Ok(self.fixed_rate * self.annuity(curve)?)
    }

    /// Present value of the floating payments including spread.
    ///
    /// A period that started before the curve's reference date uses the most
    /// recent 3M LIBOR fixing on or before its start, falling back to the
    /// forward from the reference date when none is held.
    pub fn float_leg_pv<C: Curve + ?Sized>(&self, curve: &C, fixings: &FixingStore) -> AnalyticsResult<f64> {
        let reference = curve.reference_date();
        let mut pv = 0.0;
        for (start, end) in self.float_periods(reference) {
            let df = curve.discount(end, true)?;
            let payment = if start < reference {
                let yf = FLOAT_DAY_COUNT.year_fraction(start, end);
                let rate = match fixings.last_fixing_before(LIBOR_3M, start) {
                    Some((_, fixing)) => fixing.to_f64().unwrap_or_default(),
                    None => {
                        log::warn!("no {LIBOR_3M} fixing on or before {start}, using forward");
                        curve.forward_depo(reference, end, FLOAT_DAY_COUNT)?
                    }
                };
                (rate + self.spread) * yf
            } else {
                curve.forward_payment(start, end, FLOAT_DAY_COUNT, self.spread)?
            };
            pv += df * payment;
        }
        Ok(pv * SWAP_NOTIONAL)
    }

    /// Net present value to the holder: floating less fixed for a payer.
    pub fn npv<C: Curve + ?Sized>(&self, curve: &C, fixings: &FixingStore) -> AnalyticsResult<f64> {
        let float = self.float_leg_pv(curve, fixings)?;
        let fixed = self.fixed_leg_pv(curve)?;
        Ok(self.direction.sign() * (float - fixed))
    }

    /// Fixed rate giving zero NPV.
    pub fn fair_rate<C: Curve + ?Sized>(&self, curve: &C, fixings: &FixingStore) -> AnalyticsResult<f64> {
        let annuity = self.annuity(curve)?;
        if annuity <= 0.0 {
            return Err(AnalyticsError::invalid_swap("no fixed payments after the curve date"));
        }
        Ok(self.float_leg_pv(curve, fixings)? / annuity)
    }
}
