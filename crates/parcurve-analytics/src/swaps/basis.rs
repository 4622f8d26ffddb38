//! Ratio basis swap: a percentage of LIBOR against an index.

use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::{Date, Tenor};
use parcurve_curves::{Curve, CurveServices};

use super::irs::{SwapDirection, SWAP_NOTIONAL};
use crate::error::{AnalyticsError, AnalyticsResult};

const PERIOD_MONTHS: u32 = 3;
const DAY_COUNT: DayCountConvention = DayCountConvention::Act360;
const ADJUSTMENT: BusinessDayConvention = BusinessDayConvention::ModifiedFollowing;

/// A quarterly swap of `ratio * LIBOR` against an index rate plus spread.
///
/// The LIBOR leg is projected and discounted on the reference curve; the
/// index leg is projected on the index curve and discounted on the reference
/// curve. A payer pays the LIBOR leg.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisSwap {
    start: Date,
    maturity: Date,
    ratio: f64,
    spread: f64,
    direction: SwapDirection,
    schedule: Vec<Date>,
}

impl BasisSwap {
    /// Creates a basis swap rolling on the US government bond calendar.
    pub fn new(
        start: Date,
        maturity: Date,
        ratio: f64,
        spread: f64,
        direction: SwapDirection,
    ) -> AnalyticsResult<Self> {
        if maturity <= start {
            return Err(AnalyticsError::invalid_swap(format!(
                "maturity {maturity} is not after start {start}"
            )));
        }
        let schedule = Tenor::months(PERIOD_MONTHS).schedule(
            start,
            maturity,
            ADJUSTMENT,
            &CalendarId::UsGovernmentBond,
        )?;
        Ok(Self {
            start,
            maturity,
            ratio,
            spread,
            direction,
            schedule,
        })
    }

    /// Start date.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Maturity date.
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// LIBOR ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Payment dates, starting with the start date.
    pub fn schedule(&self) -> &[Date] {
        &self.schedule
    }

    fn legs<D, I>(&self, discount: &D, index: &I, spread: f64) -> AnalyticsResult<(f64, f64)>
    where
        D: Curve + ?Sized,
        I: Curve + ?Sized,
    {
        let reference = discount.reference_date();
        let mut libor_leg = 0.0;
        let mut index_leg = 0.0;
        for pair in self.schedule.windows(2).filter(|w| w[1] > reference) {
            let (start, end) = (pair[0].max(reference), pair[1]);
            let df = discount.discount(end, true)?;
            libor_leg += df * discount.forward_payment(start, end, DAY_COUNT, 0.0)?;
            index_leg += df * index.forward_payment(start, end, DAY_COUNT, spread)?;
        }
        Ok((libor_leg * SWAP_NOTIONAL, index_leg * SWAP_NOTIONAL))
    }

    /// Ratio of LIBOR that makes the swap fair, ignoring the spread.
    pub fn fair_ratio<D, I>(&self, discount: &D, index: &I) -> AnalyticsResult<f64>
    where
        D: Curve + ?Sized,
        I: Curve + ?Sized,
    {
        let (libor_leg, index_leg) = self.legs(discount, index, 0.0)?;
        if libor_leg.abs() < f64::EPSILON {
            return Err(AnalyticsError::invalid_swap("LIBOR leg has no value"));
        }
        Ok(index_leg / libor_leg)
    }

    /// Value to the holder: index leg less ratio times LIBOR leg for a payer.
    pub fn npv<D, I>(&self, discount: &D, index: &I) -> AnalyticsResult<f64>
    where
        D: Curve + ?Sized,
        I: Curve + ?Sized,
    {
        let (libor_leg, index_leg) = self.legs(discount, index, self.spread)?;
        let sign = match self.direction {
            SwapDirection::Payer => 1.0,
            SwapDirection::Receiver => -1.0,
        };
        Ok(sign * (index_leg - self.ratio * libor_leg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flat, settle};
    use approx::assert_relative_eq;
    use parcurve_curves::SpreadedCurve;

    #[test]
    fn test_fair_ratio_of_identical_curves_is_one() {
        let libor = flat(0.04);
        let swap = BasisSwap::new(settle(), settle().add_years(10).unwrap(), 1.0, 0.0, SwapDirection::Payer).unwrap();
        assert_relative_eq!(swap.fair_ratio(&libor, &libor).unwrap(), 1.0, epsilon = 1e-12);
        assert!(swap.npv(&libor, &libor).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_fair_ratio_zeroes_npv() {
        let libor = flat(0.05);
        let muni = SpreadedCurve::new(flat(0.05), -0.015);
        let maturity = settle().add_years(7).unwrap();

        let probe = BasisSwap::new(settle(), maturity, 1.0, 0.0, SwapDirection::Payer).unwrap();
        let fair = probe.fair_ratio(&libor, &muni).unwrap();
        assert!(fair > 0.6 && fair < 0.8, "fair ratio {fair}");

        let swap = BasisSwap::new(settle(), maturity, fair, 0.0, SwapDirection::Payer).unwrap();
        assert!(swap.npv(&libor, &muni).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_spread_adds_to_index_leg() {
        let libor = flat(0.04);
        let maturity = settle().add_years(3).unwrap();
        let plain = BasisSwap::new(settle(), maturity, 1.0, 0.0, SwapDirection::Payer).unwrap();
        let spread = BasisSwap::new(settle(), maturity, 1.0, 0.001, SwapDirection::Payer).unwrap();
        assert!(spread.npv(&libor, &libor).unwrap() > plain.npv(&libor, &libor).unwrap());
    }
}
