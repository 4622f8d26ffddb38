//! Bermudan swaption valued on a short rate lattice.

use parcurve_bonds::options::{ShortRateModel, DEFAULT_TREE_STEPS};
use parcurve_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use parcurve_core::types::TimeUnit;
use parcurve_core::Date;
use parcurve_curves::Curve;

use super::irs::{InterestRateSwap, SwapDirection, SWAP_NOTIONAL};
use crate::error::{AnalyticsError, AnalyticsResult};

/// A right to enter a swap on any of a set of annual exercise dates.
///
/// The underlying swap starts on the first exercise date and runs to the
/// final maturity. Exercise falls yearly from the first exercise date until
/// one year before maturity. On exercise a receiver gets the remaining fixed
/// coupons plus principal against the floating leg, which is worth par at a
/// reset date; the spread stays with the fixed side as a deduction.
///
/// # Example
///
/// ```rust
/// use parcurve_analytics::swaps::{BermudanSwaption, SwapDirection};
/// use parcurve_core::Date;
///
/// let swaption = BermudanSwaption::new(
///     Date::from_ymd(2030, 1, 15).unwrap(),
///     Date::from_ymd(2035, 1, 15).unwrap(),
///     0.05,
///     0.0,
///     SwapDirection::Receiver,
/// )
/// .unwrap();
/// assert_eq!(swaption.exercise_dates().len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BermudanSwaption {
    swap: InterestRateSwap,
    exercise_dates: Vec<Date>,
}

impl BermudanSwaption {
    /// Creates a swaption exercisable yearly from `first_exercise`.
    pub fn new(
        first_exercise: Date,
        maturity: Date,
        fixed_rate: f64,
        spread: f64,
        direction: SwapDirection,
    ) -> AnalyticsResult<Self> {
        let swap = InterestRateSwap::new(first_exercise, maturity, fixed_rate, spread, direction)?;
        let calendar = CalendarId::Target;
        let last = calendar.advance(maturity, -1, TimeUnit::Years, BusinessDayConvention::Unadjusted)?;

        let mut exercise_dates = vec![first_exercise];
        let mut k = 1;
        loop {
            let next = first_exercise.add_years(k)?;
            if next > last {
                break;
            }
            exercise_dates.push(next);
            k += 1;
        }
        Ok(Self { swap, exercise_dates })
    }

    /// The underlying forward-starting swap.
    pub fn swap(&self) -> &InterestRateSwap {
        &self.swap
    }

    /// Exercise dates in order.
    pub fn exercise_dates(&self) -> &[Date] {
        &self.exercise_dates
    }

    /// Value on a lattice of `model` fitted to `curve`.
    ///
    /// Exercise dates on or before the curve's reference date are dropped;
    /// with none left the swaption is worth nothing.
    pub fn npv(&self, curve: &dyn Curve, model: &dyn ShortRateModel) -> AnalyticsResult<f64> {
        let reference = curve.reference_date();
        let maturity = self.swap.maturity();
        if maturity <= reference {
            return Ok(0.0);
        }

        let exercises: Vec<Date> = self
            .exercise_dates
            .iter()
            .copied()
            .filter(|d| *d > reference)
            .collect();
        if exercises.is_empty() {
            return Ok(0.0);
        }

        let horizon = curve.year_fraction(maturity);
        let tree = model.build_tree(curve, horizon, DEFAULT_TREE_STEPS)?;

        // Receiver side of the exercised swap: fixed coupons and principal less spread
        let mut flows: Vec<(f64, f64)> = self
            .swap
            .fixed_periods(reference)
            .map(|(start, end)| (curve.year_fraction(end), self.swap.fixed_amount(start, end)))
            .collect();
        let last_fixed = self
            .swap
            .fixed_schedule()
            .last()
            .copied()
            .ok_or_else(|| AnalyticsError::invalid_swap("empty fixed schedule"))?;
        flows.push((curve.year_fraction(last_fixed), SWAP_NOTIONAL));
        flows.extend(
            self.swap
                .float_periods(reference)
                .map(|(start, end)| (curve.year_fraction(end), -self.swap.spread_amount(start, end))),
        );

        let sign = match self.swap.direction() {
            SwapDirection::Receiver => 1.0,
            SwapDirection::Payer => -1.0,
        };
        let flows: Vec<(f64, f64)> = flows.into_iter().map(|(t, a)| (t, sign * a)).collect();
        let strikes: Vec<(f64, f64)> = exercises
            .iter()
            .map(|d| (curve.year_fraction(*d), sign * SWAP_NOTIONAL))
            .collect();

        let (_, option) = tree.value_call(&flows, &strikes, 0.0);
        Ok(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flat, settle};
    use parcurve_bonds::options::{HullWhite, DEFAULT_MEAN_REVERSION};
    use parcurve_bonds::ModelKind;

    fn receiver(rate: f64) -> BermudanSwaption {
        BermudanSwaption::new(
            settle().add_years(3).unwrap(),
            settle().add_years(10).unwrap(),
            rate,
            0.0,
            SwapDirection::Receiver,
        )
        .unwrap()
    }

    #[test]
    fn test_exercise_schedule() {
        let swaption = receiver(0.05);
        let dates = swaption.exercise_dates();
        assert_eq!(dates.first(), Some(&settle().add_years(3).unwrap()));
        assert_eq!(dates.last(), Some(&settle().add_years(9).unwrap()));
        assert_eq!(dates.len(), 7);
    }

    #[test]
    fn test_value_grows_with_vol() {
        let curve = flat(0.05);
        let swaption = receiver(0.05);
        let low = swaption
            .npv(&curve, ModelKind::BlackKarasinski.build(0.05, DEFAULT_MEAN_REVERSION).as_ref())
            .unwrap();
        let high = swaption
            .npv(&curve, ModelKind::BlackKarasinski.build(0.25, DEFAULT_MEAN_REVERSION).as_ref())
            .unwrap();
        assert!(low > 0.0);
        assert!(high > low);
    }

    #[test]
    fn test_deep_out_of_the_money_at_low_vol() {
        let curve = flat(0.06);
        let swaption = receiver(0.02);
        let model = HullWhite::new(DEFAULT_MEAN_REVERSION, 1e-6);
        assert!(swaption.npv(&curve, &model).unwrap() < 1e-8);
    }

    #[test]
    fn test_payer_gains_when_rates_above_strike() {
        let curve = flat(0.06);
        let payer = BermudanSwaption::new(
            settle().add_years(3).unwrap(),
            settle().add_years(10).unwrap(),
            0.03,
            0.0,
            SwapDirection::Payer,
        )
        .unwrap();
        let model = HullWhite::new(DEFAULT_MEAN_REVERSION, 1e-6);
        assert!(payer.npv(&curve, &model).unwrap() > 5.0);
    }

    #[test]
    fn test_expired_exercises_are_worthless() {
        let curve = flat(0.05);
        let swaption = BermudanSwaption::new(
            settle().add_years(-3).unwrap(),
            settle().add_months(6).unwrap(),
            0.08,
            0.0,
            SwapDirection::Receiver,
        )
        .unwrap();
        let model = HullWhite::new(DEFAULT_MEAN_REVERSION, 0.01);
        assert_eq!(swaption.npv(&curve, &model).unwrap(), 0.0);
    }
}
