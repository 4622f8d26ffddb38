//! Calibrated discount curve model.
//!
//! [`TermStructureModel`] owns a helper set, the curve bootstrapped from it,
//! the fixings recorded while calibrating and lazily built scenario views.
//! Recalibration replaces the curve and bumps [`version`](TermStructureModel::version)
//! so dependents can tell their derived state is stale.
//!
//! ```text
//! Uninitialized --update--> Calibrated --update--> Calibrated
//!       ^                        |
//!       +---------reset----------+
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::OnceCell;

use parcurve_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use parcurve_core::types::TimeUnit;
use parcurve_core::{Date, Tenor};

use crate::bootstrap::PiecewiseBootstrap;
use crate::curves::{DiscountCurve, SpreadedCurve};
use crate::error::{CurveError, CurveResult};
use crate::fixings::{FixingStore, LIBOR_3M};
use crate::helpers::{helper_for, HelperSet, RateHelper};
use crate::services::CurveServices;
use crate::traits::Curve;

/// Quotes are given in percent unless configured otherwise.
pub const DEFAULT_DATA_DIVISOR: f64 = 100.0;

/// Business days from curve date to settlement.
pub const DEFAULT_SETTLE_DAYS: u32 = 2;

/// Default scenario shift: one basis point.
pub const DEFAULT_SCENARIO_SHOCK: f64 = 0.0001;

/// A shifted view of a calibrated curve.
pub type ScenarioCurve = SpreadedCurve<Arc<DiscountCurve>>;

/// Up and down zero-spread shifts of the same base curve.
#[derive(Debug, Clone)]
pub struct Scenarios {
    up: ScenarioCurve,
    dn: ScenarioCurve,
    shock: f64,
}

impl Scenarios {
    /// Builds `base` shifted by `+shock` and `-shock`.
    #[must_use]
    pub fn new(base: Arc<DiscountCurve>, shock: f64) -> Self {
        Self {
            up: SpreadedCurve::new(Arc::clone(&base), shock),
            dn: SpreadedCurve::new(base, -shock),
            shock,
        }
    }

    /// Curve shifted up by the shock.
    pub fn up(&self) -> &ScenarioCurve {
        &self.up
    }

    /// Curve shifted down by the shock.
    pub fn dn(&self) -> &ScenarioCurve {
        &self.dn
    }

    /// Size of the shift.
    pub fn shock(&self) -> f64 {
        self.shock
    }
}

/// Drops empty labels and zero or non-finite quotes, and divides by `divisor`.
#[must_use]
pub fn clean_quotes(quotes: &BTreeMap<String, f64>, divisor: f64) -> BTreeMap<String, f64> {
    quotes
        .iter()
        .filter(|(label, value)| !label.trim().is_empty() && value.is_finite() && **value != 0.0)
        .map(|(label, value)| (label.trim().to_string(), value / divisor))
        .collect()
}

/// A discount curve calibrated to deposit and swap quotes.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use parcurve_core::Date;
/// use parcurve_curves::{Curve, TermStructureModel};
///
/// let quotes = BTreeMap::from([
///     ("3M".to_string(), 4.50),
///     ("2Y".to_string(), 4.20),
///     ("10Y".to_string(), 4.10),
/// ]);
///
/// let mut model = TermStructureModel::new("LIBOR");
/// model.update(&quotes, Some(Date::from_ymd(2025, 1, 13).unwrap())).unwrap();
///
/// assert!(model.is_calibrated());
/// assert_eq!(model.settlement(), Some(Date::from_ymd(2025, 1, 15).unwrap()));
/// assert!(model.discount_factor(5.0).unwrap() < 1.0);
/// ```
#[derive(Debug)]
pub struct TermStructureModel {
    label: String,
    data_divisor: f64,
    settle_days: u32,
    calendar: CalendarId,
    curve_date: Option<Date>,
    settlement: Option<Date>,
    helpers: HelperSet<Box<dyn RateHelper>>,
    quotes: BTreeMap<String, f64>,
    curve: Option<Arc<DiscountCurve>>,
    version: u64,
    fixings: FixingStore,
    scenario_shock: f64,
    scenarios: OnceCell<Scenarios>,
}

impl TermStructureModel {
    /// Creates an uncalibrated model.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data_divisor: DEFAULT_DATA_DIVISOR,
            settle_days: DEFAULT_SETTLE_DAYS,
            calendar: CalendarId::Target,
            curve_date: None,
            settlement: None,
            helpers: HelperSet::new(),
            quotes: BTreeMap::new(),
            curve: None,
            version: 0,
            fixings: FixingStore::new(),
            scenario_shock: DEFAULT_SCENARIO_SHOCK,
            scenarios: OnceCell::new(),
        }
    }

    /// Sets the divisor applied to incoming quotes (1.0 for decimal quotes).
    #[must_use]
    pub fn with_data_divisor(mut self, divisor: f64) -> Self {
        self.data_divisor = divisor;
        self
    }

    /// Sets the settlement lag in business days.
    #[must_use]
    pub fn with_settle_days(mut self, days: u32) -> Self {
        self.settle_days = days;
        self
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// Uses an existing fixing store.
    #[must_use]
    pub fn with_fixings(mut self, fixings: FixingStore) -> Self {
        self.fixings = fixings;
        self
    }

    /// Builds a calibrated model directly from discount factors.
    ///
    /// The first date is settlement; the curve date is `settle_days` business
    /// days earlier.
    pub fn from_discount_factors(
        label: impl Into<String>,
        settlement: Date,
        discount_factors: &BTreeMap<Date, f64>,
    ) -> CurveResult<Self> {
        let mut model = Self::new(label);
        let curve = DiscountCurve::new(settlement, discount_factors)?;
        let lag = -i32::try_from(model.settle_days).unwrap_or(0);
        model.curve_date = Some(model.calendar.advance(
            settlement,
            lag,
            TimeUnit::Days,
            BusinessDayConvention::Preceding,
        )?);
        model.settlement = Some(settlement);
        model.install(curve);
        Ok(model)
    }

    /// Recalibrates to `quotes` (`tenor -> quote`, divided by the data divisor).
    ///
    /// Existing helpers are re-quoted in place; only the quoted tenors take
    /// part. The 3M quote is recorded as the LIBOR fixing for the curve date.
    /// Without a curve date, today is used.
    ///
    /// If the bootstrap fails, helpers, quotes, dates and curve are left as
    /// they were before the call.
    pub fn update(&mut self, quotes: &BTreeMap<String, f64>, curve_date: Option<Date>) -> CurveResult<()> {
        let cleaned = clean_quotes(quotes, self.data_divisor);
        if cleaned.is_empty() {
            return Err(CurveError::InsufficientPoints {
                required: 1,
                got: 0,
            });
        }

        let curve_date = self
            .calendar
            .adjust(curve_date.unwrap_or_else(Date::today), BusinessDayConvention::Following)?;
        let days = i32::try_from(self.settle_days)
            .map_err(|_| CurveError::construction("settlement lag out of range"))?;
        let settlement = self.calendar.advance(
            curve_date,
            days,
            TimeUnit::Days,
            BusinessDayConvention::Following,
        )?;

        let snapshot = self.helpers.snapshot();
        let calendar = self.calendar;
        let built = self
            .helpers
            .update(&cleaned, |label, quote| helper_for(label, quote, calendar))
            .and_then(|()| self.bootstrap_at(settlement));
        let curve = match built {
            Ok(curve) => curve,
            Err(err) => {
                warn!("{}: recalibration at {settlement} failed, keeping previous curve: {err}", self.label);
                self.helpers.restore(snapshot);
                return Err(err);
            }
        };

        match cleaned
            .iter()
            .find(|(label, _)| Tenor::parse(label) == Tenor::months(3))
        {
            Some((_, rate)) => {
                self.fixings.add_fixing_f64(LIBOR_3M, curve_date, *rate);
            }
            None => warn!("{}: no 3M quote, LIBOR fixing for {curve_date} not recorded", self.label),
        }

        self.curve_date = Some(curve_date);
        self.settlement = Some(settlement);
        self.quotes = cleaned;
        self.install(curve);
        Ok(())
    }

    /// Adds a helper (e.g. a bond) to the active set. Takes effect on the next
    /// [`rebuild`](Self::rebuild) or [`update`](Self::update).
    pub fn insert_helper(&mut self, helper: Box<dyn RateHelper>) {
        self.helpers.insert(helper.label(), helper);
    }

    /// Bootstraps the active helpers at the current settlement.
    pub fn rebuild(&mut self) -> CurveResult<()> {
        let settlement = self
            .settlement
            .ok_or_else(|| CurveError::not_calibrated(&self.label))?;
        let curve = self.bootstrap_at(settlement)?;
        self.install(curve);
        Ok(())
    }

    fn bootstrap_at(&self, settlement: Date) -> CurveResult<DiscountCurve> {
        let active: Vec<&dyn RateHelper> = self.helpers.active().map(|h| &**h).collect();
        let curve = PiecewiseBootstrap::new(settlement).bootstrap(&active)?;
        debug!(
            "{}: bootstrapped {} pillars at {settlement}",
            self.label,
            curve.len()
        );
        Ok(curve)
    }

    fn install(&mut self, curve: DiscountCurve) {
        self.curve = Some(Arc::new(curve));
        self.version += 1;
        self.clear_scenarios();
    }

    /// Discards helpers and curve. Returns false if already uninitialized.
    pub fn reset(&mut self) -> bool {
        if self.curve.is_none() && self.helpers.is_empty() {
            return false;
        }
        self.helpers.clear();
        self.quotes.clear();
        self.curve = None;
        self.clear_scenarios();
        true
    }

    /// Par rate minus quote, times 100, for each quoted tenor in term order.
    pub fn check_curve(&self) -> CurveResult<Vec<(String, f64)>> {
        let mut labels: Vec<(&String, &f64)> = self.quotes.iter().collect();
        labels.sort_by(|a, b| Tenor::parse(a.0).cmp_term(&Tenor::parse(b.0)));
        labels
            .into_iter()
            .map(|(label, quote)| {
                let par = self.tenorpar(&Tenor::parse(label), &self.calendar)?;
                Ok((label.clone(), (par - quote) * 100.0))
            })
            .collect()
    }

    /// Lazily built up/down scenario curves.
    pub fn scenarios(&self) -> CurveResult<&Scenarios> {
        let base = Arc::clone(self.curve()?);
        self.scenarios
            .get_or_try_init(|| Ok(Scenarios::new(base, self.scenario_shock)))
    }

    /// Curve shifted up by the scenario shock.
    pub fn shift_up(&self) -> CurveResult<&ScenarioCurve> {
        Ok(self.scenarios()?.up())
    }

    /// Curve shifted down by the scenario shock.
    pub fn shift_dn(&self) -> CurveResult<&ScenarioCurve> {
        Ok(self.scenarios()?.dn())
    }

    /// Symmetric difference `(value(up) - value(dn)) / 2`.
    pub fn sensitivity<F>(&self, mut value: F) -> CurveResult<f64>
    where
        F: FnMut(&dyn Curve) -> CurveResult<f64>,
    {
        let scenarios = self.scenarios()?;
        let up = value(scenarios.up())?;
        let dn = value(scenarios.dn())?;
        Ok((up - dn) / 2.0)
    }

    /// Drops cached scenario curves.
    pub fn clear_scenarios(&mut self) {
        self.scenarios.take();
    }

    /// Changes the scenario shift and drops cached scenarios.
    pub fn set_scenario_shock(&mut self, shock: f64) {
        self.scenario_shock = shock;
        self.clear_scenarios();
    }

    /// Current scenario shift.
    pub fn scenario_shock(&self) -> f64 {
        self.scenario_shock
    }

    /// The calibrated curve.
    pub fn curve(&self) -> CurveResult<&Arc<DiscountCurve>> {
        self.curve
            .as_ref()
            .ok_or_else(|| CurveError::not_calibrated(&self.label))
    }

    /// True once a curve has been built.
    pub fn is_calibrated(&self) -> bool {
        self.curve.is_some()
    }

    /// Label of the model.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Divisor applied to incoming quotes.
    pub fn data_divisor(&self) -> f64 {
        self.data_divisor
    }

    /// Settlement lag in business days.
    pub fn settle_days(&self) -> u32 {
        self.settle_days
    }

    /// Calendar for settlement and helper dates.
    pub fn calendar(&self) -> CalendarId {
        self.calendar
    }

    /// Curve (trade) date of the last calibration.
    pub fn curve_date(&self) -> Option<Date> {
        self.curve_date
    }

    /// Settlement date of the last calibration.
    pub fn settlement(&self) -> Option<Date> {
        self.settlement
    }

    /// Cleaned quotes of the last update, as decimals.
    pub fn quotes(&self) -> &BTreeMap<String, f64> {
        &self.quotes
    }

    /// The helper set.
    pub fn helpers(&self) -> &HelperSet<Box<dyn RateHelper>> {
        &self.helpers
    }

    /// Incremented on every rebuild.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Fixings recorded by this model.
    pub fn fixings(&self) -> &FixingStore {
        &self.fixings
    }

    /// Mutable access to the fixings.
    pub fn fixings_mut(&mut self) -> &mut FixingStore {
        &mut self.fixings
    }
}

impl Curve for TermStructureModel {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        self.curve()?.discount_factor(t)
    }

    /// Settlement once calibrated, otherwise today.
    fn reference_date(&self) -> Date {
        self.curve
            .as_ref()
            .map_or_else(|| self.settlement.unwrap_or_else(Date::today), |c| c.reference_date())
    }

    fn max_date(&self) -> Date {
        self.curve
            .as_ref()
            .map_or_else(|| self.reference_date(), |c| c.max_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn curve_date() -> Date {
        Date::from_ymd(2025, 1, 13).unwrap()
    }

    fn quotes() -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("3M".to_string(), 4.50),
            ("6M".to_string(), 4.45),
            ("1Y".to_string(), 4.35),
            ("2Y".to_string(), 4.20),
            ("5Y".to_string(), 4.05),
            ("10Y".to_string(), 4.10),
        ])
    }

    fn calibrated() -> TermStructureModel {
        let mut model = TermStructureModel::new("LIBOR");
        model.update(&quotes(), Some(curve_date())).unwrap();
        model
    }

    #[test]
    fn test_clean_quotes() {
        let raw = BTreeMap::from([
            ("3M".to_string(), 4.5),
            ("6M".to_string(), 0.0),
            ("".to_string(), 4.0),
            ("1Y".to_string(), f64::NAN),
        ]);
        let cleaned = clean_quotes(&raw, 100.0);
        assert_eq!(cleaned.len(), 1);
        assert_relative_eq!(cleaned["3M"], 0.045);
    }

    #[test]
    fn test_uninitialized_queries_fail() {
        let model = TermStructureModel::new("LIBOR");
        assert!(!model.is_calibrated());
        assert!(matches!(
            model.discount_factor(1.0),
            Err(CurveError::NotCalibrated { .. })
        ));
        assert!(model.scenarios().is_err());
    }

    #[test]
    fn test_update_calibrates_and_checks() {
        let model = calibrated();
        assert_eq!(model.settlement(), Some(Date::from_ymd(2025, 1, 15).unwrap()));
        assert_eq!(model.version(), 1);
        for (label, residual) in model.check_curve().unwrap() {
            assert!(residual.abs() < 1e-8, "{label}: {residual}");
        }
        assert_eq!(
            model.fixings().get_fixing(LIBOR_3M, curve_date()),
            Some(dec!(0.045))
        );
    }

    #[test]
    fn test_requote_in_place() {
        let mut model = calibrated();
        let cell = model.helpers().get("5Y").unwrap().quote().clone();
        let before = model.zero_rate(5.0).unwrap();

        let mut bumped = quotes();
        bumped.insert("5Y".to_string(), 4.25);
        model.update(&bumped, Some(curve_date())).unwrap();

        assert_relative_eq!(cell.value(), 0.0425);
        assert_eq!(model.version(), 2);
        assert!(model.zero_rate(5.0).unwrap() > before);
    }

    #[test]
    fn test_failed_update_keeps_previous_calibration() {
        let mut model = calibrated();
        let settlement = model.settlement();
        let reference = model.curve().unwrap().reference_date();
        let quotes_before = model.quotes().clone();

        // 12M and 1Y land on the same pillar
        let clashing = BTreeMap::from([
            ("3M".to_string(), 4.60),
            ("12M".to_string(), 4.40),
            ("1Y".to_string(), 4.45),
        ]);
        let next_date = Date::from_ymd(2025, 3, 13).unwrap();
        assert!(matches!(
            model.update(&clashing, Some(next_date)),
            Err(CurveError::Construction { .. })
        ));

        assert_eq!(model.settlement(), settlement);
        assert_eq!(model.curve_date(), Some(curve_date()));
        assert_eq!(model.curve().unwrap().reference_date(), reference);
        assert_eq!(model.version(), 1);
        assert_eq!(model.quotes(), &quotes_before);
        assert!(model.helpers().get("12M").is_none());
        assert_relative_eq!(model.helpers().get("1Y").unwrap().quote().value(), 0.0435);
        assert_eq!(model.helpers().active_labels().len(), quotes_before.len());
        assert!(model.fixings().get_fixing(LIBOR_3M, next_date).is_none());
        for (label, residual) in model.check_curve().unwrap() {
            assert!(residual.abs() < 1e-8, "{label}: {residual}");
        }

        // the model still recalibrates normally afterwards
        model.update(&quotes(), Some(next_date)).unwrap();
        assert_eq!(model.version(), 2);
        assert_eq!(model.curve().unwrap().reference_date(), model.settlement().unwrap());
    }

    #[test]
    fn test_reset() {
        let mut model = calibrated();
        assert!(model.reset());
        assert!(!model.is_calibrated());
        assert!(!model.reset());
        assert!(model.curve().is_err());
    }

    #[test]
    fn test_scenarios_shift_symmetrically() {
        let model = calibrated();
        let base = model.zero_rate(3.0).unwrap();
        let up = model.shift_up().unwrap().zero_rate(3.0).unwrap();
        let dn = model.shift_dn().unwrap().zero_rate(3.0).unwrap();
        assert_relative_eq!(up - base, 0.0001, epsilon = 1e-12);
        assert_relative_eq!(base - dn, 0.0001, epsilon = 1e-12);
    }

    #[test]
    fn test_scenarios_cleared_on_rebuild() {
        let mut model = calibrated();
        let first = model.shift_up().unwrap().discount_factor(2.0).unwrap();
        let mut bumped = quotes();
        bumped.insert("2Y".to_string(), 4.60);
        model.update(&bumped, Some(curve_date())).unwrap();
        let second = model.shift_up().unwrap().discount_factor(2.0).unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_zero_shock_sensitivity_vanishes() {
        let mut model = calibrated();
        model.set_scenario_shock(0.0);
        let s = model
            .sensitivity(|curve| curve.discount_factor(7.0))
            .unwrap();
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_from_discount_factors() {
        let settle = Date::from_ymd(2025, 1, 15).unwrap();
        let dfs = BTreeMap::from([
            (settle, 1.0),
            (Date::from_ymd(2026, 1, 15).unwrap(), 0.96),
        ]);
        let model = TermStructureModel::from_discount_factors("DF", settle, &dfs).unwrap();
        assert!(model.is_calibrated());
        assert_eq!(model.curve_date(), Some(curve_date()));
        assert_relative_eq!(model.discount_factor(1.0).unwrap(), 0.96, epsilon = 1e-12);
    }
}
