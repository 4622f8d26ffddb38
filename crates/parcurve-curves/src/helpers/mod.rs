//! Bootstrap instruments built around shared quotes.
//!
//! A helper pairs a [`SimpleQuote`] with the conventions needed to treat it as
//! a curve constraint. Helpers live in a [`HelperSet`] keyed by tenor label;
//! re-quoting a set updates the shared cells instead of rebuilding helpers.
//!
//! - [`DepositHelper`]: money market deposits (sub-year tenors)
//! - [`SwapHelper`]: par swaps against the 3M floating index (year tenors)
//! - [`BondHelper`]: fixed coupon bonds quoted at a clean price
//! - [`RatioHelper`]: par basis ratios for ratio curves

mod bond;
mod deposit;
mod ratio;
mod swap;

pub use bond::BondHelper;
pub use deposit::DepositHelper;
pub use ratio::RatioHelper;
pub use swap::SwapHelper;

use std::collections::BTreeMap;
use std::fmt;

use parcurve_core::calendars::CalendarId;
use parcurve_core::{Date, Tenor};

use crate::error::{CurveError, CurveResult};
use crate::quotes::SimpleQuote;
use crate::traits::Curve;

/// Anything backed by a shared market quote.
pub trait Quoted {
    /// The quote cell.
    fn quote(&self) -> &SimpleQuote;

    /// Current quote value.
    fn quote_value(&self) -> f64 {
        self.quote().value()
    }
}

impl<T: Quoted + ?Sized> Quoted for Box<T> {
    fn quote(&self) -> &SimpleQuote {
        (**self).quote()
    }
}

/// An instrument used as a bootstrap constraint on a discount curve.
pub trait RateHelper: Quoted + Send + Sync + fmt::Debug {
    /// Key the helper is stored under.
    fn label(&self) -> String;

    /// Tenor of the instrument, if it is quoted by tenor.
    fn tenor(&self) -> Option<Tenor> {
        None
    }

    /// Date whose discount factor this helper determines.
    fn pillar_date(&self, settlement: Date) -> CurveResult<Date>;

    /// Quote implied by `curve`, in the same units as the market quote.
    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64>;

    /// Description used in error messages.
    fn description(&self) -> String {
        format!("{} @ {}", self.label(), self.quote_value())
    }
}

/// Creates the standard helper for a tenor label: swaps for year tenors,
/// deposits otherwise.
pub fn helper_for(label: &str, quote: f64, calendar: CalendarId) -> CurveResult<Box<dyn RateHelper>> {
    let tenor = Tenor::parse(label);
    if tenor.length() == 0 {
        return Err(CurveError::invalid_instrument(format!(
            "tenor '{label}' has no length"
        )));
    }
    if tenor.is_years() {
        Ok(Box::new(SwapHelper::new(tenor, quote).with_calendar(calendar)))
    } else {
        Ok(Box::new(DepositHelper::new(tenor, quote).with_calendar(calendar)))
    }
}

/// Quote values and active labels of a [`HelperSet`], taken before an update
/// so a failed bootstrap can be rolled back.
#[derive(Debug, Clone, PartialEq)]
pub struct HelperSnapshot {
    quotes: BTreeMap<String, f64>,
    active: Vec<String>,
}

/// Helpers keyed by label, tracking which ones were quoted last.
///
/// Only helpers quoted by the latest [`update`](HelperSet::update) (or
/// inserted since) are [`active`](HelperSet::active).
#[derive(Debug)]
pub struct HelperSet<H> {
    helpers: BTreeMap<String, H>,
    active: Vec<String>,
}

impl<H> Default for HelperSet<H> {
    fn default() -> Self {
        Self {
            helpers: BTreeMap::new(),
            active: Vec::new(),
        }
    }
}

impl<H: Quoted> HelperSet<H> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-quotes existing helpers in place and creates helpers for new labels
    /// with `make`. The quoted labels become the active set.
    pub fn update<F>(&mut self, quotes: &BTreeMap<String, f64>, mut make: F) -> CurveResult<()>
    where
        F: FnMut(&str, f64) -> CurveResult<H>,
    {
        for (label, &value) in quotes {
            if let Some(helper) = self.helpers.get(label) {
                helper.quote().set_value(value);
            } else {
                let helper = make(label, value)?;
                self.helpers.insert(label.clone(), helper);
            }
        }
        self.active = quotes.keys().cloned().collect();
        Ok(())
    }

    /// Current quote of every helper, plus the active labels.
    #[must_use]
    pub fn snapshot(&self) -> HelperSnapshot {
        HelperSnapshot {
            quotes: self
                .helpers
                .iter()
                .map(|(label, helper)| (label.clone(), helper.quote().value()))
                .collect(),
            active: self.active.clone(),
        }
    }

    /// Puts quotes and the active set back as they were at `snapshot`.
    /// Helpers created since are dropped.
    pub fn restore(&mut self, snapshot: HelperSnapshot) {
        self.helpers.retain(|label, helper| match snapshot.quotes.get(label) {
            Some(&value) => {
                helper.quote().set_value(value);
                true
            }
            None => false,
        });
        self.active = snapshot.active;
    }

    /// Adds (or replaces) a helper and marks it active.
    pub fn insert(&mut self, label: impl Into<String>, helper: H) {
        let label = label.into();
        if !self.active.contains(&label) {
            self.active.push(label.clone());
        }
        self.helpers.insert(label, helper);
    }

    /// Looks up a helper by label.
    pub fn get(&self, label: &str) -> Option<&H> {
        self.helpers.get(label)
    }

    /// Helpers taking part in the next bootstrap.
    pub fn active(&self) -> impl Iterator<Item = &H> {
        self.active.iter().filter_map(|label| self.helpers.get(label))
    }

    /// Labels of the active helpers.
    pub fn active_labels(&self) -> &[String] {
        &self.active
    }

    /// Total number of helpers held, active or not.
    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    /// True when no helpers are held.
    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Discards every helper.
    pub fn clear(&mut self) {
        self.helpers.clear();
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_helper_for_dispatch() {
        let depo = helper_for("3M", 0.05, CalendarId::Target).unwrap();
        assert_eq!(depo.tenor(), Some(Tenor::months(3)));
        assert!(format!("{depo:?}").contains("DepositHelper"));

        let swap = helper_for("10Y", 0.04, CalendarId::Target).unwrap();
        assert_eq!(swap.tenor(), Some(Tenor::years(10)));
        assert!(format!("{swap:?}").contains("SwapHelper"));

        assert!(helper_for("Y", 0.04, CalendarId::Target).is_err());
    }

    #[test]
    fn test_update_mutates_in_place() {
        let mut set: HelperSet<Box<dyn RateHelper>> = HelperSet::new();
        set.update(&quotes(&[("3M", 0.05), ("2Y", 0.04)]), |l, q| {
            helper_for(l, q, CalendarId::Target)
        })
        .unwrap();
        let cell = set.get("2Y").unwrap().quote().clone();

        set.update(&quotes(&[("2Y", 0.045)]), |l, q| {
            helper_for(l, q, CalendarId::Target)
        })
        .unwrap();

        assert_eq!(cell.value(), 0.045);
        assert_eq!(set.len(), 2);
        assert_eq!(set.active_labels(), ["2Y".to_string()]);
        assert_eq!(set.active().count(), 1);
    }

    #[test]
    fn test_restore_undoes_update() {
        let mut set: HelperSet<Box<dyn RateHelper>> = HelperSet::new();
        set.update(&quotes(&[("3M", 0.05), ("2Y", 0.04)]), |l, q| {
            helper_for(l, q, CalendarId::Target)
        })
        .unwrap();
        let snapshot = set.snapshot();

        set.update(&quotes(&[("2Y", 0.045), ("5Y", 0.042)]), |l, q| {
            helper_for(l, q, CalendarId::Target)
        })
        .unwrap();
        set.restore(snapshot.clone());

        assert_eq!(set.snapshot(), snapshot);
        assert_eq!(set.get("2Y").unwrap().quote().value(), 0.04);
        assert!(set.get("5Y").is_none());
        assert_eq!(set.active_labels(), ["2Y".to_string(), "3M".to_string()]);
    }

    #[test]
    fn test_insert_marks_active() {
        let mut set: HelperSet<Box<dyn RateHelper>> = HelperSet::new();
        set.insert("5Y", helper_for("5Y", 0.04, CalendarId::Target).unwrap());
        assert_eq!(set.active().count(), 1);
        set.clear();
        assert!(set.is_empty());
    }
}
