//! Historical index fixings.
//!
//! A [`FixingStore`] is owned by whoever needs it (a term structure model, a
//! test, a CLI session) and passed to pricers explicitly. There is no global
//! store.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use parcurve_core::Date;

/// Name of the three-month LIBOR index.
pub const LIBOR_3M: &str = "USD-LIBOR-3M";

/// Storage for historical rate fixings, by index name then date.
///
/// # Example
///
/// ```rust
/// use parcurve_core::Date;
/// use parcurve_curves::fixings::{FixingStore, LIBOR_3M};
/// use rust_decimal_macros::dec;
///
/// let mut store = FixingStore::new();
/// let date = Date::from_ymd(2025, 1, 13).unwrap();
/// store.add_fixing(LIBOR_3M, date, dec!(0.0530));
/// assert_eq!(store.get_fixing(LIBOR_3M, date), Some(dec!(0.0530)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixingStore {
    fixings: BTreeMap<String, BTreeMap<Date, Decimal>>,
}

impl FixingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overwrites a fixing, returning the previous value.
    pub fn add_fixing(&mut self, index: &str, date: Date, rate: Decimal) -> Option<Decimal> {
        self.fixings
            .entry(index.to_string())
            .or_default()
            .insert(date, rate)
    }

    /// Adds a fixing given as `f64`. Non-finite rates are ignored.
    pub fn add_fixing_f64(&mut self, index: &str, date: Date, rate: f64) -> bool {
        match Decimal::try_from(rate) {
            Ok(rate) => {
                self.add_fixing(index, date, rate);
                true
            }
            Err(_) => false,
        }
    }

    /// The fixing for `index` on `date`.
    #[must_use]
    pub fn get_fixing(&self, index: &str, date: Date) -> Option<Decimal> {
        self.fixings.get(index).and_then(|dates| dates.get(&date).copied())
    }

    /// The most recent fixing on or before `date`.
    #[must_use]
    pub fn last_fixing_before(&self, index: &str, date: Date) -> Option<(Date, Decimal)> {
        self.fixings
            .get(index)
            .and_then(|dates| dates.range(..=date).next_back().map(|(d, r)| (*d, *r)))
    }

    /// All fixings of `index` in date order.
    #[must_use]
    pub fn fixings_for(&self, index: &str) -> Vec<(Date, Decimal)> {
        self.fixings
            .get(index)
            .map(|dates| dates.iter().map(|(d, r)| (*d, *r)).collect())
            .unwrap_or_default()
    }

    /// Index names with at least one fixing.
    #[must_use]
    pub fn indices(&self) -> Vec<&str> {
        self.fixings.keys().map(String::as_str).collect()
    }

    /// True when no fixings are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixings.values().all(BTreeMap::is_empty)
    }

    /// Removes every fixing.
    pub fn clear(&mut self) {
        self.fixings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(day: u32) -> Date {
        Date::from_ymd(2025, 1, day).unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut store = FixingStore::new();
        assert!(store.is_empty());
        assert_eq!(store.add_fixing(LIBOR_3M, d(2), dec!(0.05)), None);
        assert_eq!(store.add_fixing(LIBOR_3M, d(2), dec!(0.051)), Some(dec!(0.05)));
        assert_eq!(store.get_fixing(LIBOR_3M, d(2)), Some(dec!(0.051)));
        assert_eq!(store.get_fixing(LIBOR_3M, d(3)), None);
        assert_eq!(store.get_fixing("OTHER", d(2)), None);
    }

    #[test]
    fn test_last_fixing_before() {
        let mut store = FixingStore::new();
        store.add_fixing(LIBOR_3M, d(2), dec!(0.050));
        store.add_fixing(LIBOR_3M, d(6), dec!(0.052));
        assert_eq!(store.last_fixing_before(LIBOR_3M, d(5)), Some((d(2), dec!(0.050))));
        assert_eq!(store.last_fixing_before(LIBOR_3M, d(6)), Some((d(6), dec!(0.052))));
        assert_eq!(store.last_fixing_before(LIBOR_3M, d(1)), None);
    }

    #[test]
    fn test_f64_fixings_and_clear() {
        let mut store = FixingStore::new();
        assert!(store.add_fixing_f64(LIBOR_3M, d(2), 0.0525));
        assert!(!store.add_fixing_f64(LIBOR_3M, d(3), f64::NAN));
        assert_eq!(store.fixings_for(LIBOR_3M).len(), 1);
        assert_eq!(store.indices(), vec![LIBOR_3M]);
        store.clear();
        assert!(store.is_empty());
    }
}
