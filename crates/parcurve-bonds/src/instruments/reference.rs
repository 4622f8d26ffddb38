//! Reference bonds: the market's standard structure for a maturity.
//!
//! Long municipal bonds are normally issued with a ten-year par call. A
//! reference bond restates a bond in that structure, with the call falling on
//! a coupon date (same month and day as maturity) nearest the call horizon.

use parcurve_core::daycounts::{DayCount, Thirty360};
use parcurve_core::Date;

use crate::conventions::BondConventions;
use crate::error::BondResult;
use crate::instruments::bond::{Bond, PAR};
use crate::instruments::call::CallFeature;

/// Standard par call horizon in years.
pub const DEFAULT_CALL_YEARS: u32 = 10;

/// Par call date of a reference bond, or `None` when it would not fall
/// before maturity.
///
/// # Example
///
/// ```rust
/// use parcurve_bonds::instruments::reference_call_date;
/// use parcurve_core::Date;
///
/// let issue = Date::from_ymd(2025, 1, 15).unwrap();
/// let maturity = Date::from_ymd(2045, 6, 1).unwrap();
/// let call = reference_call_date(issue, maturity, 10).unwrap();
/// assert_eq!(call, Some(Date::from_ymd(2035, 6, 1).unwrap()));
/// ```
pub fn reference_call_date(issue: Date, maturity: Date, call_years: u32) -> BondResult<Option<Date>> {
    let years = i32::try_from(call_years).unwrap_or(i32::MAX);
    let horizon = issue.add_years(years)?;

    let first = Date::from_ymd(horizon.year(), maturity.month(), 1)?;
    let day = maturity.day().min(first.days_in_month());
    let anniversary = Date::from_ymd(horizon.year(), maturity.month(), day)?;
    if Thirty360.day_count(anniversary, maturity) <= 0 {
        return Ok(None);
    }

    // Snap to the coupon date within half a year of the horizon.
    let diff = Thirty360.day_count(horizon, anniversary);
    let call = if diff.abs() <= 180 {
        anniversary
    } else if diff > 0 {
        anniversary.add_months(-6)?
    } else {
        anniversary.add_months(6)?
    };

    Ok((Thirty360.day_count(call, maturity) > 0).then_some(call))
}

/// Restates `bond` as a municipal reference bond.
///
/// The call is dated from `issue` (the bond's settlement when absent) and the
/// coupon defaults to the bond's own.
pub fn reference_bond(
    bond: &Bond,
    issue: Option<Date>,
    call_years: u32,
    coupon: Option<f64>,
) -> BondResult<Bond> {
    let issue = issue.unwrap_or(bond.settlement());
    let call = reference_call_date(issue, bond.maturity(), call_years)?
        .map(|date| CallFeature::new(date, PAR));

    let mut builder = Bond::builder()
        .coupon(coupon.unwrap_or(bond.coupon()))
        .maturity(bond.maturity())
        .redemption(bond.redemption())
        .conventions(BondConventions::municipal())
        .settlement(bond.settlement())
        .maybe_call(call);
    if let Some(oid) = bond.oid() {
        builder = builder.oid(oid);
    }
    builder.build()
}
