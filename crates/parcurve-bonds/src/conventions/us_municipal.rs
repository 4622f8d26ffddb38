//! US municipal and generic US bond conventions.

use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::Frequency;

use super::BondConventions;

/// Generic US bond conventions (the default).
///
/// - Day count: 30/360
/// - Frequency: Semi-annual
/// - Settlement: T+3
/// - Payments: Unadjusted
#[must_use]
pub fn simple() -> BondConventions {
    BondConventions::default()
}

/// Returns conventions for tax-exempt municipal bonds.
///
/// - Day count: 30/360
/// - Frequency: Semi-annual
/// - Settlement: T+3
/// - Payments: Following
///
/// # Example
///
/// ```rust
/// use parcurve_bonds::conventions::us_municipal;
/// use parcurve_core::calendars::BusinessDayConvention;
///
/// let conv = us_municipal::municipal();
/// assert_eq!(conv.payment_convention(), BusinessDayConvention::Following);
/// ```
#[must_use]
pub fn municipal() -> BondConventions {
    BondConventions::builder()
        .settlement_days(3)
        .day_count(DayCountConvention::Thirty360)
        .frequency(Frequency::SemiAnnual)
        .payment_convention(BusinessDayConvention::Following)
        .termination_convention(BusinessDayConvention::Unadjusted)
        .calendar(CalendarId::UsGovernmentBond)
        .face(100.0)
        .build()
}
