//! US Treasury bond conventions.
//!
//! Provides conventions for:
//! - Treasury notes and bonds (coupon-bearing)
//! - Treasury bills (discount instruments)

use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::Frequency;

use super::BondConventions;

/// Returns conventions for US Treasury notes and bonds.
///
/// - Day count: Actual/Actual (ICMA)
/// - Frequency: Semi-annual
/// - Settlement: T+2
/// - Payments: Modified Following
///
/// # Example
///
/// ```rust
/// use parcurve_bonds::conventions::us_treasury;
///
/// let conv = us_treasury::note_bond();
/// assert_eq!(conv.settlement_days(), 2);
/// ```
#[must_use]
pub fn note_bond() -> BondConventions {
    BondConventions::builder()
        .settlement_days(2)
        .day_count(DayCountConvention::ActActIcma)
        .frequency(Frequency::SemiAnnual)
        .payment_convention(BusinessDayConvention::ModifiedFollowing)
        .termination_convention(BusinessDayConvention::Unadjusted)
        .calendar(CalendarId::UsGovernmentBond)
        .face(100.0)
        .build()
}

/// Returns conventions for US Treasury bills.
///
/// - Day count: Actual/360 (discount)
/// - Frequency: Zero coupon
/// - Settlement: T+2
#[must_use]
pub fn bill() -> BondConventions {
    BondConventions::builder()
        .settlement_days(2)
        .day_count(DayCountConvention::Act360)
        .frequency(Frequency::Zero)
        .payment_convention(BusinessDayConvention::ModifiedFollowing)
        .termination_convention(BusinessDayConvention::Unadjusted)
        .calendar(CalendarId::UsGovernmentBond)
        .face(100.0)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_bond() {
        let conv = note_bond();
        assert_eq!(conv.frequency(), Frequency::SemiAnnual);
        assert_eq!(conv.payment_convention(), BusinessDayConvention::ModifiedFollowing);
    }

    #[test]
    fn test_bill() {
        let conv = bill();
        assert_eq!(conv.day_count(), DayCountConvention::Act360);
        assert!(conv.frequency().is_zero());
    }
}
