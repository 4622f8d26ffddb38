//! # Parcurve Core
//!
//! Foundational types for the Parcurve yield curve and bond analytics crates:
//!
//! - **Types**: [`Date`], [`Frequency`], [`Tenor`]
//! - **Day Count Conventions**: ACT/360, ACT/365F, ACT/ACT (ISDA and ICMA), 30/360
//! - **Business Day Calendars**: TARGET, US government bond, weekends-only
//!
//! ## Example
//!
//! ```rust
//! use parcurve_core::prelude::*;
//!
//! let settle = Date::from_ymd(2025, 1, 15).unwrap();
//! let maturity = Tenor::parse("2Y")
//!     .advance(settle, BusinessDayConvention::ModifiedFollowing, &Target, false)
//!     .unwrap();
//! assert_eq!(maturity, Date::from_ymd(2027, 1, 15).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::cast_possible_truncation)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessDayConvention, Calendar, CalendarId, Target, UsGovernmentBond, WeekendCalendar,
    };
    pub use crate::daycounts::{
        Act360, Act365Fixed, ActActIcma, ActActIsda, DayCount, DayCountConvention, Thirty360,
    };
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Frequency, Tenor, TimeUnit};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency, Tenor, TimeUnit};
