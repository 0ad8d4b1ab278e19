//! Calendar heat-map derivation.
//!
//! Turns the completion record and the current streak into per-day display
//! states for one month. Navigation only moves the displayed [`YearMonth`].

mod month;
mod view;

pub use month::YearMonth;
pub use view::{derive_month, DayState, DayStatus, MonthView};
