//! Calculation logic for the Attendance Engine.
//!
//! This module contains all the pure calculation functions for the engine,
//! including age banding with day-of-month correction, staffing ratio
//! lookup, end date timeline derivation across a child's consecutive
//! schedules, staffing compliance snapshot calculation with buffer and
//! status determination, and calendar row expansion with closure and
//! absence classification.

mod age;
mod calendar_rows;
mod compliance;
mod ratio;
mod timeline;

pub use age::{add_years, age_in_months, age_in_years};
pub use calendar_rows::{ExpansionContext, aggregate_rows, expand_rows, sort_rows};
pub use compliance::{PresentChild, calculate_snapshot};
pub use ratio::{AGE_BANDS, AgeBand};
pub use timeline::calculate_end_dates;
