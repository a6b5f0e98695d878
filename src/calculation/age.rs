//! Age arithmetic for ratio banding and end mark automation.
//!
//! This module provides the date calculations shared by the compliance
//! calculator (age in months on a reference date) and the end mark
//! automation (birth date plus a number of years).

use chrono::{Datelike, Months, NaiveDate};

/// Calculates a child's age in whole months on a reference date.
///
/// The raw calendar-month difference is corrected by one month when the
/// reference day-of-month has not yet reached the birth day-of-month,
/// and the result is clamped to zero for reference dates before birth.
///
/// # Arguments
///
/// * `date_of_birth` - The child's birth date
/// * `on` - The reference date to measure the age at
///
/// # Returns
///
/// The age in whole months, never negative.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::age_in_months;
/// use chrono::NaiveDate;
///
/// let born = NaiveDate::from_ymd_opt(2022, 4, 9).unwrap();
///
/// // One day short of the second birthday
/// let almost = NaiveDate::from_ymd_opt(2024, 4, 8).unwrap();
/// assert_eq!(age_in_months(born, almost), 23);
///
/// // On the second birthday
/// let birthday = NaiveDate::from_ymd_opt(2024, 4, 9).unwrap();
/// assert_eq!(age_in_months(born, birthday), 24);
/// ```
pub fn age_in_months(date_of_birth: NaiveDate, on: NaiveDate) -> u32 {
    let mut months = (on.year() - date_of_birth.year()) * 12 + on.month() as i32
        - date_of_birth.month() as i32;
    if on.day() < date_of_birth.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Calculates a child's age in whole years on a reference date.
///
/// # Arguments
///
/// * `date_of_birth` - The child's birth date
/// * `on` - The reference date to measure the age at
///
/// # Returns
///
/// The age in whole years, never negative.
pub fn age_in_years(date_of_birth: NaiveDate, on: NaiveDate) -> u32 {
    age_in_months(date_of_birth, on) / 12
}

/// Adds a number of calendar years to a date.
///
/// When the resulting month is shorter than the source day-of-month the
/// day is clamped to the end of the month, so a February 29 birth date
/// lands on February 28 in non-leap years. Additions past the end of
/// the supported calendar range saturate to [`NaiveDate::MAX`].
///
/// # Arguments
///
/// * `date` - The date to advance
/// * `years` - The number of years to add
///
/// # Returns
///
/// The advanced date.
pub fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_add_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MAX)
}
