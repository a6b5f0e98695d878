//! Age-banded child-to-staff ratio table.
//!
//! This module provides the static lookup from a child's age band to the
//! legally required number of children per qualified staff member.

use serde::{Deserialize, Serialize};

/// Represents the age band a child falls into for ratio purposes.
///
/// Bands are keyed by age in whole months; children of four years and
/// older share the three-year band's ratio.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::AgeBand;
///
/// assert_eq!(AgeBand::for_age_months(7), AgeBand::UnderOne);
/// assert_eq!(AgeBand::for_age_months(36), AgeBand::ThreeAndOver);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    /// Younger than one year - four children per staff member.
    UnderOne,
    /// One year old - five children per staff member.
    OneToTwo,
    /// Two years old - six children per staff member.
    TwoToThree,
    /// Three years and older - eight children per staff member.
    ThreeAndOver,
}

/// All age bands, ordered youngest first.
pub const AGE_BANDS: [AgeBand; 4] = [
    AgeBand::UnderOne,
    AgeBand::OneToTwo,
    AgeBand::TwoToThree,
    AgeBand::ThreeAndOver,
];

impl std::fmt::Display for AgeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeBand::UnderOne => write!(f, "0-1y"),
            AgeBand::OneToTwo => write!(f, "1-2y"),
            AgeBand::TwoToThree => write!(f, "2-3y"),
            AgeBand::ThreeAndOver => write!(f, "3y+"),
        }
    }
}

impl AgeBand {
    /// Determines the age band for an age given in whole months.
    ///
    /// # Arguments
    ///
    /// * `age_in_months` - The child's age in whole months
    ///
    /// # Returns
    ///
    /// The [`AgeBand`] the age falls into.
    pub fn for_age_months(age_in_months: u32) -> Self {
        match age_in_months {
            0..=11 => AgeBand::UnderOne,
            12..=23 => AgeBand::OneToTwo,
            24..=35 => AgeBand::TwoToThree,
            _ => AgeBand::ThreeAndOver,
        }
    }

    /// Returns how many children one qualified staff member may supervise
    /// in this band.
    pub fn children_per_staff(self) -> u32 {
        match self {
            AgeBand::UnderOne => 4,
            AgeBand::OneToTwo => 5,
            AgeBand::TwoToThree => 6,
            AgeBand::ThreeAndOver => 8,
        }
    }

    /// Returns the position of this band in [`AGE_BANDS`].
    pub fn index(self) -> usize {
        match self {
            AgeBand::UnderOne => 0,
            AgeBand::OneToTwo => 1,
            AgeBand::TwoToThree => 2,
            AgeBand::ThreeAndOver => 3,
        }
    }
}
