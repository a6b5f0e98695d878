//! Staffing compliance calculation logic.
//!
//! This module computes a point-in-time compliance snapshot for a group:
//! how many staff the present children require under the age-banded
//! ratios, how much staffing margin remains, and the resulting verdict.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{ComplianceStatus, GroupComplianceSnapshot};

use super::age::age_in_months;
use super::ratio::{AGE_BANDS, AgeBand};

/// A child present in a group at the queried instant.
///
/// Only the birth date matters to the calculation; the id is carried for
/// logging and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentChild {
    /// The child's id.
    pub child_id: Uuid,
    /// The child's birth date, used for age banding.
    pub date_of_birth: NaiveDate,
}

/// Calculates a staffing compliance snapshot for a group.
///
/// Children are age-banded as of the calendar date of `at`. The required
/// staff count is the ceiling, in hundredths, of the summed per-child
/// staff fractions, clamped up to exactly one whenever any child is
/// present. The buffer is the staffing margin over the requirement as a
/// percentage, rounded to two decimal places.
///
/// The verdict ladder: a group with no children present is always `Ok`;
/// staffing at or below zero, or below the requirement, is a `Breach`;
/// a buffer under `warning_buffer_percent` is a `Warning`; anything else
/// is `Ok`.
///
/// # Arguments
///
/// * `group_id` - The group the snapshot describes
/// * `at` - The instant the calculation is evaluated for
/// * `present_children` - The children present at that instant
/// * `qualified_staff_count` - The qualified staff count in effect
/// * `warning_buffer_percent` - The buffer below which staffing is a warning
///
/// # Returns
///
/// A fresh [`GroupComplianceSnapshot`] with a new id; the caller is
/// responsible for persisting it.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{calculate_snapshot, PresentChild};
/// use attendance_engine::models::ComplianceStatus;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let children: Vec<PresentChild> = (0..4)
///     .map(|_| PresentChild {
///         child_id: Uuid::new_v4(),
///         date_of_birth: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
///     })
///     .collect();
///
/// let snapshot = calculate_snapshot(
///     Uuid::new_v4(),
///     "2025-06-02T09:30:00Z".parse().unwrap(),
///     &children,
///     1,
///     Decimal::from(5),
/// );
///
/// assert_eq!(snapshot.required_staff, Decimal::ONE);
/// assert_eq!(snapshot.buffer_percent, Decimal::ZERO);
/// assert_eq!(snapshot.status, ComplianceStatus::Warning);
/// ```
pub fn calculate_snapshot(
    group_id: Uuid,
    at: DateTime<Utc>,
    present_children: &[PresentChild],
    qualified_staff_count: i32,
    warning_buffer_percent: Decimal,
) -> GroupComplianceSnapshot {
    let reference_date = at.date_naive();

    // Count children per band, then sum each band's staff demand in
    // hundredths. The per-band division keeps exact sums exact, which a
    // per-child 1/6 in fixed decimal precision would not.
    let mut band_counts = [0u32; AGE_BANDS.len()];
    for child in present_children {
        let months = age_in_months(child.date_of_birth, reference_date);
        band_counts[AgeBand::for_age_months(months).index()] += 1;
    }

    let required_hundredths: Decimal = AGE_BANDS
        .iter()
        .map(|band| {
            Decimal::from(band_counts[band.index()] * 100) / Decimal::from(band.children_per_staff())
        })
        .sum();

    let mut required_staff = required_hundredths.ceil() / Decimal::ONE_HUNDRED;
    if !present_children.is_empty() && required_staff < Decimal::ONE {
        required_staff = Decimal::ONE;
    }

    let staff = Decimal::from(qualified_staff_count);
    let buffer_percent = if required_staff <= Decimal::ZERO {
        if qualified_staff_count > 0 {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    } else if qualified_staff_count < 0 {
        -Decimal::ONE_HUNDRED
    } else {
        ((staff - required_staff) / required_staff * Decimal::ONE_HUNDRED).round_dp(2)
    };

    let status = if present_children.is_empty() {
        ComplianceStatus::Ok
    } else if qualified_staff_count <= 0 || staff < required_staff {
        ComplianceStatus::Breach
    } else if buffer_percent < warning_buffer_percent {
        ComplianceStatus::Warning
    } else {
        ComplianceStatus::Ok
    };

    GroupComplianceSnapshot {
        id: Uuid::new_v4(),
        group_id,
        captured_at: at,
        present_children: present_children.len() as u32,
        required_staff,
        qualified_staff: qualified_staff_count,
        buffer_percent,
        status,
    }
}
