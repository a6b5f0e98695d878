//! Calendar row model and related types.
//!
//! This module defines the denormalized per-child, per-date, per-slot
//! rows the engine materializes for fast calendar reads, along with the
//! per-slot aggregation used for occupancy views.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The resolved attendance state of a child for one calendar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The child is expected to attend.
    Present,
    /// The child is scheduled but reported absent.
    Absent,
    /// The service is closed on this date.
    Closed,
}

/// A precomputed calendar cell: one child, one date, one time slot.
///
/// Rows denormalize the child's birth date, the slot times and the
/// resolved status so calendar reads need no joins. They are cache
/// entries and are rebuilt wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRow {
    /// Unique identifier for the row.
    pub id: Uuid,
    /// The group the row was materialized for.
    pub group_id: Uuid,
    /// The child attending.
    pub child_id: Uuid,
    /// The calendar date of the row.
    pub date: NaiveDate,
    /// The time slot attended.
    pub time_slot_id: Uuid,
    /// The slot name at materialization time.
    pub time_slot_name: String,
    /// The slot start at materialization time.
    pub start_time: NaiveTime,
    /// The slot end at materialization time.
    pub end_time: NaiveTime,
    /// The resolved attendance status.
    pub status: AttendanceStatus,
    /// The reason carried over from the absence or closure, if any.
    pub reason: Option<String>,
    /// The child's birth date at materialization time.
    pub date_of_birth: NaiveDate,
    /// The child's age in whole years on `date`.
    pub age_in_years: u32,
    /// When the row was materialized.
    pub cached_at: DateTime<Utc>,
}

/// Headcount per date and time slot, summed from calendar rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarAggregation {
    /// The calendar date.
    pub date: NaiveDate,
    /// The slot start time.
    pub start_time: NaiveTime,
    /// The slot end time.
    pub end_time: NaiveTime,
    /// Number of children expected to attend.
    pub present: u32,
    /// Number of children reported absent.
    pub absent: u32,
    /// Number of children whose slot falls in a closure.
    pub closed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"present\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Absent).unwrap(),
            "\"absent\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Closed).unwrap(),
            "\"closed\""
        );
    }

    #[test]
    fn test_calendar_row_serialization_round_trip() {
        let row = CalendarRow {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
            time_slot_id: Uuid::new_v4(),
            time_slot_name: "Morning".to_string(),
            start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
            status: AttendanceStatus::Absent,
            reason: Some("sick".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(2022, 4, 9).unwrap(),
            age_in_years: 2,
            cached_at: "2025-03-16T22:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_string(&row).unwrap();
        let deserialized: CalendarRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, deserialized);
    }
}
