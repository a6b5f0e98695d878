//! Schedule model and related types.
//!
//! This module defines the Schedule and ScheduleRule structs describing
//! a child's recurring weekly attendance pattern.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single weekly recurrence within a schedule.
///
/// Each rule places the child in one group for one time slot on one
/// weekday. A rule may target a different group than the schedule's
/// primary group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRule {
    /// Unique identifier for the rule.
    pub id: Uuid,
    /// The weekday this rule recurs on.
    pub weekday: Weekday,
    /// The time slot attended on that weekday.
    pub time_slot_id: Uuid,
    /// The group attended on that weekday.
    pub group_id: Uuid,
}

/// Represents a child's recurring attendance plan.
///
/// A schedule becomes effective on `start_date` and stays in force until
/// `end_date`, which the engine derives from later schedules and end
/// marks rather than accepting from callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Unique identifier for the schedule.
    pub id: Uuid,
    /// The child the schedule belongs to.
    pub child_id: Uuid,
    /// The primary group of the schedule.
    pub group_id: Uuid,
    /// The first date the schedule is in force.
    pub start_date: NaiveDate,
    /// The last date the schedule is in force, inclusive. `None` means
    /// the schedule is open-ended. This field is always computed.
    pub end_date: Option<NaiveDate>,
    /// The weekly recurrence rules of the schedule.
    #[serde(default)]
    pub rules: Vec<ScheduleRule>,
}

impl Schedule {
    /// Returns true if the schedule is in force on the given date.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Schedule;
    /// use chrono::NaiveDate;
    /// use uuid::Uuid;
    ///
    /// let schedule = Schedule {
    ///     id: Uuid::new_v4(),
    ///     child_id: Uuid::new_v4(),
    ///     group_id: Uuid::new_v4(),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
    ///     end_date: Some(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()),
    ///     rules: vec![],
    /// };
    /// assert!(schedule.is_active_on(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()));
    /// assert!(!schedule.is_active_on(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    /// ```
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }

    /// Returns true if the schedule places the child in the given group,
    /// either as its primary group or through any of its rules.
    pub fn touches_group(&self, group_id: Uuid) -> bool {
        self.group_id == group_id || self.rules.iter().any(|rule| rule.group_id == group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_schedule(start: &str, end: Option<&str>) -> Schedule {
        Schedule {
            id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            start_date: make_date(start),
            end_date: end.map(make_date),
            rules: vec![],
        }
    }

    #[test]
    fn test_active_on_start_and_end_dates_inclusive() {
        let schedule = make_schedule("2025-02-01", Some("2025-06-30"));

        assert!(schedule.is_active_on(make_date("2025-02-01")));
        assert!(schedule.is_active_on(make_date("2025-06-30")));
        assert!(!schedule.is_active_on(make_date("2025-01-31")));
        assert!(!schedule.is_active_on(make_date("2025-07-01")));
    }

    #[test]
    fn test_open_ended_schedule_active_far_in_future() {
        let schedule = make_schedule("2025-02-01", None);

        assert!(schedule.is_active_on(make_date("2025-02-01")));
        assert!(schedule.is_active_on(make_date("2031-12-25")));
        assert!(!schedule.is_active_on(make_date("2025-01-31")));
    }

    #[test]
    fn test_touches_group_via_primary_group() {
        let schedule = make_schedule("2025-02-01", None);
        assert!(schedule.touches_group(schedule.group_id));
    }

    #[test]
    fn test_touches_group_via_rule_group() {
        let other_group = Uuid::new_v4();
        let mut schedule = make_schedule("2025-02-01", None);
        schedule.rules.push(ScheduleRule {
            id: Uuid::new_v4(),
            weekday: Weekday::Wed,
            time_slot_id: Uuid::new_v4(),
            group_id: other_group,
        });

        assert!(schedule.touches_group(other_group));
        assert!(!schedule.touches_group(Uuid::new_v4()));
    }

    #[test]
    fn test_schedule_serialization_round_trip() {
        let mut schedule = make_schedule("2025-02-01", Some("2025-06-30"));
        schedule.rules.push(ScheduleRule {
            id: Uuid::new_v4(),
            weekday: Weekday::Mon,
            time_slot_id: Uuid::new_v4(),
            group_id: schedule.group_id,
        });

        let json = serde_json::to_string(&schedule).unwrap();
        let deserialized: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(schedule, deserialized);
    }

    #[test]
    fn test_schedule_deserialization_defaults_rules_to_empty() {
        let json = r#"{
            "id": "0e8e2b4a-6c1d-4f3e-8a5b-7c9d1e2f3a4b",
            "child_id": "1f9f3c5b-7d2e-4a4f-9b6c-8dae2f3a4b5c",
            "group_id": "2a0a4d6c-8e3f-4b5a-ac7d-9ebf3a4b5c6d",
            "start_date": "2025-02-01",
            "end_date": null
        }"#;

        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert!(schedule.rules.is_empty());
        assert!(schedule.end_date.is_none());
    }
}
