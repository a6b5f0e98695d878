//! Time slot model.
//!
//! This module defines the TimeSlot struct describing a named daily
//! attendance window, including slots that wrap past midnight.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a named daily time window children can be scheduled into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Unique identifier for the time slot.
    pub id: Uuid,
    /// The display name of the slot (e.g., "Morning").
    pub name: String,
    /// The wall-clock start of the slot.
    pub start_time: NaiveTime,
    /// The wall-clock end of the slot. When not after `start_time`, the
    /// slot wraps past midnight into the next day.
    pub end_time: NaiveTime,
}

impl TimeSlot {
    /// Returns true if this slot wraps past midnight.
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Returns true if the given wall-clock time falls inside this slot.
    ///
    /// The slot is half-open: the start is included and the end excluded.
    /// For overnight slots the window covers `start..midnight` plus
    /// `midnight..end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::TimeSlot;
    /// use chrono::NaiveTime;
    /// use uuid::Uuid;
    ///
    /// let morning = TimeSlot {
    ///     id: Uuid::new_v4(),
    ///     name: "Morning".to_string(),
    ///     start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
    ///     end_time: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
    /// };
    /// assert!(morning.covers(NaiveTime::from_hms_opt(9, 15, 0).unwrap()));
    /// assert!(!morning.covers(NaiveTime::from_hms_opt(12, 30, 0).unwrap()));
    /// ```
    pub fn covers(&self, time: NaiveTime) -> bool {
        if self.is_overnight() {
            time >= self.start_time || time < self.end_time
        } else {
            time >= self.start_time && time < self.end_time
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_time(time_str: &str) -> NaiveTime {
        NaiveTime::parse_from_str(time_str, "%H:%M:%S").unwrap()
    }

    fn make_slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            start_time: make_time(start),
            end_time: make_time(end),
        }
    }

    #[test]
    fn test_daytime_slot_covers_interior_time() {
        let slot = make_slot("07:00:00", "12:30:00");

        assert!(slot.covers(make_time("07:00:00")));
        assert!(slot.covers(make_time("09:15:00")));
        assert!(slot.covers(make_time("12:29:59")));
    }

    #[test]
    fn test_daytime_slot_excludes_end_and_outside_times() {
        let slot = make_slot("07:00:00", "12:30:00");

        assert!(!slot.covers(make_time("12:30:00")));
        assert!(!slot.covers(make_time("06:59:59")));
        assert!(!slot.covers(make_time("18:00:00")));
    }

    #[test]
    fn test_overnight_slot_wraps_past_midnight() {
        let slot = make_slot("20:00:00", "06:00:00");

        assert!(slot.is_overnight());
        assert!(slot.covers(make_time("20:00:00")));
        assert!(slot.covers(make_time("23:45:00")));
        assert!(slot.covers(make_time("00:30:00")));
        assert!(slot.covers(make_time("05:59:59")));
        assert!(!slot.covers(make_time("06:00:00")));
        assert!(!slot.covers(make_time("12:00:00")));
    }

    #[test]
    fn test_daytime_slot_is_not_overnight() {
        let slot = make_slot("07:00:00", "12:30:00");
        assert!(!slot.is_overnight());
    }

    #[test]
    fn test_time_slot_serialization_round_trip() {
        let slot = make_slot("13:00:00", "17:30:00");

        let json = serde_json::to_string(&slot).unwrap();
        let deserialized: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(slot, deserialized);
    }
}
