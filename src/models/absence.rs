//! Absence and closure period models.
//!
//! This module defines the date-range records that override scheduled
//! attendance: per-child absences and service-wide closure periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reported absence for one child over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Absence {
    /// Unique identifier for the absence.
    pub id: Uuid,
    /// The child the absence applies to.
    pub child_id: Uuid,
    /// The first day of the absence.
    pub start_date: NaiveDate,
    /// The last day of the absence, inclusive.
    pub end_date: NaiveDate,
    /// An optional reason (e.g., "sick", "holiday").
    pub reason: Option<String>,
}

impl Absence {
    /// Returns true if the absence covers the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A period during which the whole service is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosurePeriod {
    /// Unique identifier for the closure.
    pub id: Uuid,
    /// The first day of the closure.
    pub start_date: NaiveDate,
    /// The last day of the closure, inclusive.
    pub end_date: NaiveDate,
    /// An optional reason (e.g., "public holiday", "staff training").
    pub reason: Option<String>,
}

impl ClosurePeriod {
    /// Returns true if the closure covers the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_absence_covers_range_inclusive() {
        let absence = Absence {
            id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            start_date: make_date("2025-05-05"),
            end_date: make_date("2025-05-09"),
            reason: Some("sick".to_string()),
        };

        assert!(absence.covers(make_date("2025-05-05")));
        assert!(absence.covers(make_date("2025-05-07")));
        assert!(absence.covers(make_date("2025-05-09")));
        assert!(!absence.covers(make_date("2025-05-04")));
        assert!(!absence.covers(make_date("2025-05-10")));
    }

    #[test]
    fn test_single_day_absence() {
        let absence = Absence {
            id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            start_date: make_date("2025-05-05"),
            end_date: make_date("2025-05-05"),
            reason: None,
        };

        assert!(absence.covers(make_date("2025-05-05")));
        assert!(!absence.covers(make_date("2025-05-06")));
    }

    #[test]
    fn test_closure_covers_range_inclusive() {
        let closure = ClosurePeriod {
            id: Uuid::new_v4(),
            start_date: make_date("2025-12-24"),
            end_date: make_date("2026-01-02"),
            reason: Some("holidays".to_string()),
        };

        assert!(closure.covers(make_date("2025-12-24")));
        assert!(closure.covers(make_date("2025-12-31")));
        assert!(closure.covers(make_date("2026-01-02")));
        assert!(!closure.covers(make_date("2026-01-03")));
    }

    #[test]
    fn test_absence_serialization_round_trip() {
        let absence = Absence {
            id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            start_date: make_date("2025-05-05"),
            end_date: make_date("2025-05-09"),
            reason: Some("holiday".to_string()),
        };

        let json = serde_json::to_string(&absence).unwrap();
        let deserialized: Absence = serde_json::from_str(&json).unwrap();
        assert_eq!(absence, deserialized);
    }
}
