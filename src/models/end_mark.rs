//! End mark model.
//!
//! This module defines the EndMark struct, a dated marker recording when
//! a child's care is expected to end. Marks are either entered manually
//! or maintained by the automation service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated marker that caps a child's scheduling timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndMark {
    /// Unique identifier for the mark.
    pub id: Uuid,
    /// The child the mark belongs to.
    pub child_id: Uuid,
    /// The first date the child is no longer in care.
    pub end_date: NaiveDate,
    /// An optional human-readable reason for the mark.
    pub reason: Option<String>,
    /// True when the mark was created and is maintained by the
    /// automation service rather than entered manually.
    pub is_system_generated: bool,
}

impl EndMark {
    /// Replaces the reason text of a system-generated mark in place.
    ///
    /// Manual marks record user intent and are left untouched; the call
    /// returns false without modifying them.
    ///
    /// # Returns
    ///
    /// True if the reason was updated, false if the mark is manual.
    pub fn set_reason(&mut self, reason: Option<String>) -> bool {
        if !self.is_system_generated {
            return false;
        }
        self.reason = reason;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_mark(system: bool) -> EndMark {
        EndMark {
            id: Uuid::new_v4(),
            child_id: Uuid::new_v4(),
            end_date: make_date("2026-08-31"),
            reason: Some("original".to_string()),
            is_system_generated: system,
        }
    }

    #[test]
    fn test_set_reason_updates_system_mark() {
        let mut mark = make_mark(true);

        let updated = mark.set_reason(Some("recomputed".to_string()));

        assert!(updated);
        assert_eq!(mark.reason.as_deref(), Some("recomputed"));
    }

    #[test]
    fn test_set_reason_clears_system_mark_reason() {
        let mut mark = make_mark(true);

        let updated = mark.set_reason(None);

        assert!(updated);
        assert!(mark.reason.is_none());
    }

    #[test]
    fn test_set_reason_leaves_manual_mark_untouched() {
        let mut mark = make_mark(false);

        let updated = mark.set_reason(Some("recomputed".to_string()));

        assert!(!updated);
        assert_eq!(mark.reason.as_deref(), Some("original"));
    }

    #[test]
    fn test_end_mark_serialization_round_trip() {
        let mark = make_mark(true);

        let json = serde_json::to_string(&mark).unwrap();
        let deserialized: EndMark = serde_json::from_str(&json).unwrap();
        assert_eq!(mark, deserialized);
    }
}
