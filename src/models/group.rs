//! Group and staffing level models.
//!
//! This module defines the Group struct for a room or cohort of children
//! and the GroupStaffLevel struct recording qualified staff counts over time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a group (room) children attend within the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier for the group.
    pub id: Uuid,
    /// The display name of the group.
    pub name: String,
    /// Optional planned staff count, used as a fallback when no
    /// timestamped staffing record exists.
    pub target_staff_count: Option<i32>,
}

/// A timestamped record of how many qualified staff are assigned to a group.
///
/// The record with the latest `effective_from` at or before a query time is
/// the one in effect at that time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStaffLevel {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The group the record applies to.
    pub group_id: Uuid,
    /// The instant from which this staffing level applies.
    pub effective_from: DateTime<Utc>,
    /// The number of qualified staff assigned from that instant.
    pub qualified_staff_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_serialization_round_trip() {
        let group = Group {
            id: Uuid::new_v4(),
            name: "Butterflies".to_string(),
            target_staff_count: Some(3),
        };

        let json = serde_json::to_string(&group).unwrap();
        let deserialized: Group = serde_json::from_str(&json).unwrap();
        assert_eq!(group, deserialized);
    }

    #[test]
    fn test_group_without_target_staff_count() {
        let json = r#"{
            "id": "a1b2c3d4-e5f6-4a3b-8c7d-9e0f1a2b3c4d",
            "name": "Caterpillars",
            "target_staff_count": null
        }"#;

        let group: Group = serde_json::from_str(json).unwrap();
        assert_eq!(group.name, "Caterpillars");
        assert!(group.target_staff_count.is_none());
    }

    #[test]
    fn test_staff_level_serialization_round_trip() {
        let level = GroupStaffLevel {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            effective_from: "2025-03-01T08:00:00Z".parse().unwrap(),
            qualified_staff_count: 2,
        };

        let json = serde_json::to_string(&level).unwrap();
        let deserialized: GroupStaffLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(level, deserialized);
    }
}
