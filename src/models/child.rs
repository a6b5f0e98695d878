//! Child model.
//!
//! This module defines the Child struct representing an enrolled child
//! whose schedules and attendance the engine computes over.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a child enrolled with the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    /// Unique identifier for the child.
    pub id: Uuid,
    /// The child's given name.
    pub given_name: String,
    /// The child's family name.
    pub family_name: String,
    /// The child's date of birth, used for age and staffing ratio banding.
    pub date_of_birth: NaiveDate,
}

impl Child {
    /// Returns the child's display name as "given family".
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Child;
    /// use chrono::NaiveDate;
    /// use uuid::Uuid;
    ///
    /// let child = Child {
    ///     id: Uuid::new_v4(),
    ///     given_name: "Mia".to_string(),
    ///     family_name: "Larsen".to_string(),
    ///     date_of_birth: NaiveDate::from_ymd_opt(2022, 4, 9).unwrap(),
    /// };
    /// assert_eq!(child.full_name(), "Mia Larsen");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}
