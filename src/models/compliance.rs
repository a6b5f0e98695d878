//! Compliance snapshot model and related types.
//!
//! This module defines the persisted result of a staffing compliance
//! calculation for a group at a point in time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The compliance verdict for a group at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Staffing meets the requirement with an adequate buffer.
    Ok,
    /// Staffing meets the requirement but the buffer is thin.
    Warning,
    /// Staffing does not meet the requirement.
    Breach,
}

/// The persisted result of one compliance calculation for a group.
///
/// Snapshots are append-only history; a new calculation never rewrites
/// an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupComplianceSnapshot {
    /// Unique identifier for the snapshot.
    pub id: Uuid,
    /// The group the snapshot describes.
    pub group_id: Uuid,
    /// The instant the calculation was evaluated for.
    pub captured_at: DateTime<Utc>,
    /// How many children were present at that instant.
    pub present_children: u32,
    /// The required number of staff, to two decimal places.
    pub required_staff: Decimal,
    /// The qualified staff count in effect at that instant.
    pub qualified_staff: i32,
    /// Staffing margin over the requirement, as a percentage.
    pub buffer_percent: Decimal,
    /// The resulting compliance verdict.
    pub status: ComplianceStatus,
}
