//! Compliance snapshot capture.
//!
//! Resolves who is present in a group at a point in time, resolves the
//! qualified staff count in effect, runs the ratio calculation, and
//! appends the resulting snapshot to the audit trail.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{PresentChild, calculate_snapshot};
use crate::error::{EngineError, EngineResult};
use crate::models::{Group, GroupComplianceSnapshot, TimeSlot};
use crate::repository::Stores;

/// Captures group staffing compliance snapshots.
#[derive(Clone)]
pub struct ComplianceService {
    stores: Stores,
    warning_buffer_percent: Decimal,
}

impl ComplianceService {
    /// Creates the service with the tenant-wide default warning
    /// threshold.
    pub fn new(stores: Stores, warning_buffer_percent: Decimal) -> Self {
        Self {
            stores,
            warning_buffer_percent,
        }
    }

    /// Captures and persists a snapshot using the default warning
    /// threshold.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GroupNotFound`] if the group does not
    /// exist.
    pub async fn capture(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        at: DateTime<Utc>,
    ) -> EngineResult<GroupComplianceSnapshot> {
        self.capture_with_buffer(tenant, group_id, at, self.warning_buffer_percent)
            .await
    }

    /// Captures and persists a snapshot with an explicit warning
    /// threshold.
    pub async fn capture_with_buffer(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        at: DateTime<Utc>,
        warning_buffer_percent: Decimal,
    ) -> EngineResult<GroupComplianceSnapshot> {
        let group = self
            .stores
            .groups
            .get(tenant, group_id)
            .await?
            .ok_or(EngineError::GroupNotFound { id: group_id })?;

        let present = self.present_children(tenant, group_id, at).await?;
        let qualified_staff = self.qualified_staff(tenant, &group, at).await?;

        let snapshot =
            calculate_snapshot(group_id, at, &present, qualified_staff, warning_buffer_percent);
        info!(
            group_id = %group_id,
            present = snapshot.present_children,
            required = %snapshot.required_staff,
            status = ?snapshot.status,
            "Captured compliance snapshot"
        );
        self.stores.snapshots.add(tenant, snapshot.clone()).await?;
        Ok(snapshot)
    }

    /// Resolves which children are present in the group at the instant.
    ///
    /// A child is present when some schedule of theirs is active on the
    /// date and carries a rule for this group whose weekday matches and
    /// whose time slot covers the time of day, and no absence covers the
    /// date. Children are returned at most once, ordered by id.
    pub async fn present_children(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        at: DateTime<Utc>,
    ) -> EngineResult<Vec<PresentChild>> {
        let date = at.date_naive();
        let time = at.time();
        let weekday = date.weekday();

        let schedules = self.stores.schedules.list_by_group(tenant, group_id).await?;
        let slots: HashMap<Uuid, TimeSlot> = self
            .stores
            .time_slots
            .list(tenant)
            .await?
            .into_iter()
            .map(|slot| (slot.id, slot))
            .collect();

        let mut present_ids = BTreeSet::new();
        for schedule in &schedules {
            if !schedule.is_active_on(date) {
                continue;
            }
            for rule in &schedule.rules {
                if rule.group_id != group_id || rule.weekday != weekday {
                    continue;
                }
                let slot = slots
                    .get(&rule.time_slot_id)
                    .ok_or(EngineError::TimeSlotNotFound {
                        id: rule.time_slot_id,
                    })?;
                if slot.covers(time) {
                    present_ids.insert(schedule.child_id);
                    break;
                }
            }
        }

        let absences = self.stores.absences.list_in_range(tenant, date, date).await?;
        for absence in &absences {
            present_ids.remove(&absence.child_id);
        }

        let mut present = Vec::with_capacity(present_ids.len());
        for child_id in present_ids {
            let child = self
                .stores
                .children
                .get(tenant, child_id)
                .await?
                .ok_or(EngineError::ChildNotFound { id: child_id })?;
            present.push(PresentChild {
                child_id,
                date_of_birth: child.date_of_birth,
            });
        }
        Ok(present)
    }

    /// Fetches the most recent snapshot for the group.
    pub async fn latest_snapshot(
        &self,
        tenant: Uuid,
        group_id: Uuid,
    ) -> EngineResult<Option<GroupComplianceSnapshot>> {
        self.require_group(tenant, group_id).await?;
        self.stores.snapshots.latest(tenant, group_id).await
    }

    /// Fetches the group's full snapshot history, newest capture
    /// first.
    pub async fn snapshot_history(
        &self,
        tenant: Uuid,
        group_id: Uuid,
    ) -> EngineResult<Vec<GroupComplianceSnapshot>> {
        self.require_group(tenant, group_id).await?;
        self.stores.snapshots.history(tenant, group_id).await
    }

    /// Latest staffing level in effect at the instant, falling back to
    /// the group's target staff count, then zero.
    async fn qualified_staff(
        &self,
        tenant: Uuid,
        group: &Group,
        at: DateTime<Utc>,
    ) -> EngineResult<i32> {
        let levels = self.stores.staff_levels.list_by_group(tenant, group.id).await?;
        Ok(levels
            .iter()
            .rev()
            .find(|level| level.effective_from <= at)
            .map(|level| level.qualified_staff_count)
            .or(group.target_staff_count)
            .unwrap_or(0))
    }

    async fn require_group(&self, tenant: Uuid, group_id: Uuid) -> EngineResult<()> {
        self.stores
            .groups
            .get(tenant, group_id)
            .await?
            .map(|_| ())
            .ok_or(EngineError::GroupNotFound { id: group_id })
    }
}
