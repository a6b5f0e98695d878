//! Child lifecycle event handling.
//!
//! Added and updated children flow through end mark maintenance, which
//! in turn recalculates the timeline; when that changes anything, the
//! affected groups' calendar caches are refreshed. Deleted children
//! cascade through their dependent records.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::events::ChildLifecycleEvent;
use crate::models::Child;
use crate::repository::Stores;

use super::calendar::CalendarService;
use super::end_mark::EndMarkAutomationService;

/// Applies child lifecycle events to the engine's stores.
#[derive(Clone)]
pub struct ChildLifecycleHandler {
    stores: Stores,
    end_marks: EndMarkAutomationService,
    calendar: CalendarService,
    refresh_horizon_days: u32,
}

impl ChildLifecycleHandler {
    /// Creates the handler.
    ///
    /// Pass clones of the same [`EndMarkAutomationService`] and
    /// [`CalendarService`] instances used elsewhere so their per-key
    /// serialization is shared. `refresh_horizon_days` bounds how far
    /// ahead calendar caches are refreshed after a timeline change.
    pub fn new(
        stores: Stores,
        end_marks: EndMarkAutomationService,
        calendar: CalendarService,
        refresh_horizon_days: u32,
    ) -> Self {
        Self {
            stores,
            end_marks,
            calendar,
            refresh_horizon_days,
        }
    }

    /// Applies one lifecycle event for the tenant.
    pub async fn handle(&self, tenant: Uuid, event: ChildLifecycleEvent) -> EngineResult<()> {
        match event {
            ChildLifecycleEvent::Added {
                child_id,
                given_name,
                family_name,
                date_of_birth,
            }
            | ChildLifecycleEvent::Updated {
                child_id,
                given_name,
                family_name,
                date_of_birth,
            } => {
                let child = Child {
                    id: child_id,
                    given_name,
                    family_name,
                    date_of_birth,
                };
                self.stores.children.upsert(tenant, child.clone()).await?;

                let changed = self.end_marks.maintain(tenant, &child).await?;
                if changed {
                    self.refresh_calendars(tenant, child_id).await?;
                }
                Ok(())
            }
            ChildLifecycleEvent::Deleted { child_id } => {
                self.stores.schedules.delete_by_child(tenant, child_id).await?;
                self.stores.end_marks.delete_by_child(tenant, child_id).await?;
                self.stores.absences.delete_by_child(tenant, child_id).await?;
                self.stores.calendar_rows.delete_by_child(tenant, child_id).await?;
                self.stores.children.delete(tenant, child_id).await?;
                info!(child_id = %child_id, "Removed child and dependent records");
                Ok(())
            }
        }
    }

    /// Drops the child's cached rows everywhere, then rebuilds the
    /// caches of every group their schedules touch over the refresh
    /// horizon. Ranges outside the horizon are repaired on demand by the
    /// query service's completeness check.
    async fn refresh_calendars(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()> {
        self.stores.calendar_rows.delete_by_child(tenant, child_id).await?;

        let schedules = self.stores.schedules.list_by_child(tenant, child_id).await?;
        let mut group_ids = BTreeSet::new();
        for schedule in &schedules {
            group_ids.insert(schedule.group_id);
            for rule in &schedule.rules {
                group_ids.insert(rule.group_id);
            }
        }

        let today = Utc::now().date_naive();
        let horizon_end = today + Duration::days(self.refresh_horizon_days as i64);
        for group_id in group_ids {
            self.calendar
                .recalculate(tenant, group_id, today, horizon_end)
                .await?;
        }
        Ok(())
    }
}
