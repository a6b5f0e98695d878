//! Calendar row cache maintenance and queries.
//!
//! The cache is the persisted store itself; this service rebuilds whole
//! ranges atomically and answers queries from the cached rows, falling
//! back to a rebuild when the range looks incomplete.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{ExpansionContext, aggregate_rows, expand_rows};
use crate::error::{EngineError, EngineResult};
use crate::models::{CalendarAggregation, CalendarRow, Child, TimeSlot};
use crate::repository::Stores;

use super::locks::KeyedLocks;

/// Rebuilds and serves materialized calendar rows.
///
/// Clones share the per-group serialization state, so overlapping
/// rebuilds of one group's cache take turns regardless of which clone
/// they go through.
#[derive(Clone)]
pub struct CalendarService {
    stores: Stores,
    locks: Arc<KeyedLocks<(Uuid, Uuid)>>,
}

impl CalendarService {
    /// Creates the service over the given stores.
    pub fn new(stores: Stores) -> Self {
        Self {
            stores,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Recomputes and atomically replaces the group's cached rows for
    /// the inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDateRange`] if `start` is after
    /// `end`, [`EngineError::GroupNotFound`] if the group does not
    /// exist, and the expansion's not-found errors for dangling child or
    /// slot references. On error the previously cached rows remain
    /// untouched.
    pub async fn recalculate(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<CalendarRow>> {
        self.validate(tenant, group_id, start, end).await?;
        let _guard = self.locks.acquire((tenant, group_id)).await;
        self.rebuild_locked(tenant, group_id, start, end).await
    }

    /// Returns the group's rows for the inclusive date range, sorted by
    /// date, slot start time, then child id.
    ///
    /// Serves the cache when every date in the range has at least one
    /// row; otherwise, or when `force_rebuild` is set, the whole range
    /// is recomputed first. A date with legitimately no scheduled
    /// children is indistinguishable from a missing one, so it triggers
    /// a rebuild as well.
    pub async fn rows(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        force_rebuild: bool,
    ) -> EngineResult<Vec<CalendarRow>> {
        self.validate(tenant, group_id, start, end).await?;

        if !force_rebuild {
            let cached = self
                .stores
                .calendar_rows
                .list_range(tenant, group_id, start, end)
                .await?;
            if !has_missing_date(&cached, start, end) {
                return Ok(cached);
            }
            debug!(
                group_id = %group_id,
                start = %start,
                end = %end,
                "Calendar cache incomplete, rebuilding range"
            );
        }

        let _guard = self.locks.acquire((tenant, group_id)).await;
        self.rebuild_locked(tenant, group_id, start, end).await
    }

    /// Returns per-slot headcounts for the range, ensuring rows are
    /// present first.
    pub async fn aggregations(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<CalendarAggregation>> {
        let rows = self.rows(tenant, group_id, start, end, false).await?;
        Ok(aggregate_rows(&rows))
    }

    async fn validate(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<()> {
        if start > end {
            return Err(EngineError::InvalidDateRange { start, end });
        }
        self.stores
            .groups
            .get(tenant, group_id)
            .await?
            .map(|_| ())
            .ok_or(EngineError::GroupNotFound { id: group_id })
    }

    /// Expands the range and swaps it into the cache. Expansion failures
    /// surface before anything is deleted, so readers keep seeing the
    /// prior rows.
    async fn rebuild_locked(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<CalendarRow>> {
        let schedules = self.stores.schedules.list_by_group(tenant, group_id).await?;
        let children: HashMap<Uuid, Child> = self
            .stores
            .children
            .list(tenant)
            .await?
            .into_iter()
            .map(|child| (child.id, child))
            .collect();
        let time_slots: HashMap<Uuid, TimeSlot> = self
            .stores
            .time_slots
            .list(tenant)
            .await?
            .into_iter()
            .map(|slot| (slot.id, slot))
            .collect();
        let absences = self.stores.absences.list_in_range(tenant, start, end).await?;
        let closures = self.stores.closures.list_in_range(tenant, start, end).await?;

        let context = ExpansionContext {
            children: &children,
            time_slots: &time_slots,
            absences: &absences,
            closures: &closures,
        };
        let rows = expand_rows(group_id, start, end, &schedules, &context, Utc::now())?;

        self.stores
            .calendar_rows
            .replace_range(tenant, group_id, start, end, rows.clone())
            .await?;
        info!(
            group_id = %group_id,
            start = %start,
            end = %end,
            rows = rows.len(),
            "Rebuilt calendar cache range"
        );
        Ok(rows)
    }
}

/// True when some date in the inclusive range has no cached rows.
fn has_missing_date(rows: &[CalendarRow], start: NaiveDate, end: NaiveDate) -> bool {
    let covered: HashSet<NaiveDate> = rows.iter().map(|row| row.date).collect();
    let mut date = start;
    while date <= end {
        if !covered.contains(&date) {
            return true;
        }
        date += Duration::days(1);
    }
    false
}
