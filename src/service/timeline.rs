//! Timeline recalculation over stored schedules.

use tracing::debug;
use uuid::Uuid;

use crate::calculation::calculate_end_dates;
use crate::error::EngineResult;
use crate::repository::Stores;

/// Loads a child's schedules and end marks, derives every schedule's
/// end date, and persists the result.
#[derive(Clone)]
pub struct TimelineService {
    stores: Stores,
}

impl TimelineService {
    /// Creates the service over the given stores.
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Recalculates and persists end dates across a child's schedules.
    ///
    /// Safe to re-run at any time; the derivation is idempotent. Callers
    /// that mutate end marks must finish their writes before invoking
    /// this, so the derivation never observes a half-committed mark set.
    pub async fn recalculate_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()> {
        let mut schedules = self.stores.schedules.list_by_child(tenant, child_id).await?;
        if schedules.is_empty() {
            return Ok(());
        }
        let marks = self.stores.end_marks.list_by_child(tenant, child_id).await?;

        calculate_end_dates(&mut schedules, &marks);
        debug!(
            child_id = %child_id,
            schedules = schedules.len(),
            "Recalculated schedule end dates"
        );

        self.stores.schedules.upsert_all(tenant, schedules).await
    }
}
