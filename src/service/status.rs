//! Child schedule status determination and publishing.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::events::{
    ChildScheduleStatusChanged, EventEnvelope, EventPublisher, TOPIC_CHILD_SCHEDULE_STATUS,
};
use crate::repository::Stores;

/// Derives each child's active/inactive status from their schedules and
/// publishes it.
#[derive(Clone)]
pub struct StatusService {
    stores: Stores,
    publisher: Arc<dyn EventPublisher>,
}

impl StatusService {
    /// Creates the service over the given stores and publisher.
    pub fn new(stores: Stores, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { stores, publisher }
    }

    /// Determines the child's schedule status as of `today`.
    ///
    /// The child is active when any schedule covers today. The last
    /// active date is the latest schedule end date, or `None` when the
    /// child has no schedules or any schedule is still open-ended.
    pub async fn determine(
        &self,
        tenant: Uuid,
        child_id: Uuid,
        today: NaiveDate,
    ) -> EngineResult<ChildScheduleStatusChanged> {
        let schedules = self.stores.schedules.list_by_child(tenant, child_id).await?;

        let is_active = schedules.iter().any(|schedule| schedule.is_active_on(today));
        let last_active_date = schedules
            .iter()
            .map(|schedule| schedule.end_date)
            .collect::<Option<Vec<NaiveDate>>>()
            .and_then(|ends| ends.into_iter().max());

        Ok(ChildScheduleStatusChanged {
            child_id,
            is_active,
            last_active_date,
        })
    }

    /// Determines and publishes the child's current status.
    pub async fn sync_child(
        &self,
        tenant: Uuid,
        child_id: Uuid,
        today: NaiveDate,
    ) -> EngineResult<ChildScheduleStatusChanged> {
        let status = self.determine(tenant, child_id, today).await?;
        let envelope = EventEnvelope::new(tenant, TOPIC_CHILD_SCHEDULE_STATUS, &status)?;
        self.publisher.publish(envelope).await?;
        debug!(
            child_id = %child_id,
            is_active = status.is_active,
            "Published child schedule status"
        );
        Ok(status)
    }
}
