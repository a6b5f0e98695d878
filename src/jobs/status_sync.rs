//! Periodic re-publication of child schedule statuses.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::repository::Stores;
use crate::service::StatusService;

use super::Shutdown;

/// Re-derives and publishes every child's schedule status on a fixed
/// interval, keeping downstream consumers aligned even when an earlier
/// change event never reached them.
#[derive(Clone)]
pub struct StatusSyncJob {
    stores: Stores,
    status: StatusService,
    interval: Duration,
    retry_cooldown: Duration,
}

impl StatusSyncJob {
    /// Creates the job from the engine configuration.
    pub fn new(stores: Stores, status: StatusService, config: &EngineConfig) -> Self {
        Self {
            stores,
            status,
            interval: Duration::from_secs(config.status_sync.interval_secs),
            retry_cooldown: Duration::from_secs(config.retry_cooldown_secs),
        }
    }

    /// Runs sync sweeps until `shutdown` trips.
    ///
    /// The first sweep starts immediately and later ones follow the
    /// configured interval. When a sweep fails outright the job backs
    /// off for the retry cooldown instead of waiting out a full
    /// interval.
    pub async fn run(&self, shutdown: Arc<Shutdown>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!(
            interval_secs = self.interval.as_secs(),
            "Status sync job started"
        );

        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                _ = ticker.tick() => {}
            }
            if let Err(e) = self.sweep(&shutdown).await {
                warn!(error = %e, "Status sync sweep failed, backing off");
                tokio::select! {
                    _ = shutdown.wait() => break,
                    _ = tokio::time::sleep(self.retry_cooldown) => {}
                }
            }
        }

        info!("Status sync job stopped");
    }

    /// Publishes the current status of every child of every known
    /// tenant once.
    ///
    /// A child or tenant that fails is logged and skipped; the sweep
    /// itself fails only when tenants cannot be enumerated at all. The
    /// shutdown signal is re-checked between children and stops the
    /// sweep early once it trips.
    pub async fn sweep(&self, shutdown: &Shutdown) -> EngineResult<()> {
        let today = Utc::now().date_naive();

        for tenant in self.stores.tenants.tenant_ids().await? {
            let children = match self.stores.children.list(tenant).await {
                Ok(children) => children,
                Err(e) => {
                    warn!(
                        tenant = %tenant,
                        error = %e,
                        "Skipping tenant in status sync sweep"
                    );
                    continue;
                }
            };
            for child in children {
                if shutdown.is_triggered() {
                    return Ok(());
                }
                if let Err(e) = self.status.sync_child(tenant, child.id, today).await {
                    warn!(
                        tenant = %tenant,
                        child_id = %child.id,
                        error = %e,
                        "Skipping child in status sync sweep"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::events::{
        ChildScheduleStatusChanged, InMemoryEventPublisher, TOPIC_CHILD_SCHEDULE_STATUS,
    };
    use crate::models::{Child, Schedule};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_job(stores: &Stores) -> (StatusSyncJob, Arc<InMemoryEventPublisher>) {
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let status = StatusService::new(stores.clone(), publisher.clone());
        let job = StatusSyncJob::new(stores.clone(), status, &EngineConfig::default());
        (job, publisher)
    }

    /// Seeds a child; `enrolled` controls whether they get an
    /// open-ended schedule and are therefore currently active.
    async fn seed_child(stores: &Stores, tenant: Uuid, enrolled: bool) -> Uuid {
        let child = Child {
            id: Uuid::new_v4(),
            given_name: "Mia".to_string(),
            family_name: "Larsen".to_string(),
            date_of_birth: make_date("2023-05-10"),
        };
        let child_id = child.id;
        stores.children.upsert(tenant, child).await.unwrap();
        if enrolled {
            let schedule = Schedule {
                id: Uuid::new_v4(),
                child_id,
                group_id: Uuid::new_v4(),
                start_date: make_date("2024-01-01"),
                end_date: None,
                rules: vec![],
            };
            stores.schedules.upsert(tenant, schedule).await.unwrap();
        }
        child_id
    }

    #[tokio::test]
    async fn test_sweep_publishes_status_for_every_child() {
        let stores = Stores::in_memory();
        let (job, publisher) = make_job(&stores);
        let tenant_a = Uuid::new_v4();
        let tenant_b = Uuid::new_v4();
        let enrolled = seed_child(&stores, tenant_a, true).await;
        let withdrawn = seed_child(&stores, tenant_a, false).await;
        seed_child(&stores, tenant_b, true).await;

        job.sweep(&Shutdown::new()).await.unwrap();

        let published = publisher.published_on(TOPIC_CHILD_SCHEDULE_STATUS).await;
        assert_eq!(published.len(), 3);
        assert_eq!(
            published
                .iter()
                .filter(|envelope| envelope.tenant_id == tenant_a)
                .count(),
            2
        );

        let statuses: Vec<ChildScheduleStatusChanged> = published
            .iter()
            .map(|envelope| envelope.decode().unwrap())
            .collect();
        let active = statuses.iter().find(|s| s.child_id == enrolled).unwrap();
        assert!(active.is_active);
        let inactive = statuses.iter().find(|s| s.child_id == withdrawn).unwrap();
        assert!(!inactive.is_active);
    }

    #[tokio::test]
    async fn test_sweep_stops_early_once_shutdown_trips() {
        let stores = Stores::in_memory();
        let (job, publisher) = make_job(&stores);
        let tenant = Uuid::new_v4();
        seed_child(&stores, tenant, true).await;

        let shutdown = Shutdown::new();
        shutdown.trigger();
        job.sweep(&shutdown).await.unwrap();

        assert!(publisher.published().await.is_empty());
    }

    #[tokio::test]
    async fn test_run_sweeps_at_startup_and_stops_on_shutdown() {
        let stores = Stores::in_memory();
        let (job, publisher) = make_job(&stores);
        let tenant = Uuid::new_v4();
        seed_child(&stores, tenant, true).await;

        let shutdown = Arc::new(Shutdown::new());
        let handle = tokio::spawn({
            let job = job.clone();
            let shutdown = shutdown.clone();
            async move { job.run(shutdown).await }
        });

        let mut synced = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if !publisher.published().await.is_empty() {
                synced = true;
                break;
            }
        }
        assert!(synced, "startup sweep should publish statuses");

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("job should stop promptly after shutdown")
            .expect("job task should not panic");
    }
}
