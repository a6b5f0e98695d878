//! Periodic warming of the calendar row cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::repository::Stores;
use crate::service::CalendarService;

use super::Shutdown;

/// Rebuilds every group's calendar rows for the near future on a fixed
/// interval, so interactive reads rarely pay for a rebuild of their
/// own.
#[derive(Clone)]
pub struct CacheWarmingJob {
    stores: Stores,
    calendar: CalendarService,
    interval: Duration,
    horizon_days: u32,
    retry_cooldown: Duration,
}

impl CacheWarmingJob {
    /// Creates the job from the engine configuration.
    ///
    /// Pass a clone of the calendar service shared with the rest of the
    /// engine, so warming sweeps and interactive rebuilds of the same
    /// group take turns instead of racing.
    pub fn new(stores: Stores, calendar: CalendarService, config: &EngineConfig) -> Self {
        Self {
            stores,
            calendar,
            interval: Duration::from_secs(config.cache_warming.interval_secs),
            horizon_days: config.cache_warming.horizon_days,
            retry_cooldown: Duration::from_secs(config.retry_cooldown_secs),
        }
    }

    /// Runs warming sweeps until `shutdown` trips.
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
            horizon_days = self.horizon_days,
            "Cache warming job started"
        );

        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                _ = ticker.tick() => {}
            }
            if let Err(e) = self.sweep(&shutdown).await {
                warn!(error = %e, "Cache warming sweep failed, backing off");
                tokio::select! {
                    _ = shutdown.wait() => break,
                    _ = tokio::time::sleep(self.retry_cooldown) => {}
                }
            }
        }

        info!("Cache warming job stopped");
    }

    /// Warms every group of every known tenant once, covering today
    /// through the configured horizon.
    ///
    /// A group or tenant that fails is logged and skipped; the sweep
    /// itself fails only when tenants cannot be enumerated at all. The
    /// shutdown signal is re-checked between groups and stops the sweep
    /// early once it trips.
    pub async fn sweep(&self, shutdown: &Shutdown) -> EngineResult<()> {
        let today = Utc::now().date_naive();
        let horizon_end = today + chrono::Duration::days(i64::from(self.horizon_days));

        for tenant in self.stores.tenants.tenant_ids().await? {
            let groups = match self.stores.groups.list(tenant).await {
                Ok(groups) => groups,
                Err(e) => {
                    warn!(
                        tenant = %tenant,
                        error = %e,
                        "Skipping tenant in cache warming sweep"
                    );
                    continue;
                }
            };
            for group in groups {
                if shutdown.is_triggered() {
                    return Ok(());
                }
                if let Err(e) = self
                    .calendar
                    .recalculate(tenant, group.id, today, horizon_end)
                    .await
                {
                    warn!(
                        tenant = %tenant,
                        group_id = %group.id,
                        error = %e,
                        "Skipping group in cache warming sweep"
                    );
                }
            }
        }
        Ok(())
    }
}
