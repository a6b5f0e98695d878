//! Background maintenance jobs.
//!
//! Each job owns a periodic sweep over every known tenant's data and
//! runs until a shared [`Shutdown`] signal trips. Sweeps visit one unit
//! of work at a time and re-check the signal between units, so a
//! requested shutdown takes effect at the next unit boundary rather
//! than mid-write.

mod cache_warming;
mod status_sync;

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

pub use cache_warming::CacheWarmingJob;
pub use status_sync::StatusSyncJob;

/// One-shot signal telling running jobs to stop.
///
/// [`Shutdown::trigger`] wakes every task blocked in [`Shutdown::wait`];
/// sweeps already in progress poll [`Shutdown::is_triggered`] between
/// units and bail out early.
#[derive(Debug, Default)]
pub struct Shutdown {
    triggered: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    /// Creates an untripped signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the signal and wakes every waiting task.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Relaxed);
        self.notify.notify_waiters();
    }

    /// Whether the signal has tripped.
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Relaxed)
    }

    /// Resolves once the signal trips, immediately if it already has.
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register as a waiter before checking the flag, so a trigger
        // landing between the check and the await still wakes us.
        notified.as_mut().enable();
        if self.is_triggered() {
            return;
        }
        notified.await;
    }
}
