//! Cache/Expiry Manager: periodically purges expired `cache` rows.
//!
//! One background task per process. Each tick moves the manager from
//! [`ExpiryState::Idle`] to [`ExpiryState::Sweeping`], issues a single bulk
//! delete of rows with `expiration < now`, and returns to `Idle`. The first
//! sweep happens one full interval after start. Up to one interval of
//! staleness is accepted; readers already ignore expired rows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::AnyPool;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::repository::cache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryState {
    Idle,
    Sweeping,
}

#[derive(Clone)]
pub struct CacheExpirer {
    pool: AnyPool,
    every: Duration,
    sweeping: Arc<AtomicBool>,
}

impl CacheExpirer {
    pub fn new(pool: AnyPool, every: Duration) -> Self {
        Self {
            pool,
            every,
            sweeping: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> ExpiryState {
        if self.sweeping.load(Ordering::Acquire) {
            ExpiryState::Sweeping
        } else {
            ExpiryState::Idle
        }
    }

    /// Run one sweep against the observed time `now` (unix seconds).
    pub async fn sweep(&self, now: i64) -> Result<u64, sqlx::Error> {
        self.sweeping.store(true, Ordering::Release);
        let result = cache::delete_expired(&self.pool, now).await;
        self.sweeping.store(false, Ordering::Release);
        result
    }

    /// Spawn the sweep loop. It runs until the runtime shuts down or the
    /// handle is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.every, self.every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!("Cache expiry scheduled every {}s", self.every.as_secs());
            loop {
                ticker.tick().await;
                let now = chrono::Utc::now().timestamp();
                match self.sweep(now).await {
                    Ok(0) => tracing::debug!("Cache sweep: nothing expired"),
                    Ok(removed) => tracing::info!("Cache sweep removed {removed} expired rows"),
                    Err(e) => tracing::warn!("Cache sweep failed: {e}"),
                }
            }
        })
    }
}
