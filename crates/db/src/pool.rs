//! Connection accounting for the health report.
//!
//! sqlx does not expose wait or eviction counters, so the adapter keeps its
//! own: waits are recorded by [`PgDeviceRepository`](crate::PgDeviceRepository)
//! when it acquires from a saturated pool, evictions by the pool's
//! `before_acquire` hook via [`PoolMetrics::admit`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use devices_core::health::PoolStats;

use crate::DbPool;

#[derive(Debug, Default)]
pub struct PoolMetrics {
    wait_count: AtomicU64,
    wait_nanos: AtomicU64,
    idle_closed: AtomicU64,
    lifetime_closed: AtomicU64,
}

impl PoolMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a pooled connection may be handed out.
    ///
    /// Returns `false` (the pool then closes the connection) when it has
    /// exceeded `max_lifetime` or sat idle longer than `idle_timeout`,
    /// counting the reason. Lifetime is checked first.
    pub fn admit(
        &self,
        age: Duration,
        idle_for: Duration,
        idle_timeout: Duration,
        max_lifetime: Duration,
    ) -> bool {
        if age > max_lifetime {
            self.lifetime_closed.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        if idle_for > idle_timeout {
            self.idle_closed.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Record an acquire that had to wait for a connection.
    pub fn record_wait(&self, waited: Duration) {
        let nanos = u64::try_from(waited.as_nanos()).unwrap_or(u64::MAX);
        self.wait_count.fetch_add(1, Ordering::Relaxed);
        self.wait_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Combine the counters with the pool's live connection counts.
    pub fn snapshot(&self, pool: &DbPool) -> PoolStats {
        let open = pool.size();
        let idle = u32::try_from(pool.num_idle()).unwrap_or(u32::MAX);
        self.stats(open, idle)
    }

    fn stats(&self, open: u32, idle: u32) -> PoolStats {
        PoolStats {
            open_connections: open,
            in_use: open.saturating_sub(idle),
            idle,
            wait_count: self.wait_count.load(Ordering::Relaxed),
            wait_duration: Duration::from_nanos(self.wait_nanos.load(Ordering::Relaxed)),
            max_idle_closed: self.idle_closed.load(Ordering::Relaxed),
            max_lifetime_closed: self.lifetime_closed.load(Ordering::Relaxed),
        }
    }
}
