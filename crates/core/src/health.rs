//! Storage health report evaluation.
//!
//! Backends gather [`PoolStats`] and turn them into a flat string map via
//! [`report_up`] / [`report_down`]. The advisory message is derived from
//! fixed thresholds; when several apply, the last one checked wins.

use std::collections::BTreeMap;
use std::time::Duration;

/// Flat `key -> human readable value` health map.
pub type HealthReport = BTreeMap<String, String>;

/// Open connection count above which the database is considered under heavy load.
pub const HEAVY_LOAD_OPEN_CONNECTIONS: u32 = 40;

/// Wait count above which the pool is considered a bottleneck.
pub const HIGH_WAIT_COUNT: u64 = 1000;

/// Time allowed for the connectivity ping.
pub const PING_TIMEOUT: Duration = Duration::from_secs(1);

pub const MSG_HEALTHY: &str = "It's healthy";
pub const MSG_HEAVY_LOAD: &str = "The database is experiencing heavy load.";
pub const MSG_HIGH_WAIT: &str =
    "The database has a high number of wait events, indicating potential bottlenecks.";
pub const MSG_IDLE_CLOSED: &str =
    "Many idle connections are being closed, consider revising the connection pool settings.";
pub const MSG_LIFETIME_CLOSED: &str = "Many connections are being closed due to max lifetime, consider increasing max lifetime or revising the connection usage pattern.";

/// Snapshot of connection pool statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub open_connections: u32,
    pub in_use: u32,
    pub idle: u32,
    /// Acquires that had to wait for a connection.
    pub wait_count: u64,
    /// Total time spent in those waits.
    pub wait_duration: Duration,
    /// Connections closed for sitting idle too long.
    pub max_idle_closed: u64,
    /// Connections closed for exceeding their lifetime.
    pub max_lifetime_closed: u64,
}

/// Pick the advisory message for a stats snapshot.
pub fn advisory_message(stats: &PoolStats) -> &'static str {
    let half_open = u64::from(stats.open_connections) / 2;
    let mut message = MSG_HEALTHY;

    if stats.open_connections > HEAVY_LOAD_OPEN_CONNECTIONS {
        message = MSG_HEAVY_LOAD;
    }
    if stats.wait_count > HIGH_WAIT_COUNT {
        message = MSG_HIGH_WAIT;
    }
    if stats.max_idle_closed > half_open {
        message = MSG_IDLE_CLOSED;
    }
    if stats.max_lifetime_closed > half_open {
        message = MSG_LIFETIME_CLOSED;
    }

    message
}

/// Report for a reachable backend.
pub fn report_up(stats: &PoolStats) -> HealthReport {
    let mut report = HealthReport::new();
    report.insert("status".into(), "up".into());
    report.insert("message".into(), advisory_message(stats).into());
    report.insert("open_connections".into(), stats.open_connections.to_string());
    report.insert("in_use".into(), stats.in_use.to_string());
    report.insert("idle".into(), stats.idle.to_string());
    report.insert("wait_count".into(), stats.wait_count.to_string());
    report.insert("wait_duration".into(), format!("{:?}", stats.wait_duration));
    report.insert("max_idle_closed".into(), stats.max_idle_closed.to_string());
    report.insert(
        "max_lifetime_closed".into(),
        stats.max_lifetime_closed.to_string(),
    );
    report
}

/// Report for a backend that failed its ping.
pub fn report_down(error: impl std::fmt::Display) -> HealthReport {
    let mut report = HealthReport::new();
    report.insert("status".into(), "down".into());
    report.insert("error".into(), format!("db down: {error}"));
    report
}
