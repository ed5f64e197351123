//! PostgreSQL storage for devices.
//!
//! Provides connection configuration, pool construction with connection
//! accounting, migrations, and [`PgDeviceRepository`], the PostgreSQL
//! implementation of the core repository traits.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod repositories;

pub use config::DbConfig;
pub use pool::PoolMetrics;
pub use repositories::PgDeviceRepository;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from configuration.
///
/// Idle and lifetime limits are enforced by the `before_acquire` hook rather
/// than the pool's reaper so every eviction is counted in `metrics`.
pub async fn create_pool(
    config: &DbConfig,
    metrics: Arc<PoolMetrics>,
) -> Result<DbPool, sqlx::Error> {
    let idle_timeout = config.idle_timeout;
    let max_lifetime = config.max_lifetime;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(None::<std::time::Duration>)
        .max_lifetime(None::<std::time::Duration>)
        .before_acquire(move |_conn, meta| {
            let admitted = metrics.admit(meta.age, meta.idle_for, idle_timeout, max_lifetime);
            Box::pin(async move { Ok(admitted) })
        })
        .connect_with(config.connect_options())
        .await
}

/// Check connectivity with a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
