//! Repository for the `devices` table.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use devices_core::device::{CreateDevice, Device, DeviceState};
use devices_core::error::{CoreError, CoreResult};
use devices_core::health::{self, HealthReport, PING_TIMEOUT};
use devices_core::repository::{
    DeleteOutcome, DeviceReader, DeviceService, DeviceWriter, UpdateOutcome,
};
use devices_core::types::DbId;
use sqlx::pool::PoolConnection;
use sqlx::Postgres;

use crate::config::DbConfig;
use crate::error::classify;
use crate::models::device::{into_devices, DeviceRow, DEVICE_COLUMNS};
use crate::pool::PoolMetrics;
use crate::DbPool;

/// PostgreSQL implementation of the device repository.
///
/// Cheap to share behind an `Arc`; the pool handles concurrent use.
pub struct PgDeviceRepository {
    pool: DbPool,
    metrics: Arc<PoolMetrics>,
    database: String,
}

impl PgDeviceRepository {
    pub fn new(pool: DbPool, metrics: Arc<PoolMetrics>, database: impl Into<String>) -> Self {
        Self {
            pool,
            metrics,
            database: database.into(),
        }
    }

    /// Build the pool from configuration and wrap it.
    pub async fn connect(config: &DbConfig) -> Result<Self, sqlx::Error> {
        let metrics = Arc::new(PoolMetrics::new());
        let pool = crate::create_pool(config, Arc::clone(&metrics)).await?;
        Ok(Self::new(pool, metrics, config.database.clone()))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Acquire a connection, recording a wait when the pool was saturated.
    async fn acquire(&self) -> CoreResult<PoolConnection<Postgres>> {
        let saturated = self.pool.num_idle() == 0
            && self.pool.size() >= self.pool.options().get_max_connections();
        let started = Instant::now();

        let conn = self.pool.acquire().await.map_err(classify)?;

        if saturated {
            self.metrics.record_wait(started.elapsed());
        }
        Ok(conn)
    }
}

#[async_trait]
impl DeviceWriter for PgDeviceRepository {
    async fn create(&self, input: CreateDevice) -> CoreResult<Device> {
        let query = format!(
            "INSERT INTO devices (d_name, d_brand, d_state, created_at) \
             VALUES ($1, $2, $3, NOW()) \
             RETURNING {DEVICE_COLUMNS}"
        );
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(input.state.id())
            .fetch_one(&mut *conn)
            .await
            .map_err(classify)?;

        tracing::debug!(device_id = row.id, "Inserted device");
        Device::try_from(row)
    }

    async fn update(&self, device: &Device) -> CoreResult<UpdateOutcome> {
        device.ensure_mutable("update")?;
        let id = device.require_id()?;

        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            "UPDATE devices SET d_name = $1, d_brand = $2, d_state = $3 WHERE id = $4",
        )
        .bind(&device.name)
        .bind(&device.brand)
        .bind(device.state.id())
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!(device_id = id, error = %e, "Device update failed");
            CoreError::UpdateFailed(e.to_string())
        })?;

        let rows_affected = result.rows_affected();
        if rows_affected == 0 {
            return Err(CoreError::NotFound {
                entity: "Device",
                id,
            });
        }

        tracing::debug!(device_id = id, rows_affected, "Updated device");
        Ok(UpdateOutcome { rows_affected })
    }

    async fn delete(&self, device: &Device) -> CoreResult<DeleteOutcome> {
        device.ensure_mutable("delete")?;
        let id = device.require_id()?;

        let mut conn = self.acquire().await?;
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!(device_id = id, error = %e, "Device delete failed");
                CoreError::DeleteFailed(e.to_string())
            })?;

        let rows_affected = result.rows_affected();
        if rows_affected == 0 {
            return Err(CoreError::NotFound {
                entity: "Device",
                id,
            });
        }

        tracing::debug!(device_id = id, rows_affected, "Deleted device");
        Ok(DeleteOutcome { rows_affected })
    }
}

#[async_trait]
impl DeviceReader for PgDeviceRepository {
    async fn get_by_id(&self, id: DbId) -> CoreResult<Device> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1");
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(classify)?
            .ok_or(CoreError::NotFound {
                entity: "Device",
                id,
            })?;

        Device::try_from(row)
    }

    async fn get_by_brand(&self, brand: &str) -> CoreResult<Vec<Device>> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE d_brand = $1 ORDER BY id");
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(brand)
            .fetch_all(&mut *conn)
            .await
            .map_err(classify)?;

        into_devices(rows)
    }

    async fn get_by_state(&self, state: DeviceState) -> CoreResult<Vec<Device>> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE d_state = $1 ORDER BY id");
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(state.id())
            .fetch_all(&mut *conn)
            .await
            .map_err(classify)?;

        into_devices(rows)
    }

    async fn all(&self) -> CoreResult<Vec<Device>> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices ORDER BY id");
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, DeviceRow>(&query)
            .fetch_all(&mut *conn)
            .await
            .map_err(classify)?;

        into_devices(rows)
    }
}

#[async_trait]
impl DeviceService for PgDeviceRepository {
    async fn health(&self) -> HealthReport {
        match tokio::time::timeout(PING_TIMEOUT, crate::health_check(&self.pool)).await {
            Ok(Ok(())) => health::report_up(&self.metrics.snapshot(&self.pool)),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Database ping failed");
                health::report_down(e)
            }
            Err(_) => {
                tracing::error!(timeout = ?PING_TIMEOUT, "Database ping timed out");
                health::report_down(format!("ping timed out after {PING_TIMEOUT:?}"))
            }
        }
    }

    async fn close(&self) -> CoreResult<()> {
        self.pool.close().await;
        tracing::info!(database = %self.database, "Disconnected from database");
        Ok(())
    }
}
