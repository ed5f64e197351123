//! In-memory [`DeviceRepository`](crate::repository::DeviceRepository).
//!
//! Backs the HTTP integration tests and local runs without PostgreSQL.
//! Ids are assigned sequentially from 1; iteration is in id order.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::device::{CreateDevice, Device, DeviceState};
use crate::error::{CoreError, CoreResult};
use crate::health::{self, HealthReport, PoolStats};
use crate::repository::{
    DeleteOutcome, DeviceReader, DeviceService, DeviceWriter, UpdateOutcome,
};
use crate::types::DbId;

#[derive(Default)]
struct Table {
    rows: BTreeMap<DbId, Device>,
    last_id: DbId,
}

/// Device storage held in a `BTreeMap` behind an async lock.
#[derive(Default)]
pub struct InMemoryDeviceRepository {
    table: RwLock<Table>,
    closed: AtomicBool,
}

impl InMemoryDeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CoreError::Storage("repository is closed".to_string()));
        }
        Ok(())
    }

    async fn filtered(&self, keep: impl Fn(&Device) -> bool) -> CoreResult<Vec<Device>> {
        self.ensure_open()?;
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|d| keep(*d)).cloned().collect())
    }
}

#[async_trait]
impl DeviceWriter for InMemoryDeviceRepository {
    async fn create(&self, input: CreateDevice) -> CoreResult<Device> {
        self.ensure_open()?;
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        let device = Device {
            id: Some(id),
            name: input.name,
            brand: input.brand,
            state: input.state,
            created_at: Some(Utc::now().fixed_offset()),
        };
        table.rows.insert(id, device.clone());
        Ok(device)
    }

    async fn update(&self, device: &Device) -> CoreResult<UpdateOutcome> {
        self.ensure_open()?;
        device.ensure_mutable("update")?;
        let id = device.require_id()?;

        let mut table = self.table.write().await;
        let stored = table
            .rows
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "Device", id })?;
        stored.name = device.name.clone();
        stored.brand = device.brand.clone();
        stored.state = device.state;

        Ok(UpdateOutcome { rows_affected: 1 })
    }

    async fn delete(&self, device: &Device) -> CoreResult<DeleteOutcome> {
        self.ensure_open()?;
        device.ensure_mutable("delete")?;
        let id = device.require_id()?;

        let mut table = self.table.write().await;
        match table.rows.remove(&id) {
            Some(_) => Ok(DeleteOutcome { rows_affected: 1 }),
            None => Err(CoreError::NotFound { entity: "Device", id }),
        }
    }
}

#[async_trait]
impl DeviceReader for InMemoryDeviceRepository {
    async fn get_by_id(&self, id: DbId) -> CoreResult<Device> {
        self.ensure_open()?;
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound { entity: "Device", id })
    }

    async fn get_by_brand(&self, brand: &str) -> CoreResult<Vec<Device>> {
        self.filtered(|d| d.brand == brand).await
    }

    async fn get_by_state(&self, state: DeviceState) -> CoreResult<Vec<Device>> {
        self.filtered(|d| d.state == state).await
    }

    async fn all(&self) -> CoreResult<Vec<Device>> {
        self.filtered(|_| true).await
    }
}

#[async_trait]
impl DeviceService for InMemoryDeviceRepository {
    async fn health(&self) -> HealthReport {
        if self.closed.load(Ordering::Acquire) {
            return health::report_down("repository is closed");
        }
        health::report_up(&PoolStats::default())
    }

    async fn close(&self) -> CoreResult<()> {
        self.closed.store(true, Ordering::Release);
        tracing::info!("Closed in-memory device repository");
        Ok(())
    }
}
