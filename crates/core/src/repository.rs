//! Repository capability traits for device storage.
//!
//! A storage backend implements [`DeviceWriter`], [`DeviceReader`] and
//! [`DeviceService`]; anything that does is a [`DeviceRepository`]. The HTTP
//! layer holds an `Arc<dyn DeviceRepository>` so backends are swappable.
//!
//! Operations are cancelled by dropping their future; callers bound them
//! with a request timeout.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::device::{CreateDevice, Device, DeviceState};
use crate::error::CoreResult;
use crate::health::HealthReport;
use crate::types::DbId;

/// Result of a successful update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct UpdateOutcome {
    pub rows_affected: u64,
}

/// Result of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeleteOutcome {
    pub rows_affected: u64,
}

/// Write side of the repository.
#[async_trait]
pub trait DeviceWriter: Send + Sync {
    /// Persist a new device and return it with its assigned id and creation time.
    async fn create(&self, input: CreateDevice) -> CoreResult<Device>;

    /// Overwrite name, brand and state of the device with `device.id`.
    ///
    /// Fails with `InUse` when `device` reports `InUse`, `Validation` when it
    /// has no id, and `NotFound` when no row matches.
    async fn update(&self, device: &Device) -> CoreResult<UpdateOutcome>;

    /// Delete the device with `device.id`.
    ///
    /// Fails with `InUse` when `device` reports `InUse`, `Validation` when it
    /// has no id, and `NotFound` when no row matches.
    async fn delete(&self, device: &Device) -> CoreResult<DeleteOutcome>;
}

/// Read side of the repository. Lists are ordered by id.
#[async_trait]
pub trait DeviceReader: Send + Sync {
    /// Fails with `NotFound` when no device has this id.
    async fn get_by_id(&self, id: DbId) -> CoreResult<Device>;

    async fn get_by_brand(&self, brand: &str) -> CoreResult<Vec<Device>>;

    async fn get_by_state(&self, state: DeviceState) -> CoreResult<Vec<Device>>;

    async fn all(&self) -> CoreResult<Vec<Device>>;
}

/// Lifecycle of the underlying storage resource.
#[async_trait]
pub trait DeviceService: Send + Sync {
    /// Connectivity and pool statistics. Never fails; a broken backend
    /// reports `status = "down"`.
    async fn health(&self) -> HealthReport;

    /// Release the underlying connection resource.
    async fn close(&self) -> CoreResult<()>;
}

/// Full repository contract: every capability at once.
pub trait DeviceRepository: DeviceWriter + DeviceReader + DeviceService {}

impl<T> DeviceRepository for T where T: DeviceWriter + DeviceReader + DeviceService {}
