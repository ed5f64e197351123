//! Row model for the `devices` table.

use devices_core::device::{Device, DeviceState};
use devices_core::error::CoreError;
use devices_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Column list for `devices` queries, in [`DeviceRow`] order.
pub const DEVICE_COLUMNS: &str = "id, d_name, d_brand, d_state, created_at";

/// A row from the `devices` table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceRow {
    pub id: DbId,
    pub d_name: String,
    pub d_brand: String,
    pub d_state: i16,
    pub created_at: Timestamp,
}

impl TryFrom<DeviceRow> for Device {
    type Error = CoreError;

    fn try_from(row: DeviceRow) -> Result<Self, Self::Error> {
        let state = DeviceState::try_from(row.d_state).map_err(|_| {
            CoreError::Storage(format!(
                "device {} has unknown state value {}",
                row.id, row.d_state
            ))
        })?;

        Ok(Device {
            id: Some(row.id),
            name: row.d_name,
            brand: row.d_brand,
            state,
            created_at: Some(row.created_at.fixed_offset()),
        })
    }
}

/// Convert a batch of rows, failing the whole batch on the first bad row.
pub fn into_devices(rows: Vec<DeviceRow>) -> Result<Vec<Device>, CoreError> {
    rows.into_iter().map(Device::try_from).collect()
}
