//! The `Device` entity and its lifecycle state.
//!
//! A device's `name` and `brand` are frozen while it is `InUse`. Its state
//! can always be changed, and any state reaches any other directly.
//! [`Device::ensure_mutable`] is the one place that guard lives; storage
//! backends call it before issuing mutating statements.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{CoreError, CoreResult};
use crate::types::{DbId, ZonedTimestamp};

/// Maximum length of a device name or brand.
pub const MAX_LABEL_LEN: u64 = 255;

/// Lifecycle state of a device, stored and serialized as its discriminant.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum DeviceState {
    Available = 0,
    InUse = 1,
    Inactive = 2,
}

impl DeviceState {
    /// All states, in discriminant order.
    pub const ALL: [DeviceState; 3] = [Self::Available, Self::InUse, Self::Inactive];

    /// Return the stored integer value.
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Parse a decimal path segment such as `"1"` into a state.
    pub fn parse_path(raw: &str) -> CoreResult<Self> {
        let value: i16 = raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid device state '{raw}'")))?;
        Self::try_from(value)
    }
}

impl TryFrom<i16> for DeviceState {
    type Error = CoreError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Available),
            1 => Ok(Self::InUse),
            2 => Ok(Self::Inactive),
            other => Err(CoreError::Validation(format!(
                "Invalid device state {other}. Must be one of: 0 (available), 1 (in use), 2 (inactive)"
            ))),
        }
    }
}

impl From<DeviceState> for i16 {
    fn from(value: DeviceState) -> Self {
        value as i16
    }
}

/// A loanable device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Device {
    /// Assigned by storage on creation; `None` until persisted.
    pub id: Option<DbId>,
    pub name: String,
    pub brand: String,
    /// `0` available, `1` in use, `2` inactive.
    #[schema(value_type = i16)]
    pub state: DeviceState,
    /// Assigned by storage on creation, RFC 3339 on the wire.
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<ZonedTimestamp>,
}

impl Device {
    /// Build an unsaved device. New devices always start `Inactive`.
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            brand: brand.into(),
            state: DeviceState::Inactive,
            created_at: None,
        }
    }

    pub fn is_in_use(&self) -> bool {
        self.state == DeviceState::InUse
    }

    /// Fail with [`CoreError::InUse`] when the device is in use.
    ///
    /// `action` completes the sentence "cannot {action} device N while in use".
    pub fn ensure_mutable(&self, action: &str) -> CoreResult<()> {
        if self.is_in_use() {
            return Err(CoreError::InUse(format!(
                "cannot {action} device {} while in use",
                self.id_label()
            )));
        }
        Ok(())
    }

    /// Set the state. Every transition is allowed.
    pub fn change_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    /// Rename the device. Refused while in use or for an out-of-range label.
    pub fn change_name(&mut self, name: impl Into<String>) -> CoreResult<()> {
        self.ensure_mutable("change name of")?;
        let name = name.into();
        validate_label("name", &name)?;
        self.name = name;
        Ok(())
    }

    /// Rebrand the device. Refused while in use or for an out-of-range label.
    pub fn change_brand(&mut self, brand: impl Into<String>) -> CoreResult<()> {
        self.ensure_mutable("change brand of")?;
        let brand = brand.into();
        validate_label("brand", &brand)?;
        self.brand = brand;
        Ok(())
    }

    /// Creation time in RFC 3339 with its original offset, if assigned.
    pub fn formatted_creation_time(&self) -> Option<String> {
        self.created_at.map(|at| at.to_rfc3339())
    }

    /// Return the id, or a validation error for an unsaved device.
    pub fn require_id(&self) -> CoreResult<DbId> {
        self.id
            .ok_or_else(|| CoreError::Validation("device id is required".to_string()))
    }

    fn id_label(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => "(unsaved)".to_string(),
        }
    }
}

/// Check that a name or brand is 1 to [`MAX_LABEL_LEN`] characters long.
///
/// Counts characters, not bytes, matching the `length` rule on [`CreateDevice`].
pub fn validate_label(field: &str, value: &str) -> CoreResult<()> {
    let len = value.chars().count() as u64;
    if len == 0 || len > MAX_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be between 1 and {MAX_LABEL_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

/// Input payload for creating a device. Storage assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDevice {
    #[validate(length(min = 1, max = MAX_LABEL_LEN))]
    pub name: String,
    #[validate(length(min = 1, max = MAX_LABEL_LEN))]
    pub brand: String,
    #[schema(value_type = i16)]
    pub state: DeviceState,
}

impl CreateDevice {
    /// Check field constraints, mapping failures to [`CoreError::Validation`].
    pub fn check(&self) -> CoreResult<()> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}

/// Device reference carried by a delete request.
///
/// Only `id` is read; a full device body is accepted and its other fields
/// are ignored, since the stored row is what gets checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub struct DeviceRef {
    pub id: Option<DbId>,
}

impl DeviceRef {
    pub fn require_id(&self) -> CoreResult<DbId> {
        self.id
            .ok_or_else(|| CoreError::Validation("device id is required".to_string()))
    }
}
