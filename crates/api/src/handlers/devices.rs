//! Handlers for the device resource.
//!
//! Path parameters are taken as strings and parsed here so malformed ids
//! and states produce the standard JSON error body with status 400.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use devices_core::device::{CreateDevice, Device, DeviceRef, DeviceState};
use devices_core::error::CoreError;
use devices_core::repository::{DeleteOutcome, UpdateOutcome};
use devices_core::types::DbId;

use crate::error::{AppError, AppResult, ErrorBody};
use crate::state::AppState;

/// Parse a device id path segment.
fn parse_id(raw: &str) -> AppResult<DbId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid device id '{raw}'")))
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

/// POST /api/v1/devices/new
#[utoipa::path(
    post,
    path = "/api/v1/devices/new",
    tag = "devices",
    request_body = CreateDevice,
    responses(
        (status = 200, description = "Device created", body = Device),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn create_device(
    State(state): State<AppState>,
    Json(input): Json<CreateDevice>,
) -> AppResult<Json<Device>> {
    input.check()?;

    let device = state.repo.create(input).await?;

    tracing::info!(device_id = device.id, brand = %device.brand, "Device created");

    Ok(Json(device))
}

/// GET /api/v1/devices/{id}
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}",
    tag = "devices",
    params(("id" = i64, Path, description = "Device id")),
    responses(
        (status = 200, description = "The device", body = Device),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such device", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Device>> {
    let id = parse_id(&raw_id)?;
    let device = state.repo.get_by_id(id).await?;
    Ok(Json(device))
}

/// GET /api/v1/devices/brand/{brand}
#[utoipa::path(
    get,
    path = "/api/v1/devices/brand/{brand}",
    tag = "devices",
    params(("brand" = String, Path, description = "Manufacturer label")),
    responses(
        (status = 200, description = "Devices of this brand", body = [Device]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn list_devices_by_brand(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> AppResult<Json<Vec<Device>>> {
    let devices = state.repo.get_by_brand(&brand).await?;
    Ok(Json(devices))
}

/// GET /api/v1/devices/state/{state}
#[utoipa::path(
    get,
    path = "/api/v1/devices/state/{state}",
    tag = "devices",
    params(("state" = i16, Path, description = "0 available, 1 in use, 2 inactive")),
    responses(
        (status = 200, description = "Devices in this state", body = [Device]),
        (status = 400, description = "Unknown state", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn list_devices_by_state(
    State(state): State<AppState>,
    Path(raw_state): Path<String>,
) -> AppResult<Json<Vec<Device>>> {
    let device_state = DeviceState::parse_path(&raw_state)?;
    let devices = state.repo.get_by_state(device_state).await?;
    Ok(Json(devices))
}

/// GET /api/v1/devices/all
#[utoipa::path(
    get,
    path = "/api/v1/devices/all",
    tag = "devices",
    responses(
        (status = 200, description = "Every device", body = [Device]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn list_all_devices(State(state): State<AppState>) -> AppResult<Json<Vec<Device>>> {
    let devices = state.repo.all().await?;
    Ok(Json(devices))
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

/// PUT /api/v1/devices/update/{id}
///
/// Applies the body's name, brand and state to the stored device. Changed
/// labels are length-checked like on create. Renaming or rebranding an in-use
/// device is refused, and so is saving a device whose resulting state is in use.
#[utoipa::path(
    put,
    path = "/api/v1/devices/update/{id}",
    tag = "devices",
    params(("id" = i64, Path, description = "Device id")),
    request_body = Device,
    responses(
        (status = 200, description = "Device updated", body = UpdateOutcome),
        (status = 400, description = "Malformed id, mismatched body id or invalid label", body = ErrorBody),
        (status = 404, description = "No such device", body = ErrorBody),
        (status = 409, description = "Device is in use", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn update_device(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(input): Json<Device>,
) -> AppResult<Json<UpdateOutcome>> {
    let id = parse_id(&raw_id)?;
    if let Some(body_id) = input.id {
        if body_id != id {
            return Err(AppError::BadRequest(format!(
                "Body id {body_id} does not match path id {id}"
            )));
        }
    }

    let mut device = state.repo.get_by_id(id).await?;
    if device.name != input.name {
        device.change_name(input.name)?;
    }
    if device.brand != input.brand {
        device.change_brand(input.brand)?;
    }
    device.change_state(input.state);

    let outcome = state.repo.update(&device).await?;

    tracing::info!(
        device_id = id,
        rows_affected = outcome.rows_affected,
        "Device updated"
    );

    Ok(Json(outcome))
}

/// DELETE /api/v1/devices/delete
///
/// Only the body's `id` is used. The stored device is reloaded so the in-use
/// check sees persisted state. An in-use device is not deleted and the
/// request is answered with 202.
#[utoipa::path(
    delete,
    path = "/api/v1/devices/delete",
    tag = "devices",
    request_body = DeviceRef,
    responses(
        (status = 200, description = "Device deleted", body = DeleteOutcome),
        (status = 202, description = "Device is in use and was kept", body = ErrorBody),
        (status = 400, description = "Missing id", body = ErrorBody),
        (status = 404, description = "No such device", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn delete_device(
    State(state): State<AppState>,
    Json(input): Json<DeviceRef>,
) -> AppResult<Response> {
    let id = input.require_id()?;
    let stored = state.repo.get_by_id(id).await?;

    match state.repo.delete(&stored).await {
        Ok(outcome) => {
            tracing::info!(
                device_id = id,
                rows_affected = outcome.rows_affected,
                "Device deleted"
            );
            Ok(Json(outcome).into_response())
        }
        Err(err @ CoreError::InUse(_)) => {
            tracing::warn!(device_id = id, "Refused to delete device in use");
            let mut response = AppError::from(err).into_response();
            *response.status_mut() = StatusCode::ACCEPTED;
            Ok(response)
        }
        Err(err) => Err(err.into()),
    }
}
