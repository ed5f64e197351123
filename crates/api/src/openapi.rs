//! OpenAPI document for the device routes, served at `/swagger.json`.

use axum::{routing::get, Json, Router};
use devices_core::device::{CreateDevice, Device, DeviceRef};
use devices_core::repository::{DeleteOutcome, UpdateOutcome};
use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::handlers::devices;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Devices API",
        description = "CRUD operations over loanable devices."
    ),
    paths(
        devices::create_device,
        devices::get_device,
        devices::list_devices_by_brand,
        devices::list_devices_by_state,
        devices::list_all_devices,
        devices::update_device,
        devices::delete_device,
    ),
    components(schemas(Device, CreateDevice, DeviceRef, UpdateOutcome, DeleteOutcome, ErrorBody)),
    tags((name = "devices", description = "Device management"))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Mount the document route at root level.
pub fn router() -> Router<AppState> {
    Router::new().route("/swagger.json", get(openapi_json))
}
