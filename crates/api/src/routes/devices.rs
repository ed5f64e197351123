//! Route definitions for the device resource, mounted at `/api/v1/devices`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// ```text
/// POST   /new              -> create_device
/// GET    /all              -> list_all_devices
/// GET    /{id}             -> get_device
/// GET    /brand/{brand}    -> list_devices_by_brand
/// GET    /state/{state}    -> list_devices_by_state
/// PUT    /update/{id}      -> update_device
/// DELETE /delete           -> delete_device
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", post(devices::create_device))
        .route("/all", get(devices::list_all_devices))
        .route("/{id}", get(devices::get_device))
        .route("/brand/{brand}", get(devices::list_devices_by_brand))
        .route("/state/{state}", get(devices::list_devices_by_state))
        .route("/update/{id}", put(devices::update_device))
        .route("/delete", delete(devices::delete_device))
}
