pub mod devices;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /devices/new                  create (POST)
/// /devices/all                  list all
/// /devices/{id}                 get by id
/// /devices/brand/{brand}        list by brand
/// /devices/state/{state}        list by state
/// /devices/update/{id}          update (PUT)
/// /devices/delete               delete (DELETE, device in body)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/devices", devices::router())
}
