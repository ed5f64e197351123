use std::sync::Arc;

use devices_core::repository::DeviceRepository;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Device storage backend (PostgreSQL in production, in-memory in tests).
    pub repo: Arc<dyn DeviceRepository>,
}
