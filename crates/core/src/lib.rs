//! Domain layer for the devices service.
//!
//! Holds the `Device` entity and its in-use guard, the repository
//! capability traits every storage backend implements, health report
//! evaluation, and an in-memory repository.

pub mod device;
pub mod error;
pub mod health;
pub mod memory;
pub mod repository;
pub mod types;
