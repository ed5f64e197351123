//! Repository layer.
//!
//! Each repository implements the core capability traits against a shared
//! `DbPool`.

pub mod device_repo;

pub use device_repo::PgDeviceRepository;
