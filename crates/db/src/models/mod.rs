//! Database row structs and their conversions into domain types.

pub mod device;
