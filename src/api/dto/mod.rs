//! Data Transfer Objects for REST request/response serialization.
//!
//! Bodies use camelCase keys to match the update wire format; query
//! parameters stay snake_case.

pub mod pulse_dto;
pub mod update_dto;

pub use pulse_dto::*;
pub use update_dto::*;
