//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod announcement;
pub mod asset;
pub mod asset_category;
pub mod inventory;
pub mod location;
pub mod report;
pub mod role;
pub mod society;
pub mod ticket;
