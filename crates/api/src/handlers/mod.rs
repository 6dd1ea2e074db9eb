//! Request handlers.
//!
//! Each submodule provides async handler functions for a single
//! resource. Handlers validate input, delegate to the corresponding
//! repository in `mainstay_db`, and map errors via [`crate::error::AppError`].

pub mod announcements;
pub mod asset_categories;
pub mod assets;
pub mod inventory;
pub mod locations;
pub mod rbac;
pub mod reports;
pub mod societies;
pub mod tickets;
