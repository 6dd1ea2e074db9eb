//! Domain layer for the Mainstay maintenance-management backend.
//!
//! Holds everything that is independent of HTTP and SQL: the error
//! taxonomy, shared id/timestamp aliases, ticket and document status
//! lifecycles, the permission catalog, field validation helpers, and the
//! report aggregation functions consumed by the dashboard endpoints.

pub mod error;
pub mod reports;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
