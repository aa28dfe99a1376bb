//! Academy Core Library
//!
//! This crate provides the domain models, role allow-lists, access resolution,
//! pagination math, error types and configuration shared by the Academy API
//! client and the `academy` dashboard CLI.

pub mod access;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod validation;

// Re-export commonly used types
pub use access::{
    resolve_access, resolve_role, AccessState, IdentityState, Permission, ProfileState, Role,
    CAN_DELETE_CATALOGS, CAN_LIST_CATALOGS, CAN_UPLOAD_CATALOGS,
};
pub use config::ClientConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use pagination::PageWindow;
pub use validation::{validate_schema, SchemaError};
