//! Data models for the application
//!
//! Wire shapes returned by the catalog API plus the request-side types the
//! client builds before talking to it.

mod catalog;
mod profile;
mod upload;

pub use catalog::*;
pub use profile::*;
pub use upload::*;
