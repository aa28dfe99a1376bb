//! Response schema validation.
//!
//! A payload passes when it deserializes into the typed model (field types,
//! UUIDs, RFC 3339 timestamps, closed enums) and the model's `validator`
//! constraints hold.

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Response shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("Response constraint violated: {0}")]
    Constraint(#[from] ValidationErrors),
}

/// Parse and validate a JSON payload against `T`'s schema.
pub fn validate_schema<T>(value: &Value) -> Result<T, SchemaError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = T::deserialize(value)?;
    parsed.validate()?;
    Ok(parsed)
}
