pub mod autofix;
pub mod builder;
pub mod presets;
pub mod validate;

pub use autofix::*;
pub use builder::*;
pub use validate::*;

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema is not well-formed JSON: {0}")]
    Parse(String),

    #[error("Schema failed validation:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

/// Parse schema text and require it to pass validation.
///
/// The entry point for user-authored schema text: warnings are logged and
/// tolerated, blocking errors become [`SchemaError::Invalid`] so the schema
/// is never sent to the API.
pub fn parse_and_validate(schema_text: &str) -> Result<Value, SchemaError> {
    let schema: Value =
        serde_json::from_str(schema_text).map_err(|e| SchemaError::Parse(e.to_string()))?;

    let validation = validate::validate_schema(&schema);
    if !validation.valid {
        return Err(SchemaError::Invalid(validation.errors));
    }
    for warning in &validation.warnings {
        tracing::warn!(warning = %warning, "Schema validation warning");
    }

    Ok(schema)
}
