//! Instance validation against merged schemas.

use serde_json::Value;

use crate::error::{SchemaError, ValidateError};
use crate::merge::merge_schemas;

/// Validate an instance against the conjunction of several schema fragments.
///
/// The fragments are merged first; the merged schema (or its `allOf`
/// fallback) is then compiled and evaluated.
///
/// # Errors
///
/// Returns `ValidateError::Merge` if a fragment is not an object,
/// `ValidateError::InvalidSchema` if the merged schema does not compile, or
/// `ValidateError::Invalid` with every violation found.
pub fn validate(instance: &Value, schemas: &[Value]) -> Result<(), ValidateError> {
    let merged = merge_schemas(schemas)?;
    validate_against_schema(&merged, instance)
}

/// Validate an instance against a single, already merged schema.
pub fn validate_against_schema(schema: &Value, instance: &Value) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
        message: e.to_string(),
    })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(instance)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(errors = errors.len(), "instance failed validation");
        Err(ValidateError::Invalid { errors })
    }
}
