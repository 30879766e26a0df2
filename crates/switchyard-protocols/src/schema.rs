//! Input validation seam.

use serde_json::Value;

use crate::definition::Definition;

/// Validates dispatch inputs against a definition's declared input schema.
///
/// Returns the list of human-readable violations on failure.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, definition: &Definition, inputs: &Value) -> Result<(), Vec<String>>;
}

/// Validator that accepts every input.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllValidator;

impl SchemaValidator for AcceptAllValidator {
    fn validate(&self, _definition: &Definition, _inputs: &Value) -> Result<(), Vec<String>> {
        Ok(())
    }
}
