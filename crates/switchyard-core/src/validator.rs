//! JSON Schema input validation.

use serde_json::Value;
use switchyard_protocols::{Definition, SchemaValidator};
use tracing::warn;

/// Validates inputs against the definition's `schema.input` JSON Schema.
///
/// Definitions without an input schema accept anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, definition: &Definition, inputs: &Value) -> Result<(), Vec<String>> {
        let Some(schema) = definition.schema().input.as_ref() else {
            return Ok(());
        };

        let validator = jsonschema::validator_for(schema).map_err(|e| {
            warn!("Invalid input schema on {}: {}", definition.qualified_name(), e);
            vec![format!("invalid input schema: {}", e)]
        })?;

        let errors: Vec<String> = validator
            .iter_errors(inputs)
            .map(|error| {
                let path = error.instance_path.to_string();
                if path.is_empty() {
                    error.to_string()
                } else {
                    format!("{}: {}", path, error)
                }
            })
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
