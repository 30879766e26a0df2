//! Model definitions: dispatched to exactly one provider per call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{DefinitionMeta, DefinitionSchema};
use crate::error::DefinitionError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    #[serde(flatten)]
    pub meta: DefinitionMeta,

    /// Providers able to run this model.
    #[serde(default)]
    pub providers: Vec<String>,

    /// Provider used when the caller does not pick one.
    pub default_provider: String,

    /// Backend-specific model ids keyed by provider name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub provider_models: HashMap<String, String>,
}

impl ModelDefinition {
    /// Create a model served by a single default provider.
    pub fn new(name: impl Into<String>, default_provider: impl Into<String>) -> Self {
        let default_provider = default_provider.into();
        Self {
            meta: DefinitionMeta::new(name),
            providers: vec![default_provider.clone()],
            default_provider,
            provider_models: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    pub fn with_schema(mut self, schema: DefinitionSchema) -> Self {
        self.meta.schema = schema;
        self
    }

    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.meta.schema.input = Some(schema);
        self
    }

    pub fn with_types(mut self, input_type: impl Into<String>, output_type: impl Into<String>) -> Self {
        self.meta.input_type = Some(input_type.into());
        self.meta.output_type = Some(output_type.into());
        self
    }

    /// Add another provider able to serve this model.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        let provider = provider.into();
        if !self.providers.contains(&provider) {
            self.providers.push(provider);
        }
        self
    }

    /// Map a provider to its backend-specific model id.
    pub fn with_provider_model(mut self, provider: impl Into<String>, model_id: impl Into<String>) -> Self {
        self.provider_models.insert(provider.into(), model_id.into());
        self
    }

    /// The id sent to `submit`: the provider mapping, else the model name.
    pub fn provider_model_id(&self, provider: &str) -> &str {
        self.provider_models
            .get(provider)
            .map(String::as_str)
            .unwrap_or(&self.meta.name)
    }

    pub(crate) fn validate(&self) -> Result<(), DefinitionError> {
        if self.default_provider.trim().is_empty() {
            return Err(DefinitionError::EmptyDefaultProvider {
                model: self.meta.name.clone(),
            });
        }
        Ok(())
    }
}
