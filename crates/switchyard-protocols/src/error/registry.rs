//! Registry errors.

use thiserror::Error;

use super::DefinitionError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Definition not found: {0}")]
    NotFound(String),

    #[error("Provider not registered: {0}")]
    ProviderNotFound(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(#[from] DefinitionError),
}
