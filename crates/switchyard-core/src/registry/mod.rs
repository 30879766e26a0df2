//! Registries for definitions and generation providers.

mod base;
mod definitions;
mod provider;

pub use base::{BaseRegistry, Registerable};
pub use definitions::{Registry, SearchFilters};
pub use provider::ProviderRegistry;
