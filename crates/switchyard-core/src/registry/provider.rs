//! Provider registry for generation backends.

use std::sync::Arc;

use switchyard_protocols::GenerationProvider;
use tracing::debug;

use super::base::BaseRegistry;

/// Registry of generation providers, keyed by provider name.
pub struct ProviderRegistry {
    inner: BaseRegistry<dyn GenerationProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
        }
    }

    /// Register a provider, replacing any provider with the same name.
    pub fn register(&self, provider: Arc<dyn GenerationProvider>) {
        let name = provider.name().to_string();
        if self.inner.insert(provider).is_some() {
            debug!("Replaced provider: {}", name);
        } else {
            debug!("Registered provider: {}", name);
        }
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn GenerationProvider>> {
        self.inner.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn GenerationProvider>> {
        self.inner.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    /// Provider names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.inner.list_ids()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
