//! Definition registry.

use std::sync::Arc;

use switchyard_protocols::{Definition, DefinitionKind, GenerationProvider, RegistryError};
use tracing::{debug, info};

use super::base::BaseRegistry;
use super::provider::ProviderRegistry;

/// Optional narrowing applied by [`Registry::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Substring of the declared input type.
    pub input_type: Option<String>,
    /// Substring of the declared output type.
    pub output_type: Option<String>,
    /// Exact provider name; only models can match.
    pub provider: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.input_type.is_none() && self.output_type.is_none() && self.provider.is_none()
    }

    fn accepts(&self, definition: &Definition) -> bool {
        let meta = definition.meta();
        if let Some(wanted) = &self.input_type {
            if !meta.input_type.as_deref().is_some_and(|t| t.contains(wanted.as_str())) {
                return false;
            }
        }
        if let Some(wanted) = &self.output_type {
            if !meta.output_type.as_deref().is_some_and(|t| t.contains(wanted.as_str())) {
                return false;
            }
        }
        if let Some(wanted) = &self.provider {
            match definition {
                Definition::Model(model) => {
                    if !model.providers.iter().any(|p| p == wanted) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

/// In-memory catalog of definitions, one map per kind, plus the providers
/// that back models.
///
/// Names are unique within a kind but may collide across kinds; bare-name
/// lookups probe model, then action, then skill.
pub struct Registry {
    models: BaseRegistry<Definition>,
    actions: BaseRegistry<Definition>,
    skills: BaseRegistry<Definition>,
    providers: ProviderRegistry,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            models: BaseRegistry::new(),
            actions: BaseRegistry::new(),
            skills: BaseRegistry::new(),
            providers: ProviderRegistry::new(),
        }
    }

    fn map(&self, kind: DefinitionKind) -> &BaseRegistry<Definition> {
        match kind {
            DefinitionKind::Model => &self.models,
            DefinitionKind::Action => &self.actions,
            DefinitionKind::Skill => &self.skills,
        }
    }

    /// Register a definition after structural validation.
    ///
    /// Re-registering a name within the same kind replaces the previous entry.
    pub fn register(&self, definition: impl Into<Definition>) -> Result<(), RegistryError> {
        let definition = definition.into();
        definition.validate()?;

        let qualified = definition.qualified_name();
        let map = self.map(definition.kind());
        if map.insert(Arc::new(definition)).is_some() {
            debug!("Replaced definition: {}", qualified);
        } else {
            debug!("Registered definition: {}", qualified);
        }
        Ok(())
    }

    /// Register many definitions, stopping at the first invalid one.
    pub fn register_all<I, D>(&self, definitions: I) -> Result<usize, RegistryError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Definition>,
    {
        let mut count = 0;
        for definition in definitions {
            self.register(definition)?;
            count += 1;
        }
        info!("Registered {} definitions", count);
        Ok(count)
    }

    pub fn register_provider(&self, provider: Arc<dyn GenerationProvider>) {
        self.providers.register(provider);
    }

    /// Look up `name`, honoring a `kind/` prefix.
    ///
    /// Without a recognized prefix the kinds are probed in resolution order
    /// and the first hit wins.
    pub fn resolve(&self, name: &str) -> Option<Arc<Definition>> {
        if let Some((kind, bare)) = split_kind(name) {
            return self.map(kind).get(bare);
        }
        DefinitionKind::ALL
            .iter()
            .find_map(|kind| self.map(*kind).get(name))
    }

    /// Look up `name` within a single kind.
    pub fn get(&self, kind: DefinitionKind, name: &str) -> Option<Arc<Definition>> {
        self.map(kind).get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Case-insensitive substring search over names and descriptions.
    ///
    /// An empty query matches everything; results follow [`Registry::list`] order.
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Vec<Arc<Definition>> {
        let needle = query.trim().to_lowercase();
        self.list(None)
            .into_iter()
            .filter(|definition| {
                needle.is_empty()
                    || definition.name().to_lowercase().contains(&needle)
                    || definition.description().to_lowercase().contains(&needle)
            })
            .filter(|definition| filters.accepts(definition))
            .collect()
    }

    /// Definitions of one kind, or all kinds in resolution order. Each kind
    /// is sorted by name.
    pub fn list(&self, kind: Option<DefinitionKind>) -> Vec<Arc<Definition>> {
        match kind {
            Some(kind) => self.map(kind).values(),
            None => DefinitionKind::ALL
                .iter()
                .flat_map(|kind| self.map(*kind).values())
                .collect(),
        }
    }

    /// Every registered name in resolution order. Names registered under
    /// several kinds appear once per kind.
    pub fn names(&self) -> Vec<String> {
        DefinitionKind::ALL
            .iter()
            .flat_map(|kind| self.map(*kind).list_ids())
            .collect()
    }

    /// Remove a definition. A `kind/` prefix restricts removal to that kind;
    /// otherwise the first match in resolution order is removed.
    pub fn unregister(&self, name: &str) -> Result<Arc<Definition>, RegistryError> {
        let removed = match split_kind(name) {
            Some((kind, bare)) => self.map(kind).remove(bare),
            None => DefinitionKind::ALL
                .iter()
                .find_map(|kind| self.map(*kind).remove(name)),
        };
        let removed = removed.ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        debug!("Unregistered definition: {}", removed.qualified_name());
        Ok(removed)
    }

    pub fn get_provider(&self, name: &str) -> Option<Arc<dyn GenerationProvider>> {
        self.providers.get(name)
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.names()
    }

    pub fn unregister_provider(&self, name: &str) -> Result<Arc<dyn GenerationProvider>, RegistryError> {
        self.providers
            .unregister(name)
            .ok_or_else(|| RegistryError::ProviderNotFound(name.to_string()))
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Number of definitions across all kinds.
    pub fn len(&self) -> usize {
        self.models.len() + self.actions.len() + self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `kind/name` when the prefix names a definition kind.
pub(crate) fn split_kind(name: &str) -> Option<(DefinitionKind, &str)> {
    let (prefix, rest) = name.split_once('/')?;
    let kind = prefix.parse::<DefinitionKind>().ok()?;
    Some((kind, rest))
}

#[cfg(test)]
#[path = "definitions_tests.rs"]
mod tests;
