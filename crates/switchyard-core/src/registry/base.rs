//! Base registry trait and implementation.
//!
//! Generic name-keyed storage shared by the per-kind definition maps and the
//! provider registry.

use dashmap::DashMap;
use std::sync::Arc;

use switchyard_protocols::{Definition, GenerationProvider};

/// Trait for items that can be stored in a registry.
pub trait Registerable: Send + Sync {
    /// Returns the key this item is stored under.
    fn registry_id(&self) -> &str;
}

impl Registerable for Definition {
    fn registry_id(&self) -> &str {
        self.name()
    }
}

impl Registerable for dyn GenerationProvider {
    fn registry_id(&self) -> &str {
        self.name()
    }
}

/// Generic registry for managing items by ID.
///
/// Registration is last-write-wins: inserting an item whose ID is already
/// present replaces the previous item.
///
/// # Type Parameters
///
/// * `T` - The stored type, possibly a trait object (e.g. `dyn GenerationProvider`)
pub struct BaseRegistry<T: ?Sized + Registerable> {
    items: DashMap<String, Arc<T>>,
}

impl<T: ?Sized + Registerable> BaseRegistry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Store an item, returning the one it replaced.
    pub fn insert(&self, item: Arc<T>) -> Option<Arc<T>> {
        let id = item.registry_id().to_string();
        self.items.insert(id, item)
    }

    /// Remove an item by ID.
    pub fn remove(&self, id: &str) -> Option<Arc<T>> {
        self.items.remove(id).map(|(_, item)| item)
    }

    /// Get an item by ID.
    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.items.get(id).map(|item| item.clone())
    }

    /// Check if an item with the given ID is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// All registered IDs, sorted.
    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.items.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    /// All registered items, sorted by ID.
    pub fn values(&self) -> Vec<Arc<T>> {
        let mut entries: Vec<(String, Arc<T>)> = self
            .items
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, item)| item).collect()
    }

    /// Get the number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: ?Sized + Registerable> Default for BaseRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
