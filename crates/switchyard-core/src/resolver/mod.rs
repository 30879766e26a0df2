//! Name resolution.
//!
//! Turns a user-supplied name into a registered [`Definition`] by trying, in
//! order: an exact registry match, the alias table, a namespace-qualified
//! lookup for the preferred kind, and (when enabled) fuzzy matching.

mod similarity;

pub use similarity::{levenshtein, similarity};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use switchyard_config::ResolverConfig;
use switchyard_protocols::{Definition, DefinitionKind, DispatchError};
use tracing::debug;

use crate::registry::Registry;

/// Built-in shorthand names.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("i2v", "image-to-video"),
    ("t2v", "text-to-video"),
    ("t2i", "text-to-image"),
    ("tts", "text-to-speech"),
    ("stt", "speech-to-text"),
];

/// How a name was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Alias,
    Namespace,
    Fuzzy,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Alias => "alias",
            Self::Namespace => "namespace",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub definition: Arc<Definition>,
    pub match_kind: MatchKind,
    /// Similarity score; 1.0 for every non-fuzzy match.
    pub score: f64,
}

/// Result of [`Resolver::resolve`] when the name is not required.
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    Found(Resolution),
    NotFound { suggestions: Vec<String> },
}

impl ResolveOutcome {
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            Self::Found(resolution) => Some(resolution),
            Self::NotFound { .. } => None,
        }
    }

    pub fn into_resolution(self) -> Option<Resolution> {
        match self {
            Self::Found(resolution) => Some(resolution),
            Self::NotFound { .. } => None,
        }
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Found(_) => &[],
            Self::NotFound { suggestions } => suggestions,
        }
    }
}

/// Per-call resolution options.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Fail with a resolution error instead of returning `NotFound`.
    pub required: bool,
    /// Kind to try as a namespace when the bare name misses.
    pub prefer_type: Option<DefinitionKind>,
    /// Override the configured fuzzy default.
    pub fuzzy: Option<bool>,
}

impl ResolveOptions {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    pub fn with_prefer_type(mut self, kind: DefinitionKind) -> Self {
        self.prefer_type = Some(kind);
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }
}

/// Resolver knobs.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub fuzzy: bool,
    /// Candidates must score strictly above this.
    pub threshold: f64,
    pub max_suggestions: usize,
    pub aliases: HashMap<String, String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            fuzzy: false,
            threshold: 0.3,
            max_suggestions: 3,
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(alias, target)| (alias.to_string(), target.to_string()))
                .collect(),
        }
    }
}

impl From<&ResolverConfig> for ResolverSettings {
    fn from(config: &ResolverConfig) -> Self {
        let mut aliases = Self::default().aliases;
        aliases.extend(config.aliases.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            fuzzy: config.fuzzy,
            threshold: config.fuzzy_threshold,
            max_suggestions: config.max_suggestions,
            aliases,
        }
    }
}

/// Name resolver over a shared [`Registry`].
pub struct Resolver {
    registry: Arc<Registry>,
    settings: ResolverSettings,
}

impl Resolver {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_settings(registry, ResolverSettings::default())
    }

    pub fn with_settings(registry: Arc<Registry>, settings: ResolverSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Add or replace an alias.
    pub fn add_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.settings.aliases.insert(alias.into(), target.into());
    }

    /// Resolve `name`.
    ///
    /// Returns `Ok(NotFound)` with suggestions when nothing matches, or a
    /// [`DispatchError::Resolution`] when `options.required` is set.
    pub fn resolve(&self, name: &str, options: &ResolveOptions) -> Result<ResolveOutcome, DispatchError> {
        if let Some(resolution) = self.find(name, options) {
            debug!(
                "Resolved '{}' to {} ({} match)",
                name,
                resolution.definition.qualified_name(),
                resolution.match_kind
            );
            return Ok(ResolveOutcome::Found(resolution));
        }

        let suggestions = self.suggestions(name);
        if options.required {
            return Err(DispatchError::Resolution {
                name: name.to_string(),
                suggestions,
            });
        }
        Ok(ResolveOutcome::NotFound { suggestions })
    }

    /// Resolve `name` or fail with a resolution error.
    pub fn resolve_required(&self, name: &str) -> Result<Arc<Definition>, DispatchError> {
        let options = ResolveOptions::required();
        match self.resolve(name, &options)? {
            ResolveOutcome::Found(resolution) => Ok(resolution.definition),
            ResolveOutcome::NotFound { suggestions } => Err(DispatchError::Resolution {
                name: name.to_string(),
                suggestions,
            }),
        }
    }

    fn find(&self, name: &str, options: &ResolveOptions) -> Option<Resolution> {
        // A bare name shared across kinds defers to the preferred kind.
        if let Some(definition) = self.registry.resolve(name) {
            let shadowed = options.prefer_type.is_some_and(|kind| {
                definition.kind() != kind && self.registry.get(kind, name).is_some()
            });
            if !shadowed {
                return Some(Self::resolution(definition, MatchKind::Exact, 1.0));
            }
        }

        if let Some(target) = self.settings.aliases.get(name) {
            if let Some(definition) = self.registry.resolve(target) {
                return Some(Self::resolution(definition, MatchKind::Alias, 1.0));
            }
        }

        if let Some(kind) = options.prefer_type {
            if let Some(definition) = self.registry.get(kind, name) {
                return Some(Self::resolution(definition, MatchKind::Namespace, 1.0));
            }
        }

        if options.fuzzy.unwrap_or(self.settings.fuzzy) {
            let (candidate, score) = self.ranked(name).into_iter().next()?;
            let definition = self.registry.resolve(&candidate)?;
            return Some(Self::resolution(definition, MatchKind::Fuzzy, score));
        }

        None
    }

    fn resolution(definition: Arc<Definition>, match_kind: MatchKind, score: f64) -> Resolution {
        Resolution {
            definition,
            match_kind,
            score,
        }
    }

    /// Up to `max_suggestions` registered names most similar to `name`.
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        self.ranked(name)
            .into_iter()
            .take(self.settings.max_suggestions)
            .map(|(candidate, _)| candidate)
            .collect()
    }

    /// Registered names scoring above the threshold, best first, ties by name.
    fn ranked(&self, name: &str) -> Vec<(String, f64)> {
        if name.trim().is_empty() {
            return Vec::new();
        }

        let mut names = self.registry.names();
        names.sort();
        names.dedup();

        let mut scored: Vec<(String, f64)> = names
            .into_iter()
            .map(|candidate| {
                let score = similarity(name, &candidate);
                (candidate, score)
            })
            .filter(|(_, score)| *score > self.settings.threshold)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
