//! # Switchyard Core
//!
//! Lookup side of the dispatch layer.
//!
//! ## Components
//!
//! - [`Registry`] - In-memory catalog of definitions (by kind) and providers (by name)
//! - [`Resolver`] - Turns user-supplied names into definitions: exact, alias,
//!   namespace and fuzzy matching
//! - [`JsonSchemaValidator`] - Validates inputs against a definition's JSON Schema

pub mod registry;
pub mod resolver;
pub mod validator;

pub use registry::{ProviderRegistry, Registry, SearchFilters};
pub use resolver::{
    MatchKind, ResolveOptions, ResolveOutcome, Resolution, Resolver, ResolverSettings,
};
pub use validator::JsonSchemaValidator;
