//! # Switchyard Protocols
//!
//! Core contracts for the Switchyard dispatch layer.
//! Contains data model and interface definitions only - dispatch logic lives in
//! `switchyard-core` and `switchyard-runtime`.
//!
//! ## Core Types
//!
//! - [`Definition`] - A named unit of work: model, action or skill
//! - [`GenerationProvider`] - Trait every generation backend implements
//! - [`LocalAction`] - Trait for actions that execute in-process
//! - [`SchemaValidator`] - Trait for input validation against a definition schema
//! - [`Job`] - Runtime record of one provider invocation
//! - [`RunOptions`] / [`RunResult`] - The dispatch call surface

pub mod action;
pub mod definition;
pub mod error;
pub mod job;
pub mod provider;
pub mod run;
pub mod schema;

pub use action::{FnAction, InputTransform, LocalAction};
pub use definition::{
    ActionDefinition, Condition, ConditionSet, Definition, DefinitionKind, DefinitionMeta,
    DefinitionSchema, FieldCondition, ModelDefinition, Route, SkillDefinition, Step,
};
pub use error::{DefinitionError, DispatchError, ProviderError, RegistryError};
pub use job::{Job, JobStatus};
pub use provider::{GenerationProvider, JobHandle, StatusReport};
pub use run::{ProgressCallback, RunOptions, RunResult, StatusCallback};
pub use schema::{AcceptAllValidator, SchemaValidator};
