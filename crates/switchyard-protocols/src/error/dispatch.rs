//! Dispatch errors surfaced by `Executor::run`.

use thiserror::Error;

use super::{ProviderError, RegistryError};

/// Top-level error taxonomy for a dispatch call.
///
/// Resolution, validation and routing failures are raised before any provider
/// is contacted. Provider and timeout failures come out of the job poll loop.
/// A failing pipeline step is wrapped in `PipelineStep` so callers can tell
/// which step broke without losing the underlying error.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Definition not found: {name}{}", suggestion_hint(.suggestions))]
    Resolution {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("Invalid inputs for '{name}': {}", .errors.join("; "))]
    Validation { name: String, errors: Vec<String> },

    #[error("No route matched for action '{action}': {reason}")]
    Routing { action: String, reason: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Job {job_id} timed out after {elapsed_ms}ms")]
    Timeout { job_id: String, elapsed_ms: u64 },

    #[error("Step '{step}' of skill '{skill}' failed: {source}")]
    PipelineStep {
        skill: String,
        step: String,
        #[source]
        source: Box<DispatchError>,
    },

    #[error("Action '{name}' failed: {message}")]
    Action { name: String, message: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl DispatchError {
    /// Suggestions carried by a resolution failure, if any.
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Resolution { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Innermost error once pipeline step wrappers are peeled off.
    pub fn root_cause(&self) -> &DispatchError {
        match self {
            Self::PipelineStep { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn suggestion_hint(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}
