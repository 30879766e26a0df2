//! Generation provider errors.

use thiserror::Error;

/// Message used when a provider reports `failed` without an error string.
pub const GENERIC_JOB_FAILURE: &str = "Job failed";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not found: {0}")]
    NotFound(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("{message}")]
    JobFailed { job_id: String, message: String },

    #[error("Job was cancelled")]
    Cancelled { job_id: String },

    #[error("Provider {provider} does not support {operation}")]
    Unsupported { provider: String, operation: String },
}

impl ProviderError {
    /// Build a `JobFailed` error, falling back to a generic message.
    pub fn job_failed(job_id: impl Into<String>, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_JOB_FAILURE.to_string());
        Self::JobFailed {
            job_id: job_id.into(),
            message,
        }
    }

    /// Build an `Unsupported` error for an optional capability.
    pub fn unsupported(provider: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            provider: provider.into(),
            operation: operation.into(),
        }
    }
}
