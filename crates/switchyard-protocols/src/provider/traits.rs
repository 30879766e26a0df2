//! Generation provider trait definition.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use super::{JobHandle, StatusReport};
use crate::error::ProviderError;

/// Core trait for generation backends.
///
/// Synchronous backends return [`JobHandle::Immediate`] from `submit` and are
/// never polled. Asynchronous backends return [`JobHandle::Pending`] and are
/// polled through `get_status` until a terminal status is reported.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Returns the provider name used for registration and lookup.
    fn name(&self) -> &str;

    /// Start a unit of work for the backend-specific `model_id`.
    async fn submit(&self, model_id: &str, inputs: &Value) -> Result<JobHandle, ProviderError>;

    /// Report the current status of a pending job.
    async fn get_status(&self, job_id: &str) -> Result<StatusReport, ProviderError>;

    /// Fetch the output of a completed job.
    async fn get_result(&self, job_id: &str) -> Result<Value, ProviderError>;

    /// Cancel a pending job (optional).
    async fn cancel(&self, job_id: &str) -> Result<(), ProviderError> {
        let _ = job_id;
        Err(ProviderError::unsupported(self.name(), "cancel"))
    }

    /// Upload a file and return a URL the backend can read (optional).
    async fn upload_file(&self, data: Bytes, filename: Option<&str>) -> Result<String, ProviderError> {
        let _ = (data, filename);
        Err(ProviderError::unsupported(self.name(), "upload_file"))
    }
}
