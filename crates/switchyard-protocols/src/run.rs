//! Dispatch call surface: options in, result out.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::job::JobStatus;

/// Invoked with the provider-reported percentage and the latest log lines.
pub type ProgressCallback = Arc<dyn Fn(f64, &[String]) + Send + Sync>;

/// Invoked whenever a job changes status.
pub type StatusCallback = Arc<dyn Fn(JobStatus) + Send + Sync>;

/// Options recognized by a dispatch call. They flow unchanged into nested
/// route targets and pipeline steps.
#[derive(Clone)]
pub struct RunOptions {
    /// Override the model's default provider.
    pub provider: Option<String>,
    /// Poll budget for a single job.
    pub timeout: Option<Duration>,
    /// When `false`, model runs return right after submit.
    pub wait: bool,
    /// Where local actions should write files.
    pub output_dir: Option<PathBuf>,
    /// Pipeline error policy; `None` means stop on the first failure.
    pub stop_on_error: Option<bool>,
    pub on_progress: Option<ProgressCallback>,
    pub on_status_change: Option<StatusCallback>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            provider: None,
            timeout: None,
            wait: true,
            output_dir: None,
            stop_on_error: None,
            on_progress: None,
            on_status_change: None,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = Some(stop);
        self
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(f64, &[String]) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn on_status_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(JobStatus) + Send + Sync + 'static,
    {
        self.on_status_change = Some(Arc::new(callback));
        self
    }

    /// Pipelines stop on the first failing step unless explicitly disabled.
    pub fn stops_on_error(&self) -> bool {
        self.stop_on_error != Some(false)
    }

    pub fn notify_status(&self, status: JobStatus) {
        if let Some(callback) = &self.on_status_change {
            callback(status);
        }
    }

    pub fn notify_progress(&self, progress: f64, logs: &[String]) {
        if let Some(callback) = &self.on_progress {
            callback(progress, logs);
        }
    }
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .field("wait", &self.wait)
            .field("output_dir", &self.output_dir)
            .field("stop_on_error", &self.stop_on_error)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_status_change", &self.on_status_change.is_some())
            .finish()
    }
}

/// Outcome of a dispatch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub output: Value,
    pub duration_ms: u64,
    pub provider: String,
    pub model: String,
    #[serde(rename = "jobId", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl RunResult {
    pub fn new(output: Value, provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            output,
            duration_ms: 0,
            provider: provider.into(),
            model: model.into(),
            job_id: None,
            metadata: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Set one metadata entry, creating the metadata object if needed.
    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        let metadata = self
            .metadata
            .get_or_insert_with(|| Value::Object(Default::default()));
        if let Value::Object(map) = metadata {
            map.insert(key.to_string(), value);
        }
        self
    }
}
