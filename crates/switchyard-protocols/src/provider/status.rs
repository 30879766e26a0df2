//! Submit handles and status reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::job::JobStatus;

/// What a provider hands back from `submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobHandle {
    /// The backend finished inside `submit`; no polling needed.
    Immediate { output: Value },
    /// The backend queued the work under `job_id`.
    Pending { job_id: String },
}

impl JobHandle {
    pub fn immediate(output: Value) -> Self {
        Self::Immediate { output }
    }

    pub fn pending(job_id: impl Into<String>) -> Self {
        Self::Pending {
            job_id: job_id.into(),
        }
    }
}

/// Snapshot returned by `get_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,

    /// Percentage, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            progress: None,
            logs: Vec::new(),
            output: None,
            error: None,
        }
    }

    pub fn queued() -> Self {
        Self::new(JobStatus::Queued)
    }

    pub fn processing(progress: f64) -> Self {
        Self::new(JobStatus::Processing).with_progress(progress)
    }

    /// Completed, with the output inlined.
    pub fn completed(output: Value) -> Self {
        let mut report = Self::new(JobStatus::Completed);
        report.output = Some(output);
        report
    }

    pub fn failed(error: impl Into<String>) -> Self {
        let mut report = Self::new(JobStatus::Failed);
        report.error = Some(error.into());
        report
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress.clamp(0.0, 100.0));
        self
    }

    pub fn with_log(mut self, line: impl Into<String>) -> Self {
        self.logs.push(line.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handle_constructors() {
        assert_eq!(
            JobHandle::pending("j1"),
            JobHandle::Pending {
                job_id: "j1".to_string()
            }
        );
        assert!(matches!(JobHandle::immediate(json!(1)), JobHandle::Immediate { .. }));
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(StatusReport::processing(140.0).progress, Some(100.0));
        assert_eq!(StatusReport::processing(-3.0).progress, Some(0.0));
    }

    #[test]
    fn test_deserialize_minimal_report() {
        let report: StatusReport = serde_json::from_value(json!({"status": "processing"})).unwrap();
        assert_eq!(report.status, JobStatus::Processing);
        assert!(report.logs.is_empty());
        assert!(report.output.is_none());
    }
}
