//! Job record and status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Job lifecycle status.
///
/// `pending` and `cancelled` are only ever set locally; the remaining states
/// are reported by providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created locally, not yet submitted.
    Pending,
    /// Accepted by the provider.
    Queued,
    /// Running on the provider.
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Pending
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime record tracking one provider invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Provider-assigned or synthesized id. Empty until submitted.
    pub id: String,
    pub status: JobStatus,
    pub provider: String,
    /// Backend-specific model id sent to the provider.
    pub model: String,
    pub inputs: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default)]
    pub logs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a local job record in `pending` state.
    pub fn pending(provider: impl Into<String>, model: impl Into<String>, inputs: Value) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            status: JobStatus::Pending,
            provider: provider.into(),
            model: model.into(),
            inputs,
            output: None,
            error: None,
            progress: None,
            logs: Vec::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Move to `status`, stamping `completed_at` on terminal states.
    ///
    /// A terminal status is final. Returns `true` when the status actually
    /// changed.
    pub fn transition(&mut self, status: JobStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let now = Utc::now();
        self.updated_at = now;
        if status.is_terminal() && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        if self.status == status {
            return false;
        }
        self.status = status;
        true
    }

    /// Append log lines not already recorded.
    pub fn merge_logs(&mut self, lines: &[String]) {
        for line in lines {
            if !self.logs.contains(line) {
                self.logs.push(line.clone());
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_job() {
        let job = Job::pending("fal", "flux", json!({"prompt": "cat"}));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.id.is_empty());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_transition_stamps_completion() {
        let mut job = Job::pending("fal", "flux", json!({}));
        assert!(job.transition(JobStatus::Queued));
        assert!(job.completed_at.is_none());
        assert!(!job.transition(JobStatus::Queued));
        assert!(job.transition(JobStatus::Completed));
        assert!(job.completed_at.is_some());
        assert!(job.is_finished());
    }

    #[test]
    fn test_terminal_status_is_final() {
        let mut job = Job::pending("fal", "flux", json!({}));
        job.transition(JobStatus::Processing);
        assert!(job.transition(JobStatus::Cancelled));
        let completed_at = job.completed_at;

        assert!(!job.transition(JobStatus::Processing));
        assert!(!job.transition(JobStatus::Completed));
        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.completed_at, completed_at);
    }

    #[test]
    fn test_merge_logs_deduplicates() {
        let mut job = Job::pending("fal", "flux", json!({}));
        job.merge_logs(&["loading".to_string(), "step 1".to_string()]);
        job.merge_logs(&["loading".to_string(), "step 2".to_string()]);
        assert_eq!(job.logs, vec!["loading", "step 1", "step 2"]);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(JobStatus::Processing).unwrap(), json!("processing"));
        assert_eq!(JobStatus::Cancelled.to_string(), "cancelled");
        assert!(!JobStatus::Queued.is_terminal());
    }
}
