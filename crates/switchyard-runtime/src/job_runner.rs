//! Job runner: drives one provider invocation to completion.
//!
//! Jobs move through `pending -> queued -> processing -> {completed | failed
//! | cancelled}`. Providers that finish inside `submit` skip polling entirely.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{Value, json};
use switchyard_protocols::{
    DispatchError, GenerationProvider, Job, JobHandle, JobStatus, ProviderError, RunOptions,
    RunResult, StatusReport,
};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::poll::PollSettings;

/// One unit of work for [`JobRunner::run`].
#[derive(Clone)]
pub struct JobConfig {
    pub provider: Arc<dyn GenerationProvider>,
    /// Backend-specific model id passed to `submit`.
    pub model: String,
    pub inputs: Value,
    pub options: RunOptions,
}

impl JobConfig {
    pub fn new(provider: Arc<dyn GenerationProvider>, model: impl Into<String>, inputs: Value) -> Self {
        Self {
            provider,
            model: model.into(),
            inputs,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }
}

/// Submits jobs, polls them with backoff and keeps their records.
///
/// Records are retained until [`JobRunner::clear_completed`] is called.
pub struct JobRunner {
    jobs: DashMap<String, Job>,
    settings: PollSettings,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::with_settings(PollSettings::default())
    }

    pub fn with_settings(settings: PollSettings) -> Self {
        Self {
            jobs: DashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Submit the job and, unless `wait` is off, poll it to a terminal status.
    pub async fn run(&self, config: JobConfig) -> Result<RunResult, DispatchError> {
        let JobConfig {
            provider,
            model,
            inputs,
            options,
        } = config;
        let started = Instant::now();
        let provider_name = provider.name().to_string();
        let mut job = Job::pending(&provider_name, &model, inputs);

        info!("Submitting job to {} (model: {})", provider_name, model);
        let handle = match provider.submit(&model, &job.inputs).await {
            Ok(handle) => handle,
            Err(e) => {
                error!("Submit to {} failed: {}", provider_name, e);
                return Err(e.into());
            }
        };

        match handle {
            JobHandle::Immediate { output } => {
                job.id = uuid::Uuid::new_v4().to_string();
                job.output = Some(output.clone());
                job.transition(JobStatus::Completed);
                let job_id = job.id.clone();
                self.jobs.insert(job_id.clone(), job);
                options.notify_status(JobStatus::Completed);
                debug!("Job {} completed during submit", job_id);

                Ok(RunResult::new(output, provider_name, model)
                    .with_duration(started.elapsed())
                    .with_job_id(job_id))
            }
            JobHandle::Pending { job_id } => {
                job.id = job_id.clone();
                job.transition(JobStatus::Queued);
                self.jobs.insert(job_id.clone(), job);
                options.notify_status(JobStatus::Queued);

                if !options.wait {
                    debug!("Job {} queued, not waiting", job_id);
                    return Ok(RunResult::new(json!({ "jobId": job_id }), provider_name, model)
                        .with_duration(started.elapsed())
                        .with_job_id(job_id));
                }

                let output = self.poll(provider.as_ref(), &job_id, &options).await?;
                Ok(RunResult::new(output, provider_name, model)
                    .with_duration(started.elapsed())
                    .with_job_id(job_id))
            }
        }
    }

    async fn poll(
        &self,
        provider: &dyn GenerationProvider,
        job_id: &str,
        options: &RunOptions,
    ) -> Result<Value, DispatchError> {
        let timeout = options.timeout.unwrap_or(self.settings.timeout);
        let submitted = Instant::now();
        let mut interval = self.settings.initial_interval.min(self.settings.max_interval);

        while submitted.elapsed() < timeout {
            if self.status(job_id) == Some(JobStatus::Cancelled) {
                return Err(ProviderError::Cancelled {
                    job_id: job_id.to_string(),
                }
                .into());
            }

            let report = match provider.get_status(job_id).await {
                Ok(report) => report,
                Err(e) => {
                    self.fail(job_id, &e.to_string(), options);
                    return Err(e.into());
                }
            };
            debug!("Job {} status: {}", job_id, report.status);
            // Cancelled locally while the status call was in flight.
            if self.status(job_id) == Some(JobStatus::Cancelled) {
                return Err(ProviderError::Cancelled {
                    job_id: job_id.to_string(),
                }
                .into());
            }
            self.apply_report(job_id, &report, options);

            match report.status {
                JobStatus::Completed => {
                    let output = match report.output {
                        Some(output) => output,
                        None => match provider.get_result(job_id).await {
                            Ok(output) => output,
                            Err(e) => {
                                self.fail(job_id, &e.to_string(), options);
                                return Err(e.into());
                            }
                        },
                    };
                    self.update(job_id, |job| job.output = Some(output.clone()));
                    info!("Job {} completed", job_id);
                    return Ok(output);
                }
                JobStatus::Failed => {
                    let err = ProviderError::job_failed(job_id, report.error);
                    error!("Job {} failed: {}", job_id, err);
                    self.update(job_id, |job| job.error = Some(err.to_string()));
                    return Err(err.into());
                }
                JobStatus::Cancelled => {
                    warn!("Job {} was cancelled by the provider", job_id);
                    return Err(ProviderError::Cancelled {
                        job_id: job_id.to_string(),
                    }
                    .into());
                }
                _ => {}
            }

            let remaining = timeout.saturating_sub(submitted.elapsed());
            tokio::time::sleep(interval.min(remaining)).await;
            interval = self.settings.next_interval(interval);
        }

        let elapsed_ms = submitted.elapsed().as_millis() as u64;
        warn!("Job {} timed out after {}ms", job_id, elapsed_ms);
        Err(DispatchError::Timeout {
            job_id: job_id.to_string(),
            elapsed_ms,
        })
    }

    fn apply_report(&self, job_id: &str, report: &StatusReport, options: &RunOptions) {
        let mut changed = false;
        let mut progress = None;
        self.update(job_id, |job| {
            if let Some(p) = report.progress {
                job.progress = Some(p);
            }
            job.merge_logs(&report.logs);
            changed = job.transition(report.status);
            progress = job.progress;
        });

        if report.progress.is_some() || !report.logs.is_empty() {
            options.notify_progress(progress.unwrap_or(0.0), &report.logs);
        }
        if changed {
            options.notify_status(report.status);
        }
    }

    fn fail(&self, job_id: &str, message: &str, options: &RunOptions) {
        let mut changed = false;
        self.update(job_id, |job| {
            job.error = Some(message.to_string());
            changed = job.transition(JobStatus::Failed);
        });
        if changed {
            options.notify_status(JobStatus::Failed);
        }
    }

    fn update<F>(&self, job_id: &str, f: F)
    where
        F: FnOnce(&mut Job),
    {
        if let Some(mut job) = self.jobs.get_mut(job_id) {
            f(job.value_mut());
        }
    }

    fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.get(job_id).map(|job| job.status)
    }

    /// Cancel a job.
    ///
    /// The provider is asked to cancel when it supports it; the local record
    /// is marked `cancelled` either way. Returns `false` for unknown jobs.
    pub async fn cancel(&self, job_id: &str, provider: &dyn GenerationProvider) -> bool {
        match provider.cancel(job_id).await {
            Ok(()) => debug!("Provider {} cancelled job {}", provider.name(), job_id),
            Err(ProviderError::Unsupported { .. }) => {
                debug!("Provider {} cannot cancel; marking job {} locally", provider.name(), job_id)
            }
            Err(e) => warn!("Cancel of job {} on {} failed: {}", job_id, provider.name(), e),
        }

        match self.jobs.get_mut(job_id) {
            Some(mut job) => {
                job.transition(JobStatus::Cancelled);
                true
            }
            None => false,
        }
    }

    /// Snapshot of every retained job, oldest first.
    pub fn list(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.iter().map(|entry| entry.value().clone()).collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        jobs
    }

    pub fn get(&self, job_id: &str) -> Option<Job> {
        self.jobs.get(job_id).map(|job| job.clone())
    }

    /// Drop every job in a terminal status, returning how many were removed.
    pub fn clear_completed(&self) -> usize {
        let mut removed = 0;
        self.jobs.retain(|_, job| {
            let keep = !job.status.is_terminal();
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "job_runner_tests.rs"]
mod tests;
