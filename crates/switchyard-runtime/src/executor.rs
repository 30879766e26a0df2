//! Top-level dispatcher.
//!
//! `run` resolves a name, validates inputs, then dispatches by kind: models
//! go through the [`JobRunner`], actions execute locally or follow a route,
//! and skills go through the [`PipelineRunner`] with the executor itself as
//! the step callback.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Value, json};
use switchyard_config::Config;
use switchyard_core::{JsonSchemaValidator, Registry, Resolver, ResolverSettings};
use switchyard_protocols::{
    ActionDefinition, Definition, DispatchError, GenerationProvider, ModelDefinition,
    RegistryError, RunOptions, RunResult, SchemaValidator,
};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::job_runner::{JobConfig, JobRunner};
use crate::pipeline::{PipelineRunner, StepExecutor};
use crate::poll::PollSettings;

/// Provider name reported for in-process actions.
pub const LOCAL_PROVIDER: &str = "local";

/// Dispatches names to models, actions and skills.
pub struct Executor {
    registry: Arc<Registry>,
    resolver: Resolver,
    validator: Arc<dyn SchemaValidator>,
    jobs: Arc<JobRunner>,
    pipeline: PipelineRunner,
}

impl Executor {
    /// Create an executor with default resolver and poll settings and JSON
    /// Schema validation.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            resolver: Resolver::new(registry.clone()),
            registry,
            validator: Arc::new(JsonSchemaValidator::new()),
            jobs: Arc::new(JobRunner::new()),
            pipeline: PipelineRunner::new(),
        }
    }

    /// Create an executor whose resolver and job runner follow `config`.
    pub fn from_config(registry: Arc<Registry>, config: &Config) -> Self {
        Self::new(registry)
            .with_resolver_settings(ResolverSettings::from(&config.resolver))
            .with_job_runner(Arc::new(JobRunner::with_settings(PollSettings::from(
                &config.dispatch,
            ))))
    }

    pub fn with_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_resolver_settings(mut self, settings: ResolverSettings) -> Self {
        self.resolver = Resolver::with_settings(self.registry.clone(), settings);
        self
    }

    pub fn with_job_runner(mut self, jobs: Arc<JobRunner>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn jobs(&self) -> &Arc<JobRunner> {
        &self.jobs
    }

    /// Resolve `name` and dispatch it (boxed for recursion).
    pub fn run<'a>(
        &'a self,
        name: &'a str,
        inputs: Value,
        options: &'a RunOptions,
    ) -> Pin<Box<dyn Future<Output = Result<RunResult, DispatchError>> + Send + 'a>> {
        Box::pin(async move {
            let started = Instant::now();
            let definition = self.resolver.resolve_required(name)?;

            self.validator
                .validate(&definition, &inputs)
                .map_err(|errors| DispatchError::Validation {
                    name: definition.name().to_string(),
                    errors,
                })?;

            debug!("Dispatching {}", definition.qualified_name());
            let result = match definition.as_ref() {
                Definition::Model(model) => self.run_model(model, inputs, options).await?,
                Definition::Action(action) => self.run_action(action, inputs, options).await?,
                Definition::Skill(skill) => {
                    self.pipeline.run(skill, inputs, self, options).await?
                }
            };

            Ok(result.with_duration(started.elapsed()))
        })
    }

    async fn run_model(
        &self,
        model: &ModelDefinition,
        inputs: Value,
        options: &RunOptions,
    ) -> Result<RunResult, DispatchError> {
        let provider_name = options
            .provider
            .as_deref()
            .unwrap_or(&model.default_provider);
        let provider = self
            .registry
            .get_provider(provider_name)
            .ok_or_else(|| RegistryError::ProviderNotFound(provider_name.to_string()))?;
        let model_id = model.provider_model_id(provider_name).to_string();

        info!("Running model {} on {} ({})", model.meta.name, provider_name, model_id);
        let config = JobConfig::new(provider, model_id.clone(), inputs).with_options(options.clone());
        let mut result = self.jobs.run(config).await?;

        let status = result
            .job_id
            .as_deref()
            .and_then(|id| self.jobs.get(id))
            .map(|job| job.status.as_str())
            .unwrap_or("completed");
        result.model = model.meta.name.clone();
        Ok(result
            .with_metadata("providerModel", json!(model_id))
            .with_metadata("status", json!(status)))
    }

    async fn run_action(
        &self,
        action: &ActionDefinition,
        inputs: Value,
        options: &RunOptions,
    ) -> Result<RunResult, DispatchError> {
        if let Some(execute) = &action.execute {
            debug!("Executing local action {}", action.meta.name);
            let output = execute.execute(inputs, options).await?;
            return Ok(RunResult::new(output, LOCAL_PROVIDER, action.meta.name.clone())
                .with_metadata("executedBy", json!(LOCAL_PROVIDER)));
        }

        let route = action.select_route(&inputs)?;
        debug!("Action {} routed to {}", action.meta.name, route.target);
        let routed_inputs = route.apply_transform(inputs);
        let result = self.run(&route.target, routed_inputs, options).await?;
        Ok(result.with_metadata("routedFrom", json!(action.meta.name)))
    }

    /// Upload a file through a provider and return the URL it hands back.
    pub async fn upload(
        &self,
        provider: &str,
        data: Bytes,
        filename: Option<&str>,
    ) -> Result<String, DispatchError> {
        let provider = self.provider(provider)?;
        Ok(provider.upload_file(data, filename).await?)
    }

    /// Cancel a job on `provider`. Returns `false` when the job is unknown.
    pub async fn cancel(&self, job_id: &str, provider: &str) -> Result<bool, DispatchError> {
        let provider = self.provider(provider)?;
        Ok(self.jobs.cancel(job_id, provider.as_ref()).await)
    }

    fn provider(&self, name: &str) -> Result<Arc<dyn GenerationProvider>, DispatchError> {
        self.registry
            .get_provider(name)
            .ok_or_else(|| RegistryError::ProviderNotFound(name.to_string()).into())
    }
}

#[async_trait]
impl StepExecutor for Executor {
    async fn execute(
        &self,
        target: &str,
        inputs: Value,
        options: &RunOptions,
    ) -> Result<RunResult, DispatchError> {
        self.run(target, inputs, options).await
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
