//! Pipeline runner for skills.
//!
//! Steps run strictly one after another. Each step's inputs are resolved
//! against the accumulated [`PipelineContext`] and handed to a
//! [`StepExecutor`], which is how steps reach models, actions and nested
//! skills uniformly.

use async_trait::async_trait;
use serde_json::{Value, json};
use switchyard_protocols::{DispatchError, RunOptions, RunResult, SkillDefinition, Step};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::references::PipelineContext;

/// Provider name reported when no step succeeded.
pub const PIPELINE_PROVIDER: &str = "pipeline";

/// Callback used to dispatch a single step.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Dispatch `target` with already-resolved inputs.
    async fn execute(
        &self,
        target: &str,
        inputs: Value,
        options: &RunOptions,
    ) -> Result<RunResult, DispatchError>;
}

/// Runs skill steps in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineRunner;

impl PipelineRunner {
    pub fn new() -> Self {
        Self
    }

    /// Execute every step of `skill`.
    ///
    /// A failing step aborts the pipeline unless `options.stop_on_error` is
    /// `Some(false)`, in which case `{"error": message}` is recorded as that
    /// step's result and execution continues.
    pub async fn run(
        &self,
        skill: &SkillDefinition,
        inputs: Value,
        executor: &dyn StepExecutor,
        options: &RunOptions,
    ) -> Result<RunResult, DispatchError> {
        let started = Instant::now();
        let skill_name = skill.meta.name.as_str();
        let mut context = PipelineContext::new(inputs, skill.steps.len());
        let mut last_success: Option<RunResult> = None;

        info!("Running skill {} ({} steps)", skill_name, skill.steps.len());

        for (index, step) in skill.steps.iter().enumerate() {
            context.step_index = index;

            if !Self::should_run(step, &context) {
                debug!("Skipping step {} of {}: condition not met", step.name, skill_name);
                continue;
            }

            let resolved = Value::Object(context.resolve_map(&step.inputs));
            debug!(
                "Step {}/{} of {}: {} -> {}",
                index + 1,
                context.total_steps,
                skill_name,
                step.name,
                step.run
            );

            match executor.execute(&step.run, resolved, options).await {
                Ok(result) => {
                    context.results.insert(step.name.clone(), result.output.clone());
                    last_success = Some(result);
                }
                Err(e) if options.stops_on_error() => {
                    warn!("Step {} of {} failed, aborting: {}", step.name, skill_name, e);
                    return Err(DispatchError::PipelineStep {
                        skill: skill_name.to_string(),
                        step: step.name.clone(),
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!("Step {} of {} failed, continuing: {}", step.name, skill_name, e);
                    context
                        .results
                        .insert(step.name.clone(), json!({ "error": e.to_string() }));
                }
            }
        }

        let step_results = Value::Object(context.results.clone());
        let (output, provider) = match last_success {
            Some(result) => (result.output, result.provider),
            None => (step_results.clone(), PIPELINE_PROVIDER.to_string()),
        };

        Ok(RunResult::new(output, provider, skill_name)
            .with_duration(started.elapsed())
            .with_metadata("stepResults", step_results))
    }

    /// A step runs when every `when` key, resolved as a reference path,
    /// satisfies its condition.
    fn should_run(step: &Step, context: &PipelineContext) -> bool {
        step.when.is_empty() || step.when.evaluate_owned(|field| context.lookup(field))
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
