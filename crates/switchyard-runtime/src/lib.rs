//! # Switchyard Runtime
//!
//! Execution side of the dispatch layer: job polling, skill pipelines and
//! the top-level [`Executor`].

pub mod executor;
pub mod job_runner;
pub mod pipeline;
pub mod poll;
pub mod references;

pub use executor::{Executor, LOCAL_PROVIDER};
pub use job_runner::{JobConfig, JobRunner};
pub use pipeline::{PIPELINE_PROVIDER, PipelineRunner, StepExecutor};
pub use poll::PollSettings;
pub use references::PipelineContext;
