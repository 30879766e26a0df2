//! Local action protocol.
//!
//! Actions with a local implementation bypass provider dispatch entirely:
//! the executor hands them validated inputs and wraps whatever they return.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DispatchError;
use crate::run::RunOptions;

/// Pure input-rewriting function applied before a route recurses.
pub type InputTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Core trait for in-process action implementations.
#[async_trait]
pub trait LocalAction: Send + Sync {
    /// Run the action against validated inputs.
    async fn execute(&self, inputs: Value, options: &RunOptions) -> Result<Value, DispatchError>;
}

/// Adapter turning a synchronous closure into a [`LocalAction`].
pub struct FnAction<F> {
    name: String,
    f: F,
}

impl<F> FnAction<F>
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

#[async_trait]
impl<F> LocalAction for FnAction<F>
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    async fn execute(&self, inputs: Value, _options: &RunOptions) -> Result<Value, DispatchError> {
        (self.f)(inputs).map_err(|message| DispatchError::Action {
            name: self.name.clone(),
            message,
        })
    }
}
