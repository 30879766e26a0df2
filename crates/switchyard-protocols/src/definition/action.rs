//! Action definitions: local execution or conditional routing.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ConditionSet, DefinitionMeta};
use crate::action::{FnAction, InputTransform, LocalAction};
use crate::error::{DefinitionError, DispatchError};

/// A conditional, priority-ordered redirection target.
#[derive(Clone, Serialize, Deserialize)]
pub struct Route {
    /// Definition name to dispatch to.
    pub target: String,

    /// Every condition must hold against the action inputs.
    #[serde(default, skip_serializing_if = "ConditionSet::is_empty")]
    pub when: ConditionSet,

    /// Higher wins.
    #[serde(default)]
    pub priority: i64,

    /// Rewrites inputs before dispatching to `target`.
    #[serde(skip)]
    pub transform: Option<InputTransform>,
}

impl Route {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            when: ConditionSet::new(),
            priority: 0,
            transform: None,
        }
    }

    pub fn when(mut self, conditions: ConditionSet) -> Self {
        self.when = conditions;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// True when every `when` condition holds against `inputs`.
    pub fn is_eligible(&self, inputs: &Value) -> bool {
        self.when.matches_object(inputs)
    }

    /// Inputs to forward to the target.
    pub fn apply_transform(&self, inputs: Value) -> Value {
        match &self.transform {
            Some(transform) => transform(inputs),
            None => inputs,
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("target", &self.target)
            .field("when", &self.when)
            .field("priority", &self.priority)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    #[serde(flatten)]
    pub meta: DefinitionMeta,

    #[serde(default)]
    pub routes: Vec<Route>,

    /// In-process implementation. When present, routes are ignored.
    #[serde(skip)]
    pub execute: Option<Arc<dyn LocalAction>>,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: DefinitionMeta::new(name),
            routes: Vec::new(),
            execute: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.meta.schema.input = Some(schema);
        self
    }

    pub fn with_types(mut self, input_type: impl Into<String>, output_type: impl Into<String>) -> Self {
        self.meta.input_type = Some(input_type.into());
        self.meta.output_type = Some(output_type.into());
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn with_execute(mut self, action: Arc<dyn LocalAction>) -> Self {
        self.execute = Some(action);
        self
    }

    /// Wrap a synchronous closure as the local implementation.
    pub fn with_execute_fn<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        let name = self.meta.name.clone();
        self.with_execute(Arc::new(FnAction::new(name, f)))
    }

    pub fn is_local(&self) -> bool {
        self.execute.is_some()
    }

    /// Select the route to follow for `inputs`.
    ///
    /// Eligible routes are ordered by priority, highest first; routes with
    /// equal priority keep declaration order.
    pub fn select_route(&self, inputs: &Value) -> Result<&Route, DispatchError> {
        if self.routes.is_empty() {
            return Err(DispatchError::Routing {
                action: self.meta.name.clone(),
                reason: "action has no execute function and no routes".to_string(),
            });
        }

        let mut eligible: Vec<&Route> = self
            .routes
            .iter()
            .filter(|route| route.is_eligible(inputs))
            .collect();
        eligible.sort_by(|a, b| b.priority.cmp(&a.priority));

        eligible.into_iter().next().ok_or_else(|| DispatchError::Routing {
            action: self.meta.name.clone(),
            reason: format!("none of {} routes matched the inputs", self.routes.len()),
        })
    }

    pub(crate) fn validate(&self) -> Result<(), DefinitionError> {
        if self.routes.iter().any(|r| r.target.trim().is_empty()) {
            return Err(DefinitionError::EmptyRouteTarget {
                action: self.meta.name.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("meta", &self.meta)
            .field("routes", &self.routes)
            .field("execute", &self.execute.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Condition;
    use serde_json::json;

    fn quality_action() -> ActionDefinition {
        ActionDefinition::new("image-to-video")
            .with_route(
                Route::new("x")
                    .when(ConditionSet::new().with("quality", Condition::Gte(8.0)))
                    .with_priority(10),
            )
            .with_route(Route::new("y").with_priority(1))
    }

    #[test]
    fn test_high_quality_routes_to_x() {
        let action = quality_action();
        let route = action.select_route(&json!({"quality": 9})).unwrap();
        assert_eq!(route.target, "x");
    }

    #[test]
    fn test_low_quality_falls_through_to_y() {
        let action = quality_action();
        let route = action.select_route(&json!({"quality": 3})).unwrap();
        assert_eq!(route.target, "y");
    }

    #[test]
    fn test_equal_priority_keeps_declaration_order() {
        let action = ActionDefinition::new("pick")
            .with_route(Route::new("first"))
            .with_route(Route::new("second"));
        assert_eq!(action.select_route(&json!({})).unwrap().target, "first");
    }

    #[test]
    fn test_no_match_is_routing_error() {
        let action = ActionDefinition::new("strict").with_route(
            Route::new("x").when(ConditionSet::new().with("mode", Condition::Eq(json!("pro")))),
        );
        let err = action.select_route(&json!({"mode": "lite"})).unwrap_err();
        assert!(matches!(err, DispatchError::Routing { .. }));
    }

    #[test]
    fn test_no_routes_is_routing_error() {
        let action = ActionDefinition::new("empty");
        assert!(matches!(
            action.select_route(&json!({})),
            Err(DispatchError::Routing { .. })
        ));
    }

    #[test]
    fn test_transform_rewrites_inputs() {
        let route = Route::new("upscale").with_transform(|mut inputs| {
            inputs["scale"] = json!(2);
            inputs
        });
        let out = route.apply_transform(json!({"image": "a.png"}));
        assert_eq!(out, json!({"image": "a.png", "scale": 2}));
    }

    #[test]
    fn test_validate_rejects_empty_target() {
        let action = ActionDefinition::new("bad").with_route(Route::new(""));
        assert!(matches!(
            action.validate(),
            Err(DefinitionError::EmptyRouteTarget { .. })
        ));
    }

    #[test]
    fn test_debug_hides_closures() {
        let action = ActionDefinition::new("local").with_execute_fn(|v| Ok(v));
        let debug = format!("{:?}", action);
        assert!(debug.contains("execute: true"));
        assert!(action.is_local());
    }
}
