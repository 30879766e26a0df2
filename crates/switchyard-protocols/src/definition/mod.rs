//! Definition data model.
//!
//! A [`Definition`] is a named, schema-described unit of work. It is one of
//! three kinds, resolved in the fixed order model → action → skill when a
//! bare name is looked up.

mod action;
mod condition;
mod model;
mod skill;

pub use action::{ActionDefinition, Route};
pub use condition::{coerce_number, values_equal, Condition, ConditionSet, FieldCondition};
pub use model::ModelDefinition;
pub use skill::{SkillDefinition, Step};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;

/// The closed set of definition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Model,
    Action,
    Skill,
}

impl DefinitionKind {
    /// Kinds in resolution order.
    pub const ALL: [DefinitionKind; 3] = [Self::Model, Self::Action, Self::Skill];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Action => "action",
            Self::Skill => "skill",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefinitionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" => Ok(Self::Model),
            "action" => Ok(Self::Action),
            "skill" => Ok(Self::Skill),
            other => Err(format!("unknown definition kind: {}", other)),
        }
    }
}

/// Opaque input/output contract. Validation is delegated to a
/// [`SchemaValidator`](crate::SchemaValidator).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionSchema {
    /// JSON Schema for the inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,

    /// JSON Schema for the output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
}

/// Fields shared by every definition kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionMeta {
    /// Unique within its kind.
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub schema: DefinitionSchema,

    /// Declared input media type, e.g. "image" or "text".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,

    /// Declared output media type, e.g. "video".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
}

impl DefinitionMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A named unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Definition {
    Model(ModelDefinition),
    Action(ActionDefinition),
    Skill(SkillDefinition),
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Model(_) => DefinitionKind::Model,
            Self::Action(_) => DefinitionKind::Action,
            Self::Skill(_) => DefinitionKind::Skill,
        }
    }

    pub fn meta(&self) -> &DefinitionMeta {
        match self {
            Self::Model(d) => &d.meta,
            Self::Action(d) => &d.meta,
            Self::Skill(d) => &d.meta,
        }
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn description(&self) -> &str {
        &self.meta().description
    }

    pub fn schema(&self) -> &DefinitionSchema {
        &self.meta().schema
    }

    /// Namespaced form, e.g. `model/echo`.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.kind(), self.name())
    }

    /// Structural checks run at registration time.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name().trim().is_empty() {
            return Err(DefinitionError::EmptyName);
        }
        match self {
            Self::Model(model) => model.validate(),
            Self::Action(action) => action.validate(),
            Self::Skill(skill) => skill.validate(),
        }
    }
}

impl From<ModelDefinition> for Definition {
    fn from(value: ModelDefinition) -> Self {
        Self::Model(value)
    }
}

impl From<ActionDefinition> for Definition {
    fn from(value: ActionDefinition) -> Self {
        Self::Action(value)
    }
}

impl From<SkillDefinition> for Definition {
    fn from(value: SkillDefinition) -> Self {
        Self::Skill(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip_through_str() {
        for kind in DefinitionKind::ALL {
            assert_eq!(kind.as_str().parse::<DefinitionKind>().unwrap(), kind);
        }
        assert!("workflow".parse::<DefinitionKind>().is_err());
    }

    #[test]
    fn test_definition_accessors() {
        let def: Definition = ModelDefinition::new("echo", "mock")
            .with_description("Echo inputs back")
            .into();
        assert_eq!(def.kind(), DefinitionKind::Model);
        assert_eq!(def.name(), "echo");
        assert_eq!(def.description(), "Echo inputs back");
        assert_eq!(def.qualified_name(), "model/echo");
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let def: Definition = SkillDefinition::new("  ").into();
        assert!(matches!(def.validate(), Err(DefinitionError::EmptyName)));
    }

    #[test]
    fn test_deserialize_tagged_catalog_entry() {
        let def: Definition = serde_json::from_value(json!({
            "kind": "action",
            "name": "image-to-video",
            "description": "Pick a video backend",
            "input_type": "image",
            "output_type": "video",
            "routes": [
                {"target": "kling", "when": {"quality": {"$gte": 8}}, "priority": 10},
                {"target": "wan", "priority": 1}
            ]
        }))
        .unwrap();

        let Definition::Action(action) = &def else {
            panic!("expected action");
        };
        assert_eq!(action.routes.len(), 2);
        assert_eq!(action.routes[0].when.len(), 1);
        assert!(action.routes[1].when.is_empty());
        assert_eq!(def.meta().output_type.as_deref(), Some("video"));
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_deserialize_rejects_malformed_route_condition() {
        let result: Result<Definition, _> = serde_json::from_value(json!({
            "kind": "action",
            "name": "broken",
            "routes": [{"target": "x", "when": {"q": {"$approx": 1}}}]
        }));
        assert!(result.is_err());
    }
}
