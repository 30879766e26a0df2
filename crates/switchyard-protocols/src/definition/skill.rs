//! Skill definitions: ordered steps, each a recursive dispatch.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ConditionSet, DefinitionMeta};
use crate::error::DefinitionError;

/// One step of a skill pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Unique within the skill; key of the step's result.
    pub name: String,

    /// Definition to dispatch.
    pub run: String,

    /// Literal values or `$`-prefixed reference expressions.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub inputs: Map<String, Value>,

    /// Evaluated against the pipeline context; keys are reference paths.
    #[serde(default, skip_serializing_if = "ConditionSet::is_empty")]
    pub when: ConditionSet,
}

impl Step {
    pub fn new(name: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run: run.into(),
            inputs: Map::new(),
            when: ConditionSet::new(),
        }
    }

    pub fn with_input(mut self, key: impl Into<String>, value: Value) -> Self {
        self.inputs.insert(key.into(), value);
        self
    }

    pub fn when(mut self, conditions: ConditionSet) -> Self {
        self.when = conditions;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    #[serde(flatten)]
    pub meta: DefinitionMeta,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl SkillDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: DefinitionMeta::new(name),
            steps: Vec::new(),
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

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), DefinitionError> {
        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.name.trim().is_empty() {
                return Err(DefinitionError::EmptyStepName {
                    skill: self.meta.name.clone(),
                });
            }
            if step.run.trim().is_empty() {
                return Err(DefinitionError::EmptyStepTarget {
                    skill: self.meta.name.clone(),
                    step: step.name.clone(),
                });
            }
            if !seen.insert(step.name.as_str()) {
                return Err(DefinitionError::DuplicateStep {
                    skill: self.meta.name.clone(),
                    step: step.name.clone(),
                });
            }
        }
        Ok(())
    }
}
