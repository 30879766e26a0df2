//! Errors for malformed definitions, caught before dispatch begins.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Definition name cannot be empty")]
    EmptyName,

    #[error("Model '{model}' has no default provider")]
    EmptyDefaultProvider { model: String },

    #[error("Action '{action}' has a route with an empty target")]
    EmptyRouteTarget { action: String },

    #[error("Skill '{skill}' has a step with an empty name")]
    EmptyStepName { skill: String },

    #[error("Step '{step}' of skill '{skill}' has no target to run")]
    EmptyStepTarget { skill: String, step: String },

    #[error("Skill '{skill}' declares step '{step}' more than once")]
    DuplicateStep { skill: String, step: String },

    #[error("Unknown operator '{operator}' for field '{field}'")]
    UnknownOperator { field: String, operator: String },

    #[error("Invalid operand for {operator} on field '{field}': {reason}")]
    InvalidOperand {
        field: String,
        operator: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_operator_display() {
        let err = DefinitionError::UnknownOperator {
            field: "quality".to_string(),
            operator: "$between".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("$between"));
        assert!(display.contains("quality"));
    }

    #[test]
    fn test_duplicate_step_display() {
        let err = DefinitionError::DuplicateStep {
            skill: "talking-head".to_string(),
            step: "voice".to_string(),
        };
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors: Vec<DefinitionError> = vec![
            DefinitionError::EmptyName,
            DefinitionError::EmptyDefaultProvider { model: "m".into() },
            DefinitionError::EmptyRouteTarget { action: "a".into() },
            DefinitionError::EmptyStepName { skill: "s".into() },
            DefinitionError::EmptyStepTarget {
                skill: "s".into(),
                step: "x".into(),
            },
            DefinitionError::InvalidOperand {
                field: "f".into(),
                operator: "$lt".into(),
                reason: "not a number".into(),
            },
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
