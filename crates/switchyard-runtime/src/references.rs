//! Pipeline context and reference expressions.
//!
//! A string beginning with `$` is a dotted path into the pipeline context:
//! `$inputs.prompt`, `$results.frame.url`, or `$frame.url` as shorthand for
//! a step result. Numeric segments index arrays. A string beginning with
//! `$$` is a literal with the first `$` removed.

use serde_json::{Map, Value};

/// State accumulated while a skill runs.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// The skill's own validated input.
    pub inputs: Value,
    /// Outputs of executed steps, keyed by step name.
    pub results: Map<String, Value>,
    pub step_index: usize,
    pub total_steps: usize,
}

impl PipelineContext {
    pub fn new(inputs: Value, total_steps: usize) -> Self {
        Self {
            inputs,
            results: Map::new(),
            step_index: 0,
            total_steps,
        }
    }

    /// Look up a reference path, with or without the leading `$`.
    ///
    /// Returns `None` when any segment is missing or cannot be navigated.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        let path = path.strip_prefix('$').unwrap_or(path);
        let mut segments = path.split('.');
        let root = segments.next()?;

        let mut current: &Value = match root {
            "inputs" => &self.inputs,
            "results" => match segments.next() {
                Some(step) => self.results.get(step)?,
                None => return Some(Value::Object(self.results.clone())),
            },
            step => self.results.get(step)?,
        };

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Resolve every reference inside `value`.
    ///
    /// `None` means the value itself was an undefined reference. Inside
    /// objects undefined entries are dropped; inside arrays they become `null`.
    pub fn resolve(&self, value: &Value) -> Option<Value> {
        match value {
            Value::String(s) => {
                if let Some(literal) = s.strip_prefix("$$") {
                    Some(Value::String(format!("${}", literal)))
                } else if s.starts_with('$') {
                    self.lookup(s)
                } else {
                    Some(value.clone())
                }
            }
            Value::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve(item).unwrap_or(Value::Null))
                    .collect(),
            )),
            Value::Object(map) => Some(Value::Object(self.resolve_map(map))),
            other => Some(other.clone()),
        }
    }

    /// Resolve a step's input map.
    pub fn resolve_map(&self, inputs: &Map<String, Value>) -> Map<String, Value> {
        inputs
            .iter()
            .filter_map(|(key, value)| self.resolve(value).map(|resolved| (key.clone(), resolved)))
            .collect()
    }
}
