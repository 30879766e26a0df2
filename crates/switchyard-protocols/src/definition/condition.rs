//! Typed routing and step conditions.
//!
//! Conditions arrive in the JSON map form `{field: literal | {"$op": operand}}`
//! and are parsed once into a [`ConditionSet`]. Evaluation never re-reads the
//! operator strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DefinitionError;

/// A single predicate applied to one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact equality. Numbers compare by value, so `8` equals `8.0`.
    Eq(Value),
    Ne(Value),
    Lt(f64),
    Lte(f64),
    Gt(f64),
    Gte(f64),
    /// The value equals one of the listed candidates.
    In(Vec<Value>),
}

impl Condition {
    /// Operator keyword as written in the map form.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Eq(_) => "$eq",
            Self::Ne(_) => "$ne",
            Self::Lt(_) => "$lt",
            Self::Lte(_) => "$lte",
            Self::Gt(_) => "$gt",
            Self::Gte(_) => "$gte",
            Self::In(_) => "$in",
        }
    }

    /// Operand rendered back into JSON.
    pub fn operand(&self) -> Value {
        match self {
            Self::Eq(v) | Self::Ne(v) => v.clone(),
            Self::Lt(n) | Self::Lte(n) | Self::Gt(n) | Self::Gte(n) => number_value(*n),
            Self::In(values) => Value::Array(values.clone()),
        }
    }

    /// Test an actual value. `None` means the field is absent.
    ///
    /// Ordering operators coerce the actual value to a number; values that do
    /// not coerce never satisfy them. An absent value only satisfies `$ne`.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        let Some(actual) = actual else {
            return matches!(self, Self::Ne(_));
        };

        match self {
            Self::Eq(expected) => values_equal(actual, expected),
            Self::Ne(expected) => !values_equal(actual, expected),
            Self::Lt(bound) => coerce_number(actual).is_some_and(|n| n < *bound),
            Self::Lte(bound) => coerce_number(actual).is_some_and(|n| n <= *bound),
            Self::Gt(bound) => coerce_number(actual).is_some_and(|n| n > *bound),
            Self::Gte(bound) => coerce_number(actual).is_some_and(|n| n >= *bound),
            Self::In(candidates) => candidates.iter().any(|c| values_equal(actual, c)),
        }
    }

    /// Parse the expected value for one field into one or more conditions.
    ///
    /// An object whose keys all start with `$` is an operator map; every
    /// operator must hold. Anything else is an equality literal.
    pub fn parse_field(field: &str, expected: &Value) -> Result<Vec<Condition>, DefinitionError> {
        let operators = match expected {
            Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) => map,
            other => return Ok(vec![Condition::Eq(other.clone())]),
        };

        operators
            .iter()
            .map(|(operator, operand)| Self::parse_operator(field, operator, operand))
            .collect()
    }

    fn parse_operator(field: &str, operator: &str, operand: &Value) -> Result<Condition, DefinitionError> {
        let numeric = || {
            coerce_number(operand).ok_or_else(|| DefinitionError::InvalidOperand {
                field: field.to_string(),
                operator: operator.to_string(),
                reason: format!("expected a number, got {}", operand),
            })
        };

        let condition = match operator {
            "$eq" => Condition::Eq(operand.clone()),
            "$ne" => Condition::Ne(operand.clone()),
            "$lt" => Condition::Lt(numeric()?),
            "$lte" => Condition::Lte(numeric()?),
            "$gt" => Condition::Gt(numeric()?),
            "$gte" => Condition::Gte(numeric()?),
            "$in" => match operand {
                Value::Array(values) => Condition::In(values.clone()),
                other => {
                    return Err(DefinitionError::InvalidOperand {
                        field: field.to_string(),
                        operator: operator.to_string(),
                        reason: format!("expected an array, got {}", other),
                    });
                }
            },
            unknown => {
                return Err(DefinitionError::UnknownOperator {
                    field: field.to_string(),
                    operator: unknown.to_string(),
                });
            }
        };
        Ok(condition)
    }
}

/// A condition bound to the field it reads.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    pub field: String,
    pub condition: Condition,
}

/// Conjunction of field conditions. Empty sets always hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ConditionSet {
    entries: Vec<FieldCondition>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON map form.
    pub fn parse(map: &Map<String, Value>) -> Result<Self, DefinitionError> {
        let mut entries = Vec::new();
        for (field, expected) in map {
            for condition in Condition::parse_field(field, expected)? {
                entries.push(FieldCondition {
                    field: field.clone(),
                    condition,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parse from an arbitrary JSON value; `null` yields an empty set.
    pub fn from_value(value: &Value) -> Result<Self, DefinitionError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Self::parse(map),
            other => Err(DefinitionError::InvalidOperand {
                field: String::new(),
                operator: "when".to_string(),
                reason: format!("expected an object, got {}", other),
            }),
        }
    }

    /// Add a condition on a field.
    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.entries.push(FieldCondition {
            field: field.into(),
            condition,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldCondition> {
        self.entries.iter()
    }

    /// True when every condition holds. `lookup` maps a field to its value.
    pub fn evaluate<'a, F>(&self, mut lookup: F) -> bool
    where
        F: FnMut(&str) -> Option<&'a Value>,
    {
        self.entries
            .iter()
            .all(|entry| entry.condition.matches(lookup(&entry.field)))
    }

    /// Like [`evaluate`](Self::evaluate) for lookups that produce owned values.
    pub fn evaluate_owned<F>(&self, mut lookup: F) -> bool
    where
        F: FnMut(&str) -> Option<Value>,
    {
        self.entries.iter().all(|entry| {
            let actual = lookup(&entry.field);
            entry.condition.matches(actual.as_ref())
        })
    }

    /// Evaluate against the top-level fields of a JSON object.
    pub fn matches_object(&self, inputs: &Value) -> bool {
        self.evaluate(|field| inputs.get(field))
    }
}

impl TryFrom<Map<String, Value>> for ConditionSet {
    type Error = DefinitionError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::parse(&map)
    }
}

impl From<ConditionSet> for Map<String, Value> {
    fn from(set: ConditionSet) -> Self {
        let mut grouped: Vec<(String, Vec<Condition>)> = Vec::new();
        for entry in set.entries {
            match grouped.iter_mut().find(|(field, _)| *field == entry.field) {
                Some((_, conditions)) => conditions.push(entry.condition),
                None => grouped.push((entry.field, vec![entry.condition])),
            }
        }

        let mut map = Map::new();
        for (field, conditions) in grouped {
            let value = match conditions.as_slice() {
                [Condition::Eq(literal)] if !literal.is_object() => literal.clone(),
                _ => Value::Object(
                    conditions
                        .iter()
                        .map(|c| (c.operator().to_string(), c.operand()))
                        .collect(),
                ),
            };
            map.insert(field, value);
        }
        map
    }
}

/// Loose equality: numbers by value, everything else structurally.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

/// Numeric coercion used by ordering operators.
///
/// Numbers pass through, numeric strings parse (blank strings are zero),
/// booleans are 0/1 and `null` is zero. Arrays and objects do not coerce.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
