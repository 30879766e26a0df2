//! Tests for typed conditions.

use super::*;
use serde_json::json;

fn set(value: Value) -> ConditionSet {
    ConditionSet::from_value(&value).unwrap()
}

#[test]
fn test_plain_literal_is_equality() {
    let conditions = set(json!({"style": "anime"}));
    assert!(conditions.matches_object(&json!({"style": "anime"})));
    assert!(!conditions.matches_object(&json!({"style": "photo"})));
    assert!(!conditions.matches_object(&json!({})));
}

#[test]
fn test_numbers_compare_by_value() {
    let conditions = set(json!({"steps": 8}));
    assert!(conditions.matches_object(&json!({"steps": 8.0})));
}

#[test]
fn test_gte_coerces_actual_value() {
    let conditions = set(json!({"quality": {"$gte": 8}}));
    assert!(conditions.matches_object(&json!({"quality": 9})));
    assert!(conditions.matches_object(&json!({"quality": "8"})));
    assert!(!conditions.matches_object(&json!({"quality": 3})));
    assert!(!conditions.matches_object(&json!({"quality": "high"})));
    assert!(!conditions.matches_object(&json!({})));
}

#[test]
fn test_ordering_operators() {
    let actual = json!({"duration": 5});
    assert!(set(json!({"duration": {"$lt": 6}})).matches_object(&actual));
    assert!(!set(json!({"duration": {"$lt": 5}})).matches_object(&actual));
    assert!(set(json!({"duration": {"$lte": 5}})).matches_object(&actual));
    assert!(set(json!({"duration": {"$gt": 4.5}})).matches_object(&actual));
    assert!(!set(json!({"duration": {"$gt": 5}})).matches_object(&actual));
}

#[test]
fn test_multiple_operators_on_one_field_all_hold() {
    let conditions = set(json!({"duration": {"$gte": 5, "$lt": 10}}));
    assert_eq!(conditions.len(), 2);
    assert!(conditions.matches_object(&json!({"duration": 7})));
    assert!(!conditions.matches_object(&json!({"duration": 10})));
    assert!(!conditions.matches_object(&json!({"duration": 4})));
}

#[test]
fn test_every_key_must_hold() {
    let conditions = set(json!({"quality": {"$gte": 8}, "style": "anime"}));
    assert!(conditions.matches_object(&json!({"quality": 9, "style": "anime"})));
    assert!(!conditions.matches_object(&json!({"quality": 9, "style": "photo"})));
}

#[test]
fn test_in_and_ne() {
    let conditions = set(json!({"ratio": {"$in": ["16:9", "9:16"]}}));
    assert!(conditions.matches_object(&json!({"ratio": "9:16"})));
    assert!(!conditions.matches_object(&json!({"ratio": "1:1"})));

    let conditions = set(json!({"model": {"$ne": "fast"}}));
    assert!(conditions.matches_object(&json!({"model": "pro"})));
    assert!(!conditions.matches_object(&json!({"model": "fast"})));
    // Absent fields are "not equal" to anything.
    assert!(conditions.matches_object(&json!({})));
}

#[test]
fn test_explicit_eq_operator() {
    let conditions = set(json!({"mode": {"$eq": {"nested": true}}}));
    assert!(conditions.matches_object(&json!({"mode": {"nested": true}})));
}

#[test]
fn test_object_without_operators_is_literal() {
    let conditions = set(json!({"size": {"width": 512}}));
    assert!(conditions.matches_object(&json!({"size": {"width": 512}})));
    assert!(!conditions.matches_object(&json!({"size": {"width": 1024}})));
}

#[test]
fn test_empty_set_always_holds() {
    let conditions = ConditionSet::new();
    assert!(conditions.is_empty());
    assert!(conditions.matches_object(&json!({"anything": 1})));
}

#[test]
fn test_unknown_operator_rejected_at_parse() {
    let err = ConditionSet::from_value(&json!({"quality": {"$between": [1, 2]}})).unwrap_err();
    assert!(matches!(err, DefinitionError::UnknownOperator { .. }));
}

#[test]
fn test_non_numeric_operand_rejected() {
    let err = ConditionSet::from_value(&json!({"quality": {"$gt": "high"}})).unwrap_err();
    assert!(matches!(err, DefinitionError::InvalidOperand { .. }));
}

#[test]
fn test_in_requires_array() {
    let err = ConditionSet::from_value(&json!({"ratio": {"$in": "16:9"}})).unwrap_err();
    assert!(matches!(err, DefinitionError::InvalidOperand { .. }));
}

#[test]
fn test_deserialize_and_serialize_map_form() {
    let conditions: ConditionSet =
        serde_json::from_value(json!({"quality": {"$gte": 8}, "style": "anime"})).unwrap();
    assert_eq!(conditions.len(), 2);

    let back = serde_json::to_value(&conditions).unwrap();
    assert_eq!(back, json!({"quality": {"$gte": 8}, "style": "anime"}));
}

#[test]
fn test_deserialize_rejects_malformed() {
    let result: Result<ConditionSet, _> = serde_json::from_value(json!({"q": {"$near": 1}}));
    assert!(result.is_err());
}

#[test]
fn test_builder() {
    let conditions = ConditionSet::new()
        .with("quality", Condition::Gte(8.0))
        .with("style", Condition::Eq(json!("anime")));
    assert!(conditions.matches_object(&json!({"quality": 8, "style": "anime"})));
}

#[test]
fn test_coerce_number() {
    assert_eq!(coerce_number(&json!(3)), Some(3.0));
    assert_eq!(coerce_number(&json!(" 2.5 ")), Some(2.5));
    assert_eq!(coerce_number(&json!("")), Some(0.0));
    assert_eq!(coerce_number(&json!(true)), Some(1.0));
    assert_eq!(coerce_number(&Value::Null), Some(0.0));
    assert_eq!(coerce_number(&json!("abc")), None);
    assert_eq!(coerce_number(&json!([1])), None);
}
