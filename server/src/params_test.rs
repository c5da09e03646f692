use serde_json::json;

use super::*;

fn raw(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[test]
fn required_fields_must_be_present() {
    let schema = [("pageNumber", ParamType::Int)];
    for input in [json!({}), json!({"pageNumber": null}), json!({"pageNumber": ""})] {
        let err = coerce_params(&raw(input), &schema).unwrap_err();
        assert_eq!(err, ParamError::Missing("pageNumber".into()));
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
    }
}

#[test]
fn optional_fields_may_be_absent() {
    let schema = [("filters", ParamType::JsonOptional), ("countDocuments", ParamType::BooleanOptional)];
    let params = coerce_params(&raw(json!({"countDocuments": ""})), &schema).unwrap();
    assert!(params.get("filters").is_none());
    assert!(params.bool("countDocuments").is_none());
}

#[test]
fn query_strings_coerce_to_typed_values() {
    let query = HashMap::from([
        ("pageNumber".to_owned(), "3".to_owned()),
        ("countDocuments".to_owned(), "true".to_owned()),
        ("ratio".to_owned(), "0.25".to_owned()),
        ("filters".to_owned(), r#"{"tags":{"graded":true}}"#.to_owned()),
        ("name".to_owned(), "quiz".to_owned()),
    ]);
    let schema = [
        ("pageNumber", ParamType::Int),
        ("countDocuments", ParamType::Boolean),
        ("ratio", ParamType::Float),
        ("filters", ParamType::Json),
        ("name", ParamType::String),
    ];
    let params = coerce_params(&from_query(query), &schema).unwrap();
    assert_eq!(params.int("pageNumber"), Some(3));
    assert_eq!(params.bool("countDocuments"), Some(true));
    assert_eq!(params.float("ratio"), Some(0.25));
    assert_eq!(params.json("filters"), Some(&json!({"tags": {"graded": true}})));
    assert_eq!(params.str("name"), Some("quiz"));
}

#[test]
fn json_bodies_keep_native_types() {
    let schema = [
        ("pageNumber", ParamType::Int),
        ("countDocuments", ParamType::Boolean),
        ("filters", ParamType::Json),
        ("label", ParamType::String),
    ];
    let params = coerce_params(
        &raw(json!({"pageNumber": 2, "countDocuments": false, "filters": {"date": null}, "label": 7})),
        &schema,
    )
    .unwrap();
    assert_eq!(params.int("pageNumber"), Some(2));
    assert_eq!(params.bool("countDocuments"), Some(false));
    assert_eq!(params.json("filters"), Some(&json!({"date": null})));
    assert_eq!(params.str("label"), Some("7"));
}

#[test]
fn wrong_shapes_are_invalid() {
    let cases = [
        (json!({"v": "yes"}), ParamType::Boolean, "boolean"),
        (json!({"v": "1.5"}), ParamType::Int, "integer"),
        (json!({"v": 1.5}), ParamType::IntOptional, "integer"),
        (json!({"v": "abc"}), ParamType::Float, "number"),
        (json!({"v": [1]}), ParamType::String, "string"),
        (json!({"v": "{oops"}), ParamType::Json, "JSON"),
    ];
    for (input, kind, expected) in cases {
        let err = coerce_params(&raw(input), &[("v", kind)]).unwrap_err();
        assert_eq!(err, ParamError::Invalid { name: "v".into(), expected });
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }
}

#[test]
fn unknown_fields_are_ignored() {
    let params = coerce_params(&raw(json!({"extra": 1, "n": "4"})), &[("n", ParamType::Int)]).unwrap();
    assert_eq!(params.int("n"), Some(4));
    assert!(params.get("extra").is_none());
}
