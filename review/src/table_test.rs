use serde_json::{Value, json};

use super::*;

fn columns() -> Vec<Column> {
    vec![
        Column::new("Name", "name", ColumnType::String),
        Column::new("Is Admin", "isAdmin", ColumnType::Boolean),
        Column::new("Score", "score", ColumnType::Float),
        Column::new("Tags", "tags", ColumnType::Json),
        Column::new("Mobile", "device.isMobile", ColumnType::Boolean).hidden(),
    ]
}

fn ids(rows: &[Value]) -> Vec<&str> {
    rows.iter().filter_map(|r| r["id"].as_str()).collect()
}

fn sorted_by(rows: &[Value], param: &str, clicks: usize) -> Vec<Value> {
    let mut sort = SortState::default();
    for _ in 0..clicks {
        sort.click(param);
    }
    sort_rows(rows, &columns(), &sort)
}

#[test]
fn value_at_follows_dot_paths_and_treats_null_as_absent() {
    let row = json!({"device": {"isMobile": true}, "gone": null});
    assert_eq!(value_at(&row, "device.isMobile"), Some(&json!(true)));
    assert_eq!(value_at(&row, "device.missing"), None);
    assert_eq!(value_at(&row, "gone"), None);
}

#[test]
fn sort_header_cycles_through_three_states() {
    let mut sort = SortState::default();
    sort.click("name");
    assert_eq!(sort.key().map(|k| k.direction), Some(SortDirection::Ascending));
    sort.click("name");
    assert_eq!(sort.key().map(|k| k.direction), Some(SortDirection::Descending));
    sort.click("name");
    assert!(sort.key().is_none());
}

#[test]
fn clicking_other_column_restarts_ascending() {
    let mut sort = SortState::default();
    sort.click("name");
    sort.click("name");
    sort.click("score");
    let key = sort.key().expect("sorted");
    assert_eq!(key.param, "score");
    assert_eq!(key.direction, SortDirection::Ascending);
}

#[test]
fn three_clicks_restore_original_order() {
    let rows = vec![
        json!({"id": "b", "name": "beta", "timestamp": 1}),
        json!({"id": "a", "name": "alpha", "timestamp": 2}),
        json!({"id": "c", "name": "gamma", "timestamp": 3}),
    ];
    assert_eq!(ids(&sorted_by(&rows, "name", 1)), vec!["a", "b", "c"]);
    assert_eq!(ids(&sorted_by(&rows, "name", 2)), vec!["c", "b", "a"]);
    assert_eq!(ids(&sorted_by(&rows, "name", 3)), vec!["b", "a", "c"]);
}

#[test]
fn boolean_descending_puts_true_first_and_missing_last() {
    let rows = vec![
        json!({"id": "f1", "isAdmin": false, "timestamp": 10}),
        json!({"id": "m", "timestamp": 50}),
        json!({"id": "t1", "isAdmin": true, "timestamp": 20}),
        json!({"id": "f2", "isAdmin": false, "timestamp": 30}),
        json!({"id": "t2", "isAdmin": true, "timestamp": 40}),
    ];
    assert_eq!(ids(&sorted_by(&rows, "isAdmin", 2)), vec!["t2", "t1", "f2", "f1", "m"]);
    assert_eq!(ids(&sorted_by(&rows, "isAdmin", 1)), vec!["f2", "f1", "t2", "t1", "m"]);
}

#[test]
fn missing_values_sort_last_in_both_directions() {
    let rows = vec![
        json!({"id": "none", "timestamp": 1}),
        json!({"id": "low", "score": 1.5, "timestamp": 2}),
        json!({"id": "high", "score": 9.0, "timestamp": 3}),
    ];
    assert_eq!(ids(&sorted_by(&rows, "score", 1)), vec!["low", "high", "none"]);
    assert_eq!(ids(&sorted_by(&rows, "score", 2)), vec!["high", "low", "none"]);
}

#[test]
fn ties_fall_back_to_newest_first() {
    let rows = vec![
        json!({"id": "old", "name": "same", "timestamp": 100}),
        json!({"id": "new", "name": "same", "timestamp": 300}),
        json!({"id": "mid", "name": "same", "timestamp": 200}),
    ];
    assert_eq!(ids(&sorted_by(&rows, "name", 1)), vec!["new", "mid", "old"]);
    assert_eq!(ids(&sorted_by(&rows, "name", 2)), vec!["new", "mid", "old"]);
}

#[test]
fn full_ties_compare_equal_and_keep_input_order() {
    let column = Column::new("Name", "name", ColumnType::String);
    let a = json!({"id": "first", "name": "x", "timestamp": 5});
    let b = json!({"id": "second", "name": "x", "timestamp": 5});
    assert_eq!(compare_rows(&a, &b, &column, SortDirection::Ascending), Ordering::Equal);
    assert_eq!(ids(&sorted_by(&[a, b], "name", 1)), vec!["first", "second"]);
}

#[test]
fn json_columns_compare_by_size() {
    let rows = vec![
        json!({"id": "three", "tags": ["a", "b", "c"], "timestamp": 1}),
        json!({"id": "one", "tags": ["zzz"], "timestamp": 2}),
        json!({"id": "two", "tags": {"k": 1, "j": 2}, "timestamp": 3}),
    ];
    assert_eq!(ids(&sorted_by(&rows, "tags", 1)), vec!["one", "two", "three"]);
}

#[test]
fn sorting_is_idempotent() {
    let rows = vec![
        json!({"id": "1", "score": 3, "timestamp": 4}),
        json!({"id": "2", "score": 1, "timestamp": 9}),
        json!({"id": "3", "timestamp": 1}),
        json!({"id": "4", "score": 3, "timestamp": 7}),
        json!({"id": "5", "score": 2, "timestamp": 7}),
    ];
    for clicks in 1..=2 {
        let once = sorted_by(&rows, "score", clicks);
        let twice = sorted_by(&once, "score", clicks);
        assert_eq!(once, twice);
    }
}

#[test]
fn visibility_follows_schema_and_toggles() {
    let columns = columns();
    let mut visibility = ColumnVisibility::new(&columns);
    assert!(!visibility.is_visible("device.isMobile"));
    assert_eq!(visibility.visible(&columns).len(), 4);

    visibility.toggle("name");
    visibility.toggle("device.isMobile");
    let titles = visibility.visible(&columns).into_iter().map(|c| c.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["Is Admin", "Score", "Tags", "Mobile"]);
}

#[test]
fn column_schema_parses_from_json() {
    let column: Column =
        serde_json::from_value(json!({"title": "Tags", "param": "tags", "type": "JSON", "startsHidden": true}))
            .expect("parse");
    assert_eq!(column.kind, ColumnType::Json);
    assert!(column.starts_hidden);
}
