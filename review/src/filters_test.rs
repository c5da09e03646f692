use logs::metadata::{NO_TARGET, UNCATEGORIZED};

use super::*;
use crate::test_support::metadata;

#[test]
fn allow_all_opens_every_checklist_except_tags() {
    let filters = LogFilters::allow_all(&metadata());
    assert!(filters.date.is_none());
    assert!(filters.context.all_checked());
    assert!(filters.context.get(&[UNCATEGORIZED]).is_some());
    assert!(filters.context.get(&["Quiz", "Attempt"]).is_some());
    assert!(filters.tags.values().all(|selected| !selected));
    assert_eq!(filters.tags.len(), 3);
    assert_eq!(filters.action_error.target.get(NO_TARGET), Some(&true));
    assert!(filters.action_error.action.values().all(|checked| *checked));
    assert!(filters.advanced.include_learners && filters.advanced.include_admins);
}

#[test]
fn initial_covers_month_to_date() {
    let today = DateParts::new(2024, 3, 17);
    let filters = LogFilters::initial(&metadata(), today);
    assert_eq!(filters.date, Some(DateRange::new(DateParts::new(2024, 3, 1), today)));
}

#[test]
fn date_range_validation() {
    let jan = |day| DateParts::new(2024, 1, day);
    assert_eq!(DateRange::new(jan(1), jan(31)).validate(), Ok(()));
    assert_eq!(DateRange::new(jan(5), jan(5)).validate(), Ok(()));
    assert_eq!(DateRange::new(jan(9), jan(2)).validate(), Err(FilterError::StartAfterEnd));
    let bad = DateParts::new(2023, 2, 29);
    assert_eq!(DateRange::new(bad, jan(2)).validate(), Err(FilterError::InvalidDate(bad)));
}

#[test]
fn json_form_survives_the_query_string() {
    let mut filters = LogFilters::initial(&metadata(), DateParts::new(2024, 1, 20));
    filters.tags.insert("graded".to_owned(), true);
    filters.action_error.log_type = Some(LogType::Error);
    filters.advanced.source = Some(LogSource::Server);
    filters.context = filters.context.with_checked(&["Quiz", "Review"], false);

    let parsed = LogFilters::from_json(&filters.to_json()).expect("parse");
    assert_eq!(parsed, filters);
}

#[test]
fn partial_json_fills_defaults() {
    let parsed = LogFilters::from_json(r#"{"advanced": {"userEmail": "grace"}}"#).expect("parse");
    assert_eq!(parsed.advanced.user_email, "grace");
    assert!(parsed.advanced.include_ttms);
    assert!(parsed.date.is_none());
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(LogFilters::from_json("{not json"), Err(FilterError::Malformed(_))));
    let inverted = r#"{"date": {"start": {"year": 2024, "month": 2, "day": 1}, "end": {"year": 2024, "month": 1, "day": 1}}}"#;
    assert_eq!(LogFilters::from_json(inverted), Err(FilterError::StartAfterEnd));
}

#[test]
fn parsed_values_are_validated_too() {
    let value = serde_json::json!({"tags": {"timed": true}});
    let filters = LogFilters::from_value(value).expect("parse");
    assert_eq!(filters.tags.get("timed"), Some(&true));
    assert!(matches!(LogFilters::from_value(serde_json::json!([1, 2])), Err(FilterError::Malformed(_))));
}
