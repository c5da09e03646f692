use super::*;
use serde_json::json;

fn requester() -> Requester {
    Requester {
        user_id: 12345,
        user_first_name: "Ada".to_owned(),
        user_last_name: "Lovelace".to_owned(),
        user_email: "ada@example.edu".to_owned(),
        is_learner: true,
        is_ttm: false,
        is_admin: false,
        course_id: 777,
        course_name: "Analytical Engines".to_owned(),
        device: DeviceInfo { description: "Firefox on Linux".to_owned(), is_mobile: false },
        source: LogSource::Client,
        route_path: None,
        route_template: None,
    }
}

fn action_log() -> Log {
    Log::new(
        "log-1",
        1_705_339_800_000,
        "Quiz",
        LogKind::Action { action: "Open".to_owned(), target: Some("QuizPanel".to_owned()) },
        requester(),
    )
    .expect("valid timestamp")
    .with_subcontext("Attempt")
    .with_tags(["graded", "timed"])
}

#[test]
fn new_derives_eastern_time_fields() {
    let log = action_log();
    assert_eq!(log.date(), DateParts::new(2024, 1, 15));
    assert_eq!((log.hour, log.minute), (12, 30));
    assert_eq!(log.level, LogLevel::Info);
    assert_eq!(log.log_type(), LogType::Action);
}

#[test]
fn action_log_serializes_flat_camel_case() {
    let value = serde_json::to_value(action_log()).expect("serialize");
    assert_eq!(value["type"], "action");
    assert_eq!(value["action"], "Open");
    assert_eq!(value["target"], "QuizPanel");
    assert_eq!(value["userFirstName"], "Ada");
    assert_eq!(value["isTTM"], false);
    assert_eq!(value["device"]["isMobile"], false);
    assert_eq!(value["source"], "client");
    assert_eq!(value["tags"], json!(["graded", "timed"]));
    assert!(value.get("routePath").is_none());
}

#[test]
fn error_log_deserializes_from_wire_shape() {
    let raw = json!({
        "id": "e-1",
        "timestamp": 1_720_109_100_000_i64,
        "year": 2024, "month": 7, "day": 4, "hour": 12, "minute": 5,
        "context": "ServerEndpoint",
        "tags": [],
        "level": "error",
        "type": "error",
        "errorMessage": "Database unavailable",
        "errorCode": "DB42",
        "errorStack": "at query()",
        "userId": 9,
        "isAdmin": true,
        "courseId": 55,
        "source": "server",
        "routePath": "/api/courses/55",
        "routeTemplate": "/api/courses/:id"
    });
    let log: Log = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(log.log_type(), LogType::Error);
    assert_eq!(log.level, LogLevel::Error);
    assert!(log.requester.is_admin);
    assert!(!log.requester.is_ttm);
    assert_eq!(log.requester.route_template.as_deref(), Some("/api/courses/:id"));
    match log.kind {
        LogKind::Error { error_code, .. } => assert_eq!(error_code, "DB42"),
        LogKind::Action { .. } => panic!("expected error log"),
    }
}

#[test]
fn log_survives_json_round_trip() {
    let log = action_log().with_metadata(json!({"attempt": 2}));
    let text = serde_json::to_string(&log).expect("serialize");
    let back: Log = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(back, log);
}

#[test]
fn envelope_ok_unwraps_body() {
    let env = Envelope::ok(5_u32);
    assert_eq!(env.into_result(), Ok(5));
}

#[test]
fn envelope_failure_carries_message_and_code() {
    let env: Envelope<u32> = Envelope::failure("nope", wire::codes::SESSION_EXPIRED);
    let err = env.into_result().expect_err("failure");
    assert_eq!(err.code, "SESSION_EXPIRED");
    assert_eq!(err.message, "nope");
}

#[test]
fn envelope_failure_without_code_gets_placeholder() {
    let env: Envelope<u32> = serde_json::from_value(json!({"success": false})).expect("parse");
    let err = env.into_result().expect_err("failure");
    assert_eq!(err.code, wire::codes::NO_CODE);
}

#[test]
fn envelope_serializes_without_empty_fields() {
    let value = serde_json::to_value(Envelope::ok(json!({"a": 1}))).expect("serialize");
    assert_eq!(value, json!({"success": true, "body": {"a": 1}}));
}

#[test]
fn log_page_omits_num_pages_unless_counted() {
    let page = LogPage { items: Vec::new(), has_another_page: true, num_pages: None };
    let value = serde_json::to_value(&page).expect("serialize");
    assert_eq!(value, json!({"items": [], "hasAnotherPage": true}));
}

#[test]
fn scope_paths_and_membership() {
    assert_eq!(LogScope::All.path(), "/logs");
    let scope = LogScope::Month { year: 2024, month: 1 };
    assert_eq!(scope.path(), "/logs/years/2024/months/1");
    assert!(scope.contains(&action_log()));
    assert!(!LogScope::Month { year: 2024, month: 2 }.contains(&action_log()));
}

#[test]
fn metadata_merges_built_ins() {
    let meta = LogMetadata::from_json(
        r#"{"contexts":[{"name":"Quiz","subcontexts":["Attempt","Review"]}],"tags":["graded","graded"],"targets":["QuizPanel"]}"#,
    )
    .expect("parse");
    let names = meta.all_contexts().into_iter().map(|c| c.name).collect::<Vec<_>>();
    assert_eq!(names, vec!["Quiz", metadata::UNCATEGORIZED, metadata::SERVER_ENDPOINT]);
    assert_eq!(meta.all_tags(), vec!["graded"]);
    assert_eq!(meta.all_targets(), vec!["QuizPanel", metadata::NO_TARGET]);
    assert!(meta.all_actions().iter().any(|a| a == "Open"));
}
