//! Record builders shared by the unit tests.

use logs::{DeviceInfo, Log, LogKind, LogMetadata, LogSource, Requester, metadata::ContextDecl};

/// 2024-01-15 12:00 Eastern.
pub const JAN_15: i64 = 1_705_338_000_000;
/// 2024-02-01 12:00 Eastern.
pub const FEB_01: i64 = 1_706_806_800_000;

pub fn requester() -> Requester {
    Requester {
        user_id: 123_456,
        user_first_name: "Grace".to_owned(),
        user_last_name: "Hopper".to_owned(),
        user_email: "grace@example.edu".to_owned(),
        is_learner: true,
        is_ttm: false,
        is_admin: false,
        course_id: 98_765,
        course_name: "Compilers".to_owned(),
        device: DeviceInfo { description: "Safari on iOS".to_owned(), is_mobile: true },
        source: LogSource::Client,
        route_path: None,
        route_template: None,
    }
}

pub fn action(id: &str, timestamp: i64, context: &str, action: &str, target: Option<&str>) -> Log {
    Log::new(
        id,
        timestamp,
        context,
        LogKind::Action { action: action.to_owned(), target: target.map(str::to_owned) },
        requester(),
    )
    .expect("valid timestamp")
}

pub fn error(id: &str, timestamp: i64, message: &str, code: &str) -> Log {
    Log::new(
        id,
        timestamp,
        "ServerEndpoint",
        LogKind::Error {
            error_message: message.to_owned(),
            error_code: code.to_owned(),
            error_stack: String::new(),
        },
        requester(),
    )
    .expect("valid timestamp")
}

pub fn metadata() -> LogMetadata {
    LogMetadata {
        contexts: vec![
            ContextDecl::group("Quiz", ["Attempt", "Review"]),
            ContextDecl::leaf("Gradebook"),
        ],
        tags: vec!["graded".to_owned(), "timed".to_owned(), "practice".to_owned()],
        targets: vec!["QuizPanel".to_owned(), "Sidebar".to_owned()],
        actions: Vec::new(),
    }
}
