use super::*;

#[test]
fn alert_and_fatal_are_independent() {
    let mut notices = Notices::default();
    notices.show_alert("Invalid date range", "Start must not be after end.");
    notices.show_fatal("store down", "E_STORE");
    assert_eq!(notices.alert().map(|a| a.title.as_str()), Some("Invalid date range"));

    notices.dismiss_alert();
    assert!(notices.alert().is_none());
    assert_eq!(notices.fatal().map(|f| f.code.as_str()), Some("E_STORE"));

    notices.dismiss_fatal();
    assert_eq!(notices, Notices::default());
}

#[test]
fn later_alert_replaces_earlier() {
    let mut notices = Notices::default();
    notices.show_alert("first", "a");
    notices.show_alert("second", "b");
    assert_eq!(notices.alert(), Some(&Alert { title: "second".to_owned(), text: "b".to_owned() }));
}

#[test]
fn expired_session_stays_blocked() {
    let mut notices = Notices::default();
    assert!(!notices.is_blocked());
    notices.expire_session();
    notices.dismiss_fatal();
    notices.dismiss_alert();
    assert!(notices.session_expired());
    assert!(notices.is_blocked());
}
