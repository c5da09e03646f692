//! User-facing error surface owned by a dashboard.
//!
//! Three slots, each independent: a dismissable alert for input the user can
//! correct, a fatal error for failed fetches, and a session flag that stays
//! set once the server reports the session as gone.

/// Blocking message about input the user can fix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub text: String,
}

/// Failure the dashboard cannot recover from on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FatalError {
    pub message: String,
    pub code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notices {
    alert: Option<Alert>,
    fatal: Option<FatalError>,
    session_expired: bool,
}

impl Notices {
    pub fn show_alert(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.alert = Some(Alert { title: title.into(), text: text.into() });
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn show_fatal(&mut self, message: impl Into<String>, code: impl Into<String>) {
        self.fatal = Some(FatalError { message: message.into(), code: code.into() });
    }

    pub fn dismiss_fatal(&mut self) {
        self.fatal = None;
    }

    /// Sticky: there is no way back short of a new dashboard.
    pub fn expire_session(&mut self) {
        self.session_expired = true;
    }

    #[must_use]
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    #[must_use]
    pub fn fatal(&self) -> Option<&FatalError> {
        self.fatal.as_ref()
    }

    #[must_use]
    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    /// True when no further fetches may be issued.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.session_expired
    }
}

#[cfg(test)]
#[path = "notices_test.rs"]
mod tests;
