//! HTTP wire types shared by the server and its clients.
//!
//! Every response is an [`Envelope`]: `{ success: true, body }` or
//! `{ success: false, message, code }`. Codes are stable strings so callers
//! can branch on them (session expiry in particular) without parsing text.

use serde::{Deserialize, Serialize};

use crate::Log;

/// Stable error codes carried in failure envelopes.
pub mod codes {
    /// No response body at all; set client-side.
    pub const NETWORK_FAILURE: &str = "NETWORK_FAILURE";
    /// Failure envelope arrived without a code.
    pub const NO_CODE: &str = "NO_CODE";
    pub const SESSION_EXPIRED: &str = "SESSION_EXPIRED";
    pub const MISSING_PARAMETER: &str = "MISSING_PARAMETER";
    pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
    pub const STORE_FAILURE: &str = "STORE_FAILURE";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

/// Server-reported failure extracted from an envelope.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct Failure {
    pub message: String,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(body: T) -> Self {
        Self { success: true, body: Some(body), message: None, code: None }
    }

    pub fn failure(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            body: None,
            message: Some(message.into()),
            code: Some(code.into()),
        }
    }

    /// Unwrap the body or convert the envelope into a [`Failure`].
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] when `success` is false or a successful envelope
    /// carries no body.
    pub fn into_result(self) -> Result<T, Failure> {
        match (self.success, self.body) {
            (true, Some(body)) => Ok(body),
            (true, None) => Err(Failure {
                message: "response body missing".to_owned(),
                code: codes::NO_CODE.to_owned(),
            }),
            (false, _) => Err(Failure {
                message: self
                    .message
                    .unwrap_or_else(|| "an unknown error occurred".to_owned()),
                code: self.code.unwrap_or_else(|| codes::NO_CODE.to_owned()),
            }),
        }
    }
}

/// One page of log records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    pub items: Vec<Log>,
    pub has_another_page: bool,
    /// Present only when the request asked for a document count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pages: Option<u32>,
}

/// Query string of a log page request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub page_number: u32,
    /// JSON-encoded filter state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_documents: Option<bool>,
}

/// Which slice of the log collection a request targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogScope {
    #[default]
    All,
    Month { year: i32, month: u32 },
}

impl LogScope {
    /// Request path relative to the route prefix.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::All => "/logs".to_owned(),
            Self::Month { year, month } => format!("/logs/years/{year}/months/{month}"),
        }
    }

    #[must_use]
    pub fn contains(self, log: &Log) -> bool {
        match self {
            Self::All => true,
            Self::Month { year, month } => log.year == year && log.month == month,
        }
    }
}
