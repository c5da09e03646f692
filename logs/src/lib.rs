//! Shared log record model for the log review dashboard.
//!
//! This crate owns the JSON representation used by both `server` and `cli`.
//! Records are read-only from the dashboard's point of view: the logging
//! subsystem that writes them lives elsewhere, so the constructors here exist
//! for seeding stores and for tests.

pub mod metadata;
pub mod time;
pub mod wire;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use metadata::{ContextDecl, LogMetadata};
pub use time::{DateParts, TimeError, TimeInfo};
pub use wire::{Envelope, Failure, LogPage, LogQuery, LogScope};

/// Severity attached to a log record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

/// Which side of the application produced the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Client,
    Server,
}

/// Discriminant of [`LogKind`], used where only the type matters (filters).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Action,
    Error,
}

/// Type-specific payload of a record. Flattened into the record on the wire
/// with a `type` tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogKind {
    Action {
        action: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        error_message: String,
        #[serde(default)]
        error_code: String,
        #[serde(default)]
        error_stack: String,
    },
}

impl LogKind {
    #[must_use]
    pub fn log_type(&self) -> LogType {
        match self {
            Self::Action { .. } => LogType::Action,
            Self::Error { .. } => LogType::Error,
        }
    }
}

/// Device the request came from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Human readable browser/OS description.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_mobile: bool,
}

/// Who made the request that produced a record, and from where.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub user_id: u64,
    #[serde(default)]
    pub user_first_name: String,
    #[serde(default)]
    pub user_last_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub is_learner: bool,
    #[serde(default, rename = "isTTM")]
    pub is_ttm: bool,
    #[serde(default)]
    pub is_admin: bool,
    pub course_id: u64,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub device: DeviceInfo,
    pub source: LogSource,
    /// Concrete request path. Server records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_path: Option<String>,
    /// Route pattern the path matched. Server records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_template: Option<String>,
}

/// A single immutable log event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Eastern-Time decomposition of `timestamp`.
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcontext: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(flatten)]
    pub kind: LogKind,
    #[serde(flatten)]
    pub requester: Requester,
}

impl Log {
    /// Build a record, deriving the Eastern-Time fields from `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::OutOfRange`] when `timestamp` cannot be
    /// represented as a calendar date.
    pub fn new(
        id: impl Into<String>,
        timestamp: i64,
        context: impl Into<String>,
        kind: LogKind,
        requester: Requester,
    ) -> Result<Self, TimeError> {
        let info = time::time_info_in_et(timestamp)?;
        Ok(Self {
            id: id.into(),
            timestamp,
            year: info.year,
            month: info.month,
            day: info.day,
            hour: info.hour,
            minute: info.minute,
            context: context.into(),
            subcontext: None,
            tags: Vec::new(),
            level: LogLevel::default(),
            metadata: None,
            kind,
            requester,
        })
    }

    #[must_use]
    pub fn with_subcontext(mut self, subcontext: impl Into<String>) -> Self {
        self.subcontext = Some(subcontext.into());
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[must_use]
    pub fn log_type(&self) -> LogType {
        self.kind.log_type()
    }

    /// Calendar date of the record in Eastern Time.
    #[must_use]
    pub fn date(&self) -> DateParts {
        DateParts::new(self.year, self.month, self.day)
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
