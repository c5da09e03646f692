//! Filter state for the log review dashboard.
//!
//! DESIGN
//! ======
//! The state is five independent sub-filters combined with AND. Each one has
//! an "allow all" position; [`LogFilters::allow_all`] puts every sub-filter
//! there, while [`LogFilters::initial`] is what a freshly opened dashboard
//! starts from (current month to date, everything else open).
//!
//! The whole value is plain owned data: `Clone` is a deep copy and the JSON
//! form is what the server receives as the `filters` query parameter.

use std::collections::BTreeMap;

use logs::{ContextDecl, DateParts, LogMetadata, LogSource, LogType};
use serde::{Deserialize, Serialize};

use crate::tree::CheckTree;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("{0:?} is not a valid calendar date")]
    InvalidDate(DateParts),
    #[error("start date must not be after end date")]
    StartAfterEnd,
    #[error("malformed filter state: {0}")]
    Malformed(String),
}

/// Inclusive calendar range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateParts,
    pub end: DateParts,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: DateParts, end: DateParts) -> Self {
        Self { start, end }
    }

    /// Reject impossible dates and inverted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDate`] or [`FilterError::StartAfterEnd`].
    pub fn validate(&self) -> Result<(), FilterError> {
        for date in [self.start, self.end] {
            if !date.is_valid() {
                return Err(FilterError::InvalidDate(date));
            }
        }
        if self.start > self.end {
            return Err(FilterError::StartAfterEnd);
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, date: DateParts) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Type restriction plus the action- and error-specific checks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionErrorFilter {
    /// `None` allows both types.
    #[serde(default)]
    pub log_type: Option<LogType>,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub error_code: String,
    /// Action checklist. Actions missing from the map are allowed.
    #[serde(default)]
    pub action: BTreeMap<String, bool>,
    /// Target checklist. Targets missing from the map are allowed.
    #[serde(default)]
    pub target: BTreeMap<String, bool>,
}

/// Requester-oriented filters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedFilter {
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
    /// Digits matched as a substring of the decimal user id.
    pub user_id: String,
    pub course_id: String,
    pub include_learners: bool,
    #[serde(rename = "includeTTMs")]
    pub include_ttms: bool,
    pub include_admins: bool,
    /// `Some(true)` keeps mobile devices only, `Some(false)` desktop only.
    pub is_mobile: Option<bool>,
    pub source: Option<LogSource>,
    pub route_path: String,
    pub route_template: String,
}

impl Default for AdvancedFilter {
    fn default() -> Self {
        Self {
            user_first_name: String::new(),
            user_last_name: String::new(),
            user_email: String::new(),
            user_id: String::new(),
            course_id: String::new(),
            include_learners: true,
            include_ttms: true,
            include_admins: true,
            is_mobile: None,
            source: None,
            route_path: String::new(),
            route_template: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilters {
    /// `None` means no date restriction.
    #[serde(default)]
    pub date: Option<DateRange>,
    #[serde(default)]
    pub context: CheckTree,
    /// Tag checklist; OR semantics, nothing selected means no restriction.
    #[serde(default)]
    pub tags: BTreeMap<String, bool>,
    #[serde(default)]
    pub action_error: ActionErrorFilter,
    #[serde(default)]
    pub advanced: AdvancedFilter,
}

impl LogFilters {
    /// Every sub-filter at its "allow all" position, seeded from `metadata`.
    #[must_use]
    pub fn allow_all(metadata: &LogMetadata) -> Self {
        Self {
            date: None,
            context: context_tree(&metadata.all_contexts()),
            tags: checklist(metadata.all_tags(), false),
            action_error: ActionErrorFilter {
                log_type: None,
                error_message: String::new(),
                error_code: String::new(),
                action: checklist(metadata.all_actions(), true),
                target: checklist(metadata.all_targets(), true),
            },
            advanced: AdvancedFilter::default(),
        }
    }

    /// The state a dashboard opens with: the current month up to `today`.
    #[must_use]
    pub fn initial(metadata: &LogMetadata, today: DateParts) -> Self {
        Self {
            date: Some(DateRange::new(today.first_of_month(), today)),
            ..Self::allow_all(metadata)
        }
    }

    /// JSON form sent to the server.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Map keys are strings and no field has a fallible serializer.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse the JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Malformed`] for invalid JSON or shapes, and the
    /// date range validation errors when a range is present.
    pub fn from_json(raw: &str) -> Result<Self, FilterError> {
        serde_json::from_str::<Self>(raw)
            .map_err(|e| FilterError::Malformed(e.to_string()))?
            .validated()
    }

    /// Same as [`LogFilters::from_json`] for an already parsed value.
    ///
    /// # Errors
    ///
    /// See [`LogFilters::from_json`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, FilterError> {
        serde_json::from_value::<Self>(value)
            .map_err(|e| FilterError::Malformed(e.to_string()))?
            .validated()
    }

    fn validated(self) -> Result<Self, FilterError> {
        if let Some(range) = &self.date {
            range.validate()?;
        }
        Ok(self)
    }
}

/// Context picker tree: a leaf per plain context, a group per context with
/// subcontexts. Everything starts checked.
#[must_use]
pub fn context_tree(contexts: &[ContextDecl]) -> CheckTree {
    CheckTree::group(contexts.iter().map(|decl| {
        let node = if decl.subcontexts.is_empty() {
            CheckTree::Leaf(true)
        } else {
            CheckTree::group(decl.subcontexts.iter().map(|sub| (sub.clone(), CheckTree::Leaf(true))))
        };
        (decl.name.clone(), node)
    }))
}

fn checklist(items: Vec<String>, checked: bool) -> BTreeMap<String, bool> {
    items.into_iter().map(|item| (item, checked)).collect()
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
