//! Caller-supplied declaration of the contexts, tags, targets and actions a
//! dashboard should offer as filters.
//!
//! Built-in entries are merged in so that records written by the logging
//! subsystem itself (uncategorized events, server endpoint events) are always
//! filterable even when the caller never declares them.

use serde::{Deserialize, Serialize};

/// Context for records that were not given one.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Context for records produced by server endpoints.
pub const SERVER_ENDPOINT: &str = "ServerEndpoint";
/// Target for actions that have no meaningful target.
pub const NO_TARGET: &str = "NoTarget";

/// Action vocabulary every dashboard knows about.
pub const BUILT_IN_ACTIONS: &[&str] = &[
    "Open", "Close", "Cancel", "Expand", "Collapse", "Remove", "Add", "Edit", "View",
    "Interrupt", "Resume", "Start", "End", "Pause", "Unpause", "Receive", "Send", "Click",
    "Submit", "Upload", "Download",
];

/// A top-level context, optionally split into subcontexts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDecl {
    pub name: String,
    #[serde(default)]
    pub subcontexts: Vec<String>,
}

impl ContextDecl {
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self { name: name.into(), subcontexts: Vec::new() }
    }

    #[must_use]
    pub fn group<I, S>(name: impl Into<String>, subcontexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            subcontexts: subcontexts.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMetadata {
    #[serde(default)]
    pub contexts: Vec<ContextDecl>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    /// Extra actions on top of [`BUILT_IN_ACTIONS`].
    #[serde(default)]
    pub actions: Vec<String>,
}

impl LogMetadata {
    /// Parse a metadata declaration from JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Declared contexts followed by any built-in context not already declared.
    #[must_use]
    pub fn all_contexts(&self) -> Vec<ContextDecl> {
        let mut out = self.contexts.clone();
        for built_in in [UNCATEGORIZED, SERVER_ENDPOINT] {
            if !out.iter().any(|c| c.name == built_in) {
                out.push(ContextDecl::leaf(built_in));
            }
        }
        out
    }

    #[must_use]
    pub fn all_tags(&self) -> Vec<String> {
        dedup(self.tags.iter().cloned())
    }

    #[must_use]
    pub fn all_targets(&self) -> Vec<String> {
        dedup(self.targets.iter().cloned().chain([NO_TARGET.to_owned()]))
    }

    #[must_use]
    pub fn all_actions(&self) -> Vec<String> {
        dedup(
            BUILT_IN_ACTIONS
                .iter()
                .map(|a| (*a).to_owned())
                .chain(self.actions.iter().cloned()),
        )
    }
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out = Vec::<String>::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
