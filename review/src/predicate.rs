//! Per-record inclusion check for [`LogFilters`].
//!
//! Clauses run in a fixed order and short-circuit on the first rejection:
//! date, context, tags, type, error sub-filter, action sub-filter, advanced.
//! A clause at its "allow all" position passes without inspecting the record.
//! The same predicate runs server-side (before paging) and client-side
//! (over the fetched page).

use std::collections::BTreeMap;

use logs::{Log, LogKind, LogSource};

use crate::filters::{ActionErrorFilter, AdvancedFilter, LogFilters};
use crate::tree::CheckTree;

impl LogFilters {
    #[must_use]
    pub fn allows(&self, log: &Log) -> bool {
        self.date.is_none_or(|range| range.contains(log.date()))
            && context_allows(&self.context, log)
            && tags_allow(&self.tags, log)
            && self.action_error.allows(log)
            && self.advanced.allows(log)
    }

    /// Records from `logs` that pass every clause, in input order.
    #[must_use]
    pub fn apply<'a>(&self, logs: &'a [Log]) -> Vec<&'a Log> {
        logs.iter().filter(|log| self.allows(log)).collect()
    }
}

fn context_allows(tree: &CheckTree, log: &Log) -> bool {
    if tree.all_checked() {
        return true;
    }
    let Some(node) = tree.get(&[log.context.as_str()]) else {
        return true;
    };
    match node {
        CheckTree::Leaf(checked) => *checked,
        CheckTree::Group(subcontexts) => {
            if !node.any_checked() {
                return false;
            }
            log.subcontext
                .as_deref()
                .and_then(|sub| subcontexts.get(sub))
                .is_none_or(CheckTree::any_checked)
        }
    }
}

fn tags_allow(tags: &BTreeMap<String, bool>, log: &Log) -> bool {
    if !tags.values().any(|selected| *selected) {
        return true;
    }
    log.tags.iter().any(|tag| tags.get(tag).copied().unwrap_or(false))
}

impl ActionErrorFilter {
    #[must_use]
    pub fn allows(&self, log: &Log) -> bool {
        if let Some(required) = self.log_type
            && log.log_type() != required
        {
            return false;
        }

        match &log.kind {
            LogKind::Error { error_message, error_code, .. } => {
                (self.error_message.is_empty() || contains_ignore_case(error_message, &self.error_message))
                    && (self.error_code.is_empty() || starts_with_ignore_case(error_code, &self.error_code))
            }
            LogKind::Action { action, target } => {
                checklist_allows(&self.action, action)
                    && target
                        .as_deref()
                        .is_none_or(|target| checklist_allows(&self.target, target))
            }
        }
    }
}

impl AdvancedFilter {
    #[must_use]
    pub fn allows(&self, log: &Log) -> bool {
        let r = &log.requester;

        let text_matches = [
            (&self.user_first_name, &r.user_first_name),
            (&self.user_last_name, &r.user_last_name),
            (&self.user_email, &r.user_email),
        ]
        .into_iter()
        .all(|(query, value)| query.trim().is_empty() || contains_ignore_case(value, query.trim()));
        if !text_matches {
            return false;
        }

        if !digits_match(&self.user_id, r.user_id) || !digits_match(&self.course_id, r.course_id) {
            return false;
        }

        if (r.is_learner && !self.include_learners)
            || (r.is_ttm && !self.include_ttms)
            || (r.is_admin && !self.include_admins)
        {
            return false;
        }

        if self.is_mobile.is_some_and(|mobile| mobile != r.device.is_mobile) {
            return false;
        }
        if self.source.is_some_and(|source| source != r.source) {
            return false;
        }

        if r.source == LogSource::Server {
            let path_ok = self.route_path.is_empty()
                || r.route_path
                    .as_deref()
                    .is_some_and(|path| contains_ignore_case(path, &self.route_path));
            let template_ok = self.route_template.is_empty()
                || r.route_template
                    .as_deref()
                    .is_some_and(|template| contains_ignore_case(template, &self.route_template));
            if !path_ok || !template_ok {
                return false;
            }
        }

        true
    }
}

fn checklist_allows(list: &BTreeMap<String, bool>, value: &str) -> bool {
    list.get(value).copied().unwrap_or(true)
}

fn digits_match(query: &str, value: u64) -> bool {
    let query = query.trim();
    query.is_empty() || value.to_string().contains(query)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

#[cfg(test)]
#[path = "predicate_test.rs"]
mod tests;
