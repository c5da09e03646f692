//! Nested checkbox tree used by the context picker.
//!
//! A tree is either a checked/unchecked leaf or a group of named children.
//! Paths address nodes by name from the root, e.g. `["Quiz", "Attempt"]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckTree {
    Leaf(bool),
    Group(BTreeMap<String, CheckTree>),
}

impl Default for CheckTree {
    fn default() -> Self {
        Self::Group(BTreeMap::new())
    }
}

impl CheckTree {
    pub fn group<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, CheckTree)>,
        K: Into<String>,
    {
        Self::Group(children.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Fold over every leaf value, depth first.
    pub fn fold_leaves<B>(&self, init: B, f: &mut impl FnMut(B, bool) -> B) -> B {
        match self {
            Self::Leaf(checked) => f(init, *checked),
            Self::Group(children) => children
                .values()
                .fold(init, |acc, child| child.fold_leaves(acc, &mut *f)),
        }
    }

    /// Rebuild the tree with every leaf passed through `f`.
    #[must_use]
    pub fn map_leaves(&self, f: &impl Fn(bool) -> bool) -> Self {
        match self {
            Self::Leaf(checked) => Self::Leaf(f(*checked)),
            Self::Group(children) => Self::Group(
                children
                    .iter()
                    .map(|(k, v)| (k.clone(), v.map_leaves(f)))
                    .collect(),
            ),
        }
    }

    /// True when no leaf is unchecked. An empty group counts as checked.
    #[must_use]
    pub fn all_checked(&self) -> bool {
        self.fold_leaves(true, &mut |acc, checked| acc && checked)
    }

    #[must_use]
    pub fn any_checked(&self) -> bool {
        self.fold_leaves(false, &mut |acc, checked| acc || checked)
    }

    /// `(checked, total)` leaf counts.
    #[must_use]
    pub fn count(&self) -> (usize, usize) {
        self.fold_leaves((0, 0), &mut |(checked, total), leaf| {
            (checked + usize::from(leaf), total + 1)
        })
    }

    #[must_use]
    pub fn set_all(&self, checked: bool) -> Self {
        self.map_leaves(&|_| checked)
    }

    #[must_use]
    pub fn get(&self, path: &[&str]) -> Option<&CheckTree> {
        let Some((head, rest)) = path.split_first() else {
            return Some(self);
        };
        match self {
            Self::Leaf(_) => None,
            Self::Group(children) => children.get(*head)?.get(rest),
        }
    }

    #[must_use]
    pub fn children(&self) -> Option<&BTreeMap<String, CheckTree>> {
        match self {
            Self::Leaf(_) => None,
            Self::Group(children) => Some(children),
        }
    }

    /// Check or uncheck the node at `path` (and every leaf below it).
    /// Unknown paths leave the tree unchanged.
    #[must_use]
    pub fn with_checked(&self, path: &[&str], checked: bool) -> Self {
        let Some((head, rest)) = path.split_first() else {
            return self.set_all(checked);
        };
        match self {
            Self::Leaf(_) => self.clone(),
            Self::Group(children) => Self::Group(
                children
                    .iter()
                    .map(|(k, v)| {
                        let child = if k == head { v.with_checked(rest, checked) } else { v.clone() };
                        (k.clone(), child)
                    })
                    .collect(),
            ),
        }
    }

    /// Flip the node at `path`: a partially or fully checked node becomes
    /// fully unchecked, an unchecked one becomes fully checked.
    #[must_use]
    pub fn toggled(&self, path: &[&str]) -> Self {
        match self.get(path) {
            Some(node) => self.with_checked(path, !node.any_checked()),
            None => self.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tests;
