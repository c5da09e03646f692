//! Generic sortable table over JSON rows.
//!
//! DESIGN
//! ======
//! Rows are `serde_json::Value`s so one column schema (dot paths into the
//! record) drives rendering, sorting and CSV export for any serializable row
//! type. Sorting is stable: ties fall back to descending `timestamp`, and rows
//! equal on both keys keep their input order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row field used as the secondary sort key.
pub const TIMESTAMP_PARAM: &str = "timestamp";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Boolean,
    Int,
    Float,
    String,
    #[serde(rename = "JSON")]
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Display title, also the CSV header.
    pub title: String,
    /// Dot path into the row, e.g. `device.isMobile`.
    pub param: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    #[serde(default)]
    pub starts_hidden: bool,
}

impl Column {
    pub fn new(title: impl Into<String>, param: impl Into<String>, kind: ColumnType) -> Self {
        Self { title: title.into(), param: param.into(), kind, starts_hidden: false }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.starts_hidden = true;
        self
    }
}

/// Resolve a dot path. `null` counts as absent.
#[must_use]
pub fn value_at<'a>(row: &'a Value, param: &str) -> Option<&'a Value> {
    param
        .split('.')
        .try_fold(row, |value, key| value.get(key))
        .filter(|value| !value.is_null())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub param: String,
    pub direction: SortDirection,
}

/// Header-click sort state: unsorted, ascending, descending, unsorted again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    key: Option<SortKey>,
}

impl SortState {
    #[must_use]
    pub fn key(&self) -> Option<&SortKey> {
        self.key.as_ref()
    }

    /// Advance the cycle for `param`. A different column starts ascending.
    pub fn click(&mut self, param: &str) {
        self.key = match self.key.take() {
            Some(SortKey { param: current, direction: SortDirection::Ascending }) if current == param => {
                Some(SortKey { param: current, direction: SortDirection::Descending })
            }
            Some(SortKey { param: current, direction: SortDirection::Descending }) if current == param => None,
            _ => Some(SortKey { param: param.to_owned(), direction: SortDirection::Ascending }),
        };
    }

    pub fn clear(&mut self) {
        self.key = None;
    }
}

/// Which columns are shown, keyed by `param`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnVisibility(BTreeMap<String, bool>);

impl ColumnVisibility {
    #[must_use]
    pub fn new(columns: &[Column]) -> Self {
        Self(columns.iter().map(|c| (c.param.clone(), !c.starts_hidden)).collect())
    }

    #[must_use]
    pub fn is_visible(&self, param: &str) -> bool {
        self.0.get(param).copied().unwrap_or(true)
    }

    pub fn set(&mut self, param: &str, visible: bool) {
        self.0.insert(param.to_owned(), visible);
    }

    pub fn toggle(&mut self, param: &str) {
        let visible = self.is_visible(param);
        self.set(param, !visible);
    }

    /// Columns to render/export, in schema order.
    #[must_use]
    pub fn visible<'a>(&self, columns: &'a [Column]) -> Vec<&'a Column> {
        columns.iter().filter(|c| self.is_visible(&c.param)).collect()
    }
}

/// Rows ordered by `sort`. Unsorted (or an unknown column) keeps input order.
#[must_use]
pub fn sort_rows(rows: &[Value], columns: &[Column], sort: &SortState) -> Vec<Value> {
    let mut sorted = rows.to_vec();
    let Some(key) = sort.key() else {
        return sorted;
    };
    let Some(column) = columns.iter().find(|c| c.param == key.param) else {
        return sorted;
    };
    sorted.sort_by(|a, b| compare_rows(a, b, column, key.direction));
    sorted
}

/// Primary comparison on `column`, absent values last in either direction,
/// then descending timestamp.
#[must_use]
pub fn compare_rows(a: &Value, b: &Value, column: &Column, direction: SortDirection) -> Ordering {
    let primary = match (value_at(a, &column.param), value_at(b, &column.param)) {
        (Some(x), Some(y)) => {
            let ordering = compare_values(x, y, column.kind);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    primary.then_with(|| {
        let ts = |row: &Value| value_at(row, TIMESTAMP_PARAM).and_then(Value::as_i64);
        ts(b).cmp(&ts(a))
    })
}

/// Ascending order for one column type. Booleans order `false` before `true`
/// so a descending sort lists `true` first.
fn compare_values(x: &Value, y: &Value, kind: ColumnType) -> Ordering {
    match kind {
        ColumnType::Boolean => truthy(x).cmp(&truthy(y)),
        ColumnType::Int | ColumnType::Float => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        ColumnType::String => match (x.as_str(), y.as_str()) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => x.to_string().cmp(&y.to_string()),
        },
        ColumnType::Json => size(x).cmp(&size(y)),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn size(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
