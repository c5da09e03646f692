//! CSV export of the visible table.

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::table::{Column, ColumnType, value_at};

/// Title used when a dashboard has none.
pub const DEFAULT_TITLE: &str = "Logs";

/// Quote a cell iff it contains a comma or a double quote.
#[must_use]
pub fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains(',') || cell.contains('"') {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

/// Text for one cell before escaping.
#[must_use]
pub fn format_cell(value: Option<&Value>, kind: ColumnType) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) if kind != ColumnType::Json => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Header row of titles, then one line per row.
#[must_use]
pub fn to_csv(columns: &[&Column], rows: &[Value]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| escape_cell(&c.title).into_owned())
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let cells = columns
            .iter()
            .map(|c| escape_cell(&format_cell(value_at(row, &c.param), c.kind)).into_owned())
            .collect::<Vec<_>>();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// `<title>.csv`, falling back to [`DEFAULT_TITLE`] for a blank title.
#[must_use]
pub fn csv_filename(title: &str) -> String {
    let title = title.trim();
    let title = if title.is_empty() { DEFAULT_TITLE } else { title };
    format!("{title}.csv")
}

/// `data:` URI carrying `csv` for a browser download link.
#[must_use]
pub fn csv_data_uri(csv: &str) -> String {
    format!("data:text/csv;base64,{}", STANDARD.encode(csv.as_bytes()))
}

/// A ready-to-save export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvDownload {
    pub filename: String,
    pub contents: String,
}

impl CsvDownload {
    #[must_use]
    pub fn data_uri(&self) -> String {
        csv_data_uri(&self.contents)
    }
}

#[cfg(test)]
#[path = "csv_test.rs"]
mod tests;
