//! Typed coercion of raw request fields.
//!
//! DESIGN
//! ======
//! Handlers declare a schema of `(name, ParamType)` pairs and get back a
//! [`Params`] map of typed values or the first [`ParamError`]. The same
//! coercion serves query strings (every value arrives as a string) and JSON
//! bodies (values arrive typed), so the string forms of booleans, integers,
//! floats and JSON are all accepted.
//!
//! A field is missing when it is absent, `null`, or an empty string.

use std::collections::{BTreeMap, HashMap};

use logs::wire::codes;
use serde_json::{Map, Value};

use crate::error::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Boolean,
    BooleanOptional,
    Int,
    IntOptional,
    Float,
    FloatOptional,
    String,
    StringOptional,
    Json,
    JsonOptional,
}

impl ParamType {
    #[must_use]
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Self::BooleanOptional | Self::IntOptional | Self::FloatOptional | Self::StringOptional | Self::JsonOptional
        )
    }

    /// Name used in error messages.
    #[must_use]
    pub fn expected(self) -> &'static str {
        match self {
            Self::Boolean | Self::BooleanOptional => "boolean",
            Self::Int | Self::IntOptional => "integer",
            Self::Float | Self::FloatOptional => "number",
            Self::String | Self::StringOptional => "string",
            Self::Json | Self::JsonOptional => "JSON",
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("missing required parameter `{0}`")]
    Missing(String),
    #[error("parameter `{name}` must be a {expected}")]
    Invalid { name: String, expected: &'static str },
}

impl ErrorCode for ParamError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing(_) => codes::MISSING_PARAMETER,
            Self::Invalid { .. } => codes::INVALID_PARAMETER,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Json(Value),
}

/// Coerced parameters. Missing optional fields are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ParamValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn json(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            ParamValue::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// Lift query-string pairs into the JSON map `coerce_params` takes.
#[must_use]
pub fn from_query(query: HashMap<String, String>) -> Map<String, Value> {
    query.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

/// Coerce `raw` against `schema`. Fields not in the schema are ignored.
///
/// # Errors
///
/// Returns the first missing required field or mistyped field, in schema
/// order.
pub fn coerce_params(raw: &Map<String, Value>, schema: &[(&str, ParamType)]) -> Result<Params, ParamError> {
    let mut params = BTreeMap::new();
    for &(name, kind) in schema {
        let value = raw.get(name).filter(|v| !is_missing(v));
        match value {
            None if kind.is_optional() => {}
            None => return Err(ParamError::Missing(name.to_owned())),
            Some(value) => {
                let coerced = coerce(value, kind).ok_or_else(|| ParamError::Invalid {
                    name: name.to_owned(),
                    expected: kind.expected(),
                })?;
                params.insert(name.to_owned(), coerced);
            }
        }
    }
    Ok(Params(params))
}

fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn coerce(value: &Value, kind: ParamType) -> Option<ParamValue> {
    match kind {
        ParamType::Boolean | ParamType::BooleanOptional => match value {
            Value::Bool(b) => Some(ParamValue::Bool(*b)),
            Value::String(s) => match s.as_str() {
                "true" => Some(ParamValue::Bool(true)),
                "false" => Some(ParamValue::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        ParamType::Int | ParamType::IntOptional => match value {
            Value::Number(n) => n.as_i64().map(ParamValue::Int),
            Value::String(s) => s.trim().parse().ok().map(ParamValue::Int),
            _ => None,
        },
        ParamType::Float | ParamType::FloatOptional => match value {
            Value::Number(n) => n.as_f64().map(ParamValue::Float),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ParamValue::Float),
            _ => None,
        },
        ParamType::String | ParamType::StringOptional => match value {
            Value::String(s) => Some(ParamValue::String(s.clone())),
            Value::Number(n) => Some(ParamValue::String(n.to_string())),
            Value::Bool(b) => Some(ParamValue::String(b.to_string())),
            _ => None,
        },
        ParamType::Json | ParamType::JsonOptional => match value {
            Value::String(s) => serde_json::from_str(s).ok().map(ParamValue::Json),
            other => Some(ParamValue::Json(other.clone())),
        },
    }
}

#[cfg(test)]
#[path = "params_test.rs"]
mod tests;
