//! Raw submission payloads
//!
//! A submission arrives either form-encoded or as a JSON object. Both are
//! reduced to the same key/value map before dispatch. Keys written with a
//! trailing `[]` (the browser convention for multi-valued checkboxes) are
//! stored under the bare name.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One submitted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// First value, for fields that take a single value
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::Many(values) => values.first().map(String::as_str),
        }
    }

    /// Every value, in submission order
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(value) => vec![value.as_str()],
            FieldValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = FieldValue::Many(vec![first, value]);
            }
            FieldValue::Many(values) => values.push(value),
        }
    }
}

/// Untrusted submission, keyed by wire field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    fields: BTreeMap<String, FieldValue>,
}

fn bare_key(key: &str) -> &str {
    key.strip_suffix("[]").unwrap_or(key)
}

impl RawSubmission {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded `application/x-www-form-urlencoded` pairs.
    /// Repeated keys accumulate.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::new();
        for (key, value) in pairs {
            raw.append(key.as_ref(), value);
        }
        raw
    }

    /// Build from a JSON object. Arrays become multi-valued fields, scalars
    /// are kept as text, and nulls are treated as absent.
    #[must_use]
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let mut raw = Self::new();
        for (key, value) in object {
            match value {
                Value::Null | Value::Object(_) => {}
                Value::Array(items) => {
                    for text in items.iter().filter_map(scalar_text) {
                        raw.append(key, text);
                    }
                }
                scalar => {
                    if let Some(text) = scalar_text(scalar) {
                        raw.append(key, text);
                    }
                }
            }
        }
        raw
    }

    /// Add a value, accumulating under an existing key
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let key = bare_key(key);
        match self.fields.get_mut(key) {
            Some(existing) => existing.push(value),
            None => {
                self.fields
                    .insert(key.to_string(), FieldValue::Single(value));
            }
        }
    }

    /// Single value of a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::first)
    }

    /// Every value of a field; empty when absent
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields.get(name).map(FieldValue::all).unwrap_or_default()
    }

    /// Absent, or blank after trimming
    #[must_use]
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).map_or(true, |value| value.trim().is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
