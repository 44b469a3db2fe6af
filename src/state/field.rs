//! Defensive navigation over inspection documents.

use std::collections::BTreeMap;

use serde_json::Value;

use super::value::{ParamValue, scalar_text};
use crate::normalize::parse_bool;

/// A possibly-missing position inside a JSON document.
///
/// Every accessor tolerates absent keys, `null` and unexpected types by
/// returning an empty result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Field<'a>(Option<&'a Value>);

impl<'a> Field<'a> {
    /// Wrap an optional JSON value.
    #[must_use]
    pub const fn new(value: Option<&'a Value>) -> Self {
        Self(value)
    }

    /// A field that points nowhere.
    #[must_use]
    pub const fn missing() -> Self {
        Self(None)
    }

    /// Descend into an object member.
    #[must_use]
    pub fn get(self, key: &str) -> Self {
        Self(self.0.and_then(|value| value.get(key)))
    }

    /// Descend along a path of object members.
    #[must_use]
    pub fn at(self, path: &[&str]) -> Self {
        path.iter().fold(self, |field, key| field.get(key))
    }

    /// Descend into an array element.
    #[must_use]
    pub fn nth(self, index: usize) -> Self {
        Self(self.0.and_then(|value| value.get(index)))
    }

    /// The underlying JSON value.
    #[must_use]
    pub const fn value(self) -> Option<&'a Value> {
        self.0
    }

    /// Whether the field holds a non-null value.
    #[must_use]
    pub fn exists(self) -> bool {
        self.0.is_some_and(|value| !value.is_null())
    }

    /// Whether the field is an object containing `key`, even with a null value.
    #[must_use]
    pub fn has_key(self, key: &str) -> bool {
        self.0
            .and_then(Value::as_object)
            .is_some_and(|object| object.contains_key(key))
    }

    /// The string payload, if the field is a string.
    #[must_use]
    pub fn as_str(self) -> Option<&'a str> {
        self.0.and_then(Value::as_str)
    }

    /// Scalar text, or an empty string when missing.
    #[must_use]
    pub fn text(self) -> String {
        self.0.and_then(scalar_text).unwrap_or_default()
    }

    /// A boolean, accepting JSON booleans and boolean-like strings.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self.0 {
            Some(Value::Bool(flag)) => Some(*flag),
            Some(Value::String(text)) => parse_bool(text),
            _ => None,
        }
    }

    /// An integer, accepting JSON numbers and numeric strings.
    #[must_use]
    pub fn as_i64(self) -> Option<i64> {
        match self.0 {
            Some(Value::Number(number)) => number.as_i64(),
            Some(Value::String(text)) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// String items of an array. A lone non-empty string is a one-item list.
    #[must_use]
    pub fn strings(self) -> Vec<String> {
        match self.0 {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(Value::String(text)) if !text.is_empty() => vec![text.clone()],
            _ => Vec::new(),
        }
    }

    /// Object members with scalar values rendered as text.
    #[must_use]
    pub fn entries(self) -> BTreeMap<String, String> {
        self.0
            .and_then(Value::as_object)
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(key, value)| scalar_text(value).map(|text| (key.clone(), text)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Array elements as fields.
    #[must_use]
    pub fn items(self) -> Vec<Self> {
        self.0
            .and_then(Value::as_array)
            .map(|items| items.iter().map(|item| Self(Some(item))).collect())
            .unwrap_or_default()
    }

    /// Object member names.
    #[must_use]
    pub fn keys(self) -> Vec<String> {
        self.0
            .and_then(Value::as_object)
            .map(|object| object.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Convert to a parameter value, `None` when missing or null.
    #[must_use]
    pub fn param(self) -> Option<ParamValue> {
        self.0.and_then(ParamValue::from_json)
    }
}
