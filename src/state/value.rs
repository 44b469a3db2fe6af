//! Desired parameter values.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::DiffError;
use crate::normalize::parse_bool;

/// A single desired parameter value.
///
/// JSON `null` is the explicit "not requested" marker and never becomes a
/// `ParamValue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A boolean switch.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string. Floating-point inputs are kept as their decimal text.
    Str(String),
    /// A list of strings.
    List(Vec<String>),
    /// A string-to-string mapping.
    Map(BTreeMap<String, String>),
}

/// Render a JSON scalar as text. `null` yields `None`; arrays and objects
/// yield their compact JSON form.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

impl ParamValue {
    /// Convert a JSON value. Returns `None` for `null`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => Some(
                number
                    .as_i64()
                    .map_or_else(|| Self::Str(number.to_string()), Self::Int),
            ),
            Value::String(text) => Some(Self::Str(text.clone())),
            Value::Array(items) => Some(Self::List(items.iter().filter_map(scalar_text).collect())),
            Value::Object(map) => Some(Self::Map(
                map.iter()
                    .filter_map(|(key, item)| scalar_text(item).map(|text| (key.clone(), text)))
                    .collect(),
            )),
        }
    }

    /// The JSON form of this value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Int(number) => Value::from(*number),
            Self::Str(text) => Value::String(text.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Self::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), Value::String(item.clone())))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Render as command-line text. Booleans use `True`/`False`, lists are
    /// comma-joined and maps become comma-joined `key=value` pairs.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Bool(true) => String::from("True"),
            Self::Bool(false) => String::from("False"),
            Self::Int(number) => number.to_string(),
            Self::Str(text) => text.clone(),
            Self::List(items) => items.join(","),
            Self::Map(entries) => entries
                .iter()
                .map(|(key, item)| format!("{key}={item}"))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Interpret as a boolean. Strings such as `yes` or `False` and the
    /// integers 0 and 1 are understood.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::Str(text) => parse_bool(text),
            Self::Int(_) | Self::List(_) | Self::Map(_) => None,
        }
    }

    /// The string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// List items. A string is split on commas; scalars become one item.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Str(text) => text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
            Self::Bool(_) | Self::Int(_) => vec![self.render()],
            Self::Map(entries) => entries
                .iter()
                .map(|(key, item)| format!("{key}={item}"))
                .collect(),
        }
    }

    /// List items without splitting strings, for specs that may contain
    /// commas (volumes, mounts, devices).
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Map(_) => self.items(),
            Self::Bool(_) | Self::Int(_) | Self::Str(_) => vec![self.render()],
        }
    }

    /// Whitespace-split words of a command string, or the list as given.
    #[must_use]
    pub fn words(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Str(text) => text.split_whitespace().map(str::to_owned).collect(),
            Self::Bool(_) | Self::Int(_) | Self::Map(_) => vec![self.render()],
        }
    }

    /// Mapping entries. A list of `key=value` strings is split at the first
    /// `=`; an item without `=` maps to an empty value.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        match self {
            Self::Map(entries) => entries.clone(),
            Self::List(_) | Self::Str(_) => self
                .items()
                .iter()
                .map(|item| {
                    item.split_once('=').map_or_else(
                        || (item.clone(), String::new()),
                        |(key, value)| (key.to_owned(), value.to_owned()),
                    )
                })
                .collect(),
            Self::Bool(_) | Self::Int(_) => BTreeMap::new(),
        }
    }

    /// Whether the value is an empty string, list or mapping.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            Self::Bool(_) | Self::Int(_) => false,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for ParamValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|item| (*item).to_owned()).collect())
    }
}

impl From<BTreeMap<String, String>> for ParamValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self::Map(value)
    }
}

/// The declarative parameter set requested for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    params: BTreeMap<String, ParamValue>,
}

impl DesiredState {
    /// An empty desired state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: BTreeMap::new(),
        }
    }

    /// Build from a JSON object. `null` members are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::InvalidDesiredState` when `value` is not an object.
    pub fn from_json(value: &Value) -> Result<Self, DiffError> {
        let object = value
            .as_object()
            .ok_or_else(|| DiffError::InvalidDesiredState {
                message: format!("expected a JSON object, got {}", json_kind(value)),
            })?;
        let params = object
            .iter()
            .filter_map(|(name, raw)| ParamValue::from_json(raw).map(|param| (name.clone(), param)))
            .collect();
        Ok(Self { params })
    }

    /// Set a parameter, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_owned(), value.into());
        self
    }

    /// Set a parameter.
    pub fn insert(&mut self, name: &str, value: ParamValue) {
        self.params.insert(name.to_owned(), value);
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.params.remove(name)
    }

    /// The requested value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Whether `name` was explicitly requested.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// The resource name, when given as a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(ParamValue::as_str)
    }

    /// Iterate parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The number of requested parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
