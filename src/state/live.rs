//! Observed resource state and create-command reconstruction.

use serde_json::Value;

use super::field::Field;
use crate::normalize::parse_bool;

/// Recursively lower-case every object key in `value`.
///
/// Values are left untouched, so label and environment *values* keep their
/// case while lookups become case-insensitive.
#[must_use]
pub fn lower_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(key, item)| (key.to_lowercase(), lower_keys(item)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lower_keys).collect()),
        other => other,
    }
}

/// Unwrap `podman inspect` array output and lower-case keys.
fn document(value: Value) -> Option<Value> {
    let single = match value {
        Value::Array(items) => items.into_iter().next()?,
        other => other,
    };
    if single.is_null() {
        None
    } else {
        Some(lower_keys(single))
    }
}

/// The inspection documents describing one existing resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveState {
    info: Option<Value>,
    image: Option<Value>,
    infra: Option<Value>,
}

impl LiveState {
    /// Wrap the resource's own inspection document.
    ///
    /// A top-level array is reduced to its first element; `null` or an empty
    /// array means the resource does not exist.
    #[must_use]
    pub fn new(info: Value) -> Self {
        Self {
            info: document(info),
            image: None,
            infra: None,
        }
    }

    /// Attach the image inspection document (containers).
    #[must_use]
    pub fn with_image(mut self, image: Value) -> Self {
        self.image = document(image);
        self
    }

    /// Attach the infra container inspection document (pods).
    #[must_use]
    pub fn with_infra(mut self, infra: Value) -> Self {
        self.infra = document(infra);
        self
    }

    /// Whether an inspection document is present.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.info.is_some()
    }

    /// Whether an image document is present.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Whether an infra container document is present.
    #[must_use]
    pub const fn has_infra(&self) -> bool {
        self.infra.is_some()
    }

    /// The resource inspection document.
    #[must_use]
    pub fn info(&self) -> Field<'_> {
        Field::new(self.info.as_ref())
    }

    /// The image inspection document.
    #[must_use]
    pub fn image(&self) -> Field<'_> {
        Field::new(self.image.as_ref())
    }

    /// The infra container inspection document.
    #[must_use]
    pub fn infra(&self) -> Field<'_> {
        Field::new(self.infra.as_ref())
    }

    /// The argv the resource was created with: `config.createcommand` for
    /// containers, the top-level `createcommand` for pods.
    #[must_use]
    pub fn create_command(&self) -> CreateCommand<'_> {
        let nested = self.info().at(&["config", "createcommand"]);
        if nested.exists() {
            CreateCommand::from_field(nested)
        } else {
            CreateCommand::from_field(self.info().get("createcommand"))
        }
    }
}

/// Flag lookup over a recorded create command.
///
/// Each lookup takes every spelling of the flag (`["--volume", "-v"]`) and
/// recognises both `--flag value` and `--flag=value`.
#[derive(Debug, Clone, Copy)]
pub struct CreateCommand<'a> {
    args: Option<&'a [Value]>,
}

impl<'a> CreateCommand<'a> {
    /// Read the argv array from an inspection field.
    #[must_use]
    pub fn from_field(field: Field<'a>) -> Self {
        Self {
            args: field.value().and_then(Value::as_array).map(Vec::as_slice),
        }
    }

    /// Whether the inspection document recorded a create command.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.args.is_some()
    }

    fn tokens(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.args
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
    }

    /// Every value given to the flag, in command order.
    #[must_use]
    pub fn values(&self, spellings: &[&str]) -> Vec<String> {
        let mut found = Vec::new();
        let mut tokens = self.tokens();
        while let Some(token) = tokens.next() {
            if spellings.contains(&token) {
                if let Some(value) = tokens.next() {
                    found.push(value.to_owned());
                }
                continue;
            }
            if let Some((flag, value)) = token.split_once('=') {
                if spellings.contains(&flag) {
                    found.push(value.to_owned());
                }
            }
        }
        found
    }

    /// The last value given to the flag.
    #[must_use]
    pub fn value(&self, spellings: &[&str]) -> Option<String> {
        self.values(spellings).pop()
    }

    /// The state of a boolean switch: bare `--flag` is `true`,
    /// `--flag=value` is parsed. `None` when the flag never appears.
    #[must_use]
    pub fn switch(&self, spellings: &[&str]) -> Option<bool> {
        self.tokens().fold(None, |state, token| {
            if spellings.contains(&token) {
                return Some(true);
            }
            match token.split_once('=') {
                Some((flag, value)) if spellings.contains(&flag) => parse_bool(value).or(state),
                _ => state,
            }
        })
    }

    /// Whether any spelling of the flag appears.
    #[must_use]
    pub fn contains(&self, spellings: &[&str]) -> bool {
        self.tokens().any(|token| {
            spellings.contains(&token)
                || token
                    .split_once('=')
                    .is_some_and(|(flag, _)| spellings.contains(&flag))
        })
    }
}
