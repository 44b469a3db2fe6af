//! Parameter specifications.

use std::fmt;

use serde_json::Value;

use super::context::DiffContext;
use crate::error::DiffError;
use crate::normalize::Mode;
use crate::state::ParamValue;
use crate::version::{EngineVersion, VersionGate};

/// A bespoke comparison. `None` means the parameter does not apply.
pub type CompareFn = fn(&DiffContext<'_>) -> Option<Comparison>;

/// Canonical observed (`before`) and desired (`after`) values of one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The canonical observed value.
    pub before: Value,
    /// The canonical desired value.
    pub after: Value,
}

impl Comparison {
    /// Pair an observed and a desired value.
    #[must_use]
    pub const fn new(before: Value, after: Value) -> Self {
        Self { before, after }
    }

    /// A comparison that cannot differ.
    #[must_use]
    pub fn unchanged(value: Value) -> Self {
        Self {
            after: value.clone(),
            before: value,
        }
    }

    /// Whether the two sides differ.
    #[must_use]
    pub fn differs(&self) -> bool {
        self.before != self.after
    }
}

/// Where a generic field rule reads the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A path in the resource inspection document.
    Info(&'static [&'static str]),
    /// A path in the infra container document. Skipped without infra.
    Infra(&'static [&'static str]),
    /// A flag in the recorded create command, by its spellings.
    Command(&'static [&'static str]),
}

/// How a parameter is compared.
#[derive(Clone, Copy)]
pub enum Rule {
    /// Observed at `source`, both sides canonicalised under `mode`. An unset
    /// parameter without a default compares equal.
    Field {
        /// Where the observed value lives.
        source: Source,
        /// The canonicalisation applied to both sides.
        mode: Mode,
    },
    /// Bespoke extraction and comparison.
    Custom(CompareFn),
    /// Rendered on the command line but never compared.
    BuildOnly,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { source, mode } => f
                .debug_struct("Field")
                .field("source", source)
                .field("mode", mode)
                .finish(),
            Self::Custom(_) => f.write_str("Custom"),
            Self::BuildOnly => f.write_str("BuildOnly"),
        }
    }
}

/// How a parameter is rendered on the create command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagStyle {
    /// `--flag VALUE`.
    Value,
    /// `--flag=VALUE`.
    Equals,
    /// `--flag ITEM` once per list item.
    Repeated,
    /// `--flag A,B,C`.
    Joined,
    /// `--flag KEY{sep}VALUE` once per mapping entry.
    Pairs(char),
    /// Bare `--flag` when true, nothing otherwise.
    Switch,
    /// `--flag key-name=VALUE` per entry, with `_` in keys turned into `-`.
    LogOpt,
    /// Items appended verbatim.
    Raw,
    /// Not rendered as a flag.
    Omit,
}

/// How a parameter takes part in the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idempotency {
    /// Compared normally.
    Compared,
    /// Extracted and comparable, but never counted as a difference.
    Excluded,
    /// Cannot be verified from inspection; any non-empty value is a difference.
    NonIdempotent,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    name: &'static str,
    aliases: &'static [&'static str],
    flag: Option<&'static str>,
    style: FlagStyle,
    boolean: bool,
    rule: Rule,
    gate: VersionGate,
    idempotency: Idempotency,
}

impl ParamSpec {
    /// A compared parameter with no flag, no rule and an open gate.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            flag: None,
            style: FlagStyle::Omit,
            boolean: false,
            rule: Rule::BuildOnly,
            gate: VersionGate::OPEN,
            idempotency: Idempotency::Compared,
        }
    }

    /// Set the command-line flag.
    #[must_use]
    pub const fn flag(mut self, flag: &'static str, style: FlagStyle) -> Self {
        self.flag = Some(flag);
        self.style = style;
        self
    }

    /// Append the value's words verbatim instead of rendering a flag.
    #[must_use]
    pub const fn raw(mut self) -> Self {
        self.style = FlagStyle::Raw;
        self
    }

    /// Mark as a boolean flag.
    #[must_use]
    pub const fn boolean(mut self) -> Self {
        self.boolean = true;
        self
    }

    /// Accept alternative names in the desired state.
    #[must_use]
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Compare against a path in the inspection document.
    #[must_use]
    pub const fn field(mut self, path: &'static [&'static str], mode: Mode) -> Self {
        self.rule = Rule::Field {
            source: Source::Info(path),
            mode,
        };
        self
    }

    /// Compare against a path in the infra container document.
    #[must_use]
    pub const fn infra_field(mut self, path: &'static [&'static str], mode: Mode) -> Self {
        self.rule = Rule::Field {
            source: Source::Infra(path),
            mode,
        };
        self
    }

    /// Compare against the flag's value in the recorded create command.
    #[must_use]
    pub const fn command_field(mut self, spellings: &'static [&'static str], mode: Mode) -> Self {
        self.rule = Rule::Field {
            source: Source::Command(spellings),
            mode,
        };
        self
    }

    /// Compare with a bespoke function.
    #[must_use]
    pub const fn custom(mut self, compare: CompareFn) -> Self {
        self.rule = Rule::Custom(compare);
        self
    }

    /// Restrict to a window of engine versions.
    #[must_use]
    pub const fn gate(mut self, gate: VersionGate) -> Self {
        self.gate = gate;
        self
    }

    /// Keep out of the verdict.
    #[must_use]
    pub const fn excluded(mut self) -> Self {
        self.idempotency = Idempotency::Excluded;
        self
    }

    /// Force a difference whenever a non-empty value is requested.
    #[must_use]
    pub const fn non_idempotent(mut self) -> Self {
        self.idempotency = Idempotency::NonIdempotent;
        self
    }

    /// The parameter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Alternative names.
    #[must_use]
    pub const fn alias_names(&self) -> &'static [&'static str] {
        self.aliases
    }

    /// The command-line flag, if any.
    #[must_use]
    pub const fn flag_name(&self) -> Option<&'static str> {
        self.flag
    }

    /// The rendering style.
    #[must_use]
    pub const fn style(&self) -> FlagStyle {
        self.style
    }

    /// Whether this is a boolean flag.
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        self.boolean
    }

    /// The comparison rule.
    #[must_use]
    pub const fn rule(&self) -> Rule {
        self.rule
    }

    /// The supported version window.
    #[must_use]
    pub const fn version_gate(&self) -> VersionGate {
        self.gate
    }

    /// The verdict participation.
    #[must_use]
    pub const fn idempotency(&self) -> Idempotency {
        self.idempotency
    }

    /// Decide whether the parameter applies to `version`.
    ///
    /// Returns `Ok(false)` for a parameter outside its window that was not
    /// requested.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::UnsupportedParameter` when the parameter was
    /// requested but the engine is outside its window.
    pub fn admit(&self, version: &EngineVersion, requested: bool) -> Result<bool, DiffError> {
        match self.gate.check(version) {
            Ok(()) => Ok(true),
            Err(violation) if requested => Err(DiffError::UnsupportedParameter {
                param: self.name.to_owned(),
                bound: violation.bound,
                required: violation.required.to_owned(),
                current: version.to_string(),
            }),
            Err(_) => Ok(false),
        }
    }

    /// Append this parameter's command-line rendering of `value` to `argv`.
    pub fn render_into(&self, value: &ParamValue, argv: &mut Vec<String>) {
        if self.style == FlagStyle::Raw {
            argv.extend(value.words());
            return;
        }
        let Some(flag) = self.flag else {
            return;
        };
        match self.style {
            FlagStyle::Value => {
                argv.push(flag.to_owned());
                argv.push(value.render());
            }
            FlagStyle::Equals => argv.push(format!("{flag}={}", value.render())),
            FlagStyle::Repeated => {
                for item in value.values() {
                    argv.push(flag.to_owned());
                    argv.push(item);
                }
            }
            FlagStyle::Joined => {
                argv.push(flag.to_owned());
                argv.push(value.items().join(","));
            }
            FlagStyle::Pairs(separator) => {
                for (key, item) in value.entries() {
                    argv.push(flag.to_owned());
                    if item.is_empty() && separator != '=' {
                        argv.push(key);
                    } else {
                        argv.push(format!("{key}{separator}{item}"));
                    }
                }
            }
            FlagStyle::Switch => {
                if value.as_bool() == Some(true) {
                    argv.push(flag.to_owned());
                }
            }
            FlagStyle::LogOpt => {
                for (key, item) in value.entries() {
                    argv.push(flag.to_owned());
                    argv.push(format!("{}={item}", key.replace('_', "-")));
                }
            }
            FlagStyle::Raw | FlagStyle::Omit => {}
        }
    }
}
