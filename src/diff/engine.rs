//! Per-parameter comparison and difference aggregation.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::catalog::{Catalog, Defaults};
use super::context::{CompareOptions, DiffContext};
use super::spec::{Comparison, Idempotency, ParamSpec, Rule, Source};
use crate::error::DiffError;
use crate::normalize::{Mode, normalize};
use crate::state::{DesiredState, LiveState, ParamValue};
use crate::version::EngineVersion;

/// How much work the aggregator does once a difference is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffMode {
    /// Stop at the first difference.
    #[default]
    FailFast,
    /// Evaluate every parameter and report all differences.
    Full,
}

impl DiffMode {
    /// `Full` when a full report was asked for.
    #[must_use]
    pub const fn from_full(full: bool) -> Self {
        if full { Self::Full } else { Self::FailFast }
    }
}

/// The differing parameters, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    before: BTreeMap<String, Value>,
    after: BTreeMap<String, Value>,
}

/// The human-readable form of a [`DiffResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDiff {
    /// `param - value` lines for the observed side.
    pub before: String,
    /// `param - value` lines for the desired side.
    pub after: String,
}

impl DiffResult {
    /// Record a differing parameter.
    pub fn record(&mut self, name: &str, comparison: Comparison) {
        self.before.insert(name.to_owned(), comparison.before);
        self.after.insert(name.to_owned(), comparison.after);
    }

    /// Whether any parameter differs.
    #[must_use]
    pub fn is_different(&self) -> bool {
        !self.before.is_empty()
    }

    /// Observed values of the differing parameters.
    #[must_use]
    pub const fn before(&self) -> &BTreeMap<String, Value> {
        &self.before
    }

    /// Desired values of the differing parameters.
    #[must_use]
    pub const fn after(&self) -> &BTreeMap<String, Value> {
        &self.after
    }

    /// Names of the differing parameters in sorted order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.before.keys().map(String::as_str)
    }

    /// One `param - value` line per difference, sorted by name, each block
    /// ending with a newline.
    #[must_use]
    pub fn render(&self) -> RenderedDiff {
        RenderedDiff {
            before: render_block(&self.before),
            after: render_block(&self.after),
        }
    }
}

fn render_block(entries: &BTreeMap<String, Value>) -> String {
    entries
        .iter()
        .map(|(name, value)| {
            let text = value
                .as_str()
                .map_or_else(|| value.to_string(), str::to_owned);
            format!("{name} - {text}\n")
        })
        .collect()
}

/// Compares one desired state against one live resource.
#[derive(Debug)]
pub struct DiffEngine<'a> {
    catalog: &'a Catalog,
    desired: DesiredState,
    defaults: Defaults,
    live: &'a LiveState,
    version: &'a EngineVersion,
    options: CompareOptions,
}

impl<'a> DiffEngine<'a> {
    /// Prepare a comparison. Aliases in `desired` are resolved and defaults
    /// computed for `version`.
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        desired: &DesiredState,
        live: &'a LiveState,
        version: &'a EngineVersion,
    ) -> Self {
        Self {
            catalog,
            desired: catalog.resolve_aliases(desired),
            defaults: catalog.defaults(version, live),
            live,
            version,
            options: CompareOptions::default(),
        }
    }

    /// Apply caller-level switches.
    #[must_use]
    pub fn with_options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }

    /// The view handed to comparison rules.
    #[must_use]
    pub const fn context(&self) -> DiffContext<'_> {
        DiffContext::new(
            &self.desired,
            &self.defaults,
            self.live,
            self.version,
            self.options,
        )
    }

    /// The alias-resolved desired state.
    #[must_use]
    pub const fn desired(&self) -> &DesiredState {
        &self.desired
    }

    /// Compare a single parameter.
    ///
    /// Returns `Ok(None)` when the parameter does not apply: it is outside its
    /// version window and was not requested, a required document is missing,
    /// or the rule cannot judge the input.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::UnknownParameter` for a name outside the catalog and
    /// `DiffError::UnsupportedParameter` when the parameter was requested but
    /// the engine version is outside its window.
    pub fn compare_param(&self, name: &str) -> Result<Option<Comparison>, DiffError> {
        let spec = self
            .catalog
            .spec(name)
            .ok_or_else(|| DiffError::UnknownParameter {
                kind: self.catalog.kind().to_string(),
                param: name.to_owned(),
            })?;
        self.evaluate_spec(spec)
    }

    /// Fail on any requested parameter the engine version cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first `DiffError::UnsupportedParameter` in catalog order.
    pub fn check_gates(&self) -> Result<(), DiffError> {
        for spec in self.catalog.specs() {
            if self.desired.contains(spec.name()) {
                spec.admit(self.version, true)?;
            }
        }
        Ok(())
    }

    /// Compare the whole catalog.
    ///
    /// Excluded parameters are skipped. Non-idempotent parameters with a
    /// non-empty requested value are recorded with an empty observed side.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::UnsupportedParameter` before any comparison when a
    /// requested parameter is outside its version window.
    pub fn evaluate(&self, mode: DiffMode) -> Result<DiffResult, DiffError> {
        self.check_gates()?;
        let mut result = DiffResult::default();
        for spec in self.catalog.specs() {
            let comparison = match spec.idempotency() {
                Idempotency::Excluded => None,
                Idempotency::NonIdempotent => self.unverifiable(spec),
                Idempotency::Compared => self.evaluate_spec(spec)?,
            };
            let Some(found) = comparison.filter(Comparison::differs) else {
                continue;
            };
            debug!(
                kind = %self.catalog.kind(),
                param = spec.name(),
                before = %found.before,
                after = %found.after,
                "parameter differs"
            );
            result.record(spec.name(), found);
            if mode == DiffMode::FailFast {
                break;
            }
        }
        Ok(result)
    }

    /// Whether the resource differs from the desired state.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`evaluate`](Self::evaluate).
    pub fn is_different(&self, fail_fast: bool) -> Result<bool, DiffError> {
        self.evaluate(DiffMode::from_full(!fail_fast)).map(|result| result.is_different())
    }

    fn unverifiable(&self, spec: &ParamSpec) -> Option<Comparison> {
        self.desired
            .get(spec.name())
            .filter(|value| !value.is_empty())
            .map(|value| Comparison::new(Value::String(String::new()), value.to_json()))
    }

    fn evaluate_spec(&self, spec: &ParamSpec) -> Result<Option<Comparison>, DiffError> {
        let requested = self.desired.contains(spec.name());
        if !spec.admit(self.version, requested)? {
            debug!(
                param = spec.name(),
                gate = %spec.version_gate(),
                version = %self.version,
                "skipping parameter outside its version window"
            );
            return Ok(None);
        }
        let context = self.context();
        Ok(match spec.rule() {
            Rule::Field { source, mode } => compare_field(&context, spec.name(), source, mode),
            Rule::Custom(compare) => compare(&context),
            Rule::BuildOnly => None,
        })
    }
}

fn compare_field(
    context: &DiffContext<'_>,
    name: &str,
    source: Source,
    mode: Mode,
) -> Option<Comparison> {
    let observed = match source {
        Source::Info(path) => context.info().at(path).param(),
        Source::Infra(path) => {
            if !context.live().has_infra() {
                return None;
            }
            context.infra().at(path).param()
        }
        Source::Command(spellings) => {
            let command = context.create_command();
            if !command.is_available() {
                return None;
            }
            match mode {
                Mode::FlagList { .. } | Mode::KeyValue => {
                    Some(ParamValue::List(command.values(spellings)))
                }
                Mode::BoolString => Some(ParamValue::Bool(
                    command.switch(spellings).unwrap_or(false),
                )),
                Mode::Scalar | Mode::Lowercase | Mode::Path | Mode::ByteSize => {
                    command.value(spellings).map(ParamValue::Str)
                }
            }
        }
    };
    Some(context.against(name, normalize(observed.as_ref(), mode), mode))
}
