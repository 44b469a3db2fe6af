//! The read-only view handed to comparison rules.

use serde_json::Value;

use super::catalog::Defaults;
use super::spec::Comparison;
use crate::normalize::{Mode, normalize};
use crate::state::{CreateCommand, DesiredState, Field, LiveState, ParamValue};
use crate::version::EngineVersion;

/// Caller-level switches that influence individual comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Compare container images by ID only, unless the desired state sets
    /// `image_strict` itself.
    pub image_strict: bool,
}

/// Everything a comparison rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct DiffContext<'a> {
    desired: &'a DesiredState,
    defaults: &'a Defaults,
    live: &'a LiveState,
    version: &'a EngineVersion,
    options: CompareOptions,
}

impl<'a> DiffContext<'a> {
    /// Assemble a context.
    #[must_use]
    pub const fn new(
        desired: &'a DesiredState,
        defaults: &'a Defaults,
        live: &'a LiveState,
        version: &'a EngineVersion,
        options: CompareOptions,
    ) -> Self {
        Self {
            desired,
            defaults,
            live,
            version,
            options,
        }
    }

    /// The value the caller explicitly requested.
    #[must_use]
    pub fn explicit(&self, name: &str) -> Option<&'a ParamValue> {
        self.desired.get(name)
    }

    /// The requested value, or the default when not requested.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&'a ParamValue> {
        self.desired
            .get(name)
            .or_else(|| self.defaults.get(name))
    }

    /// A requested or defaulted boolean.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.param(name).and_then(ParamValue::as_bool)
    }

    /// The observed resource.
    #[must_use]
    pub const fn live(&self) -> &'a LiveState {
        self.live
    }

    /// The resource inspection document.
    #[must_use]
    pub fn info(&self) -> Field<'a> {
        self.live.info()
    }

    /// The image inspection document.
    #[must_use]
    pub fn image(&self) -> Field<'a> {
        self.live.image()
    }

    /// The infra container inspection document.
    #[must_use]
    pub fn infra(&self) -> Field<'a> {
        self.live.infra()
    }

    /// The recorded create command.
    #[must_use]
    pub fn create_command(&self) -> CreateCommand<'a> {
        self.live.create_command()
    }

    /// The detected engine version.
    #[must_use]
    pub const fn version(&self) -> &'a EngineVersion {
        self.version
    }

    /// Caller-level switches.
    #[must_use]
    pub const fn options(&self) -> CompareOptions {
        self.options
    }

    /// Compare `before` with the requested or defaulted value of `name`
    /// canonicalised under `mode`. When neither exists the observed value is
    /// accepted as is.
    #[must_use]
    pub fn against(&self, name: &str, before: Value, mode: Mode) -> Comparison {
        match self.param(name) {
            Some(value) => Comparison::new(before, normalize(Some(value), mode)),
            None => Comparison::unchanged(before),
        }
    }

    /// Like [`against`](Self::against), but only an explicit request is
    /// compared; defaults are ignored.
    #[must_use]
    pub fn against_explicit(&self, name: &str, before: Value, mode: Mode) -> Comparison {
        match self.explicit(name) {
            Some(value) => Comparison::new(before, normalize(Some(value), mode)),
            None => Comparison::unchanged(before),
        }
    }
}
