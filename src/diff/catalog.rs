//! Per-kind parameter catalogs.

use std::collections::BTreeMap;

use super::spec::{Idempotency, ParamSpec};
use crate::resources::ResourceKind;
use crate::state::{DesiredState, LiveState, ParamValue};
use crate::version::EngineVersion;

/// Default values substituted for parameters the caller did not set.
pub type Defaults = BTreeMap<&'static str, ParamValue>;

/// Computes defaults for an engine version and the observed resource (some
/// defaults come from the image).
pub type DefaultsFn = fn(&EngineVersion, &LiveState) -> Defaults;

/// The parameter table of one resource kind, indexed by name and alias.
#[derive(Debug, Clone)]
pub struct Catalog {
    kind: ResourceKind,
    specs: &'static [ParamSpec],
    defaults: DefaultsFn,
    index: BTreeMap<&'static str, usize>,
}

impl Catalog {
    /// Index a static table of specs.
    #[must_use]
    pub fn new(kind: ResourceKind, specs: &'static [ParamSpec], defaults: DefaultsFn) -> Self {
        let mut index = BTreeMap::new();
        for (position, spec) in specs.iter().enumerate() {
            for alias in spec.alias_names() {
                index.entry(*alias).or_insert(position);
            }
        }
        for (position, spec) in specs.iter().enumerate() {
            index.insert(spec.name(), position);
        }
        Self {
            kind,
            specs,
            defaults,
            index,
        }
    }

    /// The resource kind described.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// All specs in evaluation order.
    #[must_use]
    pub const fn specs(&self) -> &'static [ParamSpec] {
        self.specs
    }

    /// Look up a spec by name or alias.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&'static ParamSpec> {
        let specs = self.specs;
        self.index
            .get(name)
            .and_then(|position| specs.get(*position))
    }

    /// The specs that never feed the verdict.
    pub fn excluded(&self) -> impl Iterator<Item = &'static ParamSpec> + use<> {
        self.with_idempotency(Idempotency::Excluded)
    }

    /// The specs that cannot be verified from inspection.
    pub fn non_idempotent(&self) -> impl Iterator<Item = &'static ParamSpec> + use<> {
        self.with_idempotency(Idempotency::NonIdempotent)
    }

    fn with_idempotency(
        &self,
        idempotency: Idempotency,
    ) -> impl Iterator<Item = &'static ParamSpec> + use<> {
        self.specs
            .iter()
            .filter(move |spec| spec.idempotency() == idempotency)
    }

    /// Defaults for `version`, some derived from `live`.
    #[must_use]
    pub fn defaults(&self, version: &EngineVersion, live: &LiveState) -> Defaults {
        (self.defaults)(version, live)
    }

    /// Rewrite aliased parameter names to their canonical names. A canonical
    /// name present in `desired` takes precedence over its aliases.
    #[must_use]
    pub fn resolve_aliases(&self, desired: &DesiredState) -> DesiredState {
        let mut resolved = DesiredState::new();
        for (name, value) in desired.iter() {
            let canonical = self.spec(name).map_or(name, |spec| spec.name());
            if canonical != name && desired.contains(canonical) {
                continue;
            }
            resolved.insert(canonical, value.clone());
        }
        resolved
    }
}
