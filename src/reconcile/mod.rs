//! Deciding what to do with a resource given its desired state.
//!
//! The [`Reconciler`] fetches inspection documents through an
//! [`InspectionSource`], runs the diff engine over them and turns the verdict
//! into a [`Plan`]: create a missing resource, recreate a drifted one or leave
//! it alone. Fetching is kept behind a trait so planning can be exercised
//! without a running engine.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::diff::{CompareOptions, DiffEngine, DiffMode, DiffResult, build_create_command};
use crate::error::{DiffError, InspectionError, Result};
use crate::resources::ResourceKind;
use crate::state::{DesiredState, LiveState, ParamValue};
use crate::version::EngineVersion;

/// The desired-state key forcing a recreate regardless of differences.
const RECREATE_KEY: &str = "recreate";

/// The result of looking up one inspection document.
pub type Lookup = std::result::Result<Option<Value>, InspectionError>;

/// Access to the live state of the container engine.
///
/// Every lookup returns `Ok(None)` when the object does not exist.
pub trait InspectionSource {
    /// The engine version, either bare (`4.9.3`) or as printed by
    /// `podman --version`.
    ///
    /// # Errors
    ///
    /// Returns `InspectionError::Unavailable` when the version cannot be
    /// determined.
    fn engine_version(&self) -> std::result::Result<String, InspectionError>;

    /// The inspection document of a resource.
    ///
    /// # Errors
    ///
    /// Returns `InspectionError::Unavailable` when the engine cannot be
    /// queried.
    fn inspect(&self, kind: ResourceKind, name: &str) -> Lookup;

    /// The inspection document of an image.
    ///
    /// # Errors
    ///
    /// Returns `InspectionError::Unavailable` when the engine cannot be
    /// queried.
    fn inspect_image(&self, reference: &str) -> Lookup;

    /// The inspection document of a container, by ID.
    ///
    /// # Errors
    ///
    /// Returns `InspectionError::Unavailable` when the engine cannot be
    /// queried.
    fn inspect_container(&self, id: &str) -> Lookup;
}

/// An [`InspectionSource`] over documents loaded ahead of time, such as
/// saved `podman inspect` output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticInspection {
    version: String,
    resource: Option<Value>,
    image: Option<Value>,
    infra: Option<Value>,
}

impl StaticInspection {
    /// A source reporting `version` and no resources.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Report `document` for the resource lookup.
    #[must_use]
    pub fn with_resource(mut self, document: Value) -> Self {
        self.resource = Some(document);
        self
    }

    /// Report `document` for image lookups.
    #[must_use]
    pub fn with_image(mut self, document: Value) -> Self {
        self.image = Some(document);
        self
    }

    /// Report `document` for container lookups (the pod infra container).
    #[must_use]
    pub fn with_infra(mut self, document: Value) -> Self {
        self.infra = Some(document);
        self
    }
}

impl InspectionSource for StaticInspection {
    fn engine_version(&self) -> std::result::Result<String, InspectionError> {
        if self.version.trim().is_empty() {
            return Err(InspectionError::Unavailable {
                what: String::from("engine version"),
                message: String::from("no engine version was configured"),
            });
        }
        Ok(self.version.clone())
    }

    fn inspect(&self, _kind: ResourceKind, _name: &str) -> Lookup {
        Ok(self.resource.clone())
    }

    fn inspect_image(&self, _reference: &str) -> Lookup {
        Ok(self.image.clone())
    }

    fn inspect_container(&self, _id: &str) -> Lookup {
        Ok(self.infra.clone())
    }
}

/// What should happen to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The resource does not exist yet.
    Create,
    /// The resource exists but differs, or a recreate was forced.
    Recreate,
    /// The resource already matches.
    Unchanged,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Recreate => "recreate",
            Self::Unchanged => "unchanged",
        })
    }
}

/// The outcome of planning one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// The action to take.
    pub action: Action,
    /// The differences found. Empty for creates and forced recreates.
    pub diff: DiffResult,
    /// The create argv (without the `podman` executable) for creates and
    /// recreates.
    pub command: Option<Vec<String>>,
}

/// Plans resources against an inspection source.
#[derive(Debug)]
pub struct Reconciler<'a, S> {
    source: &'a S,
    mode: DiffMode,
    options: CompareOptions,
}

impl<'a, S: InspectionSource> Reconciler<'a, S> {
    /// A fail-fast reconciler with default comparison options.
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            mode: DiffMode::default(),
            options: CompareOptions::default(),
        }
    }

    /// Choose between a fail-fast verdict and a full report.
    #[must_use]
    pub const fn with_mode(mut self, mode: DiffMode) -> Self {
        self.mode = mode;
        self
    }

    /// Apply caller-level comparison switches.
    #[must_use]
    pub const fn with_options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }

    /// The detected engine version.
    ///
    /// # Errors
    ///
    /// Returns the source's `InspectionError` or `DiffError::InvalidVersion`.
    pub fn engine_version(&self) -> Result<EngineVersion> {
        let reported = self.source.engine_version()?;
        Ok(EngineVersion::from_version_output(&reported)?)
    }

    /// Decide what to do with the resource `desired` describes.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::MissingParameter` without a `name`,
    /// `DiffError::UnsupportedParameter` when a requested parameter is
    /// outside its version window, and any inspection failure.
    pub fn plan(&self, kind: ResourceKind, desired: &DesiredState) -> Result<Plan> {
        let name = desired
            .name()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| DiffError::MissingParameter {
                param: String::from("name"),
            })?;
        let version = self.engine_version()?;
        let catalog = kind.catalog();

        let mut request = desired.clone();
        let forced = request
            .remove(RECREATE_KEY)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);

        let document = self.source.inspect(kind, name)?;
        if let Some(ref found) = document {
            check_shape(kind, name, found)?;
        }
        let live = document.map(LiveState::new).filter(LiveState::exists);
        let Some(observed) = live else {
            info!(%kind, name, "resource does not exist, creating");
            let command = build_create_command(&catalog, &request, &version)?;
            return Ok(Plan {
                action: Action::Create,
                diff: DiffResult::default(),
                command: Some(command),
            });
        };

        if forced {
            info!(%kind, name, "recreate requested");
            let command = build_create_command(&catalog, &request, &version)?;
            return Ok(Plan {
                action: Action::Recreate,
                diff: DiffResult::default(),
                command: Some(command),
            });
        }

        let related = self.attach_related(kind, observed, &request)?;
        let diff = DiffEngine::new(&catalog, &request, &related, &version)
            .with_options(self.options)
            .evaluate(self.mode)?;
        if !diff.is_different() {
            info!(%kind, name, "resource is up to date");
            return Ok(Plan {
                action: Action::Unchanged,
                diff,
                command: None,
            });
        }

        let changed: Vec<&str> = diff.params().collect();
        info!(%kind, name, params = ?changed, "resource differs, recreating");
        let command = build_create_command(&catalog, &request, &version)?;
        Ok(Plan {
            action: Action::Recreate,
            diff,
            command: Some(command),
        })
    }

    /// Fetch the documents a kind compares against besides its own: the
    /// image for containers and the infra container for pods.
    fn attach_related(
        &self,
        kind: ResourceKind,
        live: LiveState,
        desired: &DesiredState,
    ) -> Result<LiveState> {
        match kind {
            ResourceKind::Container => {
                let Some(image) = desired.get("image").and_then(ParamValue::as_str) else {
                    return Ok(live);
                };
                let document = self.source.inspect_image(image)?;
                if document.is_none() {
                    debug!(image, "image is not present locally");
                }
                Ok(document.into_iter().fold(live, LiveState::with_image))
            }
            ResourceKind::Pod => {
                let infra_id = infra_container_id(&live);
                if infra_id.is_empty() {
                    return Ok(live);
                }
                let document = self.source.inspect_container(&infra_id)?;
                Ok(document.into_iter().fold(live, LiveState::with_infra))
            }
            ResourceKind::Volume | ResourceKind::Network => Ok(live),
        }
    }
}

/// Inspection output is an object, or an array of objects as printed by
/// `podman <kind> inspect`.
fn check_shape(kind: ResourceKind, name: &str, document: &Value) -> Result<()> {
    let valid = match document {
        Value::Null | Value::Object(_) => true,
        Value::Array(items) => items.iter().all(Value::is_object),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
    };
    if valid {
        return Ok(());
    }
    Err(DiffError::InvalidInspection {
        what: format!("{kind} '{name}'"),
        message: String::from("expected an object or an array of objects"),
    }
    .into())
}

/// Current engines report the infra container at the top level, older ones
/// under `state`.
fn infra_container_id(live: &LiveState) -> String {
    let info = live.info();
    let top_level = info.get("infracontainerid").text();
    if top_level.is_empty() {
        info.at(&["state", "infracontainerid"]).text()
    } else {
        top_level
    }
}

#[cfg(test)]
mod tests;
