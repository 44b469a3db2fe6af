//! The generic idempotency diff engine.
//!
//! A resource kind is described by a [`Catalog`] of [`ParamSpec`] entries.
//! Each entry says how the parameter is rendered on a `podman ... create`
//! command line and how it is compared against the live inspection document.
//! [`DiffEngine`] walks a catalog and reports the parameters whose canonical
//! desired and observed values differ.

mod catalog;
mod command;
mod context;
mod engine;
mod spec;


pub use catalog::{Catalog, Defaults, DefaultsFn};
pub use command::build_create_command;
pub use context::{CompareOptions, DiffContext};
pub use engine::{DiffEngine, DiffMode, DiffResult, RenderedDiff};
pub use spec::{CompareFn, Comparison, FlagStyle, Idempotency, ParamSpec, Rule, Source};
