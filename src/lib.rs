//! Idempotency diff engine for declaratively managed Podman resources.
//!
//! `poddiff` answers one question for a container, pod, volume or network:
//! does the resource Podman reports match the parameters a caller declared,
//! or must it be recreated? Both sides are normalised into canonical forms,
//! absent parameters are filled from version-aware defaults, and parameters
//! outside the engine's supported version window are refused.
//!
//! # Architecture
//!
//! Comparison is driven by data rather than per-kind code: every resource
//! kind contributes a catalog of parameter specifications, and a single
//! engine walks that catalog. Kind-specific quirks live in small comparison
//! rules attached to individual entries.
//!
//! # Modules
//!
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`diff`]: Parameter specifications, catalogs and the diff engine
//! - [`error`]: Semantic error types for the library
//! - [`normalize`]: Canonicalisation of desired and observed values
//! - [`reconcile`]: Create, recreate or leave-alone decisions over an inspection source
//! - [`resources`]: Catalogs for containers, pods, volumes and networks
//! - [`state`]: Desired parameters and live inspection documents
//! - [`version`]: Podman version parsing and version gates

pub mod config;
pub mod diff;
pub mod error;
pub mod normalize;
pub mod reconcile;
pub mod resources;
pub mod state;
pub mod version;
