//! Configuration system for poddiff.
//!
//! This module provides the configuration structures and CLI definitions for the
//! poddiff binary. Layers are merged with the `ortho_config` crate in the
//! precedence order: CLI flags override environment variables, which override
//! configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/poddiff/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! engine_version = "4.9.3"
//!
//! [diff]
//! full = true
//!
//! [image]
//! strict = false
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, CommandArgs, Commands, ParamsArgs, PlanArgs};
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, DiffConfig, ImageConfig};
