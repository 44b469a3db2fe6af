//! Configuration data types for poddiff.

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::diff::{CompareOptions, DiffMode};

/// Difference reporting configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Report every difference instead of stopping at the first one.
    pub full: bool,
}

/// Image comparison configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Compare container images by ID even when the requested reference
    /// names a different tag or registry.
    pub strict: bool,
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `PODDIFF_CONFIG_PATH` environment variable
/// 2. `.poddiff.toml` in the current working directory
/// 3. `.poddiff.toml` in the home directory
/// 4. `~/.config/poddiff/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "PODDIFF",
    post_merge_hook,
    discovery(
        app_name = "poddiff",
        env_var = "PODDIFF_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".poddiff.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The Podman version to compare against, bare (`4.9.3`) or as printed by
    /// `podman --version`.
    pub engine_version: Option<String>,

    /// Difference reporting configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub diff: DiffConfig,

    /// Image comparison configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub image: ImageConfig,
}

impl AppConfig {
    /// The aggregation mode the configuration asks for.
    #[must_use]
    pub const fn diff_mode(&self) -> DiffMode {
        DiffMode::from_full(self.diff.full)
    }

    /// The comparison switches the configuration asks for.
    #[must_use]
    pub const fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            image_strict: self.image.strict,
        }
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // A blank version means "not configured".
        self.engine_version = self
            .engine_version
            .take()
            .map(|version| version.trim().to_owned())
            .filter(|version| !version.is_empty());
        Ok(())
    }
}
