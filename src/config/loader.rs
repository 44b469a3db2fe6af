//! Configuration loading with layered precedence.
//!
//! This module provides functions to load configuration with the precedence order
//! (lowest to highest): application defaults, configuration file, environment
//! variables, command-line arguments.
//!
//! # Architecture Note: Manual Layer Composition
//!
//! The `OrthoConfig` derive macro provides `load()` and `compose_layers()`
//! methods that handle discovery, environment variables, and CLI parsing
//! automatically. This loader drives a `MergeComposer` itself instead:
//!
//! 1. **Subcommand separation**: The CLI (`Cli` struct) handles subcommand dispatch
//!    via clap's `#[command(subcommand)]`, while `AppConfig` holds configuration
//!    values.
//!
//! 2. **Environment variable validation**: `OrthoConfig`'s environment layer
//!    ignores unparseable values. This loader returns errors for invalid typed
//!    values.
//!
//! 3. **Explicit paths**: a `--config` path that does not exist is an error
//!    rather than a silent fallback to discovery.
//!
//! # Environment Variable Handling
//!
//! String fields (`PODDIFF_ENGINE_VERSION`) are always accepted. Boolean fields
//! (`PODDIFF_DIFF_FULL`, `PODDIFF_IMAGE_STRICT`) must be `true` or `false`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

// ============================================================================
// Environment Variable Specification Table
// ============================================================================

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `PODDIFF_DIFF_FULL`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["diff", "full"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "PODDIFF_ENGINE_VERSION",
        path: &["engine_version"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "PODDIFF_DIFF_FULL",
        path: &["diff", "full"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "PODDIFF_IMAGE_STRICT",
        path: &["image", "strict"],
        var_type: EnvVarType::Bool,
    },
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every `PODDIFF_*` variable the loader reads.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
///
/// The parent directory is opened with `cap_std::fs_utf8` and the file read
/// relative to it.
fn load_config_file(path: &Utf8Path, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or(current_dir.as_path());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.to_path_buf()));
    Ok(())
}

/// Find the configuration file: the `--config` path when given, otherwise
/// the first discovered candidate that exists.
fn config_path(cli: &Cli) -> Result<Option<Utf8PathBuf>> {
    if let Some(ref explicit) = cli.config {
        if !explicit.exists() {
            return Err(ConfigError::FileNotFound {
                path: explicit.clone().into_std_path_buf(),
            }
            .into());
        }
        return Ok(Some(explicit.clone()));
    }

    let discovery = ConfigDiscovery::builder("poddiff")
        .env_var("PODDIFF_CONFIG_PATH")
        .config_file_name("config.toml")
        .dotfile_name(".poddiff.toml")
        .build();
    Ok(discovery
        .candidates()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| Utf8PathBuf::try_from(p).ok()))
}

/// Load configuration with full layer precedence.
///
/// This function loads configuration from all available sources:
/// 1. Application defaults defined in the struct
/// 2. Configuration file (`--config`, `PODDIFF_CONFIG_PATH` or XDG discovery)
/// 3. Environment variables prefixed with `PODDIFF_`
/// 4. Command-line arguments (from the provided `Cli`)
///
/// Later sources override earlier ones.
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to:
/// - A `--config` path that does not exist
/// - Malformed configuration files
/// - Invalid typed environment variable values (e.g., non-boolean for
///   `PODDIFF_DIFF_FULL`)
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: Defaults (serialised from AppConfig::default()).
    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Configuration file.
    if let Some(path) = config_path(cli)? {
        load_config_file(&path, &mut composer)?;
    }

    // Layer 3: Environment variables.
    let env_values = collect_env_vars()?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    // Layer 4: CLI overrides.
    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Collect environment variables with the `PODDIFF_` prefix into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a boolean environment variable has
/// an unparseable value.
fn collect_env_vars() -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Ok(raw_value) = std::env::var(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.trim().parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map.
///
/// For a path like `["diff", "full"]`, this creates the intermediate `diff`
/// object if needed and inserts `full` within it.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
///
/// Switches only override lower layers when they are given.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref version) = cli.engine_version {
        insert_at_path(
            &mut overrides,
            &["engine_version"],
            Value::String(version.clone()),
        );
    }
    if cli.full {
        insert_at_path(&mut overrides, &["diff", "full"], Value::Bool(true));
    }
    if cli.image_strict {
        insert_at_path(&mut overrides, &["image", "strict"], Value::Bool(true));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn insert_at_path_creates_intermediate_objects() {
        let mut root = Map::new();
        insert_at_path(&mut root, &["diff", "full"], Value::Bool(true));
        insert_at_path(&mut root, &["engine_version"], Value::from("4.9.3"));
        assert_eq!(
            Value::Object(root),
            serde_json::json!({"diff": {"full": true}, "engine_version": "4.9.3"})
        );
    }

    #[rstest]
    fn insert_at_path_ignores_empty_paths() {
        let mut root = Map::new();
        insert_at_path(&mut root, &[], Value::Bool(true));
        assert!(root.is_empty());
    }

    #[rstest]
    fn env_var_names_cover_every_spec() {
        assert_eq!(
            env_var_names(),
            [
                "PODDIFF_ENGINE_VERSION",
                "PODDIFF_DIFF_FULL",
                "PODDIFF_IMAGE_STRICT"
            ]
        );
    }
}
