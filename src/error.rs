//! Semantic error types for poddiff.
//!
//! Conditions a caller might inspect or report (an unsupported parameter for the
//! running engine, malformed input documents, configuration problems) are
//! modelled as `thiserror` enums. Opaque `eyre::Report` values appear only at the
//! binary boundary.
//!
//! Problems while *extracting* observed values from inspection documents are
//! never errors: missing keys degrade to empty values instead.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::version::GateBound;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while comparing or rendering a desired resource definition.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The desired state requests a parameter the running engine cannot honour.
    #[error(
        "parameter '{param}' is supported {bound} podman version {required} only; \
         current version is {current}"
    )]
    UnsupportedParameter {
        /// The parameter name.
        param: String,
        /// Which side of the version window was violated.
        bound: GateBound,
        /// The bound the parameter requires.
        required: String,
        /// The detected engine version.
        current: String,
    },

    /// An engine version string could not be parsed.
    #[error("invalid podman version '{version}'")]
    InvalidVersion {
        /// The rejected version text.
        version: String,
    },

    /// The desired state document has the wrong shape.
    #[error("invalid desired state: {message}")]
    InvalidDesiredState {
        /// A description of the problem.
        message: String,
    },

    /// An inspection document has the wrong shape.
    #[error("invalid inspection document for {what}: {message}")]
    InvalidInspection {
        /// Which document was rejected.
        what: String,
        /// A description of the problem.
        message: String,
    },

    /// A JSON document read from disk could not be parsed.
    #[error("malformed JSON document at '{path}': {message}")]
    MalformedDocument {
        /// The file that was read.
        path: PathBuf,
        /// The parser message.
        message: String,
    },

    /// A parameter needed to render a create command is missing.
    #[error("missing required parameter '{param}'")]
    MissingParameter {
        /// The parameter name.
        param: String,
    },

    /// A parameter name is not part of the resource catalog.
    #[error("unknown {kind} parameter '{param}'")]
    UnknownParameter {
        /// The resource kind whose catalog was searched.
        kind: String,
        /// The parameter name.
        param: String,
    },
}

/// Errors raised by an inspection source while fetching live documents.
#[derive(Debug, Error)]
pub enum InspectionError {
    /// The source could not provide the requested document.
    #[error("failed to inspect {what}: {message}")]
    Unavailable {
        /// The object being inspected.
        what: String,
        /// A description of the failure.
        message: String,
    },
}

/// Errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// A file or directory was not found.
    #[error("path not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Permission denied when accessing a path.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error at '{path}': {message}")]
    IoError {
        /// The path where the error occurred.
        path: PathBuf,
        /// A description of the I/O error.
        message: String,
    },
}

/// Top-level error type for poddiff.
///
/// Aggregates the domain errors into one type. The binary converts it to
/// `eyre::Report` for human-readable reporting.
#[derive(Debug, Error)]
pub enum PoddiffError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while comparing resources.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// An error occurred while fetching inspection documents.
    #[error(transparent)]
    Inspection(#[from] InspectionError),

    /// An error occurred during filesystem operations.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// A specialised `Result` type for poddiff operations.
pub type Result<T> = std::result::Result<T, PoddiffError>;

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::Report;
    use rstest::{fixture, rstest};

    /// Fixture providing a sample configuration file path.
    #[fixture]
    fn config_path() -> PathBuf {
        PathBuf::from("/etc/poddiff/config.toml")
    }

    #[rstest]
    fn config_error_file_not_found_displays_correctly(config_path: PathBuf) {
        let error = ConfigError::FileNotFound { path: config_path };
        assert_eq!(
            error.to_string(),
            "configuration file not found: /etc/poddiff/config.toml"
        );
    }

    #[rstest]
    #[case(
        "engine_version",
        "not a version",
        "invalid configuration value for 'engine_version': not a version"
    )]
    #[case(
        "PODDIFF_DIFF_FULL",
        "expected bool (true/false), got 'maybe'",
        "invalid configuration value for 'PODDIFF_DIFF_FULL': expected bool (true/false), got 'maybe'"
    )]
    fn config_error_invalid_value_displays_correctly(
        #[case] field: &str,
        #[case] reason: &str,
        #[case] expected: &str,
    ) {
        let error = ConfigError::InvalidValue {
            field: String::from(field),
            reason: String::from(reason),
        };
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn config_error_ortho_config_displays_correctly() {
        let ortho_error = ortho_config::OrthoError::Validation {
            key: String::from("engine_version"),
            message: String::from("must not be empty"),
        };
        let error = ConfigError::OrthoConfig(Arc::new(ortho_error));
        assert_eq!(
            error.to_string(),
            "configuration loading failed: Validation failed for 'engine_version': must not be empty"
        );
    }

    #[rstest]
    #[case(
        GateBound::Minimum,
        "1.6.2",
        "parameter 'cgroupns' is supported from podman version 1.6.2 only; current version is 1.5.0"
    )]
    #[case(
        GateBound::Maximum,
        "1.4.0",
        "parameter 'cgroupns' is supported until podman version 1.4.0 only; current version is 1.5.0"
    )]
    fn diff_error_unsupported_parameter_names_bound(
        #[case] bound: GateBound,
        #[case] required: &str,
        #[case] expected: &str,
    ) {
        let error = DiffError::UnsupportedParameter {
            param: String::from("cgroupns"),
            bound,
            required: String::from(required),
            current: String::from("1.5.0"),
        };
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn diff_error_unknown_parameter_names_kind() {
        let error = DiffError::UnknownParameter {
            kind: String::from("volume"),
            param: String::from("privileged"),
        };
        assert_eq!(error.to_string(), "unknown volume parameter 'privileged'");
    }

    #[rstest]
    fn inspection_error_displays_target() {
        let error = InspectionError::Unavailable {
            what: String::from("container web"),
            message: String::from("no such container"),
        };
        assert_eq!(
            error.to_string(),
            "failed to inspect container web: no such container"
        );
    }

    #[rstest]
    fn filesystem_error_io_error_displays_message(config_path: PathBuf) {
        let error = FilesystemError::IoError {
            path: config_path,
            message: String::from("disk full"),
        };
        assert_eq!(
            error.to_string(),
            "I/O error at '/etc/poddiff/config.toml': disk full"
        );
    }

    #[rstest]
    fn poddiff_error_wraps_diff_error() {
        let diff_error = DiffError::MissingParameter {
            param: String::from("image"),
        };
        let error: PoddiffError = diff_error.into();
        assert_eq!(error.to_string(), "missing required parameter 'image'");
    }

    #[rstest]
    fn poddiff_error_converts_to_eyre_report() {
        let error: PoddiffError = DiffError::InvalidVersion {
            version: String::from("banana"),
        }
        .into();
        let report = Report::from(error);
        assert_eq!(report.to_string(), "invalid podman version 'banana'");
    }
}
