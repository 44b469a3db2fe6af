//! Reading JSON documents from disk.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::Value;

use crate::error::{DiffError, FilesystemError, Result};

fn filesystem_error(path: &Utf8Path, error: &io::Error) -> FilesystemError {
    let owned = path.as_std_path().to_path_buf();
    match error.kind() {
        io::ErrorKind::NotFound => FilesystemError::NotFound { path: owned },
        io::ErrorKind::PermissionDenied => FilesystemError::PermissionDenied { path: owned },
        _ => FilesystemError::IoError {
            path: owned,
            message: error.to_string(),
        },
    }
}

/// Read and parse a JSON document such as saved `podman inspect` output.
///
/// The parent directory is opened with `cap_std` and the file read relative
/// to it.
///
/// # Errors
///
/// Returns `FilesystemError` when the file cannot be read and
/// `DiffError::MalformedDocument` when it is not valid JSON.
pub fn load_json_document(path: &Utf8Path) -> Result<Value> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or(current_dir.as_path());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|error| filesystem_error(parent, &error))?;
    let content = dir
        .read_to_string(file_name)
        .map_err(|error| filesystem_error(path, &error))?;

    serde_json::from_str(&content).map_err(|error| {
        DiffError::MalformedDocument {
            path: path.as_std_path().to_path_buf(),
            message: error.to_string(),
        }
        .into()
    })
}
