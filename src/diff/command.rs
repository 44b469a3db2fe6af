//! Rendering a desired state as a `podman ... create` argument vector.

use super::catalog::Catalog;
use crate::error::DiffError;
use crate::resources::ResourceKind;
use crate::state::{DesiredState, ParamValue};
use crate::version::EngineVersion;

fn required<'a>(desired: &'a DesiredState, param: &str) -> Result<&'a str, DiffError> {
    desired
        .get(param)
        .and_then(ParamValue::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| DiffError::MissingParameter {
            param: param.to_owned(),
        })
}

/// Build the argv (without the `podman` executable) that creates the
/// resource described by `desired`.
///
/// Flags appear in catalog order, one group per requested parameter.
///
/// # Errors
///
/// Returns `DiffError::MissingParameter` when `name` (or `image` for
/// containers) is missing and `DiffError::UnsupportedParameter` when a
/// requested parameter is outside its version window.
pub fn build_create_command(
    catalog: &Catalog,
    desired: &DesiredState,
    version: &EngineVersion,
) -> Result<Vec<String>, DiffError> {
    let resolved = catalog.resolve_aliases(desired);
    let name = required(&resolved, "name")?;

    let mut flags = Vec::new();
    for spec in catalog.specs() {
        let Some(value) = resolved.get(spec.name()) else {
            continue;
        };
        spec.admit(version, true)?;
        spec.render_into(value, &mut flags);
    }

    let mut argv: Vec<String> = Vec::new();
    match catalog.kind() {
        ResourceKind::Container => {
            let image = required(&resolved, "image")?;
            argv.extend(["container", "create", "--name", name].map(str::to_owned));
            argv.append(&mut flags);
            argv.push(image.to_owned());
            if let Some(command) = resolved.get("command") {
                argv.extend(command.words());
            }
        }
        ResourceKind::Pod => {
            argv.extend(["pod", "create", "--name", name].map(str::to_owned));
            argv.append(&mut flags);
        }
        ResourceKind::Volume | ResourceKind::Network => {
            argv.push(catalog.kind().to_string());
            argv.push(String::from("create"));
            argv.append(&mut flags);
            argv.push(name.to_owned());
        }
    }
    Ok(argv)
}
