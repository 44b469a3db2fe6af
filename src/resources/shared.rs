//! Comparison helpers used by more than one resource kind.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::diff::{Comparison, DiffContext};
use crate::normalize::{is_port_range, port_spec, string_set};
use crate::state::{Field, ParamValue};

/// Network modes that stand in for a list of named networks.
const NETWORK_MODES: &[&str] = &["bridge", "host", "none", "slirp4netns", "pasta", "private"];

/// The network rootful Podman attaches when none is requested.
const DEFAULT_NETWORK: &str = "podman";

/// Compare `before` with the requested or defaulted value of `name` as
/// converted by `after`. Accepts `before` when neither exists.
pub(super) fn compare_with<F>(
    ctx: &DiffContext<'_>,
    name: &str,
    before: Value,
    after: F,
) -> Comparison
where
    F: FnOnce(&ParamValue) -> Value,
{
    match ctx.param(name) {
        Some(value) => {
            let desired = after(value);
            Comparison::new(before, desired)
        }
        None => Comparison::unchanged(before),
    }
}

/// Like [`compare_with`], ignoring defaults.
pub(super) fn compare_explicit<F>(
    ctx: &DiffContext<'_>,
    name: &str,
    before: Value,
    after: F,
) -> Comparison
where
    F: FnOnce(&ParamValue) -> Value,
{
    match ctx.explicit(name) {
        Some(value) => {
            let desired = after(value);
            Comparison::new(before, desired)
        }
        None => Comparison::unchanged(before),
    }
}

/// Mapping entries with lower-cased keys, matching the key folding applied
/// to inspection documents.
pub(super) fn lowered_entries(value: &ParamValue) -> BTreeMap<String, String> {
    value
        .entries()
        .into_iter()
        .map(|(key, item)| (key.to_lowercase(), item))
        .collect()
}

/// Canonical publish specs from a `hostconfig.portbindings` object.
pub(super) fn observed_ports(bindings: Field<'_>) -> Vec<String> {
    bindings
        .keys()
        .into_iter()
        .map(|port| {
            let first = bindings.get(&port).nth(0);
            port_spec(&format!(
                "{}:{}:{}",
                first.get("hostip").text(),
                first.get("hostport").text(),
                port
            ))
        })
        .collect()
}

/// Compare published ports. Requests using port ranges are not judged.
pub(super) fn compare_ports(observed: Vec<String>, requested: &[String]) -> Option<Comparison> {
    let canonical: Vec<String> = requested.iter().map(|spec| port_spec(spec)).collect();
    if canonical.iter().any(|spec| is_port_range(spec)) {
        return None;
    }
    Some(Comparison::new(string_set(observed), string_set(canonical)))
}

fn mode_alias(mode: &str) -> String {
    match mode {
        "bridge" | "slirp4netns" | "pasta" | "private" | "" => String::from("default"),
        other => other.to_owned(),
    }
}

/// Compare networks attached to a container or pod infra container.
///
/// When nothing is requested beyond a plain network mode and the resource
/// is attached to no named network (Podman's own `podman` network does not
/// count), the modes are compared, with the rootless and rootful defaults
/// treated as the same mode.
pub(super) fn compare_networks(document: Field<'_>, requested: Option<&ParamValue>) -> Comparison {
    let mode_before = document.at(&["hostconfig", "networkmode"]).text();
    let wanted: Vec<String> = requested.map(ParamValue::items).unwrap_or_default();
    let mut networks: Vec<String> = document.at(&["networksettings", "networks"]).keys();
    let only_default = networks.len() == 1
        && networks.first().is_some_and(|net| net == DEFAULT_NETWORK);
    if only_default && !wanted.iter().any(|net| net == DEFAULT_NETWORK) {
        networks.clear();
    }
    let lone_mode = match wanted.as_slice() {
        [only] if NETWORK_MODES.contains(&only.as_str()) => Some(only.as_str()),
        [] => Some(""),
        _ => None,
    };
    match lone_mode {
        Some(mode) if networks.is_empty() => Comparison::new(
            Value::String(mode_alias(&mode_before)),
            Value::String(mode_alias(mode)),
        ),
        _ => Comparison::new(string_set(networks), string_set(wanted)),
    }
}
