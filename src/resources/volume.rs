//! The volume catalog.

use std::collections::BTreeMap;

use super::ResourceKind;
use super::shared::{compare_with, lowered_entries};
use crate::diff::{Catalog, Comparison, Defaults, DiffContext, FlagStyle, ParamSpec};
use crate::normalize::{Mode, string_map, string_set};
use crate::state::{LiveState, ParamValue};
use crate::version::EngineVersion;

const QUADLET_LABEL: &str = "podman_systemd_unit";

/// Ownership options the engine reports outside the options map.
const ID_OPTIONS: [&str; 2] = ["uid", "gid"];

const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("driver")
        .flag("--driver", FlagStyle::Value)
        .field(&["driver"], Mode::Scalar),
    ParamSpec::new("label")
        .aliases(&["labels"])
        .flag("--label", FlagStyle::Pairs('='))
        .custom(label),
    ParamSpec::new("options")
        .flag("--opt", FlagStyle::Repeated)
        .custom(options),
];

fn label(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let mut observed = ctx.info().get("labels").entries();
    observed.remove(QUADLET_LABEL);
    Some(compare_with(ctx, "label", string_map(&observed), |value| {
        string_map(&lowered_entries(value))
    }))
}

/// Split `o=a,b` into its mount options so they compare one by one.
fn expand_option(key: &str, value: &str) -> Vec<String> {
    if key == "o" {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    } else {
        vec![format!("{key}={value}")]
    }
}

fn expand_all(entries: &BTreeMap<String, String>) -> Vec<String> {
    entries
        .iter()
        .flat_map(|(key, value)| expand_option(key, value))
        .collect()
}

/// Options compare as a set of `key=value` items with `o=` split apart.
/// Ownership reported as `uid`/`gid` overrides what the options map says.
fn options(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let mut observed = expand_all(&info.get("options").entries());
    for id in ID_OPTIONS {
        let owner = info.get(id).text();
        if owner.is_empty() || owner == "0" {
            continue;
        }
        let prefix = format!("{id}=");
        observed.retain(|item| !item.starts_with(&prefix));
        observed.push(format!("{prefix}{owner}"));
    }
    Some(compare_with(ctx, "options", string_set(observed), |value| {
        let requested: BTreeMap<String, String> = value
            .values()
            .iter()
            .map(|option| {
                option.split_once('=').map_or_else(
                    || (option.clone(), String::new()),
                    |(key, item)| (key.to_owned(), item.to_owned()),
                )
            })
            .collect();
        string_set(expand_all(&requested))
    }))
}

fn defaults(_version: &EngineVersion, _live: &LiveState) -> Defaults {
    Defaults::from([
        ("driver", ParamValue::from("local")),
        ("label", ParamValue::Map(BTreeMap::new())),
        ("options", ParamValue::List(Vec::new())),
    ])
}

/// The volume catalog.
pub(super) fn catalog() -> Catalog {
    Catalog::new(ResourceKind::Volume, PARAMS, defaults)
}
