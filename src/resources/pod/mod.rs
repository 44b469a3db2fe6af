//! The pod catalog.
//!
//! Most pod settings live on the infra container, so those parameters read
//! the infra document and are skipped for pods created without one.

use std::collections::BTreeMap;

use serde_json::Value;

use super::ResourceKind;
use super::shared::{
    compare_explicit, compare_networks, compare_ports, compare_with, lowered_entries,
    observed_ports,
};
use crate::diff::{Catalog, Comparison, Defaults, DiffContext, FlagStyle, ParamSpec};
use crate::normalize::{Mode, bool_string, clean_path, image_base, string_map, string_set};
use crate::state::{LiveState, ParamValue};
use crate::version::{EngineVersion, VersionGate};

const LIST: Mode = Mode::FlagList { lowercase: false };

/// Namespaces shared by default.
const DEFAULT_SHARE: [&str; 3] = ["ipc", "net", "uts"];

/// Reported as shared by some engines but never requested.
const IMPLICIT_SHARE: &str = "cgroup";

const QUADLET_LABEL: &str = "podman_systemd_unit";

/// Every pod parameter, in alphabetical order.
const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("add_host")
        .flag("--add-host", FlagStyle::Repeated)
        .infra_field(&["hostconfig", "extrahosts"], LIST),
    ParamSpec::new("cgroup_parent")
        .flag("--cgroup-parent", FlagStyle::Value)
        .custom(cgroup_parent),
    ParamSpec::new("dns")
        .flag("--dns", FlagStyle::Repeated)
        .infra_field(&["hostconfig", "dns"], LIST),
    ParamSpec::new("dns_opt")
        .flag("--dns-opt", FlagStyle::Repeated)
        .infra_field(&["hostconfig", "dnsoptions"], LIST),
    ParamSpec::new("dns_search")
        .flag("--dns-search", FlagStyle::Repeated)
        .infra_field(&["hostconfig", "dnssearch"], LIST),
    ParamSpec::new("exit_policy")
        .flag("--exit-policy", FlagStyle::Equals)
        .field(&["exitpolicy"], Mode::Lowercase)
        .gate(VersionGate::since("4.2.0"))
        .excluded(),
    ParamSpec::new("hostname")
        .flag("--hostname", FlagStyle::Value)
        .infra_field(&["config", "hostname"], Mode::Scalar),
    ParamSpec::new("infra")
        .flag("--infra", FlagStyle::Equals)
        .boolean()
        .custom(infra),
    ParamSpec::new("infra_command").flag("--infra-command", FlagStyle::Value),
    ParamSpec::new("infra_conmon_pidfile")
        .flag("--infra-conmon-pidfile", FlagStyle::Value)
        .command_field(&["--infra-conmon-pidfile"], Mode::Path)
        .excluded(),
    ParamSpec::new("infra_image")
        .flag("--infra-image", FlagStyle::Value)
        .custom(infra_image),
    ParamSpec::new("infra_name")
        .flag("--infra-name", FlagStyle::Value)
        .infra_field(&["name"], Mode::Scalar),
    ParamSpec::new("ip").flag("--ip", FlagStyle::Value),
    ParamSpec::new("label")
        .aliases(&["labels"])
        .flag("--label", FlagStyle::Pairs('='))
        .custom(label),
    ParamSpec::new("label_file")
        .flag("--label-file", FlagStyle::Value)
        .non_idempotent(),
    ParamSpec::new("mac_address").flag("--mac-address", FlagStyle::Value),
    ParamSpec::new("network")
        .flag("--network", FlagStyle::Joined)
        .custom(network),
    ParamSpec::new("no_hosts")
        .flag("--no-hosts", FlagStyle::Equals)
        .boolean(),
    ParamSpec::new("pod_id_file")
        .flag("--pod-id-file", FlagStyle::Value)
        .command_field(&["--pod-id-file"], Mode::Path)
        .excluded(),
    ParamSpec::new("publish")
        .aliases(&["ports"])
        .flag("--publish", FlagStyle::Repeated)
        .custom(publish),
    ParamSpec::new("share")
        .flag("--share", FlagStyle::Joined)
        .custom(share),
];

const fn text(value: String) -> Value {
    Value::String(value)
}

fn cgroup_parent(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let observed = if info.has_key("cgroupparent") {
        info.get("cgroupparent").text()
    } else {
        info.at(&["config", "cgroupparent"]).text()
    };
    Some(compare_explicit(
        ctx,
        "cgroup_parent",
        text(clean_path(&observed)),
        |value| text(clean_path(&value.render())),
    ))
}

/// Engines before 2.0 only report the infra container ID key when there is
/// an infra container; later ones always report it, empty when absent.
fn infra(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let state = info.get("state");
    let present = if state.has_key("infracontainerid") {
        !state.get("infracontainerid").text().is_empty()
    } else if ctx.version().at_least(2, 0, 0) {
        !info.get("infracontainerid").text().is_empty()
    } else {
        info.has_key("infracontainerid")
    };
    let observed = text(bool_string(present).to_owned());
    Some(ctx.against("infra", observed, Mode::BoolString))
}

fn infra_image(ctx: &DiffContext<'_>) -> Option<Comparison> {
    if !ctx.live().has_infra() {
        return None;
    }
    let observed = image_base(&ctx.infra().get("imagename").text());
    Some(compare_explicit(ctx, "infra_image", text(observed), |value| {
        text(image_base(&value.render()))
    }))
}

fn label(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let mut observed = if info.get("config").has_key("labels") {
        info.at(&["config", "labels"]).entries()
    } else {
        info.get("labels").entries()
    };
    observed.remove(QUADLET_LABEL);
    Some(compare_with(ctx, "label", string_map(&observed), |value| {
        string_map(&lowered_entries(value))
    }))
}

fn network(ctx: &DiffContext<'_>) -> Option<Comparison> {
    if !ctx.live().has_infra() {
        return None;
    }
    Some(compare_networks(ctx.infra(), ctx.param("network")))
}

fn publish(ctx: &DiffContext<'_>) -> Option<Comparison> {
    if !ctx.live().has_infra() {
        return None;
    }
    let observed = observed_ports(ctx.infra().at(&["hostconfig", "portbindings"]));
    let requested = ctx
        .param("publish")
        .map(ParamValue::values)
        .unwrap_or_default();
    compare_ports(observed, &requested)
}

/// Older engines report sharing as `config.shares<ns>` booleans.
fn shared_namespaces(ctx: &DiffContext<'_>) -> Vec<String> {
    let info = ctx.info();
    if info.has_key("sharednamespaces") {
        return info.get("sharednamespaces").strings();
    }
    let config = info.get("config");
    config
        .keys()
        .into_iter()
        .filter(|key| config.get(key).as_bool() != Some(false))
        .filter_map(|key| key.strip_prefix("shares").map(str::to_lowercase))
        .collect()
}

fn share(ctx: &DiffContext<'_>) -> Option<Comparison> {
    if !ctx.live().has_infra() {
        return None;
    }
    let explicit = |namespace: &String| namespace != IMPLICIT_SHARE;
    let observed = shared_namespaces(ctx).into_iter().filter(explicit);
    let requested = ctx.param("share").map_or_else(
        || DEFAULT_SHARE.map(str::to_owned).to_vec(),
        ParamValue::items,
    );
    Some(Comparison::new(
        string_set(observed),
        string_set(requested.into_iter().filter(explicit)),
    ))
}

fn defaults(_version: &EngineVersion, _live: &LiveState) -> Defaults {
    let none = || ParamValue::List(Vec::new());
    Defaults::from([
        ("add_host", none()),
        ("dns", none()),
        ("dns_opt", none()),
        ("dns_search", none()),
        ("infra", ParamValue::Bool(true)),
        ("label", ParamValue::Map(BTreeMap::new())),
    ])
}

/// The pod catalog.
pub(super) fn catalog() -> Catalog {
    Catalog::new(ResourceKind::Pod, PARAMS, defaults)
}
