//! Bespoke container comparisons.
//!
//! Each function reads the container inspection document (and the image
//! document where the engine fills values in from the image) and returns the
//! canonical observed and desired values.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::diff::{Comparison, DiffContext};
use crate::normalize::{
    Mode, bool_string, byte_size, capability, clean_path, image_base, is_anonymous_volume,
    is_port_range, key_values, mount_key, mount_target, nano_cpus, normalize, port_spec,
    signal_number, string_list, string_map, string_set, volume_key,
};
use crate::resources::shared::{
    compare_explicit, compare_networks, compare_ports, compare_with, lowered_entries,
    observed_ports,
};
use crate::state::{CreateCommand, Field, ParamValue};

/// Label set by quadlet on the units it generates.
const QUADLET_LABEL: &str = "podman_systemd_unit";

/// Security option the engine adds on AppArmor hosts.
const DEFAULT_APPARMOR: &str = "apparmor=containers-default";

const fn text(value: String) -> Value {
    Value::String(value)
}

fn hostconfig<'a>(ctx: &DiffContext<'a>) -> Field<'a> {
    ctx.info().get("hostconfig")
}

fn in_pod(ctx: &DiffContext<'_>) -> bool {
    ctx.explicit("pod").is_some_and(|pod| !pod.is_empty())
}

pub(super) fn annotation(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = ctx.info().at(&["config", "annotations"]).entries();
    Some(compare_explicit(ctx, "annotation", string_map(&observed), |value| {
        let mut merged = observed.clone();
        merged.extend(lowered_entries(value));
        string_map(&merged)
    }))
}

pub(super) fn blkio_weight_device(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed: Vec<String> = hostconfig(ctx)
        .get("blkioweightdevice")
        .items()
        .into_iter()
        .map(|device| format!("{}:{}", device.get("path").text(), device.get("weight").text()))
        .collect();
    Some(compare_with(ctx, "blkio_weight_device", string_set(observed), |value| {
        string_set(key_values(&value.entries(), ':'))
    }))
}

fn effective_caps(ctx: &DiffContext<'_>) -> Vec<String> {
    ctx.info()
        .get("effectivecaps")
        .strings()
        .iter()
        .map(|cap| capability(cap))
        .collect()
}

fn capability_set(value: &ParamValue) -> BTreeSet<String> {
    value.items().iter().map(|cap| capability(cap)).collect()
}

pub(super) fn cap_add(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let effective = effective_caps(ctx);
    Some(compare_explicit(ctx, "cap_add", string_set(effective.clone()), |value| {
        string_set(effective.iter().cloned().chain(capability_set(value)))
    }))
}

pub(super) fn cap_drop(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let effective = effective_caps(ctx);
    let added = ctx.explicit("cap_add").map(capability_set).unwrap_or_default();
    Some(compare_explicit(ctx, "cap_drop", string_set(effective.clone()), |value| {
        let dropped = capability_set(value);
        let drop_all = dropped.contains("all");
        let kept = effective.iter().filter(|cap| {
            if drop_all {
                added.contains(*cap)
            } else {
                !dropped.contains(*cap)
            }
        });
        string_set(kept.cloned())
    }))
}

pub(super) fn cgroups(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let config = hostconfig(ctx);
    if !config.has_key("cgroups") {
        return None;
    }
    let observed = config.get("cgroups").text().to_lowercase();
    Some(ctx.against("cgroups", text(observed), Mode::Lowercase))
}

pub(super) fn command(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = ctx.info().at(&["config", "cmd"]).strings();
    Some(compare_explicit(ctx, "command", string_list(observed), |value| {
        string_list(value.words())
    }))
}

pub(super) fn conmon_pidfile(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = ctx
        .create_command()
        .value(&["--conmon-pidfile"])
        .unwrap_or_else(|| ctx.info().get("conmonpidfile").text());
    Some(compare_explicit(ctx, "conmon_pidfile", text(observed), |value| {
        text(value.render())
    }))
}

pub(super) fn cpus(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = hostconfig(ctx).get("nanocpus").as_i64().unwrap_or(0);
    Some(compare_with(ctx, "cpus", text(observed.to_string()), |value| {
        let requested = value.render();
        text(nano_cpus(&requested).map_or(requested, |nanos| nanos.to_string()))
    }))
}

fn device_key(spec: &str) -> String {
    let mut parts = spec.trim().split(':');
    let host = parts.next().unwrap_or_default();
    let container = parts.next().unwrap_or(host);
    format!("{host}:{container}")
}

pub(super) fn device(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed: Vec<String> = hostconfig(ctx)
        .get("devices")
        .items()
        .into_iter()
        .map(|device| {
            format!(
                "{}:{}",
                device.get("pathonhost").text(),
                device.get("pathincontainer").text()
            )
        })
        .collect();
    Some(compare_with(ctx, "device", string_set(observed), |value| {
        string_set(value.values().iter().map(|spec| device_key(spec)))
    }))
}

fn throttle(ctx: &DiffContext<'_>, name: &str, key: &str, bytes: bool) -> Option<Comparison> {
    let rate = |raw: &str| {
        if bytes {
            byte_size(raw)
        } else {
            raw.trim().to_owned()
        }
    };
    let observed: Vec<String> = hostconfig(ctx)
        .get(key)
        .items()
        .into_iter()
        .map(|limit| format!("{}:{}", limit.get("path").text(), rate(&limit.get("rate").text())))
        .collect();
    Some(compare_with(ctx, name, string_set(observed), |value| {
        string_set(value.values().iter().map(|spec| {
            spec.rsplit_once(':').map_or_else(
                || spec.clone(),
                |(path, limit)| format!("{path}:{}", rate(limit)),
            )
        }))
    }))
}

pub(super) fn device_read_bps(ctx: &DiffContext<'_>) -> Option<Comparison> {
    throttle(ctx, "device_read_bps", "blkiodevicereadbps", true)
}

pub(super) fn device_read_iops(ctx: &DiffContext<'_>) -> Option<Comparison> {
    throttle(ctx, "device_read_iops", "blkiodevicereadiops", false)
}

pub(super) fn device_write_bps(ctx: &DiffContext<'_>) -> Option<Comparison> {
    throttle(ctx, "device_write_bps", "blkiodevicewritebps", true)
}

pub(super) fn device_write_iops(ctx: &DiffContext<'_>) -> Option<Comparison> {
    throttle(ctx, "device_write_iops", "blkiodevicewriteiops", false)
}

pub(super) fn entrypoint(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed: Vec<String> = ctx
        .info()
        .at(&["config", "entrypoint"])
        .strings()
        .join(" ")
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    Some(compare_explicit(ctx, "entrypoint", string_list(observed), |value| {
        string_list(value.words())
    }))
}

pub(super) fn env(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed: BTreeMap<String, String> = ctx
        .info()
        .at(&["config", "env"])
        .strings()
        .iter()
        .map(|entry| {
            entry.split_once('=').map_or_else(
                || (entry.clone(), String::new()),
                |(key, value)| (key.to_owned(), value.to_owned()),
            )
        })
        .collect();
    let before = string_set(key_values(&observed, '='));
    Some(compare_explicit(ctx, "env", before, |value| {
        let mut merged = observed.clone();
        merged.extend(value.entries());
        string_set(key_values(&merged, '='))
    }))
}

/// Inspection never reports `--env-host`, so it is assumed off.
pub(super) fn env_host(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = text(bool_string(false).to_owned());
    Some(compare_with(ctx, "env_host", observed, |value| {
        normalize(Some(value), Mode::BoolString)
    }))
}

pub(super) fn etc_hosts(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = hostconfig(ctx).get("extrahosts").strings();
    Some(compare_with(ctx, "etc_hosts", string_set(observed), |value| {
        string_set(key_values(&value.entries(), ':'))
    }))
}

/// Ports exposed by the image or implied by `--publish` are not counted.
pub(super) fn expose(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let requested: Vec<String> = ctx
        .explicit("expose")?
        .items()
        .iter()
        .map(|port| port_spec(port))
        .collect();
    if requested.iter().any(|port| is_port_range(port)) {
        return None;
    }
    let implicit: BTreeSet<String> = ctx
        .image()
        .at(&["config", "exposedports"])
        .keys()
        .into_iter()
        .chain(hostconfig(ctx).get("portbindings").keys())
        .map(|port| port_spec(&port))
        .collect();
    let observed = ctx
        .info()
        .at(&["config", "exposedports"])
        .keys()
        .into_iter()
        .map(|port| port_spec(&port))
        .filter(|port| !implicit.contains(port));
    let wanted = requested.into_iter().filter(|port| !implicit.contains(port));
    Some(Comparison::new(string_set(observed), string_set(wanted)))
}

pub(super) fn healthcheck(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = ctx
        .info()
        .at(&["config", "healthcheck", "test"])
        .nth(1)
        .text();
    Some(compare_explicit(ctx, "healthcheck", text(observed), |value| {
        text(value.render())
    }))
}

/// Images match when the IDs match. Otherwise strict mode compares IDs and
/// lite mode compares base names, ignoring registry and `:latest`.
pub(super) fn image(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let requested = ctx.explicit("image")?.render();
    let observed_id = ctx.info().get("image").text();
    let image_id = ctx.image().get("id").text();
    if !observed_id.is_empty() && observed_id == image_id {
        return Some(Comparison::unchanged(text(observed_id)));
    }
    let strict = ctx
        .explicit("image_strict")
        .and_then(ParamValue::as_bool)
        .unwrap_or(ctx.options().image_strict);
    if strict {
        return Some(Comparison::new(text(observed_id), text(image_id)));
    }
    let observed = ctx
        .info()
        .at(&["config", "image"])
        .as_str()
        .map_or_else(|| ctx.info().get("imagename").text(), str::to_owned);
    Some(Comparison::new(
        text(image_base(&observed)),
        text(image_base(&requested)),
    ))
}

/// A `shareable` namespace is a private one other containers may join.
fn namespace_mode(mode: String) -> String {
    if mode == "shareable" {
        String::from("private")
    } else {
        mode
    }
}

fn pod_namespace(ctx: &DiffContext<'_>, name: &str, key: &str) -> Option<Comparison> {
    let observed = text(namespace_mode(hostconfig(ctx).get(key).text()));
    if in_pod(ctx) && ctx.explicit(name).is_none() {
        return Some(Comparison::unchanged(observed));
    }
    Some(compare_with(ctx, name, observed, |value| {
        text(namespace_mode(value.render()))
    }))
}

pub(super) fn ipc(ctx: &DiffContext<'_>) -> Option<Comparison> {
    pod_namespace(ctx, "ipc", "ipcmode")
}

pub(super) fn uts(ctx: &DiffContext<'_>) -> Option<Comparison> {
    pod_namespace(ctx, "uts", "utsmode")
}

/// Desired labels are layered over the image's labels.
pub(super) fn label(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let mut observed = ctx.info().at(&["config", "labels"]).entries();
    observed.remove(QUADLET_LABEL);
    let image_labels = ctx.image().get("labels");
    let mut wanted = if image_labels.exists() {
        image_labels.entries()
    } else {
        ctx.image().at(&["config", "labels"]).entries()
    };
    if let Some(value) = ctx.param("label") {
        wanted.extend(lowered_entries(value));
    }
    Some(Comparison::new(string_map(&observed), string_map(&wanted)))
}

/// Read from the exit command; not applicable when it carries no level.
pub(super) fn log_level(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = CreateCommand::from_field(ctx.info().get("exitcommand"))
        .value(&["--log-level"])?
        .to_lowercase();
    Some(ctx.against("log_level", text(observed), Mode::Lowercase))
}

fn first_present(fields: [Field<'_>; 2]) -> Option<String> {
    fields
        .into_iter()
        .find(|field| field.exists())
        .map(Field::text)
}

/// Only the log path and tag are visible in inspection output.
pub(super) fn log_opt(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let log_config = hostconfig(ctx).get("logconfig");
    let requested = ctx
        .explicit("log_opt")
        .map(ParamValue::entries)
        .unwrap_or_default();
    let mut observed = BTreeMap::new();
    let mut wanted = BTreeMap::new();
    if let Some(recorded) = first_present([info.get("logpath"), log_config.get("path")]) {
        let path = clean_path(&recorded);
        let desired = requested
            .get("path")
            .map_or_else(|| path.clone(), |value| clean_path(value));
        observed.insert(String::from("path"), path);
        wanted.insert(String::from("path"), desired);
    }
    if let Some(tag) = first_present([info.get("logtag"), log_config.get("tag")]) {
        observed.insert(String::from("tag"), tag);
        wanted.insert(
            String::from("tag"),
            requested.get("tag").cloned().unwrap_or_default(),
        );
    }
    Some(Comparison::new(string_map(&observed), string_map(&wanted)))
}

/// Without an explicit value the engine sets swap to twice the memory limit.
pub(super) fn memory_swap(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = text(byte_size(&hostconfig(ctx).get("memoryswap").text()));
    if let Some(value) = ctx.explicit("memory_swap") {
        return Some(Comparison::new(observed, text(byte_size(&value.render()))));
    }
    let doubled = ctx
        .explicit("memory")
        .and_then(|memory| byte_size(&memory.render()).parse::<u64>().ok())
        .filter(|bytes| *bytes > 0)
        .and_then(|bytes| bytes.checked_mul(2));
    Some(doubled.map_or_else(
        || ctx.against("memory_swap", observed.clone(), Mode::ByteSize),
        |bytes| Comparison::new(observed.clone(), text(bytes.to_string())),
    ))
}

pub(super) fn network(ctx: &DiffContext<'_>) -> Option<Comparison> {
    if in_pod(ctx) && ctx.explicit("network").is_none() {
        let attached = ctx.info().at(&["networksettings", "networks"]).keys();
        return Some(Comparison::unchanged(string_set(attached)));
    }
    Some(compare_networks(ctx.info(), ctx.param("network")))
}

/// `network: none` implies no hosts file.
pub(super) fn no_hosts(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = ctx.info().get("hostspath").text().is_empty();
    let before = text(bool_string(observed).to_owned());
    let no_network = ctx
        .param("network")
        .is_some_and(|network| network.items() == ["none"]);
    let wanted = if no_network {
        Some(true)
    } else {
        ctx.flag("no_hosts")
    };
    Some(wanted.map_or_else(
        || Comparison::unchanged(before.clone()),
        |flag| Comparison::new(before.clone(), text(bool_string(flag).to_owned())),
    ))
}

/// With `publish_all` the image's exposed ports count as published.
pub(super) fn publish(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = observed_ports(hostconfig(ctx).get("portbindings"));
    let mut wanted = ctx
        .param("publish")
        .map(ParamValue::values)
        .unwrap_or_default();
    if ctx.flag("publish_all") == Some(true) {
        wanted.extend(ctx.image().at(&["config", "exposedports"]).keys());
    }
    compare_ports(observed, &wanted)
}

pub(super) fn security_opt(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = hostconfig(ctx)
        .get("securityopt")
        .strings()
        .into_iter()
        .filter(|option| !option.contains(DEFAULT_APPARMOR));
    Some(compare_with(ctx, "security_opt", string_set(observed), |value| {
        string_set(value.values())
    }))
}

pub(super) fn stop_signal(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = signal_number(&ctx.info().at(&["config", "stopsignal"]).text());
    Some(compare_with(ctx, "stop_signal", text(observed), |value| {
        text(signal_number(&value.render()))
    }))
}

/// Compared through the create command; `PATH:OPTIONS` per mount.
pub(super) fn tmpfs(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let recorded = ctx.create_command();
    if !recorded.is_available() {
        return None;
    }
    let observed = recorded.values(&["--tmpfs"]);
    Some(compare_explicit(ctx, "tmpfs", string_set(observed), |value| {
        string_set(value.entries().into_iter().map(|(path, options)| {
            if options.is_empty() {
                path
            } else {
                format!("{path}:{options}")
            }
        }))
    }))
}

/// Bind mounts and named volumes compare as `src=..,dst=..`, anonymous
/// volumes as `dst=..`. Anonymous volumes the image declares are ignored on
/// both sides and tmpfs mounts are left to [`tmpfs`].
pub(super) fn volume(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let implicit: BTreeSet<String> = ctx
        .image()
        .at(&["config", "volumes"])
        .keys()
        .iter()
        .map(|destination| mount_target(None, destination))
        .collect();

    let mut observed = BTreeSet::new();
    for mount in ctx.info().get("mounts").items() {
        let destination = mount.get("destination").text();
        match mount.get("type").text().as_str() {
            "tmpfs" => {}
            "volume" => {
                let name = mount.get("name").text();
                let source = (!is_anonymous_volume(&name)).then_some(name.as_str());
                observed.insert(mount_target(source, &destination));
            }
            _ => {
                observed.insert(mount_target(Some(&mount.get("source").text()), &destination));
            }
        }
    }

    let specs = |name: &str| ctx.param(name).map(ParamValue::values).unwrap_or_default();
    let mut wanted: BTreeSet<String> = specs("volume")
        .iter()
        .filter_map(|spec| volume_key(spec))
        .collect();
    wanted.extend(specs("mount").iter().filter_map(|spec| mount_key(spec)));

    observed.retain(|key| !implicit.contains(key));
    wanted.retain(|key| !implicit.contains(key));
    Some(Comparison::new(string_set(observed), string_set(wanted)))
}
