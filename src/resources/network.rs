//! The network catalog.
//!
//! Podman reports networks in two layouts: netavark documents carry
//! top-level `subnets`, `dns_enabled` and `internal` keys while CNI
//! documents describe the same settings through a `plugins` list.

use serde_json::Value;

use super::ResourceKind;
use super::shared::compare_explicit;
use crate::diff::{Catalog, Comparison, Defaults, DiffContext, FlagStyle, ParamSpec};
use crate::normalize::{Mode, bool_string, canonical_cidr, canonical_ip};
use crate::state::{Field, LiveState, ParamValue};
use crate::version::{EngineVersion, VersionGate};

/// The CNI plugin that provides name resolution.
const DNS_PLUGIN_KEY: &str = "domainname";

const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("disable_dns")
        .flag("--disable-dns", FlagStyle::Equals)
        .boolean()
        .custom(disable_dns),
    ParamSpec::new("driver")
        .flag("--driver", FlagStyle::Value)
        .custom(driver),
    ParamSpec::new("gateway")
        .flag("--gateway", FlagStyle::Value)
        .custom(gateway),
    ParamSpec::new("internal")
        .flag("--internal", FlagStyle::Equals)
        .boolean()
        .custom(internal),
    ParamSpec::new("ip_range").flag("--ip-range", FlagStyle::Value),
    ParamSpec::new("ipv6")
        .flag("--ipv6", FlagStyle::Switch)
        .boolean()
        .custom(ipv6),
    ParamSpec::new("macvlan")
        .flag("--macvlan", FlagStyle::Value)
        .gate(VersionGate::until("3.4.7")),
    ParamSpec::new("subnet")
        .flag("--subnet", FlagStyle::Value)
        .custom(subnet),
];

fn bool_value(flag: bool) -> Value {
    Value::String(bool_string(flag).to_owned())
}

fn plugins<'a>(ctx: &DiffContext<'a>) -> Vec<Field<'a>> {
    ctx.info().get("plugins").items()
}

/// The first configured subnet, from either layout. Both carry `subnet`
/// and `gateway` keys.
fn first_subnet<'a>(ctx: &DiffContext<'a>) -> Field<'a> {
    let info = ctx.info();
    let netavark = info.get("subnets").nth(0);
    if netavark.exists() {
        return netavark;
    }
    info.get("plugins")
        .nth(0)
        .at(&["ipam", "ranges"])
        .nth(0)
        .nth(0)
}

fn disable_dns(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let disabled = if info.has_key("dns_enabled") {
        info.get("dns_enabled").as_bool() != Some(true)
    } else {
        !plugins(ctx)
            .into_iter()
            .any(|plugin| plugin.has_key(DNS_PLUGIN_KEY))
    };
    Some(ctx.against("disable_dns", bool_value(disabled), Mode::BoolString))
}

fn driver(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let observed = if info.has_key("driver") {
        info.get("driver").text()
    } else {
        info.get("plugins").nth(0).get("type").text()
    };
    Some(ctx.against("driver", Value::String(observed), Mode::Lowercase))
}

fn gateway(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = canonical_ip(&first_subnet(ctx).get("gateway").text());
    Some(compare_explicit(
        ctx,
        "gateway",
        Value::String(observed),
        |value| Value::String(canonical_ip(&value.render())),
    ))
}

fn internal(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let isolated = if info.has_key("internal") {
        info.get("internal").as_bool() == Some(true)
    } else {
        info.get("plugins").nth(0).get("isgateway").as_bool() != Some(true)
    };
    Some(ctx.against("internal", bool_value(isolated), Mode::BoolString))
}

fn ipv6(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let info = ctx.info();
    let enabled = if info.has_key("ipv6_enabled") {
        info.get("ipv6_enabled").as_bool() == Some(true)
    } else {
        first_subnet(ctx).get("subnet").text().contains(':')
    };
    Some(ctx.against_explicit("ipv6", bool_value(enabled), Mode::BoolString))
}

fn subnet(ctx: &DiffContext<'_>) -> Option<Comparison> {
    let observed = canonical_cidr(&first_subnet(ctx).get("subnet").text());
    Some(compare_explicit(
        ctx,
        "subnet",
        Value::String(observed),
        |value| Value::String(canonical_cidr(&value.render())),
    ))
}

fn defaults(_version: &EngineVersion, _live: &LiveState) -> Defaults {
    Defaults::from([
        ("disable_dns", ParamValue::Bool(false)),
        ("driver", ParamValue::from("bridge")),
        ("internal", ParamValue::Bool(false)),
    ])
}

/// The network catalog.
pub(super) fn catalog() -> Catalog {
    Catalog::new(ResourceKind::Network, PARAMS, defaults)
}
