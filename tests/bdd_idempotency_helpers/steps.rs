//! Given/when steps for idempotency scenarios.

use poddiff::diff::DiffMode;
use poddiff::reconcile::{Reconciler, StaticInspection};
use poddiff::resources::ResourceKind;
use poddiff::state::{DesiredState, ParamValue};
use rstest_bdd_macros::{given, when};
use serde_json::{Value, json};

use super::StepResult;
use super::state::{IdempotencyState, PlanOutcome};

fn parse_kind(name: &str) -> StepResult<ResourceKind> {
    ResourceKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == name)
        .ok_or_else(|| format!("unknown resource kind '{name}'"))
}

fn desired(idempotency_state: &IdempotencyState) -> DesiredState {
    idempotency_state.desired.get().unwrap_or_default()
}

/// `podman run --name web alpine` on a rootless 4.9 engine.
fn created_container(effective_caps: &[String]) -> Value {
    json!({
        "Id": "5b1e0c2d",
        "Name": "web",
        "ImageName": "docker.io/library/alpine:latest",
        "HostsPath": "/run/user/1000/containers/overlay-containers/5b1e0c2d/userdata/hosts",
        "EffectiveCaps": effective_caps,
        "Mounts": [],
        "Config": {
            "Hostname": "5b1e0c2d",
            "Env": ["PATH=/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin"],
            "Cmd": ["/bin/sh"],
            "Image": "docker.io/library/alpine:latest",
            "Labels": null,
            "StopSignal": "SIGTERM",
            "StopTimeout": 10,
            "Tty": false,
            "User": "",
            "WorkingDir": "/",
            "CreateCommand": ["podman", "run", "--name", "web", "alpine"]
        },
        "HostConfig": {
            "AutoRemove": false,
            "CpuShares": 0,
            "IpcMode": "shareable",
            "LogConfig": {"Type": "journald", "Path": ""},
            "Memory": 0,
            "MemorySwap": 0,
            "NetworkMode": "slirp4netns",
            "PidMode": "private",
            "PortBindings": {},
            "Privileged": false,
            "UTSMode": "private"
        },
        "NetworkSettings": {"Networks": {}}
    })
}

#[given("a podman {version} engine")]
fn given_engine(idempotency_state: &IdempotencyState, version: String) {
    idempotency_state.engine_version.set(version);
}

#[given("full reporting is enabled")]
fn given_full_reporting(idempotency_state: &IdempotencyState) {
    idempotency_state.full.set(true);
}

#[given("a desired {kind} named {name}")]
fn given_desired_resource(
    idempotency_state: &IdempotencyState,
    kind: String,
    name: String,
) -> StepResult<()> {
    idempotency_state.kind.set(parse_kind(&kind)?);
    idempotency_state
        .desired
        .set(desired(idempotency_state).with("name", name));
    Ok(())
}

#[given("the desired {param} is {value}")]
fn given_desired_param(idempotency_state: &IdempotencyState, param: String, value: String) {
    idempotency_state
        .desired
        .set(desired(idempotency_state).with(&param, ParamValue::from(value)));
}

#[given("the volume exists with the {driver} driver")]
fn given_volume_exists(idempotency_state: &IdempotencyState, driver: String) {
    let name = desired(idempotency_state)
        .name()
        .map(str::to_owned)
        .unwrap_or_default();
    idempotency_state.inspection.set(json!([{
        "Name": name,
        "Driver": driver,
        "Labels": {},
        "Options": {},
        "Scope": "local"
    }]));
}

#[given("the network exists with the {driver} driver")]
fn given_network_exists(idempotency_state: &IdempotencyState, driver: String) {
    let name = desired(idempotency_state)
        .name()
        .map(str::to_owned)
        .unwrap_or_default();
    idempotency_state.inspection.set(json!([{
        "name": name,
        "driver": driver,
        "network_interface": "podman1",
        "subnets": [{"subnet": "10.89.0.0/24", "gateway": "10.89.0.1"}],
        "ipv6_enabled": false,
        "internal": false,
        "dns_enabled": true
    }]));
}

#[given("the container exists with effective capability {capability}")]
fn given_container_exists(idempotency_state: &IdempotencyState, capability: String) {
    idempotency_state
        .inspection
        .set(created_container(&[capability]));
}

#[when("the resource is planned")]
fn when_planned(idempotency_state: &IdempotencyState) -> StepResult<()> {
    let kind = idempotency_state
        .kind
        .get()
        .ok_or_else(|| String::from("resource kind should be configured"))?;
    let version = idempotency_state
        .engine_version
        .get()
        .ok_or_else(|| String::from("engine version should be configured"))?;
    let mode = DiffMode::from_full(idempotency_state.full.get().unwrap_or(false));

    let mut source = StaticInspection::new(version);
    if let Some(document) = idempotency_state.inspection.get() {
        source = source.with_resource(document);
    }

    let outcome = match Reconciler::new(&source)
        .with_mode(mode)
        .plan(kind, &desired(idempotency_state))
    {
        Ok(plan) => PlanOutcome::Planned(plan),
        Err(error) => PlanOutcome::Failed(error.to_string()),
    };
    idempotency_state.outcome.set(outcome);
    Ok(())
}
