//! Unit tests for planning against mocked inspection sources.

use std::sync::{Arc, Mutex};

use mockall::mock;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::error::PoddiffError;

mock! {
    #[derive(Debug)]
    Source {}

    impl InspectionSource for Source {
        fn engine_version(&self) -> std::result::Result<String, InspectionError>;
        fn inspect(&self, kind: ResourceKind, name: &str) -> Lookup;
        fn inspect_image(&self, reference: &str) -> Lookup;
        fn inspect_container(&self, id: &str) -> Lookup;
    }
}

#[derive(Debug, Default)]
struct CapturedLookups {
    images: Vec<String>,
    containers: Vec<String>,
}

fn source_with(version: &str, resource: Option<Value>) -> MockSource {
    let mut source = MockSource::new();
    let reported = String::from(version);
    source
        .expect_engine_version()
        .returning(move || Ok(reported.clone()));
    source
        .expect_inspect()
        .returning(move |_, _| Ok(resource.clone()));
    source
}

fn capture_related(
    source: &mut MockSource,
    image: Option<Value>,
    infra: Option<Value>,
) -> Arc<Mutex<CapturedLookups>> {
    let captured = Arc::new(Mutex::new(CapturedLookups::default()));
    let images_for_closure = Arc::clone(&captured);
    let containers_for_closure = Arc::clone(&captured);
    source.expect_inspect_image().returning(move |reference| {
        images_for_closure
            .lock()
            .expect("mock capture lock should succeed")
            .images
            .push(String::from(reference));
        Ok(image.clone())
    });
    source.expect_inspect_container().returning(move |id| {
        containers_for_closure
            .lock()
            .expect("mock capture lock should succeed")
            .containers
            .push(String::from(id));
        Ok(infra.clone())
    });
    captured
}

/// Fixture providing `podman volume inspect data` for a default volume.
#[fixture]
fn volume() -> Value {
    json!([{
        "Name": "data",
        "Driver": "local",
        "Mountpoint": "/home/user/.local/share/containers/storage/volumes/data/_data",
        "Labels": {},
        "Options": {},
        "Scope": "local"
    }])
}

fn data() -> DesiredState {
    DesiredState::new().with("name", "data")
}

#[rstest]
#[case::not_found(None)]
#[case::empty_inspection(Some(json!([])))]
#[case::null_inspection(Some(Value::Null))]
fn missing_resource_is_created(#[case] resource: Option<Value>) {
    let source = source_with("4.9.3", resource);
    let desired = data().with("driver", "local");
    let plan = Reconciler::new(&source)
        .plan(ResourceKind::Volume, &desired)
        .expect("planning succeeds");
    assert_eq!(plan.action, Action::Create);
    assert!(!plan.diff.is_different());
    assert_eq!(
        plan.command.expect("create command"),
        ["volume", "create", "--driver", "local", "data"]
    );
}

#[rstest]
fn matching_resource_is_left_alone(volume: Value) {
    let source = source_with("4.9.3", Some(volume));
    let plan = Reconciler::new(&source)
        .plan(ResourceKind::Volume, &data())
        .expect("planning succeeds");
    assert_eq!(plan.action, Action::Unchanged);
    assert!(plan.command.is_none());
}

#[rstest]
fn drifted_resource_is_recreated(volume: Value) {
    let source = source_with("4.9.3", Some(volume));
    let desired = data()
        .with("driver", "nfs-plugin")
        .with("labels", ParamValue::from(vec![String::from("app=web")]));
    let plan = Reconciler::new(&source)
        .with_mode(DiffMode::Full)
        .plan(ResourceKind::Volume, &desired)
        .expect("planning succeeds");
    assert_eq!(plan.action, Action::Recreate);
    assert_eq!(plan.diff.params().collect::<Vec<_>>(), ["driver", "label"]);
    assert_eq!(
        plan.command.expect("create command"),
        [
            "volume",
            "create",
            "--driver",
            "nfs-plugin",
            "--label",
            "app=web",
            "data"
        ]
    );
}

#[rstest]
fn fail_fast_plan_reports_one_difference(volume: Value) {
    let source = source_with("4.9.3", Some(volume));
    let desired = data()
        .with("driver", "nfs-plugin")
        .with("labels", ParamValue::from(vec![String::from("app=web")]));
    let plan = Reconciler::new(&source)
        .plan(ResourceKind::Volume, &desired)
        .expect("planning succeeds");
    assert_eq!(plan.action, Action::Recreate);
    assert_eq!(plan.diff.params().count(), 1);
}

#[rstest]
fn forced_recreate_skips_the_diff(volume: Value) {
    let source = source_with("4.9.3", Some(volume));
    let desired = data().with("recreate", true);
    let plan = Reconciler::new(&source)
        .plan(ResourceKind::Volume, &desired)
        .expect("planning succeeds");
    assert_eq!(plan.action, Action::Recreate);
    assert!(!plan.diff.is_different());
    let command = plan.command.expect("create command");
    assert!(!command.iter().any(|arg| arg.contains("recreate")), "{command:?}");
}

#[rstest]
fn container_plans_fetch_the_requested_image() {
    let container = json!({"Name": "web", "Config": {"Image": "alpine"}, "HostConfig": {}});
    let mut source = source_with("4.9.3", Some(container));
    let captured = capture_related(&mut source, None, None);
    let desired = DesiredState::new()
        .with("name", "web")
        .with("image", "alpine");
    Reconciler::new(&source)
        .plan(ResourceKind::Container, &desired)
        .expect("planning succeeds");
    let lookups = captured.lock().expect("mock capture lock should succeed");
    assert_eq!(lookups.images, ["alpine"]);
    assert!(lookups.containers.is_empty());
}

#[rstest]
#[case::current_layout(json!({"Name": "backend", "InfraContainerId": "0f3a"}))]
#[case::legacy_layout(json!({"Config": {"Name": "backend"}, "State": {"InfraContainerID": "0f3a"}}))]
fn pod_plans_fetch_the_infra_container(#[case] pod: Value) {
    let mut source = source_with("4.9.3", Some(pod));
    let captured = capture_related(&mut source, None, None);
    let desired = DesiredState::new().with("name", "backend");
    Reconciler::new(&source)
        .plan(ResourceKind::Pod, &desired)
        .expect("planning succeeds");
    let lookups = captured.lock().expect("mock capture lock should succeed");
    assert_eq!(lookups.containers, ["0f3a"]);
    assert!(lookups.images.is_empty());
}

#[rstest]
#[case::missing(DesiredState::new())]
#[case::blank(DesiredState::new().with("name", " "))]
fn plan_requires_a_name(#[case] desired: DesiredState) {
    let source = MockSource::new();
    let error = Reconciler::new(&source)
        .plan(ResourceKind::Volume, &desired)
        .expect_err("name is required");
    assert!(matches!(
        error,
        PoddiffError::Diff(DiffError::MissingParameter { ref param }) if param == "name"
    ));
}

#[rstest]
fn gated_request_fails_the_plan() {
    let network = json!({"name": "front", "driver": "bridge"});
    let source = source_with("4.0.0", Some(network));
    let desired = DesiredState::new()
        .with("name", "front")
        .with("macvlan", "eth0");
    let error = Reconciler::new(&source)
        .plan(ResourceKind::Network, &desired)
        .expect_err("macvlan is gone in 4.0");
    assert!(matches!(
        error,
        PoddiffError::Diff(DiffError::UnsupportedParameter { .. })
    ));
}

#[rstest]
#[case::text(json!("data"))]
#[case::array_of_text(json!(["data"]))]
fn malformed_inspection_is_rejected(#[case] document: Value) {
    let source = source_with("4.9.3", Some(document));
    let error = Reconciler::new(&source)
        .plan(ResourceKind::Volume, &data())
        .expect_err("inspection is not an object");
    assert_eq!(
        error.to_string(),
        "invalid inspection document for volume 'data': expected an object or an array of objects"
    );
}

#[rstest]
fn inspection_failures_propagate() {
    let mut source = MockSource::new();
    source.expect_engine_version().returning(|| {
        Err(InspectionError::Unavailable {
            what: String::from("engine version"),
            message: String::from("podman not found"),
        })
    });
    let error = Reconciler::new(&source)
        .plan(ResourceKind::Volume, &data())
        .expect_err("no engine");
    assert_eq!(
        error.to_string(),
        "failed to inspect engine version: podman not found"
    );
}

#[rstest]
#[case::bare("4.9.3", "4.9.3")]
#[case::cli_output("podman version 5.2.0\n", "5.2.0")]
fn engine_version_accepts_cli_output(#[case] reported: &str, #[case] expected: &str) {
    let source = StaticInspection::new(reported);
    let version = Reconciler::new(&source)
        .engine_version()
        .expect("valid version");
    assert_eq!(version.to_string(), expected);
}

#[rstest]
fn static_inspection_without_version_is_unavailable() {
    let source = StaticInspection::new("");
    let error = source.engine_version().expect_err("no version");
    assert_eq!(
        error.to_string(),
        "failed to inspect engine version: no engine version was configured"
    );
}

#[rstest]
fn static_inspection_serves_preloaded_documents(volume: Value) {
    let source = StaticInspection::new("4.9.3").with_resource(volume);
    let plan = Reconciler::new(&source)
        .plan(ResourceKind::Volume, &data())
        .expect("planning succeeds");
    assert_eq!(plan.action, Action::Unchanged);
}

#[rstest]
#[case::create(Action::Create, "create")]
#[case::recreate(Action::Recreate, "recreate")]
#[case::unchanged(Action::Unchanged, "unchanged")]
fn actions_display_in_lowercase(#[case] action: Action, #[case] expected: &str) {
    assert_eq!(action.to_string(), expected);
}
