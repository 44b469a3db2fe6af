//! Unit tests for the resource catalogs.

use super::*;
use rstest::rstest;

#[rstest]
#[case::container(ResourceKind::Container, "container")]
#[case::pod(ResourceKind::Pod, "pod")]
#[case::volume(ResourceKind::Volume, "volume")]
#[case::network(ResourceKind::Network, "network")]
fn kinds_display_as_podman_nouns(#[case] kind: ResourceKind, #[case] expected: &str) {
    assert_eq!(kind.to_string(), expected);
    assert_eq!(kind.catalog().kind(), kind);
}

#[rstest]
fn kinds_deserialize_from_lowercase_names() {
    let kind: ResourceKind = serde_json::from_str("\"network\"").expect("valid kind");
    assert_eq!(kind, ResourceKind::Network);
}

#[rstest]
#[case::container(ResourceKind::Container)]
#[case::pod(ResourceKind::Pod)]
#[case::volume(ResourceKind::Volume)]
#[case::network(ResourceKind::Network)]
fn catalogs_are_sorted_by_name(#[case] kind: ResourceKind) {
    let catalog = kind.catalog();
    let names: Vec<&str> = catalog.specs().iter().map(|spec| spec.name()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(names, sorted);
}

#[rstest]
#[case::container(ResourceKind::Container)]
#[case::pod(ResourceKind::Pod)]
#[case::volume(ResourceKind::Volume)]
#[case::network(ResourceKind::Network)]
fn aliases_never_shadow_parameter_names(#[case] kind: ResourceKind) {
    let catalog = kind.catalog();
    for spec in catalog.specs() {
        for alias in spec.alias_names() {
            assert!(
                catalog.specs().iter().all(|other| other.name() != *alias),
                "{kind} alias {alias} collides with a parameter"
            );
        }
    }
}

#[rstest]
#[case::container_labels(ResourceKind::Container, "labels", "label")]
#[case::container_ports(ResourceKind::Container, "ports", "publish")]
#[case::container_volumes(ResourceKind::Container, "volumes", "volume")]
#[case::pod_labels(ResourceKind::Pod, "labels", "label")]
#[case::pod_ports(ResourceKind::Pod, "ports", "publish")]
#[case::volume_labels(ResourceKind::Volume, "labels", "label")]
fn aliases_resolve_to_canonical_names(
    #[case] kind: ResourceKind,
    #[case] alias: &str,
    #[case] canonical: &str,
) {
    let catalog = kind.catalog();
    let spec = catalog.spec(alias).expect("alias is indexed");
    assert_eq!(spec.name(), canonical);
}

#[rstest]
#[case::container(ResourceKind::Container, &["cgroups", "cidfile", "conmon_pidfile", "sdnotify"])]
#[case::pod(ResourceKind::Pod, &["exit_policy", "infra_conmon_pidfile", "pod_id_file"])]
#[case::volume(ResourceKind::Volume, &[])]
#[case::network(ResourceKind::Network, &[])]
fn excluded_parameters_are_listed(#[case] kind: ResourceKind, #[case] expected: &[&str]) {
    let names: Vec<&str> = kind.catalog().excluded().map(|spec| spec.name()).collect();
    assert_eq!(names, expected);
}

#[rstest]
fn container_and_pod_label_files_are_not_verifiable() {
    for kind in [ResourceKind::Container, ResourceKind::Pod] {
        let names: Vec<&str> = kind
            .catalog()
            .non_idempotent()
            .map(|spec| spec.name())
            .collect();
        assert!(names.contains(&"label_file"), "{kind}: {names:?}");
    }
}
