//! Unit tests for version parsing and gating.

use super::*;
use rstest::rstest;

fn version(text: &str) -> EngineVersion {
    EngineVersion::parse(text).expect("version should parse")
}

#[rstest]
#[case("4.3", "4.3.0")]
#[case("v4.9.3", "4.9.3")]
#[case(" 2.0.0 ", "2.0")]
fn partial_versions_compare_equal(#[case] left: &str, #[case] right: &str) {
    assert_eq!(version(left), version(right));
}

#[rstest]
#[case("4.9.3", "4.10.0")]
#[case("1.6.1", "1.6.2")]
#[case("4.4.0-dev", "4.4.0")]
#[case("4.4.0-dev", "4.4.0-rc1")]
#[case("3.4.7", "4")]
fn versions_order_numerically(#[case] lower: &str, #[case] higher: &str) {
    assert!(version(lower) < version(higher), "{lower} < {higher}");
}

#[rstest]
#[case("")]
#[case("podman")]
#[case("v")]
fn rejects_text_without_numbers(#[case] text: &str) {
    let error = EngineVersion::parse(text).expect_err("parse should fail");
    assert!(matches!(error, DiffError::InvalidVersion { .. }));
}

#[rstest]
#[case("podman version 4.9.3", "4.9.3")]
#[case("Version:      5.0.1\n", "5.0.1")]
#[case("3.4.4", "3.4.4")]
fn extracts_version_from_command_output(#[case] output: &str, #[case] expected: &str) {
    let parsed = EngineVersion::from_version_output(output).expect("output should parse");
    assert_eq!(parsed, version(expected));
    assert_eq!(parsed.to_string(), expected);
}

#[rstest]
fn version_output_without_number_is_rejected() {
    assert!(EngineVersion::from_version_output("podman version unknown").is_err());
}

#[rstest]
fn series_and_floor_helpers() {
    let v = version("1.8.2");
    assert!(v.in_series(1, 8));
    assert!(!v.in_series(1, 9));
    assert!(v.at_least(1, 6, 0));
    assert!(!v.at_least(2, 0, 0));
}

#[rstest]
fn minimum_gate_reports_bound() {
    let gate = VersionGate::since("1.6.2");
    let violation = gate
        .check(&version("1.6.1"))
        .expect_err("older engine should be rejected");
    assert_eq!(violation.bound, GateBound::Minimum);
    assert_eq!(violation.required, "1.6.2");
    assert!(gate.admits(&version("1.6.2")));
}

#[rstest]
fn maximum_gate_is_inclusive() {
    let gate = VersionGate::until("3.4.7");
    assert!(gate.admits(&version("3.4.7")));
    let violation = gate
        .check(&version("4.0.0"))
        .expect_err("newer engine should be rejected");
    assert_eq!(violation.bound, GateBound::Maximum);
}

#[rstest]
fn open_gate_admits_everything() {
    assert!(VersionGate::OPEN.is_open());
    assert!(VersionGate::OPEN.admits(&version("0.1")));
    assert_eq!(VersionGate::OPEN.to_string(), "any");
}

#[rstest]
fn minimum_gates_are_monotonic() {
    let ladder = ["1.0", "1.5.0", "1.6.1", "1.6.2", "2.0", "3.4.7", "4.9.3", "5.1"];
    let gate = VersionGate::since("1.6.2");
    let mut admitted = false;
    for step in ladder {
        let now = gate.admits(&version(step));
        assert!(!admitted || now, "admission regressed at {step}");
        admitted = now;
    }
    assert!(admitted);
}

#[rstest]
fn maximum_gates_are_monotonic() {
    let ladder = ["5.1", "4.9.3", "4.0", "3.4.7", "2.0", "1.0"];
    let gate = VersionGate::until("3.4.7");
    let mut admitted = false;
    for step in ladder {
        let now = gate.admits(&version(step));
        assert!(!admitted || now, "admission regressed at {step}");
        admitted = now;
    }
}

#[rstest]
#[case(VersionGate::since("4.2.0"), ">= 4.2.0")]
#[case(VersionGate::until("3.4.7"), "<= 3.4.7")]
#[case(VersionGate::between("1.0", "2.0"), "1.0 ..= 2.0")]
fn gates_render_for_listings(#[case] gate: VersionGate, #[case] expected: &str) {
    assert_eq!(gate.to_string(), expected);
}
