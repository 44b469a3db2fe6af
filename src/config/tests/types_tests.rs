//! Type, serialisation and CLI parsing tests.

use clap::Parser;
use rstest::rstest;

use crate::config::tests::helpers::{app_config_from_full_toml, app_config_from_partial_toml};
use crate::config::{AppConfig, Cli, Commands, DiffConfig, ImageConfig};
use crate::diff::{CompareOptions, DiffMode};
use crate::resources::ResourceKind;

#[rstest]
fn app_config_defaults_are_fail_fast_and_lenient() {
    let config = AppConfig::default();
    assert_eq!(config.diff_mode(), DiffMode::FailFast);
    assert_eq!(config.compare_options(), CompareOptions::default());
}

#[rstest]
fn full_toml_sets_every_field(#[from(app_config_from_full_toml)] config: AppConfig) {
    assert_eq!(config.engine_version.as_deref(), Some("4.9.3"));
    assert_eq!(config.diff, DiffConfig { full: true });
    assert_eq!(config.image, ImageConfig { strict: true });
    assert_eq!(config.diff_mode(), DiffMode::Full);
    assert!(config.compare_options().image_strict);
}

#[rstest]
fn partial_toml_keeps_section_defaults(#[from(app_config_from_partial_toml)] config: AppConfig) {
    assert_eq!(
        config.engine_version.as_deref(),
        Some("podman version 5.2.0")
    );
    assert_eq!(config.diff, DiffConfig::default());
    assert_eq!(config.image, ImageConfig::default());
}

#[rstest]
fn plan_arguments_parse() {
    let cli = Cli::try_parse_from([
        "poddiff",
        "--engine-version",
        "4.9.3",
        "plan",
        "--kind",
        "container",
        "--desired",
        "web.json",
        "--inspect",
        "inspect.json",
        "--full",
    ])
    .expect("arguments should parse");

    assert_eq!(cli.engine_version.as_deref(), Some("4.9.3"));
    assert!(cli.full);
    assert!(!cli.image_strict);
    let Commands::Plan(args) = cli.command else {
        panic!("expected the plan subcommand");
    };
    assert_eq!(args.kind, ResourceKind::Container);
    assert_eq!(args.desired.as_str(), "web.json");
    assert_eq!(
        args.inspect.as_deref().map(camino::Utf8Path::as_str),
        Some("inspect.json")
    );
    assert!(args.image.is_none());
}

#[rstest]
#[case::container("container", ResourceKind::Container)]
#[case::pod("pod", ResourceKind::Pod)]
#[case::volume("volume", ResourceKind::Volume)]
#[case::network("network", ResourceKind::Network)]
fn params_accepts_every_kind(#[case] name: &str, #[case] expected: ResourceKind) {
    let cli =
        Cli::try_parse_from(["poddiff", "params", "--kind", name]).expect("arguments should parse");
    let Commands::Params(args) = cli.command else {
        panic!("expected the params subcommand");
    };
    assert_eq!(args.kind, expected);
}

#[rstest]
fn unknown_kind_is_rejected() {
    let result = Cli::try_parse_from(["poddiff", "params", "--kind", "secret"]);
    assert!(result.is_err());
}
