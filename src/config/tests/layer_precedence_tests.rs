//! Layer precedence tests for `MergeComposer` config composition.

use crate::config::AppConfig;
use crate::config::tests::helpers::{
    assert_config_has_defaults, create_composer_with_defaults, create_composer_with_file_and_env,
    merge_config,
};
use ortho_config::serde_json::json;
use rstest::rstest;

/// Serialised `AppConfig::default()` survives a trip through `MergeComposer`,
/// as `load_config` relies on.
#[rstest]
fn layer_precedence_serialised_defaults_round_trip() {
    let composer = create_composer_with_defaults().expect("composer creation should succeed");
    let config = merge_config(composer).expect("merge should succeed");
    let expected = AppConfig::default();

    assert_eq!(config.engine_version, expected.engine_version);
    assert_eq!(config.diff, expected.diff);
    assert_eq!(config.image, expected.image);
}

#[rstest]
fn layer_precedence_defaults_provide_baseline() {
    let composer = create_composer_with_defaults().expect("composer creation should succeed");
    let config = merge_config(composer).expect("merge should succeed");

    assert_config_has_defaults(&config);
}

#[rstest]
fn layer_precedence_file_overrides_defaults() {
    let mut composer = create_composer_with_defaults().expect("composer creation should succeed");
    composer.push_file(
        json!({
            "engine_version": "4.4.1",
            "diff": { "full": true }
        }),
        None,
    );

    let config = merge_config(composer).expect("merge should succeed");

    assert_eq!(config.engine_version.as_deref(), Some("4.4.1"));
    assert!(config.diff.full);
    assert!(!config.image.strict);
}

#[rstest]
fn layer_precedence_env_overrides_file() {
    let composer = create_composer_with_file_and_env().expect("composer creation should succeed");
    let config = merge_config(composer).expect("merge should succeed");

    assert_eq!(config.engine_version.as_deref(), Some("4.9.3"));
    // Not in the env layer, so the file value survives.
    assert!(config.image.strict);
}

#[rstest]
fn layer_precedence_cli_overrides_all() {
    let mut composer =
        create_composer_with_file_and_env().expect("composer creation should succeed");
    composer.push_cli(json!({
        "engine_version": "5.2.0",
        "diff": { "full": true }
    }));

    let config = merge_config(composer).expect("merge should succeed");

    assert_eq!(config.engine_version.as_deref(), Some("5.2.0"));
    assert!(config.diff.full);
    assert!(config.image.strict);
}

#[rstest]
fn nested_layers_merge_field_by_field() {
    let mut composer = create_composer_with_defaults().expect("composer creation should succeed");
    composer.push_file(json!({ "image": { "strict": true } }), None);
    composer.push_environment(json!({ "diff": { "full": true } }));

    let config = merge_config(composer).expect("merge should succeed");

    assert!(config.diff.full);
    assert!(config.image.strict);
}

#[rstest]
#[case::padded("  4.9.3\n", Some("4.9.3"))]
#[case::blank("   ", None)]
fn post_merge_trims_engine_version(#[case] raw: &str, #[case] expected: Option<&str>) {
    let mut composer = create_composer_with_defaults().expect("composer creation should succeed");
    composer.push_file(json!({ "engine_version": raw }), None);

    let config = merge_config(composer).expect("merge should succeed");

    assert_eq!(config.engine_version.as_deref(), expected);
}
