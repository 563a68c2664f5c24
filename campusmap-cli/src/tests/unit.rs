//! Focused unit tests covering build CLI configuration and validation.

use super::*;
use camino::Utf8PathBuf;
use campusmap_core::{Category, ConfigError, ElementRef};
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

#[rstest]
fn converting_without_inputs_errors() {
    let err = BuildSettings::try_from(BuildArgs::default()).expect_err("inputs are required");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_INPUTS);
            assert_eq!(env, ENV_INPUTS);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn defaults_fill_unset_options() {
    let args = BuildArgs {
        inputs: vec![Utf8PathBuf::from("campus.json")],
        ..BuildArgs::default()
    };
    let settings = BuildSettings::try_from(args).expect("settings");
    assert_eq!(settings.output_dir, Utf8PathBuf::from(DEFAULT_OUTPUT_DIR));
    assert_eq!(settings.config, campusmap_core::BuildConfig::default());
}

#[rstest]
#[case("way/42=Stadium", ElementRef::way(42), Category::Stadium)]
#[case("relation/7 = parking structure", ElementRef::relation(7), Category::ParkingStructure)]
fn overrides_parse_element_and_label(
    #[case] text: &str,
    #[case] element: ElementRef,
    #[case] category: Category,
) {
    let parsed = parse_override(text).expect("valid override");
    assert_eq!(parsed, (element, category));
}

#[rstest]
#[case("way/42")]
#[case("street/42=Stadium")]
#[case("way/42=Velodrome")]
fn malformed_overrides_are_rejected(#[case] text: &str) {
    match parse_override(text) {
        Err(CliError::InvalidOverride { value, .. }) => assert_eq!(value, text),
        other => panic!("expected InvalidOverride, found {other:?}"),
    }
}

#[rstest]
fn overrides_reach_the_engine_config() {
    let args = BuildArgs {
        inputs: vec![Utf8PathBuf::from("campus.json")],
        category_override: vec!["way/9=Operations".to_owned()],
        ..BuildArgs::default()
    };
    let settings = BuildSettings::try_from(args).expect("settings");
    assert_eq!(
        settings.config.overrides.get(ElementRef::way(9)),
        Some(Category::Operations)
    );
}

#[rstest]
#[case(Some(1.5), None)]
#[case(None, Some(-0.25))]
fn out_of_range_tuning_is_rejected(#[case] threshold: Option<f64>, #[case] buffer: Option<f64>) {
    let args = BuildArgs {
        inputs: vec![Utf8PathBuf::from("campus.json")],
        overlap_threshold: threshold,
        overlap_buffer: buffer,
        ..BuildArgs::default()
    };
    let err = BuildSettings::try_from(args).expect_err("range check");
    assert!(matches!(
        err,
        CliError::InvalidSetting(
            ConfigError::ThresholdOutOfRange { .. } | ConfigError::Negative { .. }
        )
    ));
}

#[rstest]
fn validate_sources_reports_missing_inputs() {
    let (_tmp, root) = workspace();
    let settings = BuildSettings {
        inputs: vec![root.join("missing.json")],
        output_dir: root.join("public"),
        config: campusmap_core::BuildConfig::default(),
    };
    match settings.validate_sources() {
        Err(CliError::MissingSourceFile { field, path }) => {
            assert_eq!(field, ARG_INPUTS);
            assert_eq!(path, root.join("missing.json"));
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories_as_inputs() {
    let (_tmp, root) = workspace();
    let settings = BuildSettings {
        inputs: vec![root.clone()],
        output_dir: root.join("public"),
        config: campusmap_core::BuildConfig::default(),
    };
    match settings.validate_sources() {
        Err(CliError::SourcePathNotFile { field, .. }) => assert_eq!(field, ARG_INPUTS),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_output_file() {
    let (_tmp, root) = workspace();
    let input = root.join("campus.json");
    let output = root.join("public");
    fs::write(&input, b"{\"elements\": []}").expect("write input");
    fs::write(&output, b"not a directory").expect("write output placeholder");
    let settings = BuildSettings {
        inputs: vec![input],
        output_dir: output,
        config: campusmap_core::BuildConfig::default(),
    };
    match settings.validate_sources() {
        Err(CliError::OutputDirectoryNotDirectory { .. }) => {}
        other => panic!("expected OutputDirectoryNotDirectory, found {other:?}"),
    }
}

#[rstest]
fn invalid_layer_maps_to_configuration_error() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "overlap_threshold": "high" }));

    let err = settings_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "output_dir": "from-file",
            "overlap_threshold": 0.5,
        }),
        None,
    );
    composer.push_environment(json!({
        "output_dir": "from-env",
        "simplify_tolerance": 0.8,
    }));
    composer.push_cli(json!({
        "inputs": ["campus.json"],
        "simplify_tolerance": 1.2,
    }));

    let settings =
        settings_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(settings.inputs, vec![Utf8PathBuf::from("campus.json")]);
    assert_eq!(settings.output_dir, Utf8PathBuf::from("from-env"));
    assert_eq!(settings.config.overlap.threshold, 0.5);
    assert_eq!(settings.config.simplify_tolerance_m, 1.2);
}
