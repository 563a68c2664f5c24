//! Build command implementation for the campusmap CLI.

use camino::{Utf8Path, Utf8PathBuf};
use campusmap_core::{BuildConfig, Category, CategoryOverrides, ElementRef, build_features};
use campusmap_data::{OverpassPayload, WrittenArtefacts, merge_payloads, write_feature_collection};
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CATEGORY_OVERRIDE, ARG_INPUTS, ARG_OUTPUT_DIR, CliError, DEFAULT_OUTPUT_DIR, ENV_INPUTS,
};

/// CLI arguments for the `build` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Assemble campus polygons from one or more Overpass JSON \
                 payloads and write a GeoJSON feature collection with its \
                 attribution notice. Options can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Build the campus feature collection"
)]
#[ortho_config(prefix = "CAMPUSMAP")]
pub(crate) struct BuildArgs {
    /// Overpass JSON payloads to merge, in priority order.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) inputs: Vec<Utf8PathBuf>,
    /// Directory receiving `campus.geojson` and `attribution.txt`.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// Simplification tolerance in metres.
    #[arg(long = "simplify-tolerance", value_name = "metres")]
    #[serde(default)]
    pub(crate) simplify_tolerance: Option<f64>,
    /// Share of a child's area that must fall inside its parent.
    #[arg(long = "overlap-threshold", value_name = "ratio")]
    #[serde(default)]
    pub(crate) overlap_threshold: Option<f64>,
    /// Outward buffer applied to children that touch no parent.
    #[arg(long = "overlap-buffer", value_name = "metres")]
    #[serde(default)]
    pub(crate) overlap_buffer: Option<f64>,
    /// Manual category assignment such as `way/123=Stadium`. Repeatable.
    #[arg(long = ARG_CATEGORY_OVERRIDE, value_name = "element=category")]
    #[serde(default)]
    pub(crate) category_override: Vec<String>,
}

impl BuildArgs {
    pub(crate) fn into_settings(self) -> Result<BuildSettings, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BuildSettings::try_from(merged)
    }
}

/// Resolved `build` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BuildSettings {
    /// Payload files in priority order.
    pub(crate) inputs: Vec<Utf8PathBuf>,
    /// Output directory.
    pub(crate) output_dir: Utf8PathBuf,
    /// Validated engine configuration.
    pub(crate) config: BuildConfig,
}

impl BuildSettings {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        for input in &self.inputs {
            Self::require_existing(input, ARG_INPUTS)?;
        }
        Self::require_output_dir(&self.output_dir)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match campusmap_fs::is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn require_output_dir(path: &Utf8Path) -> Result<(), CliError> {
        match campusmap_fs::dir_exists(path) {
            Ok(true) => Ok(()),
            Ok(false) if matches!(campusmap_fs::is_file(path), Ok(true)) => {
                Err(CliError::OutputDirectoryNotDirectory {
                    path: path.to_path_buf(),
                })
            }
            Ok(false) => Ok(()),
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_OUTPUT_DIR,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<BuildArgs> for BuildSettings {
    type Error = CliError;

    fn try_from(args: BuildArgs) -> Result<Self, Self::Error> {
        if args.inputs.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_INPUTS,
                env: ENV_INPUTS,
            });
        }

        let overrides = args
            .category_override
            .iter()
            .map(|text| parse_override(text))
            .collect::<Result<CategoryOverrides, _>>()?;
        let mut config = BuildConfig::default().with_overrides(overrides);
        if let Some(metres) = args.simplify_tolerance {
            config = config.with_simplify_tolerance(metres)?;
        }
        if let Some(ratio) = args.overlap_threshold {
            config = config.with_overlap_threshold(ratio)?;
        }
        if let Some(metres) = args.overlap_buffer {
            config = config.with_overlap_buffer(metres)?;
        }

        Ok(Self {
            inputs: args.inputs,
            output_dir: args
                .output_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)),
            config,
        })
    }
}

/// Parse `kind/id=Category` into an override entry.
pub(crate) fn parse_override(text: &str) -> Result<(ElementRef, Category), CliError> {
    let invalid = |reason: String| CliError::InvalidOverride {
        value: text.to_owned(),
        reason,
    };
    let (element, category) = text
        .split_once('=')
        .ok_or_else(|| invalid("expected `<element>=<category>`".to_owned()))?;
    let element_ref = element
        .parse::<ElementRef>()
        .map_err(|err| invalid(err.to_string()))?;
    let label = category
        .parse::<Category>()
        .map_err(|err| invalid(err.to_string()))?;
    Ok((element_ref, label))
}

pub(crate) fn run_build(args: BuildArgs) -> Result<WrittenArtefacts, CliError> {
    let settings = args.into_settings()?;
    settings.validate_sources()?;
    execute_build(&settings)
}

pub(crate) fn execute_build(settings: &BuildSettings) -> Result<WrittenArtefacts, CliError> {
    let payloads = settings
        .inputs
        .iter()
        .map(|path| OverpassPayload::read(path))
        .collect::<Result<Vec<_>, _>>()?;
    let elements = merge_payloads(payloads);
    let report = build_features(&elements, &settings.config);
    for diagnostic in &report.diagnostics {
        warn!("{diagnostic}");
    }
    info!(
        "Built {} features ({} excluded, {} diagnostics)",
        report.features.len(),
        report.exclusions.len(),
        report.diagnostics.len()
    );
    Ok(write_feature_collection(
        &settings.output_dir,
        &report.features,
    )?)
}

#[cfg(test)]
pub(crate) fn settings_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<BuildSettings, CliError> {
    let merged = BuildArgs::merge_from_layers(layers).map_err(CliError::from)?;
    BuildSettings::try_from(merged)
}
