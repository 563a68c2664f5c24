//! Error types emitted by the campusmap CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use campusmap_core::ConfigError;
use campusmap_data::{GeoJsonWriteError, OverpassError};
use thiserror::Error;

/// Errors emitted by the campusmap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass them as arguments or set {env})")]
    MissingArgument {
        /// Name of the option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Name of the option.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Name of the option.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Name of the option.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The output directory exists but is not a directory.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A category override was not of the form `kind/id=Category`.
    #[error("invalid category override {value:?}: {reason}")]
    InvalidOverride {
        /// Raw override text.
        value: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A numeric setting was out of range.
    #[error(transparent)]
    InvalidSetting(#[from] ConfigError),
    /// An input payload could not be read.
    #[error(transparent)]
    ReadPayload(#[from] OverpassError),
    /// Writing the output failed.
    #[error(transparent)]
    WriteOutput(#[from] GeoJsonWriteError),
}
