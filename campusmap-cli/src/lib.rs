//! Command-line interface for building the campus feature collection.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod build;
mod error;

pub use error::CliError;

use build::{BuildArgs, run_build};

const ARG_INPUTS: &str = "inputs";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ARG_CATEGORY_OVERRIDE: &str = "category-override";
const ENV_INPUTS: &str = "CAMPUSMAP_CMDS_BUILD_INPUTS";
const DEFAULT_OUTPUT_DIR: &str = "public";

/// Run the campusmap CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when argument parsing, configuration, input
/// decoding or output writing fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Build(args) => {
            let written = run_build(args)?;
            log::info!("Attribution written to {}", written.attribution);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "campusmap",
    about = "Turn campus map topology into named, categorised polygons",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the GeoJSON feature collection from Overpass payloads.
    Build(BuildArgs),
}

#[cfg(test)]
mod tests;
