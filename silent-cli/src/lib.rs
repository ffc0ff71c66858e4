//! Command-line interface for building the silent-mode location dataset.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod build;
mod error;
mod logging;

pub use error::CliError;

use build::BuildArgs;

pub(crate) const ARG_OUTPUT_DIR: &str = "output-dir";
pub(crate) const ARG_DATABASE_FILE: &str = "database-file";
pub(crate) const ARG_MANIFEST_FILE: &str = "manifest-file";
pub(crate) const ARG_REGION_ID: &str = "region-id";
pub(crate) const ARG_ENDPOINT: &str = "endpoint";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_REFERER: &str = "referer";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_AREA_NAME: &str = "area-name";
pub(crate) const ARG_ADMIN_LEVEL: &str = "admin-level";
pub(crate) const ARG_BBOX: &str = "bbox";
pub(crate) const ARG_SCHEMA: &str = "schema";
pub(crate) const ARG_TAXONOMY: &str = "taxonomy";
pub(crate) const ARG_LOG_LEVEL: &str = "log-level";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when parsing, configuration or the build fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Build(args) => build::run_build(args)?,
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "silent-locations",
    about = "Build the offline quiet-venue dataset for the silent mode app",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch venues from Overpass and rebuild the store and manifest.
    Build(BuildArgs),
}

#[cfg(test)]
mod tests;
