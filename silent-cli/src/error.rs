//! Error types emitted by the `silent-locations` CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use silent_data::{FetcherBuildError, PipelineError};
use thiserror::Error;

/// Errors emitted by the `silent-locations` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// An option was present but its value is unusable.
    #[error("invalid --{field} value {value:?}: {reason}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// The output directory exists but is not a directory.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory { path: Utf8PathBuf },
    /// The output directory could not be inspected due to an IO error.
    #[error("failed to inspect output directory {path:?}: {source}")]
    InspectOutputDirectory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Installing the global logger failed.
    #[error("failed to install logger: {0}")]
    Logging(#[source] log::SetLoggerError),
    /// Constructing the Overpass client failed.
    #[error("failed to build Overpass client: {0}")]
    BuildFetcher(#[from] FetcherBuildError),
    /// The dataset build aborted.
    #[error("dataset build failed: {0}")]
    Pipeline(#[from] PipelineError),
    /// Writing the run summary failed.
    #[error("failed to write build summary: {0}")]
    WriteSummary(#[source] std::io::Error),
}
