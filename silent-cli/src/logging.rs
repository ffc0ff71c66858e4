//! Process-wide logger installation.

use std::io;

use log::LevelFilter;
use structured_logger::Builder;
use structured_logger::json::new_writer;

use crate::CliError;

/// Install a JSON-lines logger on stderr, keeping stdout for the summary.
pub(crate) fn init_logging(level: LevelFilter) -> Result<(), CliError> {
    Builder::with_level(level.as_str())
        .with_target_writer("*", new_writer(io::stderr()))
        .try_init()
        .map_err(CliError::Logging)?;
    // `Builder` has no notion of `off`.
    log::set_max_level(level);
    Ok(())
}
