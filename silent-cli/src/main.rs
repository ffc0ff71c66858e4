//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use silent_cli::CliError;

fn main() {
    match silent_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("silent-locations: {err}");
            std::process::exit(1);
        }
    }
}
