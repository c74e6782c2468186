//! CLI module for Carousel.
//!
//! Parses the command line, installs logging for the execution mode and runs
//! the selected command. Every command works directly on the loaded settings;
//! there is no background service to talk to.

mod commands;
mod output;

use clap::Parser;
pub use commands::{Cli, EXIT_LOCKED};
pub use output::error_line;

use crate::error::CarouselError;
use crate::logging;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<u8, CarouselError> {
    let cli = Cli::parse();
    logging::init(cli.execution_mode());
    cli.execute()
}
