#![allow(clippy::multiple_crate_versions)]

//! Carousel command-line entry point.
//!
//! Without a subcommand the scheduled jobs due this minute are run, so a
//! crontab line of `* * * * * carousel --scheduled` is enough to drive it.

use std::process::ExitCode;

fn main() -> ExitCode {
    match carousel_lib::cli::run() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::error!(code = %err.code(), origin = err.origin(), error = %err, "carousel failed");
            eprintln!("{}", carousel_lib::cli::error_line(&err));
            ExitCode::FAILURE
        }
    }
}
