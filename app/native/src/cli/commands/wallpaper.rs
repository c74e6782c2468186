//! Wallpaper CLI commands.
//!
//! Every wallpaper, lock and identity command is a single dispatcher action.

use super::EXIT_LOCKED;
use crate::action::Action;
use crate::cli::output::{print_warning, report_line};
use crate::config::Settings;
use crate::error::{CarouselError, Outcome, Report};
use crate::modules::carousel::Dispatcher;
use crate::platform::SystemHost;

/// Runs `action` against the live desktop and prints its report.
///
/// # Errors
///
/// Returns the dispatcher's hard error.
pub fn execute(settings: &Settings, action: Action, argument: &str) -> Result<u8, CarouselError> {
    let host = SystemHost::new();
    let dispatcher = Dispatcher::new(settings, &host);
    finish(dispatcher.execute(action, argument))
}

/// Prints an outcome and maps it to the process exit code.
fn finish(outcome: Outcome) -> Result<u8, CarouselError> {
    match outcome {
        Outcome::Ok(report) => {
            if let Some(line) = report_line(&report) {
                println!("{line}");
            }
            Ok(exit_code(&report))
        }
        Outcome::Warning(warning) => {
            print_warning(&warning);
            Ok(0)
        }
        Outcome::Error(err) => Err(err),
    }
}

const fn exit_code(report: &Report) -> u8 {
    match report {
        Report::Status { locked: true } => EXIT_LOCKED,
        _ => 0,
    }
}
