//! Tracing subscriber setup.
//!
//! The filter is read from `CAROUSEL_LOG`, then `RUST_LOG`, and defaults to
//! `info`. Scheduled runs have no terminal, so they append plain lines to
//! `carousel.log` in the temporary directory instead of writing to stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_FILTER_ENV: &str = "CAROUSEL_LOG";

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_NAME: &str = "carousel.log";

/// How the process was started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Started by a user from a terminal.
    #[default]
    Interactive,
    /// Started by cron, a systemd timer, or another scheduler.
    Scheduled,
}

impl ExecutionMode {
    #[must_use]
    pub const fn from_flag(scheduled: bool) -> Self {
        if scheduled { Self::Scheduled } else { Self::Interactive }
    }
}

/// Where scheduled runs write their log.
#[must_use]
pub fn log_file_path() -> PathBuf { std::env::temp_dir().join(LOG_FILE_NAME) }

/// Picks the filter directive, first non-empty wins.
fn filter_directive(carousel: Option<String>, rust: Option<String>) -> String {
    carousel
        .into_iter()
        .chain(rust)
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn env_filter() -> EnvFilter {
    let directive =
        filter_directive(std::env::var(LOG_FILTER_ENV).ok(), std::env::var("RUST_LOG").ok());
    EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("carousel: invalid log filter '{directive}': {err}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(mode: ExecutionMode) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter()).with_target(false);

    let result = match mode {
        ExecutionMode::Interactive => builder.with_writer(std::io::stderr).try_init(),
        ExecutionMode::Scheduled => {
            let path = log_file_path();
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
                Err(err) => {
                    eprintln!("carousel: cannot open {}: {err}", path.display());
                    builder.with_writer(std::io::stderr).try_init()
                }
            }
        }
    };

    if result.is_ok() {
        tracing::debug!(?mode, "logging initialized");
    }
}
