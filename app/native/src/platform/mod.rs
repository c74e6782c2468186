//! Platform abstractions for Carousel.
//!
//! Everything that touches the operating system goes through the [`Host`]
//! trait, so the selection and authorization logic never branches on the
//! target platform:
//!
//! - [`command`] - Executable lookup for external programs
//! - [`devices`] - Parsers for `lsblk` and `lsusb` output
//! - [`path`] - Tilde expansion
//! - `unix` / `win32` - The [`SystemHost`] for the build target

pub mod command;
pub mod devices;
pub mod path;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod win32;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
#[cfg(unix)]
pub use unix::SystemHost;
#[cfg(windows)]
pub use win32::SystemHost;

use crate::session::SessionKind;

/// Failures talking to the operating system.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("unable to locate executable '{0}' in known search paths")]
    BinaryNotFound(String),

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code}: {stderr}")]
    ExitStatus {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("{program} was terminated by a signal")]
    Terminated { program: String },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("system call failed: {0}")]
    System(String),
}

/// How an external program's exit status is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitConvention {
    /// 0 is success; anything else is a failure.
    Strict,
    /// grep style: 0 found, 1 not found, 2 and above a failure.
    Search,
}

/// Captured result of an external program that did not fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramOutput {
    pub stdout: String,
    /// Always `true` under [`ExitConvention::Strict`].
    pub found: bool,
}

impl ProgramOutput {
    #[must_use]
    pub fn found(stdout: impl Into<String>) -> Self { Self { stdout: stdout.into(), found: true } }

    #[must_use]
    pub fn absent() -> Self { Self::default() }
}

/// Maps an exit status onto `convention`.
///
/// `code` is `None` when the process was killed by a signal.
///
/// # Errors
///
/// Returns [`HostError::ExitStatus`] for failure codes and
/// [`HostError::Terminated`] when no code is available.
pub fn interpret_exit(
    program: &str,
    code: Option<i32>,
    stdout: String,
    stderr: &str,
    convention: ExitConvention,
) -> Result<ProgramOutput, HostError> {
    let Some(code) = code else {
        return Err(HostError::Terminated { program: program.to_string() });
    };

    match (convention, code) {
        (_, 0) => Ok(ProgramOutput { stdout, found: true }),
        (ExitConvention::Search, 1) => Ok(ProgramOutput { stdout, found: false }),
        _ => Err(HostError::ExitStatus {
            program: program.to_string(),
            code,
            stderr: stderr.trim().to_string(),
        }),
    }
}

/// Operating-system capabilities used by the engine.
///
/// Implementations must be cheap to call repeatedly; the engine does not cache
/// anything between calls.
pub trait Host {
    /// Reads an environment variable of the current process.
    fn env_var(&self, name: &str) -> Option<String>;

    /// The session this platform always runs, if it has exactly one.
    fn native_session(&self) -> Option<SessionKind> { None }

    /// Names of the running processes.
    fn process_names(&self) -> Vec<String>;

    /// Numeric id of the current user (POSIX only).
    fn user_id(&self) -> Option<u32>;

    fn home_dir(&self) -> Option<PathBuf>;

    /// Makes `vars` visible to every external program launched afterwards.
    fn apply_env(&self, vars: &BTreeMap<String, String>);

    /// Runs an external program to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be found or started, or if its
    /// exit status is a failure under `convention`.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        convention: ExitConvention,
    ) -> Result<ProgramOutput, HostError>;

    /// Finds where the volume labelled `label` is mounted.
    ///
    /// # Errors
    ///
    /// Returns an error only when the lookup itself fails; an absent or
    /// unmounted volume is `Ok(None)`.
    fn mount_point(&self, label: &str) -> Result<Option<PathBuf>, HostError>;

    /// Whether a USB device with the given ids is plugged in.
    ///
    /// # Errors
    ///
    /// Returns an error when the query itself fails.
    fn usb_present(&self, vendor: &str, product: &str) -> Result<bool, HostError>;

    /// Sets the wallpaper through the operating system itself.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Unsupported`] where the desktop owns the wallpaper
    /// (every POSIX session), or the system error on failure.
    fn set_desktop_wallpaper(&self, path: &Path) -> Result<(), HostError>;
}
