//! The `.nochange` lock marker.
//!
//! While the marker exists, wallpaper-changing actions must not run. Nothing is
//! cached: every query goes back to the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Settings;

/// Marker file name inside the default wallpaper directory.
pub const LOCK_FILE_NAME: &str = ".nochange";

/// Handle on the lock marker of one wallpaper directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self { Self { path: dir.join(LOCK_FILE_NAME) } }

    /// The lock marker for `settings.default_dir`.
    #[must_use]
    pub fn for_settings(settings: &Settings) -> Self { Self::in_dir(&settings.default_dir()) }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    #[must_use]
    pub fn is_locked(&self) -> bool { self.path.exists() }

    /// Creates or overwrites the marker with the current local time.
    ///
    /// # Errors
    ///
    /// Returns the write error, e.g. when the directory does not exist.
    pub fn lock(&self) -> io::Result<()> {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %z").to_string();
        fs::write(&self.path, stamp)
    }

    /// Removes the marker.
    ///
    /// # Errors
    ///
    /// Returns the remove error, including `NotFound` when no lock exists.
    pub fn unlock(&self) -> io::Result<()> { fs::remove_file(&self.path) }
}
