//! Tilde expansion for paths read from the configuration file.

use std::path::PathBuf;

/// Expands a leading `~` to the user's home directory.
///
/// Surrounding whitespace is trimmed and an empty string yields an empty
/// path. Anything else, including relative paths, is returned unchanged.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}
