//! Executable lookup for external programs.
//!
//! Cron starts jobs with a minimal `PATH`, so the usual system directories are
//! always searched after whatever `PATH` holds.

use std::env;
use std::path::{Path, PathBuf};

use super::HostError;

/// Directories searched after `PATH`.
const FALLBACK_DIRS: [&str; 5] = ["/usr/bin", "/bin", "/usr/local/bin", "/usr/sbin", "/sbin"];

/// Resolve the absolute path to an executable binary.
///
/// Absolute paths are accepted as long as they point to an executable file.
/// Bare names are looked up in `CAROUSEL_EXTRA_PATHS` (colon separated), then
/// `PATH`, then the fixed system directories.
///
/// # Errors
///
/// Returns [`HostError::BinaryNotFound`] when no executable is found.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, HostError> {
    if binary.is_empty() {
        return Err(HostError::BinaryNotFound(String::new()));
    }

    let candidate = Path::new(binary);
    if candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(HostError::BinaryNotFound(binary.to_string()))
        };
    }

    search_paths()
        .into_iter()
        .filter(|directory| !directory.as_os_str().is_empty())
        .map(|directory| directory.join(binary))
        .find(|path| is_executable(path))
        .ok_or_else(|| HostError::BinaryNotFound(binary.to_string()))
}

fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(extra) = env::var_os("CAROUSEL_EXTRA_PATHS") {
        paths.extend(env::split_paths(&extra));
    }

    if let Some(path_var) = env::var_os("PATH") {
        paths.extend(env::split_paths(&path_var));
    }

    paths.extend(FALLBACK_DIRS.iter().map(PathBuf::from));
    paths
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };

    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
