//! Configuration module for Carousel.
//!
//! Settings are loaded once per process from the first file found in
//! [`config_paths`] (or from an explicit `--config` path) and passed around by
//! reference afterwards. The file supports JSONC format (JSON with comments).

pub mod template;
pub mod types;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub use types::{
    AngelOptions, Category, ConfigError, KeyDescriptor, Schedule, ScheduleAction, Settings,
    UserOptions, ValidationIssue,
};

use crate::error::CarouselError;

/// Directory name under the user configuration directory.
pub const CONFIG_DIR_NAME: &str = "carousel";

/// Configuration file names, in priority order.
const CONFIG_FILE_NAMES: [&str; 2] = ["carousel.jsonc", "carousel.json"];

/// Location used by releases that stored settings under a vendor group.
const LEGACY_GROUP: &str = "coralys";
const LEGACY_FILE_NAME: &str = "goCarousel.json";

/// Returns the candidate configuration directories, most preferred first.
#[must_use]
pub fn config_dirs() -> Vec<PathBuf> {
    let mut dirs_found = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        dirs_found.push(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let dir = config_dir.join(CONFIG_DIR_NAME);
        if !dirs_found.contains(&dir) {
            dirs_found.push(dir);
        }
    }

    dirs_found
}

/// Returns every configuration file path that is searched, in priority order.
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = config_dirs()
        .into_iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
        .collect();

    if let Some(legacy) = legacy_config_path() {
        paths.push(legacy);
    }

    paths
}

fn legacy_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(LEGACY_GROUP).join(LEGACY_FILE_NAME))
}

/// The path `init` writes to when no explicit path is given.
#[must_use]
pub fn preferred_config_path() -> PathBuf {
    config_paths()
        .into_iter()
        .next()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAMES[0]))
}

/// Parses settings from a JSONC reader.
///
/// # Errors
///
/// Returns the JSON error when the content is not a valid settings document.
pub fn parse_settings<R: Read>(reader: R) -> Result<Settings, serde_json::Error> {
    let stripped = json_comments::StripComments::new(reader);
    serde_json::from_reader(stripped)
}

/// Loads settings from a specific file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be opened and
/// [`ConfigError::Parse`] if it is not valid JSONC.
pub fn load_config_from_path(path: &Path) -> Result<Settings, ConfigError> {
    let file = fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(file).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads settings from `custom` or the first existing file in [`config_paths`].
///
/// # Errors
///
/// Returns [`CarouselError::NoConfigurationDir`] when none of the configuration
/// directories exist, [`ConfigError::NotFound`] when they exist but hold no
/// settings file, and the read/parse errors of [`load_config_from_path`].
pub fn load(custom: Option<&Path>) -> Result<(Settings, PathBuf), CarouselError> {
    if let Some(path) = custom {
        let settings = load_config_from_path(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok((settings, path.to_path_buf()));
    }

    if let Some(path) = config_paths().into_iter().find(|path| path.is_file()) {
        let settings = load_config_from_path(&path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok((settings, path));
    }

    let mut searched_dirs = config_dirs();
    if let Some(legacy_dir) = legacy_config_path().and_then(|p| p.parent().map(Path::to_path_buf)) {
        searched_dirs.push(legacy_dir);
    }

    if searched_dirs.iter().any(|dir| dir.is_dir()) {
        Err(ConfigError::NotFound.into())
    } else {
        Err(CarouselError::NoConfigurationDir(preferred_config_dir()))
    }
}

fn preferred_config_dir() -> PathBuf {
    config_dirs().into_iter().next().unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME))
}
