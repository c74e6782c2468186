//! Config CLI commands.
//!
//! Commands for creating and inspecting the Carousel configuration file.

use std::path::{Path, PathBuf};

use crate::cli::output::print_highlighted_json;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{Settings, config_paths, preferred_config_path};
use crate::error::CarouselError;

/// Writes the configuration template, or prints it with `stdout`.
///
/// # Errors
///
/// Returns an error if the file exists without `force` or cannot be written.
pub fn init(force: bool, stdout: bool, custom_path: Option<PathBuf>) -> Result<u8, CarouselError> {
    if stdout {
        println!("{}", generate_config_template());
        return Ok(0);
    }

    let config_path = custom_path.unwrap_or_else(preferred_config_path);
    create_config_file(&config_path, force)?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nEdit the categories, key devices and schedules to match your system.");
    Ok(0)
}

/// Prints the loaded settings as highlighted JSON.
///
/// # Errors
///
/// Never fails once settings are loaded.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn show(settings: &Settings) -> Result<u8, CarouselError> {
    let value = serde_json::to_value(settings).unwrap_or_default();
    print_highlighted_json(&value);
    Ok(0)
}

/// Shows the configuration search paths and which one is in use.
///
/// # Errors
///
/// Never fails.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn show_paths(custom: Option<&Path>) -> Result<u8, CarouselError> {
    if let Some(path) = custom {
        let marker = if path.is_file() { " (active)" } else { " (missing)" };
        println!("Configuration file given with --config:\n\n  {}{marker}", path.display());
        return Ok(0);
    }

    println!("Configuration file search paths (in priority order):\n");

    let lines = path_listing(&config_paths());
    for line in &lines {
        println!("{line}");
    }

    if !lines.iter().any(|line| line.ends_with("(active)")) {
        println!("\nNo configuration file found.");
        println!("Run 'carousel init' to create one.");
    }

    Ok(0)
}

/// Numbers each path and marks the first existing one as active.
fn path_listing(paths: &[PathBuf]) -> Vec<String> {
    let mut found_config = false;

    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let exists = path.is_file();
            let marker = if exists && !found_config {
                found_config = true;
                " (active)"
            } else if exists {
                " (exists)"
            } else {
                ""
            };
            format!("  {}. {}{}", i + 1, path.display(), marker)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_config_paths_returns_non_empty() {
        let paths = config_paths();
        // Should have at least one path (unless no HOME directory)
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }

    #[test]
    fn test_path_listing_marks_first_existing_file_active() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("carousel.jsonc");
        let first = dir.path().join("carousel.json");
        let second = dir.path().join("goCarousel.json");
        fs::write(&first, "{}").unwrap();
        fs::write(&second, "{}").unwrap();

        let lines = path_listing(&[missing, first, second]);
        assert!(lines[0].starts_with("  1. ") && !lines[0].contains('('));
        assert!(lines[1].ends_with("(active)"));
        assert!(lines[2].ends_with("(exists)"));
    }

    #[test]
    fn test_init_writes_to_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("carousel.jsonc");

        assert_eq!(init(false, false, Some(path.clone())).unwrap(), 0);
        assert!(path.is_file());
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carousel.jsonc");
        fs::write(&path, "{}").unwrap();

        assert!(init(false, false, Some(path.clone())).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        assert_eq!(init(true, false, Some(path.clone())).unwrap(), 0);
        assert_ne!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
