//! Key device diagnostics.

use colored::Colorize;

use crate::cli::output::format_bool;
use crate::config::Settings;
use crate::error::CarouselError;
use crate::modules::carousel::auth::{self, KEY_MARKER_FILE, KeyInspection};
use crate::platform::SystemHost;

/// Prints every authorization factor of key device `name`.
///
/// # Errors
///
/// Never fails; an unusable key is reported, not raised.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn execute(settings: &Settings, name: &str) -> Result<u8, CarouselError> {
    let host = SystemHost::new();
    let inspection = auth::inspect(settings, &host, name);

    for line in factor_lines(&inspection) {
        println!("{line}");
    }
    Ok(0)
}

fn factor_lines(key: &KeyInspection) -> Vec<String> {
    let usb = match key.usb_present {
        Some(present) => format_bool(present),
        None => "?".yellow().to_string(),
    };
    let mount = key
        .mount_point
        .as_ref()
        .map_or_else(|| "not mounted".to_string(), |path| path.display().to_string());

    vec![
        format!("Key device '{}'", key.name),
        format!("  {} configured", format_bool(key.configured)),
        format!("  {} descriptor well formed", format_bool(key.well_formed)),
        format!("  {usb} USB device present"),
        format!("  {} mounted ({mount})", format_bool(key.mount_point.is_some())),
        format!("  {} {KEY_MARKER_FILE} present", format_bool(key.marker_present)),
        format!("  {} checksum matches", format_bool(key.checksum_matches)),
        format!("  {} authorized", format_bool(key.authorized)),
    ]
}
