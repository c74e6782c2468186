//! Configuration template generation.
//!
//! `carousel init` writes a working example: two carousels over a handful of
//! categories under `~/Pictures/Wallpapers`, two of them protected by a key
//! device, plus a weekday schedule.

use std::fs;
use std::path::Path;

use super::types::{AngelOptions, Category, ConfigError, Schedule, ScheduleAction, Settings, UserOptions};
use crate::action::Action;

const KEY_DEVICE_CARD: &str = "MMC_Card";
const KEY_DEVICE_STICK: &str = "USB-Maxell";

const PUBLIC_CAROUSEL: &str = "Public";
const PRIVATE_CAROUSEL: &str = "Private";

const HEADER: &str = "// Carousel Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
//
// key_devices entries are \"vendorId:productId volumeLabel md5\". The md5 is
// the checksum of goCarousel.png at the root of the key volume; print it with
// `md5sum /media/<you>/<label>/goCarousel.png`.
//
// Schedule actions: ActNone, ActDefaultWallpaper, ActAnyWallpaper,
// ActLockCarousel, ActUnlockCarousel, ActChosenFile, ActChosenCategory,
// ActChosenCarousel, ActStatus, ActIdentify.
";

/// Builds the example settings rooted at `home`.
#[must_use]
pub fn example_settings(home: &str) -> Settings {
    let walls = format!("{home}/Pictures/Wallpapers");

    let mut settings = Settings {
        default_dir: walls.clone(),
        default_wallpaper: "/usr/share/backgrounds/gnome/adwaita-l.jpg".to_string(),
        user_options: UserOptions {
            notify: true,
            assume_session: "gnome".to_string(),
        },
        angel_options: AngelOptions {
            first_action: ScheduleAction::new(Action::ChosenCarousel, PUBLIC_CAROUSEL),
            last_action: ScheduleAction::new(Action::DefaultWallpaper, ""),
        },
        ..Settings::default()
    };

    for name in ["Aviation", "Misc", "Nature"] {
        settings.categories.insert(name.to_string(), Category::new(format!("{walls}/{name}")));
    }
    settings.categories.insert(
        "Anime".to_string(),
        Category::protected(format!("{walls}/Anime"), KEY_DEVICE_CARD),
    );
    settings.categories.insert(
        "Gothic".to_string(),
        Category::protected(format!("{home}/Pictures/Goth"), KEY_DEVICE_CARD),
    );

    settings.carousels.insert(
        PUBLIC_CAROUSEL.to_string(),
        vec!["Aviation".to_string(), "Misc".to_string(), "Nature".to_string()],
    );
    settings
        .carousels
        .insert(PRIVATE_CAROUSEL.to_string(), vec!["Anime".to_string(), "Gothic".to_string()]);

    settings.key_devices.insert(
        KEY_DEVICE_CARD.to_string(),
        "058f:6335 E0FD-1813 00000000000000000000000000000000".to_string(),
    );
    settings.key_devices.insert(
        KEY_DEVICE_STICK.to_string(),
        "058f:6387 MAXELL_BLUE 00000000000000000000000000000000".to_string(),
    );

    settings.schedules = vec![
        Schedule::new("Public Carousel weekend", "*/10 * * * 0,6", Action::ChosenCarousel, PUBLIC_CAROUSEL),
        Schedule::new("Public Carousel afterhours", "*/10 15-23 * * 1-5", Action::ChosenCarousel, PUBLIC_CAROUSEL),
        Schedule::new("Revert to default", "56 11 * * 1-5", Action::DefaultWallpaper, ""),
        Schedule::new("Lock before lunch", "59 11 * * 1-5", Action::Lock, ""),
        Schedule::new("Unlock after lunch", "0 13 * * 1-5", Action::Unlock, ""),
        Schedule::new("Anime time", "*/10 8-11 * * 1-5", Action::ChosenCategory, "Anime"),
        Schedule::new("Fun time", "*/10 13-14 * * 1-5", Action::ChosenCarousel, PRIVATE_CAROUSEL),
        Schedule::new(
            "The woods",
            "0 16 * * 1-5",
            Action::ChosenFile,
            format!("{walls}/Nature/enchanted-wood.jpg"),
        ),
    ];

    settings
}

/// Generates the configuration file content for the current user.
#[must_use]
pub fn generate_config_template() -> String {
    let home = dirs::home_dir().map_or_else(|| "~".to_string(), |h| h.display().to_string());
    render(&example_settings(&home))
}

fn render(settings: &Settings) -> String {
    let body = serde_json::to_string_pretty(settings).unwrap_or_else(|_| "{}".to_string());
    format!("{HEADER}\n{body}\n")
}

/// Writes the configuration template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::AlreadyExists`] if the file exists and `force` is
/// false, or [`ConfigError::Io`] if it cannot be written.
pub fn create_config_file(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }

    let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    fs::write(path, generate_config_template()).map_err(io_err)
}
