//! Wallpaper selection.
//!
//! Resolves a request (a directory, a category, a carousel or an explicit file)
//! into a single image path and pushes it through the bound session backend.

use std::fs;
use std::path::{Path, PathBuf};

use natord::compare;
use rand::Rng;

use super::auth;
use super::notify::Notifier;
use crate::action::Action;
use crate::config::Settings;
use crate::error::{CarouselError, Outcome, Report, Warning};
use crate::platform::Host;
use crate::session::SessionBackend;

/// Image extensions accepted as wallpapers, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "svg"];

/// Reserved file name holding a category's notification icon.
pub const CATEGORY_ICON: &str = ".category_icon.png";

/// Whether `path` names a wallpaper by extension, excluding the category icon.
///
/// Only the name is inspected; callers check that the entry is a regular file.
#[must_use]
pub fn is_wallpaper_name(path: &Path) -> bool {
    if path.file_name().is_some_and(|name| name == CATEGORY_ICON) {
        return false;
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

/// Lists the qualifying wallpapers directly inside `dir`, in natural order.
///
/// # Errors
///
/// Returns [`CarouselError::NoQualifyingWallpaper`] when the directory cannot
/// be read or holds no qualifying file.
pub fn list_wallpapers(dir: &Path) -> Result<Vec<PathBuf>, CarouselError> {
    let entries = fs::read_dir(dir).map_err(|source| CarouselError::NoQualifyingWallpaper {
        dir: dir.to_path_buf(),
        source: Some(source),
    })?;

    let mut wallpapers: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_wallpaper_name(path))
        .collect();

    if wallpapers.is_empty() {
        return Err(CarouselError::NoQualifyingWallpaper { dir: dir.to_path_buf(), source: None });
    }

    wallpapers.sort_by(|a, b| compare(a.to_string_lossy().as_ref(), b.to_string_lossy().as_ref()));
    Ok(wallpapers)
}

/// Picks one element uniformly at random, or `None` when `items` is empty.
pub fn pick<'a, T, R: Rng>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}

/// Picks a random qualifying wallpaper from `dir`.
///
/// # Errors
///
/// See [`list_wallpapers`].
pub fn random_wallpaper<R: Rng>(dir: &Path, rng: &mut R) -> Result<PathBuf, CarouselError> {
    let wallpapers = list_wallpapers(dir)?;
    pick(&wallpapers, rng)
        .cloned()
        .ok_or_else(|| CarouselError::NoQualifyingWallpaper { dir: dir.to_path_buf(), source: None })
}

/// The selection operations, bound to one resolved session.
pub struct Selector<'a, H: Host + ?Sized> {
    settings: &'a Settings,
    host: &'a H,
    backend: &'a SessionBackend,
    notifier: &'a dyn Notifier,
}

impl<'a, H: Host + ?Sized> Selector<'a, H> {
    pub fn new(
        settings: &'a Settings,
        host: &'a H,
        backend: &'a SessionBackend,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self { settings, host, backend, notifier }
    }

    fn apply(&self, path: &Path, category: Option<&str>) -> Result<Report, CarouselError> {
        self.backend.set_wallpaper_auto(self.host, path)?;
        tracing::info!(
            path = %path.display(),
            category = category.unwrap_or_default(),
            session = self.backend.identify(),
            "wallpaper applied"
        );
        Ok(Report::Applied {
            path: path.to_path_buf(),
            category: category.map(ToString::to_string),
        })
    }

    /// Applies a random wallpaper from the default directory.
    ///
    /// # Errors
    ///
    /// Fails when the directory has no qualifying file or the backend fails.
    pub fn any<R: Rng>(&self, rng: &mut R) -> Result<Report, CarouselError> {
        let path = random_wallpaper(&self.settings.default_dir(), rng)?;
        self.apply(&path, None)
    }

    /// Applies the configured default wallpaper as-is.
    ///
    /// # Errors
    ///
    /// Fails with [`CarouselError::MissingTarget`] when none is configured.
    pub fn default_wallpaper(&self) -> Result<Report, CarouselError> {
        if self.settings.default_wallpaper.trim().is_empty() {
            return Err(CarouselError::MissingTarget { action: Action::DefaultWallpaper });
        }
        self.apply(&self.settings.default_wallpaper(), None)
    }

    /// Applies an explicit file. No filter or existence check is done here.
    ///
    /// # Errors
    ///
    /// Fails on an empty path or when the backend fails.
    pub fn file(&self, path: &str) -> Result<Report, CarouselError> {
        if path.trim().is_empty() {
            return Err(CarouselError::MissingTarget { action: Action::ChosenFile });
        }
        self.apply(&crate::platform::path::expand(path), None)
    }

    /// Applies a random wallpaper from a category, honoring its key device.
    ///
    /// A denied key yields [`Outcome::Warning`] and leaves the desktop untouched.
    pub fn category<R: Rng>(&self, name: &str, rng: &mut R) -> Outcome {
        if name.trim().is_empty() {
            return Outcome::Error(CarouselError::MissingTarget { action: Action::ChosenCategory });
        }

        let Some(category) = self.settings.categories.get(name) else {
            return Outcome::Error(CarouselError::UnknownCategory(name.to_string()));
        };

        if !auth::authorize_category(self.settings, self.host, category) {
            self.notifier.sound();
            self.notifier.alert(&format!("Access to category '{name}' denied"));
            return Outcome::Warning(Warning::authorization_denied(name));
        }

        let dir = category.directory_path();
        let result = random_wallpaper(&dir, rng).and_then(|path| self.apply(&path, Some(name)));

        if result.is_ok() {
            let icon = dir.join(CATEGORY_ICON);
            let icon = icon.is_file().then_some(icon.as_path());
            self.notifier.notify(&format!("Background from {name}"), icon);
        }

        result.into()
    }

    /// Picks a category of the named carousel and delegates to [`Self::category`].
    pub fn carousel<R: Rng>(&self, name: &str, rng: &mut R) -> Outcome {
        if name.trim().is_empty() {
            return Outcome::Error(CarouselError::MissingTarget { action: Action::ChosenCarousel });
        }

        let Some(members) = self.settings.carousels.get(name) else {
            return Outcome::Error(CarouselError::UnknownCarousel(name.to_string()));
        };

        let Some(category) = pick(members, rng) else {
            tracing::warn!(carousel = %name, "carousel has no categories");
            return Outcome::Error(CarouselError::UnknownCarousel(name.to_string()));
        };

        tracing::debug!(carousel = %name, %category, "carousel picked category");
        self.category(category, rng)
    }
}
