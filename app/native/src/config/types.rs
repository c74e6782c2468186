//! Configuration types for Carousel.
//!
//! The on-disk keys (`default_dir`, `options`, `key_devices`, ...) are shared
//! with configuration files written by older releases, so field names are
//! snake case rather than the camel case used elsewhere in JSON output.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::Action;
use crate::platform::path::expand;
use crate::session::SessionKind;

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error("no configuration file found, run `carousel init` to create one")]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file contains invalid JSON.
    #[error("failed to parse configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `init` refused to replace an existing file.
    #[error("configuration file already exists at {}, use --force to overwrite", .0.display())]
    AlreadyExists(PathBuf),

    /// Some schedule entries can never fire.
    #[error("{0} schedule entries have invalid cron expressions")]
    InvalidSchedules(usize),
}

/// User preferences stored under the `options` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UserOptions {
    /// Show desktop notifications after changes and on denied access.
    pub notify: bool,

    /// Session manager to assume when none can be detected, e.g. when the
    /// process is started by cron without any desktop environment variables.
    /// One of `gnome`, `cinnamon`, `xfce`, `lxde`.
    pub assume_session: String,
}

/// A directory of wallpapers, optionally gated behind a key device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Category {
    /// Require the key device named by `key_name` before serving this category.
    pub protected: bool,

    /// Entry in `key_devices` that unlocks this category.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_name: String,

    /// Directory holding the wallpapers. Supports `~`.
    pub directory: String,
}

impl Category {
    #[must_use]
    pub fn new(directory: impl Into<String>) -> Self {
        Self { directory: directory.into(), ..Self::default() }
    }

    #[must_use]
    pub fn protected(directory: impl Into<String>, key_name: impl Into<String>) -> Self {
        Self {
            protected: true,
            key_name: key_name.into(),
            directory: directory.into(),
        }
    }

    /// The key device to check, or `None` when the category is open.
    ///
    /// A protected category with an empty `key_name` yields `Some("")`.
    #[must_use]
    pub fn required_key(&self) -> Option<&str> { self.protected.then_some(self.key_name.as_str()) }

    #[must_use]
    pub fn directory_path(&self) -> PathBuf { expand(&self.directory) }
}

/// An action plus its argument, as used by angel hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScheduleAction {
    pub action: Action,
    pub argument: String,
}

impl ScheduleAction {
    #[must_use]
    pub fn new(action: Action, argument: impl Into<String>) -> Self {
        Self { action, argument: argument.into() }
    }
}

/// Actions run when a daemon session starts and ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AngelOptions {
    pub first_action: ScheduleAction,
    pub last_action: ScheduleAction,
}

/// A cron-triggered action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Schedule {
    pub title: String,
    pub action: Action,
    pub argument: String,

    /// Standard five-field cron expression, evaluated in local time.
    pub cron_tab: String,
}

impl Schedule {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        cron_tab: impl Into<String>,
        action: Action,
        argument: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            action,
            argument: argument.into(),
            cron_tab: cron_tab.into(),
        }
    }

    /// Parses the cron expression.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the expression is malformed.
    pub fn cron(&self) -> Result<croner::Cron, croner::errors::CronError> {
        croner::Cron::new(self.cron_tab.trim()).parse()
    }
}

/// A parsed `"vendor:product label md5"` key-device descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor<'a> {
    pub usb_id: &'a str,
    pub volume_label: &'a str,
    pub checksum: &'a str,
}

impl<'a> KeyDescriptor<'a> {
    /// Number of single-space-separated fields in a descriptor.
    pub const FIELDS: usize = 3;

    /// Splits a descriptor into its three fields.
    ///
    /// Fields are separated by exactly one space. Returns `None` unless there
    /// are exactly three non-empty fields, so doubled spaces and tabs are
    /// rejected.
    #[must_use]
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut parts = raw.split(' ').map(|part| (!part.is_empty()).then_some(part));
        let descriptor = Self {
            usb_id: parts.next()??,
            volume_label: parts.next()??,
            checksum: parts.next()??,
        };
        parts.next().is_none().then_some(descriptor)
    }

    /// The `vendor` and `product` halves of the USB id, if well formed.
    #[must_use]
    pub fn vendor_product(&self) -> Option<(&'a str, &'a str)> {
        let (vendor, product) = self.usb_id.split_once(':')?;
        (!vendor.is_empty() && !product.is_empty()).then_some((vendor, product))
    }
}

/// Process-wide configuration, loaded once and read-only during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    /// Directory used by `any` and home of the `.nochange` lock file. Supports `~`.
    pub default_dir: String,

    /// Wallpaper applied by `default`. Supports `~`.
    pub default_wallpaper: String,

    #[serde(rename = "options")]
    pub user_options: UserOptions,

    pub categories: BTreeMap<String, Category>,

    /// Named pools of category names.
    pub carousels: BTreeMap<String, Vec<String>>,

    /// Key devices as `"vendorId:productId volumeLabel md5hex"`.
    pub key_devices: BTreeMap<String, String>,

    #[serde(rename = "angel")]
    pub angel_options: AngelOptions,

    pub schedules: Vec<Schedule>,
}

impl Settings {
    #[must_use]
    pub fn default_dir(&self) -> PathBuf { expand(&self.default_dir) }

    #[must_use]
    pub fn default_wallpaper(&self) -> PathBuf { expand(&self.default_wallpaper) }

    /// Checks the settings for entries that can never work.
    ///
    /// None of these stop Carousel from running; a protected category with a
    /// dangling key is simply always denied, for instance.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let assumed = self.user_options.assume_session.trim();
        if !assumed.is_empty() && SessionKind::from_name(assumed).is_none() {
            issues.push(ValidationIssue::UnsupportedSession(assumed.to_string()));
        }

        for (name, category) in &self.categories {
            if !category.protected {
                continue;
            }
            if category.key_name.is_empty() {
                issues.push(ValidationIssue::ProtectedWithoutKey(name.clone()));
            } else if !self.key_devices.contains_key(&category.key_name) {
                issues.push(ValidationIssue::UnknownKeyDevice {
                    category: name.clone(),
                    key: category.key_name.clone(),
                });
            }
        }

        for (name, members) in &self.carousels {
            if members.is_empty() {
                issues.push(ValidationIssue::EmptyCarousel(name.clone()));
            }
            for member in members.iter().filter(|m| !self.categories.contains_key(*m)) {
                issues.push(ValidationIssue::UnknownCarouselMember {
                    carousel: name.clone(),
                    category: member.clone(),
                });
            }
        }

        for (name, raw) in &self.key_devices {
            let well_formed =
                KeyDescriptor::parse(raw).is_some_and(|key| key.vendor_product().is_some());
            if !well_formed {
                issues.push(ValidationIssue::MalformedKeyDevice(name.clone()));
            }
        }

        for (index, schedule) in self.schedules.iter().enumerate() {
            if let Err(err) = schedule.cron() {
                issues.push(ValidationIssue::InvalidCron {
                    job: index + 1,
                    title: schedule.title.clone(),
                    reason: err.to_string(),
                });
            }
        }

        issues
    }
}

/// A configuration entry that can never behave as intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    UnsupportedSession(String),
    ProtectedWithoutKey(String),
    UnknownKeyDevice { category: String, key: String },
    EmptyCarousel(String),
    UnknownCarouselMember { carousel: String, category: String },
    MalformedKeyDevice(String),
    InvalidCron { job: usize, title: String, reason: String },
}

impl ValidationIssue {
    /// Invalid cron entries make the schedule unusable; everything else only
    /// degrades individual requests.
    #[must_use]
    pub const fn is_fatal(&self) -> bool { matches!(self, Self::InvalidCron { .. }) }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSession(name) => {
                write!(f, "assume_session '{name}' is not a supported session manager")
            }
            Self::ProtectedWithoutKey(category) => {
                write!(f, "category '{category}' is protected but has no key_name")
            }
            Self::UnknownKeyDevice { category, key } => {
                write!(f, "category '{category}' references unknown key device '{key}'")
            }
            Self::EmptyCarousel(carousel) => write!(f, "carousel '{carousel}' has no categories"),
            Self::UnknownCarouselMember { carousel, category } => {
                write!(f, "carousel '{carousel}' references unknown category '{category}'")
            }
            Self::MalformedKeyDevice(name) => write!(
                f,
                "key device '{name}' must be 'vendorId:productId volumeLabel md5'"
            ),
            Self::InvalidCron { job, title, reason } => {
                write!(f, "job #{job:02} '{title}' has an invalid cron_tab: {reason}")
            }
        }
    }
}
