//! Wallpaper request kinds.
//!
//! An [`Action`] travels through the configuration file (schedules and angel
//! actions) as its symbolic name, e.g. `"ActChosenCategory"`.
//!
//! Decoding is deliberately lenient: an unrecognized name becomes
//! [`Action::None`] so a single misconfigured schedule entry turns into a no-op
//! instead of rejecting the whole configuration file. [`Action::from_str`] is
//! the strict counterpart used for command-line input.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A request the dispatcher knows how to execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
pub enum Action {
    #[default]
    #[schemars(rename = "ActNone")]
    None,
    #[schemars(rename = "ActDefaultWallpaper")]
    DefaultWallpaper,
    #[schemars(rename = "ActAnyWallpaper")]
    AnyWallpaper,
    #[schemars(rename = "ActLockCarousel")]
    Lock,
    #[schemars(rename = "ActUnlockCarousel")]
    Unlock,
    #[schemars(rename = "ActChosenFile")]
    ChosenFile,
    #[schemars(rename = "ActChosenCategory")]
    ChosenCategory,
    #[schemars(rename = "ActChosenCarousel")]
    ChosenCarousel,
    #[schemars(rename = "ActStatus")]
    Status,
    #[schemars(rename = "ActIdentify")]
    Identify,
}

impl Action {
    /// Every action, in wire-code order.
    pub const ALL: [Self; 10] = [
        Self::None,
        Self::DefaultWallpaper,
        Self::AnyWallpaper,
        Self::Lock,
        Self::Unlock,
        Self::ChosenFile,
        Self::ChosenCategory,
        Self::ChosenCarousel,
        Self::Status,
        Self::Identify,
    ];

    /// Returns the symbolic wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "ActNone",
            Self::DefaultWallpaper => "ActDefaultWallpaper",
            Self::AnyWallpaper => "ActAnyWallpaper",
            Self::Lock => "ActLockCarousel",
            Self::Unlock => "ActUnlockCarousel",
            Self::ChosenFile => "ActChosenFile",
            Self::ChosenCategory => "ActChosenCategory",
            Self::ChosenCarousel => "ActChosenCarousel",
            Self::Status => "ActStatus",
            Self::Identify => "ActIdentify",
        }
    }

    /// Whether executing this action pushes a new wallpaper to the desktop.
    ///
    /// Schedulers must skip these while the carousel is locked.
    #[must_use]
    pub const fn changes_wallpaper(self) -> bool {
        matches!(
            self,
            Self::DefaultWallpaper
                | Self::AnyWallpaper
                | Self::ChosenFile
                | Self::ChosenCategory
                | Self::ChosenCarousel
        )
    }

    /// Whether the action needs a non-empty argument.
    #[must_use]
    pub const fn needs_argument(self) -> bool {
        matches!(self, Self::ChosenFile | Self::ChosenCategory | Self::ChosenCarousel)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Error returned by the strict parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid action '{0}'")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or_else(|_| {
            tracing::warn!(action = %name, "unknown action in configuration, treating as ActNone");
            Self::None
        }))
    }
}
