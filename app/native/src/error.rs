//! Error types for Carousel.
//!
//! Carousel reports outcomes on two tiers. Hard failures are [`CarouselError`]
//! values carrying a stable [`ErrorCode`] and an attribution tag. Soft failures
//! are [`Warning`] values: they are reported but never abort a batch of
//! scheduled jobs. The dispatcher folds both into an [`Outcome`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::action::Action;
use crate::config::ConfigError;
use crate::platform::HostError;

/// Stable numeric codes for hard failures.
///
/// The first six values keep the numbering of the historical `#E` codes so log
/// lines stay comparable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ErrorCode {
    MissingTarget = 0,
    NoConfigurationDir = 1,
    NoQualifyingWallpaper = 2,
    UnknownCarousel = 3,
    UnknownCategory = 4,
    UnknownSessionManager = 5,
    Io = 6,
    ExternalProgram = 7,
    Config = 8,
}

impl ErrorCode {
    /// Returns the numeric value of the code.
    #[must_use]
    pub const fn number(self) -> u8 { self as u8 }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#E{:03}", self.number())
    }
}

/// Hard failures raised while resolving or applying a wallpaper request.
#[derive(Debug, Error)]
pub enum CarouselError {
    /// The action needs a target (file, category, carousel, default wallpaper) and got none.
    #[error("missing target for {action}")]
    MissingTarget { action: Action },

    /// No configuration directory exists.
    #[error("configuration directory not found: {}", .0.display())]
    NoConfigurationDir(PathBuf),

    /// A directory yielded no file that passes the wallpaper filter.
    #[error("no qualifying wallpaper files in {}", dir.display())]
    NoQualifyingWallpaper {
        dir: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    #[error("carousel named '{0}' does not exist")]
    UnknownCarousel(String),

    #[error("category named '{0}' does not exist")]
    UnknownCategory(String),

    /// The desktop session could not be detected or is not supported.
    #[error("unknown session manager: {0}")]
    UnknownSessionManager(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CarouselError {
    /// Wraps an I/O error with a short description of what was being attempted.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Returns the stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingTarget { .. } => ErrorCode::MissingTarget,
            Self::NoConfigurationDir(_) => ErrorCode::NoConfigurationDir,
            Self::NoQualifyingWallpaper { .. } => ErrorCode::NoQualifyingWallpaper,
            Self::UnknownCarousel(_) => ErrorCode::UnknownCarousel,
            Self::UnknownCategory(_) => ErrorCode::UnknownCategory,
            Self::UnknownSessionManager(_) => ErrorCode::UnknownSessionManager,
            Self::Io { .. } => ErrorCode::Io,
            Self::Host(_) => ErrorCode::ExternalProgram,
            Self::Config(_) => ErrorCode::Config,
        }
    }

    /// Returns the component the error is attributed to.
    #[must_use]
    pub const fn origin(&self) -> &'static str {
        match self {
            Self::MissingTarget { .. } => "dispatch",
            Self::NoConfigurationDir(_) | Self::Config(_) => "config",
            Self::NoQualifyingWallpaper { .. } => "selection",
            Self::UnknownCarousel(_) | Self::UnknownCategory(_) => "carousel",
            Self::UnknownSessionManager(_) => "session",
            Self::Io { .. } => "io",
            Self::Host(_) => "platform",
        }
    }
}

/// Codes for soft failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum WarningCode {
    Empty = 0,
    AuthorizationDenied = 1,
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#W{:03}", *self as u8) }
}

/// A reportable, non-fatal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub code: WarningCode,
    pub message: String,
    pub origin: &'static str,
}

impl Warning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>, origin: &'static str) -> Self {
        Self { code, message: message.into(), origin }
    }

    /// The warning returned when a protected category refuses access.
    #[must_use]
    pub fn authorization_denied(category: &str) -> Self {
        Self::new(
            WarningCode::AuthorizationDenied,
            format!("authorization denied for category '{category}'"),
            "carousel",
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @{{{}}} {}", self.code, self.origin, self.message)
    }
}

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Report {
    /// Nothing to do (`ActNone` or an unknown action).
    Nothing,
    /// A wallpaper was pushed to the desktop.
    Applied { path: PathBuf, category: Option<String> },
    /// The active session backend identity.
    Identity { name: String },
    Locked,
    Unlocked,
    Status { locked: bool },
}

/// Result of one dispatcher invocation.
///
/// Scheduled batches continue on [`Outcome::Warning`] and stop on
/// [`Outcome::Error`].
#[derive(Debug)]
pub enum Outcome {
    Ok(Report),
    Warning(Warning),
    Error(CarouselError),
}

impl Outcome {
    #[must_use]
    pub const fn is_error(&self) -> bool { matches!(self, Self::Error(_)) }

    #[must_use]
    pub const fn is_warning(&self) -> bool { matches!(self, Self::Warning(_)) }

    /// Converts into a `Result`, treating warnings as successes.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error for [`Outcome::Error`].
    pub fn into_result(self) -> Result<Option<Report>, CarouselError> {
        match self {
            Self::Ok(report) => Ok(Some(report)),
            Self::Warning(_) => Ok(None),
            Self::Error(err) => Err(err),
        }
    }
}

impl From<Result<Report, CarouselError>> for Outcome {
    fn from(result: Result<Report, CarouselError>) -> Self {
        match result {
            Ok(report) => Self::Ok(report),
            Err(err) => Self::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_keep_historical_numbers() {
        assert_eq!(ErrorCode::MissingTarget.number(), 0);
        assert_eq!(ErrorCode::NoConfigurationDir.number(), 1);
        assert_eq!(ErrorCode::NoQualifyingWallpaper.number(), 2);
        assert_eq!(ErrorCode::UnknownCarousel.number(), 3);
        assert_eq!(ErrorCode::UnknownCategory.number(), 4);
        assert_eq!(ErrorCode::UnknownSessionManager.number(), 5);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::UnknownCategory.to_string(), "#E004");
        assert_eq!(WarningCode::AuthorizationDenied.to_string(), "#W001");
    }

    #[test]
    fn test_unknown_category_display() {
        let err = CarouselError::UnknownCategory("Anime".to_string());
        assert_eq!(err.to_string(), "category named 'Anime' does not exist");
        assert_eq!(err.code(), ErrorCode::UnknownCategory);
        assert_eq!(err.origin(), "carousel");
    }

    #[test]
    fn test_missing_target_names_action() {
        let err = CarouselError::MissingTarget { action: Action::ChosenFile };
        assert!(err.to_string().contains("ActChosenFile"));
        assert_eq!(err.origin(), "dispatch");
    }

    #[test]
    fn test_io_error_keeps_context() {
        let source = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = CarouselError::io("failed to remove lock file", source);
        let msg = err.to_string();
        assert!(msg.contains("failed to remove lock file"));
        assert!(msg.contains("gone"));
        assert_eq!(err.code(), ErrorCode::Io);
    }

    #[test]
    fn test_no_qualifying_wallpaper_exposes_source() {
        use std::error::Error as _;

        let err = CarouselError::NoQualifyingWallpaper {
            dir: PathBuf::from("/w/empty"),
            source: Some(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/w/empty"));
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::authorization_denied("Anime");
        let msg = warning.to_string();
        assert!(msg.starts_with("#W001"));
        assert!(msg.contains("Anime"));
    }

    #[test]
    fn test_outcome_into_result_treats_warning_as_success() {
        let outcome = Outcome::Warning(Warning::authorization_denied("Anime"));
        assert!(outcome.is_warning());
        assert!(matches!(outcome.into_result(), Ok(None)));
    }

    #[test]
    fn test_outcome_from_result() {
        let outcome: Outcome = Err(CarouselError::UnknownCarousel("Nope".into())).into();
        assert!(outcome.is_error());

        let outcome: Outcome = Ok(Report::Locked).into();
        assert!(matches!(outcome, Outcome::Ok(Report::Locked)));
    }
}
