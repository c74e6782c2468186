//! Desktop session detection and wallpaper backends.
//!
//! [`resolve`] works out which desktop environment is running and returns a
//! [`SessionBackend`] bound to it, together with the environment variables
//! desktop tools need when Carousel runs outside the user's session (cron).
//! The resolver never mutates process state; callers apply the returned
//! variables through [`Host::apply_env`].

mod gnome;
mod lxde;
mod windows;
mod xfce;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub use gnome::{GnomeFlavor, GnomeSession};
pub use lxde::LxdeSession;
pub use self::windows::WindowsSession;
pub use xfce::XfceSession;

use crate::error::CarouselError;
use crate::platform::{Host, HostError};

/// Environment variables naming the current session, in priority order.
pub const SESSION_ENV_VARS: [&str; 2] = ["GDMSESSION", "XDG_CURRENT_DESKTOP"];

/// Session manager processes and the session they indicate.
const SESSION_PROCESSES: [(&str, SessionKind); 5] = [
    ("cinnamon-session", SessionKind::Cinnamon),
    ("gnome-session-binary", SessionKind::Gnome),
    ("gnome-session", SessionKind::Gnome),
    ("xfce4-session", SessionKind::Xfce),
    ("lxsession", SessionKind::Lxde),
];

/// Linux truncates process names to this many bytes.
const PROCESS_NAME_LIMIT: usize = 15;

/// The supported desktop environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Gnome,
    Cinnamon,
    Xfce,
    Lxde,
    Windows,
}

impl SessionKind {
    /// Maps a session name to a kind, case-insensitively.
    ///
    /// `XDG_CURRENT_DESKTOP` style lists (`ubuntu:GNOME`) match on any entry.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.split(':').find_map(|part| match part.trim().to_ascii_lowercase().as_str() {
            "gnome" | "gnome-xorg" | "gnome-wayland" | "gnome-classic" | "ubuntu" => {
                Some(Self::Gnome)
            }
            "cinnamon" | "x-cinnamon" => Some(Self::Cinnamon),
            "xfce" | "xfce4" | "xubuntu" => Some(Self::Xfce),
            "lxde" | "lxde-pi" | "lubuntu" => Some(Self::Lxde),
            "windows" => Some(Self::Windows),
            _ => None,
        })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gnome => "gnome",
            Self::Cinnamon => "cinnamon",
            Self::Xfce => "xfce",
            Self::Lxde => "lxde",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// A wallpaper backend bound to one desktop environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    /// GNOME and Cinnamon share the gsettings protocol.
    Gnome(GnomeSession),
    Xfce(XfceSession),
    Lxde(LxdeSession),
    Windows(WindowsSession),
}

impl SessionBackend {
    /// Builds the backend for `kind`. `home` is only used by LXDE.
    #[must_use]
    pub fn for_kind(kind: SessionKind, home: Option<&Path>) -> Self {
        match kind {
            SessionKind::Gnome => Self::Gnome(GnomeSession::new(GnomeFlavor::Gnome)),
            SessionKind::Cinnamon => Self::Gnome(GnomeSession::new(GnomeFlavor::Cinnamon)),
            SessionKind::Xfce => Self::Xfce(XfceSession),
            SessionKind::Lxde => Self::Lxde(LxdeSession::new(home)),
            SessionKind::Windows => Self::Windows(WindowsSession),
        }
    }

    /// Reads the desktop's current color scheme or theme name.
    ///
    /// # Errors
    ///
    /// Returns the host error if the desktop tool fails.
    pub fn query_color_scheme<H: Host + ?Sized>(&self, host: &H) -> Result<String, HostError> {
        match self {
            Self::Gnome(session) => session.query_color_scheme(host),
            Self::Xfce(session) => session.query_color_scheme(host),
            Self::Lxde(session) => session.query_color_scheme(host),
            Self::Windows(session) => Ok(session.query_color_scheme()),
        }
    }

    /// Sets the wallpaper in the slot matching the current color scheme.
    ///
    /// # Errors
    ///
    /// Returns the host error if the scheme cannot be read or the wallpaper
    /// cannot be set.
    pub fn set_wallpaper_auto<H: Host + ?Sized>(&self, host: &H, path: &Path) -> Result<(), HostError> {
        let scheme = self.query_color_scheme(host)?;
        if is_dark(&scheme) {
            self.set_wallpaper_dark(host, path)
        } else {
            self.set_wallpaper_light(host, path)
        }
    }

    /// Sets the wallpaper used with dark themes.
    ///
    /// # Errors
    ///
    /// Returns the host error if the desktop tool fails.
    pub fn set_wallpaper_dark<H: Host + ?Sized>(&self, host: &H, path: &Path) -> Result<(), HostError> {
        match self {
            Self::Gnome(session) => session.set_wallpaper_dark(host, path),
            Self::Xfce(session) => session.set_wallpaper(host, path),
            Self::Lxde(session) => session.set_wallpaper(host, path),
            Self::Windows(session) => session.set_wallpaper(host, path),
        }
    }

    /// Sets the wallpaper used with light themes.
    ///
    /// # Errors
    ///
    /// Returns the host error if the desktop tool fails.
    pub fn set_wallpaper_light<H: Host + ?Sized>(&self, host: &H, path: &Path) -> Result<(), HostError> {
        match self {
            Self::Gnome(session) => session.set_wallpaper_light(host, path),
            Self::Xfce(session) => session.set_wallpaper(host, path),
            Self::Lxde(session) => session.set_wallpaper(host, path),
            Self::Windows(session) => session.set_wallpaper(host, path),
        }
    }

    /// Short identity string of the backend.
    #[must_use]
    pub const fn identify(&self) -> &'static str {
        match self {
            Self::Gnome(session) => session.identify(),
            Self::Xfce(_) => XfceSession::IDENTITY,
            Self::Lxde(_) => LxdeSession::IDENTITY,
            Self::Windows(_) => WindowsSession::IDENTITY,
        }
    }
}

/// Whether a scheme or theme name denotes a dark variant.
#[must_use]
pub fn is_dark(scheme: &str) -> bool { scheme.to_ascii_lowercase().contains("dark") }

/// A backend plus the environment desktop tools need to reach the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub kind: SessionKind,
    pub backend: SessionBackend,
    pub env: BTreeMap<String, String>,
}

/// Detects the active desktop session.
///
/// Order: the platform's only session (Windows), the session environment
/// variables, running session-manager processes, then `assume_session`.
///
/// # Errors
///
/// Returns [`CarouselError::UnknownSessionManager`] when a session variable
/// names an unsupported desktop, or when nothing identifies the session and
/// `assume_session` is empty or unsupported.
pub fn resolve<H: Host + ?Sized>(host: &H, assume_session: &str) -> Result<ResolvedSession, CarouselError> {
    let kind = detect(host, assume_session)?;
    let backend = SessionBackend::for_kind(kind, host.home_dir().as_deref());
    let env = session_environment(host, kind);

    tracing::debug!(session = %kind, backend = backend.identify(), "resolved session");
    Ok(ResolvedSession { kind, backend, env })
}

fn detect<H: Host + ?Sized>(host: &H, assume_session: &str) -> Result<SessionKind, CarouselError> {
    if let Some(kind) = host.native_session() {
        return Ok(kind);
    }

    let signal = SESSION_ENV_VARS
        .iter()
        .find_map(|name| host.env_var(name).filter(|value| !value.trim().is_empty()));

    if let Some(name) = signal {
        return SessionKind::from_name(&name).ok_or(CarouselError::UnknownSessionManager(name));
    }

    if let Some(kind) = detect_from_processes(&host.process_names()) {
        tracing::debug!(session = %kind, "detected session from running processes");
        return Ok(kind);
    }

    match SessionKind::from_name(assume_session) {
        Some(kind) => {
            tracing::info!(session = %kind, "no session detected, assuming configured session");
            Ok(kind)
        }
        None if assume_session.trim().is_empty() => Err(CarouselError::UnknownSessionManager(
            "couldn't determine session manager".to_string(),
        )),
        None => Err(CarouselError::UnknownSessionManager(assume_session.to_string())),
    }
}

fn detect_from_processes(names: &[String]) -> Option<SessionKind> {
    SESSION_PROCESSES.iter().find_map(|(wanted, kind)| {
        names.iter().any(|name| process_matches(name, wanted)).then_some(*kind)
    })
}

fn process_matches(name: &str, wanted: &str) -> bool {
    name == wanted || (name.len() == PROCESS_NAME_LIMIT && wanted.starts_with(name))
}

/// Variables that let gsettings and friends reach the user's session bus.
///
/// `DISPLAY` is only supplied when the process has none.
fn session_environment<H: Host + ?Sized>(host: &H, kind: SessionKind) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    if kind == SessionKind::Windows {
        return env;
    }

    let Some(uid) = host.user_id() else {
        tracing::warn!("unable to determine user id, session bus variables not set");
        return env;
    };

    env.insert(
        "DBUS_SESSION_BUS_ADDRESS".to_string(),
        format!("unix:path=/run/user/{uid}/bus"),
    );
    env.insert("XDG_RUNTIME_DIR".to_string(), format!("/run/user/{uid}"));

    if host.env_var("DISPLAY").is_none_or(|display| display.is_empty()) {
        env.insert("DISPLAY".to_string(), ":0".to_string());
    }

    env
}
