//! GNOME and Cinnamon, both driven through `gsettings`.

use std::path::Path;

use crate::platform::{ExitConvention, Host, HostError};

const GSETTINGS: &str = "gsettings";

/// Which gsettings schemas to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GnomeFlavor {
    Gnome,
    /// Cinnamon forks the GNOME schemas under its own names, has no
    /// `color-scheme` key and a single wallpaper slot.
    Cinnamon,
}

impl GnomeFlavor {
    const fn background_schema(self) -> &'static str {
        match self {
            Self::Gnome => "org.gnome.desktop.background",
            Self::Cinnamon => "org.cinnamon.desktop.background",
        }
    }

    const fn interface_schema(self) -> &'static str {
        match self {
            Self::Gnome => "org.gnome.desktop.interface",
            Self::Cinnamon => "org.cinnamon.desktop.interface",
        }
    }

    const fn scheme_key(self) -> &'static str {
        match self {
            Self::Gnome => "color-scheme",
            Self::Cinnamon => "gtk-theme",
        }
    }

    const fn dark_key(self) -> &'static str {
        match self {
            Self::Gnome => "picture-uri-dark",
            Self::Cinnamon => "picture-uri",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnomeSession {
    flavor: GnomeFlavor,
}

impl GnomeSession {
    #[must_use]
    pub const fn new(flavor: GnomeFlavor) -> Self { Self { flavor } }

    #[must_use]
    pub const fn flavor(&self) -> GnomeFlavor { self.flavor }

    pub(super) fn query_color_scheme<H: Host + ?Sized>(&self, host: &H) -> Result<String, HostError> {
        let args = ["get", self.flavor.interface_schema(), self.flavor.scheme_key()];
        let output = host.run(GSETTINGS, &args, ExitConvention::Strict)?;
        Ok(output.stdout.trim().to_string())
    }

    pub(super) fn set_wallpaper_dark<H: Host + ?Sized>(&self, host: &H, path: &Path) -> Result<(), HostError> {
        self.write_uri(host, self.flavor.dark_key(), path)
    }

    pub(super) fn set_wallpaper_light<H: Host + ?Sized>(&self, host: &H, path: &Path) -> Result<(), HostError> {
        self.write_uri(host, "picture-uri", path)
    }

    fn write_uri<H: Host + ?Sized>(&self, host: &H, key: &str, path: &Path) -> Result<(), HostError> {
        let uri = format!("file://{}", path.display());
        let args = ["set", self.flavor.background_schema(), key, uri.as_str()];
        host.run(GSETTINGS, &args, ExitConvention::Strict).map(|_| ())
    }

    pub(super) const fn identify(&self) -> &'static str {
        match self.flavor {
            GnomeFlavor::Gnome => "gnome",
            GnomeFlavor::Cinnamon => "cinnamon",
        }
    }
}
