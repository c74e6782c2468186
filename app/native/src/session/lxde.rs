//! LXDE: the theme comes from the GTK settings file, the wallpaper is set
//! through `pcmanfm`. There is a single wallpaper slot.

use std::path::{Path, PathBuf};

use crate::platform::{ExitConvention, Host, HostError};

const GTK_SETTINGS: &str = ".config/gtk-3.0/settings.ini";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LxdeSession {
    gtk_settings: PathBuf,
}

impl LxdeSession {
    pub const IDENTITY: &'static str = "LXDE";

    #[must_use]
    pub fn new(home: Option<&Path>) -> Self {
        let gtk_settings = home.map_or_else(|| PathBuf::from(GTK_SETTINGS), |home| home.join(GTK_SETTINGS));
        Self { gtk_settings }
    }

    /// Returns the `gtk-theme-name` line, or an empty string if there is none.
    pub(super) fn query_color_scheme<H: Host + ?Sized>(&self, host: &H) -> Result<String, HostError> {
        let settings = self.gtk_settings.to_string_lossy().into_owned();
        let args = ["-F", "gtk-theme-name", settings.as_str()];
        let output = host.run("grep", &args, ExitConvention::Search)?;
        Ok(output.stdout.trim().to_string())
    }

    pub(super) fn set_wallpaper<H: Host + ?Sized>(&self, host: &H, path: &Path) -> Result<(), HostError> {
        let path = path.to_string_lossy().into_owned();
        let args = ["--wallpaper-mode=crop", "-w", path.as_str()];
        host.run("pcmanfm", &args, ExitConvention::Strict).map(|_| ())
    }
}
