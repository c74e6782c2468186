//! Windows: no color schemes, one system call sets the wallpaper.

use std::path::Path;

use crate::platform::{Host, HostError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowsSession;

impl WindowsSession {
    pub const IDENTITY: &'static str = "Windows";

    pub(super) fn query_color_scheme(self) -> String { String::new() }

    pub(super) fn set_wallpaper<H: Host + ?Sized>(self, host: &H, path: &Path) -> Result<(), HostError> {
        host.set_desktop_wallpaper(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::super::SessionBackend;
    use super::*;
    use crate::testing::FakeHost;

    #[test]
    fn test_every_setter_uses_system_call() {
        let backend = SessionBackend::Windows(WindowsSession);
        let host = FakeHost::new();
        backend.set_wallpaper_auto(&host, Path::new("C:/w/a.png")).unwrap();
        backend.set_wallpaper_dark(&host, Path::new("C:/w/b.png")).unwrap();
        backend.set_wallpaper_light(&host, Path::new("C:/w/c.png")).unwrap();

        assert_eq!(
            host.desktop_wallpapers(),
            vec![PathBuf::from("C:/w/a.png"), PathBuf::from("C:/w/b.png"), PathBuf::from("C:/w/c.png")]
        );
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_identity() {
        assert_eq!(SessionBackend::Windows(WindowsSession).identify(), "Windows");
    }
}
