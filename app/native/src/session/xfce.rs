//! Xfce, driven through `xfconf-query`. Xfce has a single wallpaper slot.

use std::path::Path;

use crate::platform::{ExitConvention, Host, HostError};

const XFCONF_QUERY: &str = "xfconf-query";
const BACKDROP_PROPERTY: &str = "/backdrop/screen0/monitor0/image-path";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XfceSession;

impl XfceSession {
    pub const IDENTITY: &'static str = "Xfce4";

    pub(super) fn query_color_scheme<H: Host + ?Sized>(self, host: &H) -> Result<String, HostError> {
        let args = ["--channel", "xsettings", "--property", "/Net/ThemeName"];
        let output = host.run(XFCONF_QUERY, &args, ExitConvention::Strict)?;
        Ok(output.stdout.trim().to_string())
    }

    pub(super) fn set_wallpaper<H: Host + ?Sized>(self, host: &H, path: &Path) -> Result<(), HostError> {
        let path = path.to_string_lossy().into_owned();
        let args = ["--channel", "xfce4-desktop", "--property", BACKDROP_PROPERTY, "--set", path.as_str()];
        host.run(XFCONF_QUERY, &args, ExitConvention::Strict).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::super::SessionBackend;
    use super::*;
    use crate::testing::FakeHost;

    #[test]
    fn test_dark_and_light_write_same_property() {
        let backend = SessionBackend::Xfce(XfceSession);
        let host = FakeHost::new();
        backend.set_wallpaper_dark(&host, Path::new("/w/d.png")).unwrap();
        backend.set_wallpaper_light(&host, Path::new("/w/l.png")).unwrap();

        let calls = host.calls();
        assert_eq!(calls[0][4], BACKDROP_PROPERTY);
        assert_eq!(calls[1][4], BACKDROP_PROPERTY);
        assert_eq!(calls[0].last().map(String::as_str), Some("/w/d.png"));
        assert_eq!(calls[1].last().map(String::as_str), Some("/w/l.png"));
    }

    #[test]
    fn test_auto_queries_theme_name() {
        let host = FakeHost::new().with_output("xfconf-query", "Greybird-dark\n");
        SessionBackend::Xfce(XfceSession).set_wallpaper_auto(&host, Path::new("/w/x.png")).unwrap();
        assert_eq!(
            host.calls()[0],
            ["xfconf-query", "--channel", "xsettings", "--property", "/Net/ThemeName"]
        );
        assert_eq!(host.calls().len(), 2);
    }

    #[test]
    fn test_identity() {
        assert_eq!(SessionBackend::Xfce(XfceSession).identify(), "Xfce4");
    }
}
