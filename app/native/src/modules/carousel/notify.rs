//! Desktop notifications.
//!
//! Notifications are fire-and-forget: a missing `notify-send` or sound player
//! must never turn a successful wallpaper change into a failure.

use std::path::Path;

use crate::platform::{ExitConvention, Host};

const APP_NAME: &str = "Carousel";
const NOTIFY_SEND: &str = "notify-send";
const SOUND_PLAYER: &str = "canberra-gtk-play";

/// Display duration for informational notifications, in milliseconds.
const INFO_TIMEOUT_MS: &str = "1500";

/// Sink for user-facing notifications.
pub trait Notifier {
    /// Shows an informational message, optionally with an icon.
    fn notify(&self, message: &str, icon: Option<&Path>);

    /// Shows an urgent message.
    fn alert(&self, message: &str);

    /// Plays a short warning sound.
    fn sound(&self);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, message: &str, icon: Option<&Path>) { (**self).notify(message, icon); }

    fn alert(&self, message: &str) { (**self).alert(message); }

    fn sound(&self) { (**self).sound(); }
}

/// Sends notifications through freedesktop command-line tools.
#[derive(Debug)]
pub struct DesktopNotifier<'a, H: Host + ?Sized> {
    host: &'a H,
}

impl<'a, H: Host + ?Sized> DesktopNotifier<'a, H> {
    pub const fn new(host: &'a H) -> Self { Self { host } }

    fn send(&self, program: &str, args: &[&str]) {
        if let Err(err) = self.host.run(program, args, ExitConvention::Strict) {
            tracing::debug!(%program, error = %err, "notification not delivered");
        }
    }
}

impl<H: Host + ?Sized> Notifier for DesktopNotifier<'_, H> {
    fn notify(&self, message: &str, icon: Option<&Path>) {
        let body = format!("<i>{message}</i>");
        let icon = icon.map(|icon| icon.to_string_lossy().into_owned());

        let mut args = vec!["--app-name", APP_NAME, "-t", INFO_TIMEOUT_MS];
        if let Some(icon) = icon.as_deref() {
            args.extend(["-i", icon]);
        }
        args.extend([APP_NAME, body.as_str()]);

        self.send(NOTIFY_SEND, &args);
    }

    fn alert(&self, message: &str) {
        self.send(
            NOTIFY_SEND,
            &["--app-name", APP_NAME, "-u", "critical", "-i", "dialog-warning", APP_NAME, message],
        );
    }

    fn sound(&self) { self.send(SOUND_PLAYER, &["-i", "dialog-warning"]); }
}

/// Notifier that only logs, used when notifications are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, _icon: Option<&Path>) {
        tracing::info!(%message, "notification");
    }

    fn alert(&self, message: &str) { tracing::warn!(%message, "alert"); }

    fn sound(&self) {}
}
