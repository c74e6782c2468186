//! Single entry point that turns an [`Action`] and its argument into work.

use rand::Rng;

use super::lock::LockFile;
use super::notify::{DesktopNotifier, LogNotifier, Notifier};
use super::selection::Selector;
use crate::action::Action;
use crate::config::Settings;
use crate::error::{CarouselError, Outcome, Report};
use crate::platform::Host;
use crate::session;

/// Executes actions against one configuration and host.
///
/// The session is resolved again on every call, so a dispatcher may outlive
/// a desktop login and still target the right session.
pub struct Dispatcher<'a, H: Host + ?Sized> {
    settings: &'a Settings,
    host: &'a H,
    notifier: Box<dyn Notifier + 'a>,
}

impl<'a, H: Host + ?Sized> Dispatcher<'a, H> {
    /// Creates a dispatcher whose notifications follow `options.notify`.
    pub fn new(settings: &'a Settings, host: &'a H) -> Self {
        let notifier: Box<dyn Notifier + 'a> = if settings.user_options.notify {
            Box::new(DesktopNotifier::new(host))
        } else {
            Box::new(LogNotifier)
        };
        Self::with_notifier(settings, host, notifier)
    }

    pub fn with_notifier(settings: &'a Settings, host: &'a H, notifier: Box<dyn Notifier + 'a>) -> Self {
        Self { settings, host, notifier }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings { self.settings }

    #[must_use]
    pub fn lock_file(&self) -> LockFile { LockFile::for_settings(self.settings) }

    /// Runs `action` using the operating system's random source.
    pub fn execute(&self, action: Action, argument: &str) -> Outcome {
        self.execute_with_rng(action, argument, &mut rand::rng())
    }

    /// Runs `action`, drawing random choices from `rng`.
    pub fn execute_with_rng<R: Rng>(&self, action: Action, argument: &str, rng: &mut R) -> Outcome {
        let span = tracing::info_span!("execute", %action, argument);
        let _guard = span.enter();

        let session = match session::resolve(self.host, &self.settings.user_options.assume_session) {
            Ok(session) => session,
            Err(err) => return Outcome::Error(err),
        };
        self.host.apply_env(&session.env);

        let selector = Selector::new(self.settings, self.host, &session.backend, self.notifier.as_ref());

        let outcome = match action {
            Action::None => {
                tracing::info!("nothing to do");
                Outcome::Ok(Report::Nothing)
            }
            Action::DefaultWallpaper => selector.default_wallpaper().into(),
            Action::AnyWallpaper => selector.any(rng).into(),
            Action::ChosenFile => selector.file(argument).into(),
            Action::ChosenCategory => selector.category(argument, rng),
            Action::ChosenCarousel => selector.carousel(argument, rng),
            Action::Lock => self.lock().into(),
            Action::Unlock => self.unlock().into(),
            Action::Status => Outcome::Ok(Report::Status { locked: self.lock_file().is_locked() }),
            Action::Identify => {
                Outcome::Ok(Report::Identity { name: session.backend.identify().to_string() })
            }
        };

        match &outcome {
            Outcome::Ok(_) => {}
            Outcome::Warning(warning) => tracing::warn!(%warning, "action finished with a warning"),
            Outcome::Error(err) => {
                tracing::error!(code = %err.code(), origin = err.origin(), error = %err, "action failed");
            }
        }
        outcome
    }

    fn lock(&self) -> Result<Report, CarouselError> {
        let lock = self.lock_file();
        match lock.lock() {
            Ok(()) => {
                self.notifier.notify("Wallpaper changes locked", None);
                Ok(Report::Locked)
            }
            Err(source) => {
                self.notifier.alert("Could not lock wallpaper changes");
                Err(CarouselError::io(format!("failed to create {}", lock.path().display()), source))
            }
        }
    }

    fn unlock(&self) -> Result<Report, CarouselError> {
        let lock = self.lock_file();
        match lock.unlock() {
            Ok(()) => {
                self.notifier.notify("Wallpaper changes unlocked", None);
                Ok(Report::Unlocked)
            }
            Err(source) => {
                self.notifier.alert("Could not unlock wallpaper changes");
                Err(CarouselError::io(format!("failed to remove {}", lock.path().display()), source))
            }
        }
    }
}
