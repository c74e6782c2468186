//! Wallpaper selection, key-device authorization, and the lock marker.
//!
//! [`Dispatcher`] is the entry point; the other modules are its collaborators.

pub mod auth;
pub mod dispatcher;
pub mod lock;
pub mod notify;
pub mod selection;

pub use dispatcher::Dispatcher;
pub use lock::LockFile;
pub use notify::{DesktopNotifier, LogNotifier, Notifier};
