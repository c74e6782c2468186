//! Carousel - scheduled desktop wallpaper rotation.
//!
//! This library holds everything behind the `carousel` binary: session
//! detection and the per-desktop wallpaper backends, the selection engine with
//! its key-device authorization gate, the lock marker and the cron scheduler.
//! All access to the operating system goes through the [`platform::Host`] trait.

// Core modules
pub mod action;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod schema;
pub mod session;

// Feature modules
pub mod modules;

#[cfg(test)]
pub(crate) mod testing;
