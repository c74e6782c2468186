//! Application feature modules for Carousel.
//!
//! - [`carousel`] - Wallpaper selection, authorization, locking and dispatch
//! - [`schedule`] - Cron evaluation, the due-task runner and the daemon loop

pub mod carousel;
pub mod schedule;
