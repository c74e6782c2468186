//! Bounded in-process scheduler.
//!
//! Runs the angel `first_action`, wakes on every minute boundary to run the
//! jobs due then, and finishes with the angel `last_action` once the requested
//! number of minutes has elapsed. Ticks run one after another, so jobs never
//! overlap.

use std::thread;

use chrono::{DateTime, Local, TimeDelta};

use super::runner::{JobResult, run_action, run_due};
use super::truncate_to_minute;
use crate::action::Action;
use crate::config::ScheduleAction;
use crate::error::CarouselError;
use crate::modules::carousel::Dispatcher;
use crate::platform::Host;

/// Source of wall-clock time for the daemon loop.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Blocks until `at`; returns immediately if it has passed.
    fn sleep_until(&mut self, at: DateTime<Local>);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> { Local::now() }

    fn sleep_until(&mut self, at: DateTime<Local>) {
        let wait = (at - Local::now()).to_std().unwrap_or_default();
        thread::sleep(wait);
    }
}

/// Totals across a daemon run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaemonSummary {
    pub ticks: usize,
    pub ran: usize,
    pub warnings: usize,
    pub skipped_locked: usize,
    pub errors: usize,
}

impl DaemonSummary {
    fn record(&mut self, result: &Result<JobResult, CarouselError>) {
        match result {
            Ok(JobResult::Ran) => self.ran += 1,
            Ok(JobResult::Warned) => self.warnings += 1,
            Ok(JobResult::SkippedLocked) => self.skipped_locked += 1,
            Err(_) => self.errors += 1,
        }
    }
}

fn run_angel<H: Host + ?Sized>(
    dispatcher: &Dispatcher<'_, H>,
    hook: &ScheduleAction,
    which: &str,
    summary: &mut DaemonSummary,
) {
    if hook.action == Action::None {
        return;
    }

    let result = run_action(dispatcher, hook.action, &hook.argument);
    if let Err(err) = &result {
        tracing::error!(hook = which, action = %hook.action, error = %err, "angel action failed");
    } else {
        tracing::info!(hook = which, action = %hook.action, "executed angel action");
    }
    summary.record(&result);
}

/// Runs the scheduler for `minutes` minutes.
///
/// Job failures are logged and counted; they never end the loop early.
pub fn run_daemon<H: Host + ?Sized, C: Clock>(
    dispatcher: &Dispatcher<'_, H>,
    minutes: u32,
    clock: &mut C,
) -> DaemonSummary {
    let mut summary = DaemonSummary::default();
    let angel = &dispatcher.settings().angel_options;

    tracing::info!(minutes, "carousel daemon starting");
    run_angel(dispatcher, &angel.first_action, "first", &mut summary);

    let start = clock.now();
    let end = start + TimeDelta::minutes(i64::from(minutes));
    let mut tick = truncate_to_minute(start) + TimeDelta::minutes(1);

    while tick <= end {
        clock.sleep_until(tick);
        summary.ticks += 1;

        match run_due(dispatcher, tick) {
            Ok(batch) => {
                summary.ran += batch.ran;
                summary.warnings += batch.warnings;
                summary.skipped_locked += batch.skipped_locked;
            }
            Err(err) => {
                tracing::error!(at = %tick, error = %err, "scheduled batch failed");
                summary.errors += 1;
            }
        }

        tick += TimeDelta::minutes(1);
    }

    run_angel(dispatcher, &angel.last_action, "last", &mut summary);
    tracing::info!(?summary, "carousel daemon finished");
    summary
}
