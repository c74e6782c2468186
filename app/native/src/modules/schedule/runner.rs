//! Runs due jobs through the dispatcher.

use chrono::{DateTime, Local};

use super::due_jobs;
use crate::action::Action;
use crate::error::{CarouselError, Outcome};
use crate::modules::carousel::Dispatcher;
use crate::platform::Host;

/// Counters for one batch of scheduled jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub ran: usize,
    pub warnings: usize,
    /// Wallpaper changes suppressed by the lock marker.
    pub skipped_locked: usize,
}

impl TaskSummary {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ran == 0 && self.warnings == 0 && self.skipped_locked == 0
    }
}

/// How a scheduled action ended, short of a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobResult {
    Ran,
    Warned,
    /// Not dispatched because wallpaper changes are locked.
    SkippedLocked,
}

/// Runs one action on behalf of the scheduler.
///
/// Wallpaper-changing actions are not dispatched while the lock marker exists.
///
/// # Errors
///
/// Returns the dispatcher's hard error.
pub fn run_action<H: Host + ?Sized>(
    dispatcher: &Dispatcher<'_, H>,
    action: Action,
    argument: &str,
) -> Result<JobResult, CarouselError> {
    if action.changes_wallpaper() && dispatcher.lock_file().is_locked() {
        tracing::info!(%action, "wallpaper changes are locked, skipping");
        return Ok(JobResult::SkippedLocked);
    }

    match dispatcher.execute(action, argument) {
        Outcome::Ok(_) => Ok(JobResult::Ran),
        Outcome::Warning(_) => Ok(JobResult::Warned),
        Outcome::Error(err) => Err(err),
    }
}

/// Runs every job due in the minute containing `at`, in configuration order.
///
/// # Errors
///
/// Stops at the first job that fails and returns its error. Jobs that end in a
/// warning do not stop the batch.
pub fn run_due<H: Host + ?Sized>(
    dispatcher: &Dispatcher<'_, H>,
    at: DateTime<Local>,
) -> Result<TaskSummary, CarouselError> {
    let mut summary = TaskSummary::default();

    for (number, job) in due_jobs(dispatcher.settings(), at) {
        tracing::info!(job = number, title = %job.title, action = %job.action, "running job");

        match run_action(dispatcher, job.action, &job.argument) {
            Ok(JobResult::Ran) => summary.ran += 1,
            Ok(JobResult::Warned) => summary.warnings += 1,
            Ok(JobResult::SkippedLocked) => summary.skipped_locked += 1,
            Err(err) => {
                tracing::error!(job = number, title = %job.title, error = %err, "job failed");
                return Err(err);
            }
        }
    }

    if summary.is_empty() {
        tracing::info!("no carousel tasks due");
    }
    Ok(summary)
}
