//! Cron-driven scheduling of wallpaper actions.
//!
//! Jobs are five-field cron expressions evaluated against local time at minute
//! resolution. [`runner`] executes the jobs due at a given minute and
//! [`daemon`] keeps doing so for a bounded number of minutes.

pub mod daemon;
pub mod runner;

use chrono::{DateTime, Local, Timelike};

pub use daemon::{Clock, DaemonSummary, SystemClock, run_daemon};
pub use runner::{JobResult, TaskSummary, run_action, run_due};

use crate::action::Action;
use crate::config::{Schedule, Settings, ValidationIssue};

/// Drops seconds and sub-seconds so cron matching works on whole minutes.
#[must_use]
pub fn truncate_to_minute(at: DateTime<Local>) -> DateTime<Local> {
    at.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(at)
}

/// Whether `schedule` fires in the minute containing `at`.
///
/// # Errors
///
/// Returns the cron parser error for a malformed expression.
pub fn is_due(schedule: &Schedule, at: DateTime<Local>) -> Result<bool, croner::errors::CronError> {
    schedule.cron()?.is_time_matching(&truncate_to_minute(at))
}

/// Jobs due in the minute containing `at`, with their 1-based numbers, in
/// configuration order. Jobs with invalid expressions are logged and skipped.
#[must_use]
pub fn due_jobs(settings: &Settings, at: DateTime<Local>) -> Vec<(usize, &Schedule)> {
    settings
        .schedules
        .iter()
        .enumerate()
        .filter_map(|(index, job)| match is_due(job, at) {
            Ok(due) => due.then_some((index + 1, job)),
            Err(err) => {
                tracing::warn!(job = index + 1, title = %job.title, error = %err, "skipping job");
                None
            }
        })
        .collect()
}

/// When a job fires next.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRun {
    pub job: usize,
    pub title: String,
    pub action: Action,
    pub at: DateTime<Local>,
}

/// Next firing time of every valid job that is not due in the minute of `now`,
/// soonest first.
#[must_use]
pub fn next_runs(settings: &Settings, now: DateTime<Local>) -> Vec<NextRun> {
    let now = truncate_to_minute(now);
    let mut runs: Vec<NextRun> = settings
        .schedules
        .iter()
        .enumerate()
        .filter_map(|(index, job)| {
            let cron = job.cron().ok()?;
            if cron.is_time_matching(&now).unwrap_or(false) {
                return None;
            }
            let at = cron.find_next_occurrence(&now, true).ok()?;
            Some(NextRun { job: index + 1, title: job.title.clone(), action: job.action, at })
        })
        .collect();

    runs.sort_by(|a, b| a.at.cmp(&b.at).then(a.job.cmp(&b.job)));
    runs
}

/// Validity of a single job's cron expression.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCheck {
    pub job: usize,
    pub title: String,
    pub cron_tab: String,
    pub valid: bool,
}

/// Result of checking a configuration before scheduling it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub jobs: Vec<JobCheck>,
    pub issues: Vec<ValidationIssue>,
}

impl Verification {
    /// `true` unless some issue makes the schedule unusable.
    #[must_use]
    pub fn is_ok(&self) -> bool { !self.issues.iter().any(ValidationIssue::is_fatal) }
}

#[must_use]
pub fn verify(settings: &Settings) -> Verification {
    let jobs = settings
        .schedules
        .iter()
        .enumerate()
        .map(|(index, job)| JobCheck {
            job: index + 1,
            title: job.title.clone(),
            cron_tab: job.cron_tab.clone(),
            valid: job.cron().is_ok(),
        })
        .collect();

    Verification { jobs, issues: settings.validate() }
}
