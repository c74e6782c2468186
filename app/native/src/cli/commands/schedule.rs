//! Scheduler CLI commands.

use chrono::Local;

use crate::cli::output::{format_bool, truncate};
use crate::config::{ConfigError, Settings};
use crate::error::CarouselError;
use crate::modules::carousel::Dispatcher;
use crate::modules::schedule::{self, JobCheck, NextRun, SystemClock};
use crate::platform::SystemHost;

/// Longest job title shown in listings.
const TITLE_WIDTH: usize = 32;

/// Runs the jobs due this minute, optionally listing upcoming ones.
///
/// # Errors
///
/// Returns the error of the first job that fails.
pub fn task(settings: &Settings, next: bool) -> Result<u8, CarouselError> {
    let host = SystemHost::new();
    let dispatcher = Dispatcher::new(settings, &host);
    let now = Local::now();

    let summary = schedule::run_due(&dispatcher, now)?;
    tracing::debug!(?summary, "task finished");

    if next {
        for run in schedule::next_runs(settings, now) {
            println!("{}", next_run_line(&run));
        }
    }

    Ok(0)
}

/// Runs the in-process scheduler for `minutes` minutes.
///
/// # Errors
///
/// Never fails once settings are loaded; job errors are logged and counted.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn daemon(settings: &Settings, minutes: u32) -> Result<u8, CarouselError> {
    let host = SystemHost::new();
    let dispatcher = Dispatcher::new(settings, &host);
    let summary = schedule::run_daemon(&dispatcher, minutes, &mut SystemClock);

    println!(
        "{} ticks, {} ran, {} warnings, {} skipped while locked, {} errors",
        summary.ticks, summary.ran, summary.warnings, summary.skipped_locked, summary.errors
    );
    Ok(0)
}

/// Lists every job with its validity and every configuration issue.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSchedules`] when any cron expression is invalid.
pub fn verify(settings: &Settings) -> Result<u8, CarouselError> {
    let report = schedule::verify(settings);

    if report.jobs.is_empty() {
        println!("No scheduled jobs.");
    }
    for job in &report.jobs {
        println!("{}", job_check_line(job));
    }

    if !report.issues.is_empty() {
        println!("\nIssues:");
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }

    if report.is_ok() {
        Ok(0)
    } else {
        let invalid = report.jobs.iter().filter(|job| !job.valid).count();
        Err(ConfigError::InvalidSchedules(invalid).into())
    }
}

fn next_run_line(run: &NextRun) -> String {
    format!(
        "{}  #{:<3} {:<width$} {}",
        run.at.format("%Y-%m-%d %H:%M"),
        run.job,
        truncate(&run.title, TITLE_WIDTH),
        run.action,
        width = TITLE_WIDTH
    )
}

fn job_check_line(job: &JobCheck) -> String {
    format!(
        "{} #{:<3} {:<16} {}",
        format_bool(job.valid),
        job.job,
        job.cron_tab,
        truncate(&job.title, TITLE_WIDTH)
    )
}
