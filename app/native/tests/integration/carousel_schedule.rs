//! Scheduled jobs through the public runner and daemon entry points.

use chrono::{DateTime, Local, TimeZone};

use carousel_lib::action::Action;
use carousel_lib::config::{Schedule, ScheduleAction};
use carousel_lib::error::CarouselError;
use carousel_lib::modules::carousel::{Dispatcher, LockFile};
use carousel_lib::modules::schedule::{Clock, next_runs, run_daemon, run_due};

use crate::common::{Bell, Desktop, settings_with_categories, touch_all};

fn at(hour: u32, minute: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).single().unwrap()
}

struct SteppingClock {
    now: DateTime<Local>,
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Local> { self.now }

    fn sleep_until(&mut self, at: DateTime<Local>) { self.now = at; }
}

#[test]
fn test_due_jobs_run_in_configuration_order() {
    let root = tempfile::tempdir().unwrap();
    let mut settings = settings_with_categories(root.path(), &[]);
    settings.schedules = vec![
        Schedule::new("Second", "30 8 * * *", Action::ChosenFile, "/w/second.png"),
        Schedule::new("First", "*/15 * * * *", Action::ChosenFile, "/w/first.png"),
        Schedule::new("Later", "0 20 * * *", Action::ChosenFile, "/w/later.png"),
    ];

    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));

    let summary = run_due(&dispatcher, at(8, 30)).unwrap();
    assert_eq!(summary.ran, 2);
    let applied: Vec<_> = desktop.wallpapers_set();
    assert_eq!(applied.len(), 2);
    assert!(applied[0].ends_with("second.png"));
    assert!(applied[1].ends_with("first.png"));
}

#[test]
fn test_lock_suppresses_scheduled_changes() {
    let root = tempfile::tempdir().unwrap();
    let mut settings = settings_with_categories(root.path(), &[]);
    settings.schedules = vec![Schedule::new("Every", "* * * * *", Action::ChosenFile, "/w/x.png")];
    LockFile::for_settings(&settings).lock().unwrap();

    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));

    let summary = run_due(&dispatcher, at(12, 0)).unwrap();
    assert_eq!(summary.skipped_locked, 1);
    assert!(desktop.wallpapers_set().is_empty());
}

#[test]
fn test_first_error_aborts_batch() {
    let root = tempfile::tempdir().unwrap();
    let mut settings = settings_with_categories(root.path(), &[]);
    settings.schedules = vec![
        Schedule::new("Broken", "* * * * *", Action::ChosenCategory, "Missing"),
        Schedule::new("Never reached", "* * * * *", Action::ChosenFile, "/w/x.png"),
    ];

    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));

    let err = run_due(&dispatcher, at(12, 0)).unwrap_err();
    assert!(matches!(err, CarouselError::UnknownCategory(name) if name == "Missing"));
    assert!(desktop.wallpapers_set().is_empty());
}

#[test]
fn test_next_runs_are_sorted_and_skip_due_jobs() {
    let root = tempfile::tempdir().unwrap();
    let mut settings = settings_with_categories(root.path(), &[]);
    settings.schedules = vec![
        Schedule::new("Evening", "0 20 * * *", Action::AnyWallpaper, ""),
        Schedule::new("Now", "0 9 * * *", Action::AnyWallpaper, ""),
        Schedule::new("Soon", "15 9 * * *", Action::AnyWallpaper, ""),
    ];

    let runs = next_runs(&settings, at(9, 0));
    let titles: Vec<_> = runs.iter().map(|run| run.title.as_str()).collect();
    assert_eq!(titles, ["Soon", "Evening"]);
    assert_eq!(runs[0].at, at(9, 15));
}

#[test]
fn test_daemon_wraps_jobs_with_angel_actions() {
    let root = tempfile::tempdir().unwrap();
    touch_all(&root.path().join("day"), &["sun.png"]);

    let mut settings = settings_with_categories(root.path(), &["Day"]);
    settings.angel_options.first_action = ScheduleAction::new(Action::ChosenFile, "/w/hello.png");
    settings.angel_options.last_action = ScheduleAction::new(Action::ChosenFile, "/w/bye.png");
    settings.schedules = vec![Schedule::new("Day", "2 10 * * *", Action::ChosenCategory, "Day")];

    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));
    let mut clock = SteppingClock { now: at(10, 0) };

    let summary = run_daemon(&dispatcher, 3, &mut clock);
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.ran, 3);

    let applied = desktop.wallpapers_set();
    assert_eq!(applied.len(), 3);
    assert!(applied[0].ends_with("hello.png"));
    assert_eq!(applied[1], root.path().join("day").join("sun.png"));
    assert!(applied[2].ends_with("bye.png"));
}
