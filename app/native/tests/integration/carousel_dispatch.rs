//! Dispatcher behavior seen from outside the crate: protected categories,
//! carousels, chosen files, the lock marker and the fairness of random picks.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use carousel_lib::action::Action;
use carousel_lib::config::Category;
use carousel_lib::error::{CarouselError, Outcome, Report, WarningCode};
use carousel_lib::modules::carousel::Dispatcher;
use carousel_lib::modules::carousel::auth::{KEY_MARKER_FILE, file_md5};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::common::{Bell, Desktop, settings_with_categories, touch_all};

// =============================================================================
// Protected categories
// =============================================================================

#[test]
fn test_protected_category_denied_without_key() {
    let root = tempfile::tempdir().unwrap();
    touch_all(&root.path().join("anime"), &["a.png", "b.png"]);

    let mut settings = settings_with_categories(root.path(), &[]);
    settings.categories.insert(
        "Anime".to_string(),
        Category::protected(root.path().join("anime").display().to_string(), "Red"),
    );
    settings
        .key_devices
        .insert("Red".to_string(), "0781:5567 REDKEY 0123456789abcdef0123456789abcdef".to_string());

    let desktop = Desktop::new();
    let bell = Bell::default();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(&bell));

    let outcome = dispatcher.execute(Action::ChosenCategory, "Anime");
    match outcome {
        Outcome::Warning(warning) => assert_eq!(warning.code, WarningCode::AuthorizationDenied),
        other => panic!("expected a warning, got {other:?}"),
    }
    assert!(desktop.wallpapers_set().is_empty());
    assert_eq!(*bell.sounds.borrow(), 1);
    assert_eq!(bell.alerts.borrow().len(), 1);
}

#[test]
fn test_protected_category_served_with_mounted_key() {
    let root = tempfile::tempdir().unwrap();
    touch_all(&root.path().join("anime"), &["only.png"]);

    let stick = tempfile::tempdir().unwrap();
    let marker = stick.path().join(KEY_MARKER_FILE);
    fs::write(&marker, b"the real marker").unwrap();
    let checksum = file_md5(&marker).unwrap().to_uppercase();

    let mut settings = settings_with_categories(root.path(), &[]);
    settings.categories.insert(
        "Anime".to_string(),
        Category::protected(root.path().join("anime").display().to_string(), "Red"),
    );
    settings.key_devices.insert("Red".to_string(), format!("0781:5567 REDKEY {checksum}"));

    let desktop = Desktop::new().with_mount("REDKEY", stick.path()).with_usb("0781", "5567");
    let bell = Bell::default();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(&bell));

    let outcome = dispatcher.execute(Action::ChosenCategory, "Anime");
    assert!(matches!(outcome, Outcome::Ok(Report::Applied { .. })));
    assert_eq!(desktop.wallpapers_set(), [root.path().join("anime").join("only.png")]);
    assert!(bell.alerts.borrow().is_empty());
}

#[test]
fn test_protected_category_without_key_name_is_never_served() {
    let root = tempfile::tempdir().unwrap();
    touch_all(&root.path().join("private"), &["secret.png"]);

    let mut settings = settings_with_categories(root.path(), &[]);
    settings.categories.insert(
        "Private".to_string(),
        Category::protected(root.path().join("private").display().to_string(), ""),
    );

    let desktop = Desktop::new();
    let bell = Bell::default();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(&bell));

    let outcome = dispatcher.execute(Action::ChosenCategory, "Private");
    match outcome {
        Outcome::Warning(warning) => assert_eq!(warning.code, WarningCode::AuthorizationDenied),
        other => panic!("expected a warning, got {other:?}"),
    }
    assert!(desktop.wallpapers_set().is_empty());
}

// =============================================================================
// Carousels and files
// =============================================================================

#[test]
fn test_carousel_only_draws_from_its_categories() {
    let root = tempfile::tempdir().unwrap();
    touch_all(&root.path().join("a"), &["a1.jpg", "a2.jpg"]);
    touch_all(&root.path().join("b"), &["b1.jpg"]);
    touch_all(&root.path().join("c"), &["c1.jpg"]);

    let mut settings = settings_with_categories(root.path(), &["A", "B", "C"]);
    settings.carousels.insert("Pair".to_string(), vec!["A".to_string(), "B".to_string()]);

    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let outcome = dispatcher.execute_with_rng(Action::ChosenCarousel, "Pair", &mut rng);
        match outcome {
            Outcome::Ok(Report::Applied { category: Some(category), .. }) => {
                assert!(category == "A" || category == "B", "drew from {category}");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    let c_dir = root.path().join("c");
    assert!(desktop.wallpapers_set().iter().all(|path| !path.starts_with(&c_dir)));
}

#[test]
fn test_unknown_carousel_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with_categories(root.path(), &[]);
    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));

    let outcome = dispatcher.execute(Action::ChosenCarousel, "Nope");
    assert!(matches!(outcome, Outcome::Error(CarouselError::UnknownCarousel(name)) if name == "Nope"));
}

#[test]
fn test_chosen_file_is_applied_verbatim() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with_categories(root.path(), &[]);
    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));

    let outcome = dispatcher.execute(Action::ChosenFile, "/tmp/x.png");
    assert!(matches!(outcome, Outcome::Ok(Report::Applied { category: None, .. })));
    assert_eq!(desktop.wallpapers_set(), [PathBuf::from("/tmp/x.png")]);
}

#[test]
fn test_chosen_file_requires_argument() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with_categories(root.path(), &[]);
    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));

    let outcome = dispatcher.execute(Action::ChosenFile, "");
    assert!(matches!(outcome, Outcome::Error(CarouselError::MissingTarget { .. })));
    assert!(desktop.wallpapers_set().is_empty());
}

// =============================================================================
// Lock marker
// =============================================================================

#[test]
fn test_lock_status_unlock_cycle() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with_categories(root.path(), &[]);
    let desktop = Desktop::new();
    let bell = Bell::default();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(&bell));

    assert!(matches!(dispatcher.execute(Action::Status, ""), Outcome::Ok(Report::Status { locked: false })));
    assert!(matches!(dispatcher.execute(Action::Lock, ""), Outcome::Ok(Report::Locked)));
    assert!(root.path().join(".nochange").is_file());
    assert!(matches!(dispatcher.execute(Action::Status, ""), Outcome::Ok(Report::Status { locked: true })));
    assert!(matches!(dispatcher.execute(Action::Unlock, ""), Outcome::Ok(Report::Unlocked)));
    assert!(!root.path().join(".nochange").exists());
    assert_eq!(bell.infos.borrow().len(), 2);
}

#[test]
fn test_unlock_without_lock_is_an_io_error() {
    let root = tempfile::tempdir().unwrap();
    let settings = settings_with_categories(root.path(), &[]);
    let desktop = Desktop::new();
    let bell = Bell::default();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(&bell));

    assert!(matches!(dispatcher.execute(Action::Unlock, ""), Outcome::Error(CarouselError::Io { .. })));
    assert_eq!(bell.alerts.borrow().len(), 1);
}

// =============================================================================
// Fairness
// =============================================================================

#[test]
fn test_any_wallpaper_is_roughly_uniform() {
    let root = tempfile::tempdir().unwrap();
    let names = ["1.png", "2.png", "3.png", "4.png"];
    touch_all(root.path(), &names);

    let settings = settings_with_categories(root.path(), &[]);
    let desktop = Desktop::new();
    let dispatcher = Dispatcher::with_notifier(&settings, &desktop, Box::new(Bell::default()));
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..4000 {
        assert!(!dispatcher.execute_with_rng(Action::AnyWallpaper, "", &mut rng).is_error());
    }

    let mut counts: BTreeMap<PathBuf, usize> = BTreeMap::new();
    for path in desktop.wallpapers_set() {
        *counts.entry(path).or_default() += 1;
    }
    assert_eq!(counts.len(), names.len());
    for (path, count) in counts {
        assert!((800..=1200).contains(&count), "{} drawn {count} times", path.display());
    }
}
