//! Shared doubles for the integration tests.
//!
//! [`Desktop`] plays an Xfce session: every external program succeeds with
//! empty output and is recorded, volumes are mounted where the test says, and
//! USB devices are plugged in on request.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use carousel_lib::config::{Category, Settings};
use carousel_lib::modules::carousel::Notifier;
use carousel_lib::platform::{ExitConvention, Host, HostError, ProgramOutput};

#[derive(Debug, Default)]
pub struct Desktop {
    mounts: BTreeMap<String, PathBuf>,
    usb: Vec<String>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl Desktop {
    pub fn new() -> Self { Self::default() }

    pub fn with_mount(mut self, label: &str, path: &Path) -> Self {
        self.mounts.insert(label.to_string(), path.to_path_buf());
        self
    }

    pub fn with_usb(mut self, vendor: &str, product: &str) -> Self {
        self.usb.push(format!("{vendor}:{product}"));
        self
    }

    /// Wallpaper paths handed to `xfconf-query --set`, in order.
    pub fn wallpapers_set(&self) -> Vec<PathBuf> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.iter().any(|arg| arg == "--set"))
            .filter_map(|call| call.last().map(PathBuf::from))
            .collect()
    }
}

impl Host for Desktop {
    fn env_var(&self, name: &str) -> Option<String> {
        (name == "XDG_CURRENT_DESKTOP").then(|| "XFCE".to_string())
    }

    fn process_names(&self) -> Vec<String> { Vec::new() }

    fn user_id(&self) -> Option<u32> { Some(1000) }

    fn home_dir(&self) -> Option<PathBuf> { Some(PathBuf::from("/home/tester")) }

    fn apply_env(&self, _vars: &BTreeMap<String, String>) {}

    fn run(
        &self,
        program: &str,
        args: &[&str],
        _convention: ExitConvention,
    ) -> Result<ProgramOutput, HostError> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(ToString::to_string));
        self.calls.borrow_mut().push(call);
        Ok(ProgramOutput::found(""))
    }

    fn mount_point(&self, label: &str) -> Result<Option<PathBuf>, HostError> {
        Ok(self.mounts.get(label).cloned())
    }

    fn usb_present(&self, vendor: &str, product: &str) -> Result<bool, HostError> {
        Ok(self.usb.contains(&format!("{vendor}:{product}")))
    }

    fn set_desktop_wallpaper(&self, _path: &Path) -> Result<(), HostError> {
        Err(HostError::Unsupported("setting the wallpaper directly"))
    }
}

/// Counts notifications by kind.
#[derive(Debug, Default)]
pub struct Bell {
    pub infos: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
    pub sounds: RefCell<usize>,
}

impl Notifier for Bell {
    fn notify(&self, message: &str, _icon: Option<&Path>) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn alert(&self, message: &str) { self.alerts.borrow_mut().push(message.to_string()); }

    fn sound(&self) { *self.sounds.borrow_mut() += 1; }
}

/// Creates `names` as empty files in `dir`.
pub fn touch_all(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), b"image").unwrap();
    }
}

/// Settings rooted at `root` with one category per name, each in its own
/// subdirectory.
pub fn settings_with_categories(root: &Path, names: &[&str]) -> Settings {
    let mut settings = Settings { default_dir: root.display().to_string(), ..Settings::default() };
    for name in names {
        let dir = root.join(name.to_lowercase());
        settings
            .categories
            .insert((*name).to_string(), Category::new(dir.display().to_string()));
    }
    settings
}
