//! Scripted doubles for the host and notifier, shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::modules::carousel::Notifier;
use crate::platform::{ExitConvention, Host, HostError, ProgramOutput};
use crate::session::SessionKind;

/// A host whose answers are set up front and whose side effects are recorded.
#[derive(Debug)]
pub struct FakeHost {
    env: BTreeMap<String, String>,
    processes: Vec<String>,
    uid: Option<u32>,
    home: Option<PathBuf>,
    native: Option<SessionKind>,
    outputs: BTreeMap<String, ProgramOutput>,
    failures: Vec<String>,
    mounts: BTreeMap<String, PathBuf>,
    mount_error: bool,
    usb: Vec<String>,
    calls: RefCell<Vec<Vec<String>>>,
    applied_env: RefCell<BTreeMap<String, String>>,
    wallpapers: RefCell<Vec<PathBuf>>,
    mount_lookups: Cell<usize>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            env: BTreeMap::new(),
            processes: Vec::new(),
            uid: Some(1000),
            home: Some(PathBuf::from("/home/tester")),
            native: None,
            outputs: BTreeMap::new(),
            failures: Vec::new(),
            mounts: BTreeMap::new(),
            mount_error: false,
            usb: Vec::new(),
            calls: RefCell::new(Vec::new()),
            applied_env: RefCell::new(BTreeMap::new()),
            wallpapers: RefCell::new(Vec::new()),
            mount_lookups: Cell::new(0),
        }
    }
}

impl FakeHost {
    pub fn new() -> Self { Self::default() }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_process(mut self, name: &str) -> Self {
        self.processes.push(name.to_string());
        self
    }

    pub fn with_uid(mut self, uid: u32) -> Self {
        self.uid = Some(uid);
        self
    }

    pub fn without_uid(mut self) -> Self {
        self.uid = None;
        self
    }

    pub fn with_native(mut self, kind: SessionKind) -> Self {
        self.native = Some(kind);
        self
    }

    pub fn with_output(self, program: &str, stdout: &str) -> Self {
        self.with_program_output(program, ProgramOutput::found(stdout))
    }

    pub fn with_program_output(mut self, program: &str, output: ProgramOutput) -> Self {
        self.outputs.insert(program.to_string(), output);
        self
    }

    pub fn with_failure(mut self, program: &str) -> Self {
        self.failures.push(program.to_string());
        self
    }

    pub fn with_mount(mut self, label: &str, path: &Path) -> Self {
        self.mounts.insert(label.to_string(), path.to_path_buf());
        self
    }

    pub fn with_mount_error(mut self) -> Self {
        self.mount_error = true;
        self
    }

    pub fn with_usb(mut self, vendor: &str, product: &str) -> Self {
        self.usb.push(format!("{vendor}:{product}"));
        self
    }

    /// Every external program run so far, program name first.
    pub fn calls(&self) -> Vec<Vec<String>> { self.calls.borrow().clone() }

    pub fn applied_env(&self) -> BTreeMap<String, String> { self.applied_env.borrow().clone() }

    pub fn desktop_wallpapers(&self) -> Vec<PathBuf> { self.wallpapers.borrow().clone() }

    pub fn mount_lookups(&self) -> usize { self.mount_lookups.get() }
}

impl Host for FakeHost {
    fn env_var(&self, name: &str) -> Option<String> { self.env.get(name).cloned() }

    fn native_session(&self) -> Option<SessionKind> { self.native }

    fn process_names(&self) -> Vec<String> { self.processes.clone() }

    fn user_id(&self) -> Option<u32> { self.uid }

    fn home_dir(&self) -> Option<PathBuf> { self.home.clone() }

    fn apply_env(&self, vars: &BTreeMap<String, String>) {
        self.applied_env.borrow_mut().extend(vars.clone());
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        _convention: ExitConvention,
    ) -> Result<ProgramOutput, HostError> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(ToString::to_string));
        self.calls.borrow_mut().push(call);

        if self.failures.iter().any(|p| p == program) {
            return Err(HostError::ExitStatus {
                program: program.to_string(),
                code: 2,
                stderr: "scripted failure".to_string(),
            });
        }

        Ok(self.outputs.get(program).cloned().unwrap_or_else(|| ProgramOutput::found("")))
    }

    fn mount_point(&self, label: &str) -> Result<Option<PathBuf>, HostError> {
        self.mount_lookups.set(self.mount_lookups.get() + 1);
        if self.mount_error {
            return Err(HostError::System("lsblk unavailable".to_string()));
        }
        Ok(self.mounts.get(label).cloned())
    }

    fn usb_present(&self, vendor: &str, product: &str) -> Result<bool, HostError> {
        Ok(self.usb.contains(&format!("{vendor}:{product}")))
    }

    fn set_desktop_wallpaper(&self, path: &Path) -> Result<(), HostError> {
        self.wallpapers.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// What a [`RecordingNotifier`] was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info { message: String, icon: Option<PathBuf> },
    Alert { message: String },
    Sound,
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self { Self::default() }

    pub fn sent(&self) -> Vec<Notification> { self.sent.borrow().clone() }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, icon: Option<&Path>) {
        self.sent.borrow_mut().push(Notification::Info {
            message: message.to_string(),
            icon: icon.map(Path::to_path_buf),
        });
    }

    fn alert(&self, message: &str) {
        self.sent.borrow_mut().push(Notification::Alert { message: message.to_string() });
    }

    fn sound(&self) { self.sent.borrow_mut().push(Notification::Sound); }
}
