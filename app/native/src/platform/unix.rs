//! POSIX host: desktops are driven through their command-line tools.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use sysinfo::{ProcessesToUpdate, System};

use super::command::resolve_binary;
use super::devices::{LSBLK_COLUMNS, find_mount_point, usb_listing_contains};
use super::{ExitConvention, Host, HostError, ProgramOutput, interpret_exit};

/// The real operating system.
///
/// Environment variables handed to [`Host::apply_env`] are kept in an overlay
/// and passed to every child process instead of mutating this process's
/// environment.
#[derive(Debug, Default)]
pub struct SystemHost {
    env_overlay: RefCell<BTreeMap<String, String>>,
}

impl SystemHost {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl Host for SystemHost {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env_overlay
            .borrow()
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    }

    fn process_names(&self) -> Vec<String> {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        system
            .processes()
            .values()
            .map(|process| process.name().to_string_lossy().into_owned())
            .collect()
    }

    fn user_id(&self) -> Option<u32> {
        // SAFETY: getuid has no preconditions and cannot fail.
        Some(unsafe { libc::getuid() })
    }

    fn home_dir(&self) -> Option<PathBuf> { dirs::home_dir() }

    fn apply_env(&self, vars: &BTreeMap<String, String>) {
        for (name, value) in vars {
            tracing::debug!(%name, %value, "exporting to desktop tools");
        }
        self.env_overlay.borrow_mut().extend(vars.clone());
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        convention: ExitConvention,
    ) -> Result<ProgramOutput, HostError> {
        let binary = resolve_binary(program)?;
        tracing::debug!(program = %binary.display(), ?args, "running external program");

        let output = Command::new(&binary)
            .args(args)
            .envs(self.env_overlay.borrow().iter())
            .output()
            .map_err(|source| HostError::Spawn { program: program.to_string(), source })?;

        let result = interpret_exit(
            program,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            &String::from_utf8_lossy(&output.stderr),
            convention,
        );

        if let Err(err) = &result {
            tracing::warn!(error = %err, "external program failed");
        }

        result
    }

    fn mount_point(&self, label: &str) -> Result<Option<PathBuf>, HostError> {
        let output = self.run("lsblk", &["-P", "-o", LSBLK_COLUMNS], ExitConvention::Strict)?;
        Ok(find_mount_point(&output.stdout, label))
    }

    fn usb_present(&self, vendor: &str, product: &str) -> Result<bool, HostError> {
        let id = format!("{vendor}:{product}");
        let output = self.run("lsusb", &["-d", id.as_str()], ExitConvention::Search)?;
        Ok(output.found && usb_listing_contains(&output.stdout, vendor, product))
    }

    fn set_desktop_wallpaper(&self, _path: &Path) -> Result<(), HostError> {
        Err(HostError::Unsupported("setting the wallpaper outside a desktop session"))
    }
}
