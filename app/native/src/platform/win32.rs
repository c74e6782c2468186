//! Windows host: the wallpaper and volume labels come from Win32 calls.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use sysinfo::{ProcessesToUpdate, System};
use windows::Win32::Storage::FileSystem::{GetLogicalDrives, GetVolumeInformationW};
use windows::Win32::UI::WindowsAndMessaging::{
    SPI_SETDESKWALLPAPER, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SystemParametersInfoW,
};
use windows::core::PCWSTR;

use super::command::resolve_binary;
use super::{ExitConvention, Host, HostError, ProgramOutput, interpret_exit};
use crate::session::SessionKind;

/// Maximum volume label length plus terminator.
const LABEL_BUFFER_LEN: usize = 261;

fn to_wide(value: &std::ffi::OsStr) -> Vec<u16> { value.encode_wide().chain(Some(0)).collect() }

/// The real operating system.
#[derive(Debug, Default)]
pub struct SystemHost {
    env_overlay: RefCell<BTreeMap<String, String>>,
}

impl SystemHost {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn volume_label(root: &str) -> Option<String> {
        let root_wide = to_wide(root.as_ref());
        let mut label = [0u16; LABEL_BUFFER_LEN];

        // SAFETY: root_wide is NUL terminated and outlives the call; the label
        // buffer is a valid mutable slice.
        unsafe {
            GetVolumeInformationW(
                PCWSTR(root_wide.as_ptr()),
                Some(&mut label),
                None,
                None,
                None,
                None,
            )
        }
        .ok()?;

        let len = label.iter().position(|&c| c == 0).unwrap_or(label.len());
        Some(String::from_utf16_lossy(&label[..len]))
    }
}

impl Host for SystemHost {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env_overlay
            .borrow()
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    }

    fn native_session(&self) -> Option<SessionKind> { Some(SessionKind::Windows) }

    fn process_names(&self) -> Vec<String> {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        system
            .processes()
            .values()
            .map(|process| process.name().to_string_lossy().into_owned())
            .collect()
    }

    fn user_id(&self) -> Option<u32> { None }

    fn home_dir(&self) -> Option<PathBuf> { dirs::home_dir() }

    fn apply_env(&self, vars: &BTreeMap<String, String>) {
        self.env_overlay.borrow_mut().extend(vars.clone());
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        convention: ExitConvention,
    ) -> Result<ProgramOutput, HostError> {
        let binary = resolve_binary(program)?;
        let output = Command::new(&binary)
            .args(args)
            .envs(self.env_overlay.borrow().iter())
            .output()
            .map_err(|source| HostError::Spawn { program: program.to_string(), source })?;

        interpret_exit(
            program,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            &String::from_utf8_lossy(&output.stderr),
            convention,
        )
    }

    fn mount_point(&self, label: &str) -> Result<Option<PathBuf>, HostError> {
        // SAFETY: GetLogicalDrives takes no arguments.
        let drives = unsafe { GetLogicalDrives() };
        if drives == 0 {
            return Err(HostError::System("GetLogicalDrives returned no drives".to_string()));
        }

        let found = (b'A'..=b'Z')
            .enumerate()
            .filter(|(bit, _)| drives & (1 << bit) != 0)
            .map(|(_, letter)| format!("{}:\\", char::from(letter)))
            .find(|root| Self::volume_label(root).as_deref() == Some(label));

        Ok(found.map(PathBuf::from))
    }

    fn usb_present(&self, _vendor: &str, _product: &str) -> Result<bool, HostError> {
        Err(HostError::Unsupported("USB device queries"))
    }

    fn set_desktop_wallpaper(&self, path: &Path) -> Result<(), HostError> {
        let mut wide = to_wide(path.as_os_str());

        // SAFETY: wide is a NUL-terminated UTF-16 path that lives across the call.
        unsafe {
            SystemParametersInfoW(
                SPI_SETDESKWALLPAPER,
                0,
                Some(wide.as_mut_ptr().cast::<c_void>()),
                SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
            )
        }
        .map_err(|err| HostError::System(err.to_string()))
    }
}
