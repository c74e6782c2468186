//! Key-device authorization for protected categories.
//!
//! A key device is a removable volume that must be mounted and carry a marker
//! file whose MD5 matches the checksum pinned in `key_devices`. Every check
//! fails closed. Denial reasons are logged; the expected checksum never is.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

use crate::config::{Category, KeyDescriptor, Settings};
use crate::platform::Host;

/// File that must exist at the root of a key volume.
pub const KEY_MARKER_FILE: &str = "goCarousel.png";

/// Why a key device was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// A protected category names no key device.
    NoKeyNamed,
    UnknownKey(String),
    /// The descriptor does not have exactly three fields.
    MalformedDescriptor(String),
    NotMounted { label: String },
    MountLookupFailed { label: String, reason: String },
    MarkerMissing { mount: PathBuf },
    MarkerUnreadable { reason: String },
    ChecksumMismatch { label: String },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoKeyNamed => write!(f, "protected category names no key device"),
            Self::UnknownKey(name) => write!(f, "missing key device '{name}'"),
            Self::MalformedDescriptor(name) => write!(
                f,
                "malformed key descriptor for '{name}', must be 'vendorId:productId volumeLabel md5'"
            ),
            Self::NotMounted { label } => write!(f, "key carrier '{label}' is not mounted"),
            Self::MountLookupFailed { label, reason } => {
                write!(f, "could not look up mount of '{label}': {reason}")
            }
            Self::MarkerMissing { mount } => {
                write!(f, "key object not found on {}", mount.display())
            }
            Self::MarkerUnreadable { reason } => write!(f, "key object unreadable: {reason}"),
            Self::ChecksumMismatch { label } => write!(f, "key object on '{label}' does not match"),
        }
    }
}

/// Computes the lowercase hex MD5 of a file.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub fn file_md5(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Runs every factor of the key check, stopping at the first failure.
///
/// An empty `key_name` means the category is not protected and passes.
///
/// # Errors
///
/// Returns the first [`Denial`] encountered.
pub fn check<H: Host + ?Sized>(settings: &Settings, host: &H, key_name: &str) -> Result<(), Denial> {
    if key_name.is_empty() {
        return Ok(());
    }

    let raw = settings
        .key_devices
        .get(key_name)
        .ok_or_else(|| Denial::UnknownKey(key_name.to_string()))?;

    let key = KeyDescriptor::parse(raw).ok_or_else(|| Denial::MalformedDescriptor(key_name.to_string()))?;
    let label = key.volume_label.to_string();

    let mount = host
        .mount_point(key.volume_label)
        .map_err(|err| Denial::MountLookupFailed { label: label.clone(), reason: err.to_string() })?
        .ok_or_else(|| Denial::NotMounted { label: label.clone() })?;
    tracing::debug!(%label, mount = %mount.display(), "key device mounted");

    let marker = mount.join(KEY_MARKER_FILE);
    if !marker.is_file() {
        return Err(Denial::MarkerMissing { mount });
    }

    let actual = file_md5(&marker).map_err(|err| Denial::MarkerUnreadable { reason: err.to_string() })?;
    if actual.eq_ignore_ascii_case(key.checksum) {
        Ok(())
    } else {
        Err(Denial::ChecksumMismatch { label })
    }
}

/// Whether the key device named `key_name` currently grants access.
#[must_use]
pub fn authorize<H: Host + ?Sized>(settings: &Settings, host: &H, key_name: &str) -> bool {
    match check(settings, host, key_name) {
        Ok(()) => true,
        Err(denial) => {
            tracing::warn!(key = %key_name, reason = %denial, "authorization denied");
            false
        }
    }
}

/// Whether `category` may be served.
///
/// Open categories always pass. A protected category with an empty
/// `key_name` is denied without consulting the host.
#[must_use]
pub fn authorize_category<H: Host + ?Sized>(
    settings: &Settings,
    host: &H,
    category: &Category,
) -> bool {
    match category.required_key() {
        None => true,
        Some("") => {
            tracing::warn!(reason = %Denial::NoKeyNamed, "authorization denied");
            false
        }
        Some(key_name) => authorize(settings, host, key_name),
    }
}

/// Per-factor state of a key device, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInspection {
    pub name: String,
    pub configured: bool,
    pub well_formed: bool,
    /// `None` when presence could not be queried.
    pub usb_present: Option<bool>,
    pub mount_point: Option<PathBuf>,
    pub marker_present: bool,
    pub checksum_matches: bool,
    pub authorized: bool,
}

/// Inspects every factor of a key device without stopping at the first failure.
#[must_use]
pub fn inspect<H: Host + ?Sized>(settings: &Settings, host: &H, key_name: &str) -> KeyInspection {
    let mut report = KeyInspection {
        name: key_name.to_string(),
        configured: false,
        well_formed: false,
        usb_present: None,
        mount_point: None,
        marker_present: false,
        checksum_matches: false,
        authorized: false,
    };

    let Some(raw) = settings.key_devices.get(key_name) else {
        return report;
    };
    report.configured = true;

    let Some(key) = KeyDescriptor::parse(raw) else {
        return report;
    };
    report.well_formed = true;

    report.usb_present = key
        .vendor_product()
        .and_then(|(vendor, product)| host.usb_present(vendor, product).ok());

    report.mount_point = host.mount_point(key.volume_label).ok().flatten();
    if let Some(marker) = report.mount_point.as_ref().map(|m| m.join(KEY_MARKER_FILE)) {
        report.marker_present = marker.is_file();
        report.checksum_matches = report.marker_present
            && file_md5(&marker).is_ok_and(|sum| sum.eq_ignore_ascii_case(key.checksum));
    }

    report.authorized = check(settings, host, key_name).is_ok();
    report
}
