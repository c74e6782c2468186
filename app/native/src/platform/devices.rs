//! Parsers for block-device and USB listings.
//!
//! Both parsers are pure so they can be tested against captured output; the
//! unix host feeds them the output of `lsblk -P` and `lsusb -d`.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

/// Columns requested from `lsblk`.
pub const LSBLK_COLUMNS: &str = "NAME,LABEL,MOUNTPOINT";

/// `KEY="value"` pairs as printed by `lsblk -P`. Column names are ASCII.
const PAIR_PATTERN: &str = r#"([A-Z][A-Z0-9_:-]*)="([^"]*)""#;

static PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PAIR_PATTERN).expect("valid lsblk pair regex"));

/// One row of `lsblk -P -o NAME,LABEL,MOUNTPOINT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDevice {
    pub name: String,
    pub label: String,
    /// `None` when the device is not mounted.
    pub mount_point: Option<PathBuf>,
}

/// Parses `lsblk -P` output into devices. Rows without a `NAME` are skipped.
#[must_use]
pub fn parse_lsblk_pairs(output: &str) -> Vec<BlockDevice> {
    output
        .lines()
        .filter_map(|line| {
            let mut device = BlockDevice::default();
            for caps in PAIR_RE.captures_iter(line) {
                let value = &caps[2];
                match &caps[1] {
                    "NAME" => device.name = value.to_string(),
                    "LABEL" => device.label = value.to_string(),
                    "MOUNTPOINT" if !value.is_empty() => {
                        device.mount_point = Some(PathBuf::from(value));
                    }
                    _ => {}
                }
            }
            (!device.name.is_empty()).then_some(device)
        })
        .collect()
}

/// Finds the mount point of a mounted device whose label is exactly `label`.
///
/// Unmounted partitions sharing the label are skipped.
#[must_use]
pub fn find_mount_point(output: &str, label: &str) -> Option<PathBuf> {
    parse_lsblk_pairs(output)
        .into_iter()
        .filter(|device| device.label == label)
        .find_map(|device| device.mount_point)
}

/// Whether `lsusb` output lists a device with the given vendor and product ids.
#[must_use]
pub fn usb_listing_contains(output: &str, vendor: &str, product: &str) -> bool {
    let wanted = format!("{vendor}:{product}");
    output.lines().any(|line| {
        line.split_whitespace()
            .skip_while(|token| *token != "ID")
            .nth(1)
            .is_some_and(|id| id.eq_ignore_ascii_case(&wanted))
    })
}
