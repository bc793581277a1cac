//! Host platform detection and board-port heuristics
//!
//! Which serial ports are worth offering as board ports depends on the
//! operating system naming scheme. Windows hides only the default `COM1`,
//! while Unix-likes require a `/dev/` device node with a board-like name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::BoardsError;

const DEV_PREFIX: &str = "/dev/";

/// macOS call-out and dial-in devices, e.g. `/dev/cu.usbmodem14401`
static MACOS_DEVICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(tty|cu)\..*").expect("valid macOS device pattern"));

/// Linux style device names, e.g. `/dev/ttyACM0`
static UNIX_DEVICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(ttyS|ttyUSB|ttyACM|ttyAMA|rfcomm|ttyO)[0-9]{1,3}")
        .expect("valid unix device pattern")
});

/// macOS pseudo devices which are never boards
const MACOS_EXCLUDED: &[&str] = &[
    "/dev/cu.MALS",
    "/dev/cu.SOC",
    "/dev/cu.Bluetooth-Incoming-Port",
];

/// Legacy `/dev/ttyS0` .. `/dev/ttyS31` nodes allocated in bulk by the kernel
const LEGACY_TTYS_RANGE: std::ops::RangeInclusive<u32> = 0..=31;

/// Operating system family used for port classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Windows,
    MacOs,
    Linux,
}

impl HostPlatform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else {
            HostPlatform::Linux
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "windows",
            HostPlatform::MacOs => "macos",
            HostPlatform::Linux => "linux",
        }
    }

    /// `true` if a port with this address may have a board behind it
    pub fn is_board_port(&self, address: &str) -> bool {
        if *self == HostPlatform::Windows {
            return !address.eq_ignore_ascii_case("COM1");
        }

        let Some(device) = address.strip_prefix(DEV_PREFIX) else {
            return false;
        };

        if *self == HostPlatform::MacOs && MACOS_DEVICE.is_match(device) {
            return !MACOS_EXCLUDED
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(address));
        }

        if UNIX_DEVICE.is_match(device) {
            if let Some(index) = device.strip_prefix("ttyS") {
                if let Ok(index) = index.parse::<u32>() {
                    if LEGACY_TTYS_RANGE.contains(&index) {
                        return false;
                    }
                }
            }
            return true;
        }

        false
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HostPlatform {
    type Err = BoardsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(HostPlatform::Windows),
            "macos" | "darwin" | "osx" => Ok(HostPlatform::MacOs),
            "linux" => Ok(HostPlatform::Linux),
            other => Err(BoardsError::Config(format!("unknown platform: {}", other))),
        }
    }
}
