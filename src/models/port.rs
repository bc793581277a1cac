//! Port value type and comparison helpers

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::platform::HostPlatform;
use crate::utils::natural::{locale_compare, natural_compare};

/// Transport a port is reached through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Serial,
    Network,
    Unknown,
}

impl Protocol {
    /// Map a backend protocol name, anything unrecognised becomes `Unknown`
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("serial") => Protocol::Serial,
            Some("network") => Protocol::Network,
            _ => Protocol::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Serial => "serial",
            Protocol::Network => "network",
            Protocol::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A port reported by the backend
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Port {
    pub address: String,
    pub protocol: Protocol,
    /// Optional label for the protocol, e.g. `Serial Port (USB)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Port {
    pub fn new(address: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            address: address.into(),
            protocol,
            label: None,
        }
    }

    pub fn serial(address: impl Into<String>) -> Self {
        Self::new(address, Protocol::Serial)
    }

    pub fn network(address: impl Into<String>) -> Self {
        Self::new(address, Protocol::Network)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn label_or_empty(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    /// Address, optionally followed by the label
    pub fn to_display_string(&self, use_label: bool) -> String {
        match &self.label {
            Some(label) if use_label && !label.is_empty() => {
                format!("{} {}", self.address, label)
            }
            _ => self.address.clone(),
        }
    }

    pub fn is_board_port(&self, platform: HostPlatform) -> bool {
        platform.is_board_port(&self.address)
    }

    /// Board ports first, then protocol, address (natural order) and label
    pub fn compare(&self, other: &Port, platform: HostPlatform) -> Ordering {
        match (self.is_board_port(platform), other.is_board_port(platform)) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        self.protocol
            .as_str()
            .cmp(other.protocol.as_str())
            .then_with(|| natural_compare(&self.address, &other.address))
            .then_with(|| locale_compare(self.label_or_empty(), other.label_or_empty()))
    }

    /// Compare a port with a bare address as reported on attached boards.
    ///
    /// Only the address takes part; a non-serial protocol is logged and
    /// otherwise ignored.
    pub fn same_as(port: Option<&Port>, address: Option<&str>) -> bool {
        match (port, address) {
            (Some(port), Some(address)) => {
                if port.protocol != Protocol::Serial {
                    log::warn!(
                        "Unexpected protocol for port: {:?}. Ignoring protocol, comparing addresses with {}.",
                        port,
                        address
                    );
                }
                port.address == address
            }
            _ => false,
        }
    }
}

impl PartialEq for Port {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
            && self.protocol == other.protocol
            && self.label_or_empty() == other.label_or_empty()
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_from_name() {
        assert_eq!(Protocol::from_name(Some("serial")), Protocol::Serial);
        assert_eq!(Protocol::from_name(Some("network")), Protocol::Network);
        assert_eq!(Protocol::from_name(Some("usb")), Protocol::Unknown);
        assert_eq!(Protocol::from_name(None), Protocol::Unknown);
    }

    #[test]
    fn test_display_string() {
        let port = Port::serial("/dev/ttyACM0").with_label("Serial Port (USB)");
        assert_eq!(port.to_display_string(false), "/dev/ttyACM0");
        assert_eq!(port.to_display_string(true), "/dev/ttyACM0 Serial Port (USB)");
        assert_eq!(Port::serial("COM3").to_display_string(true), "COM3");
    }

    #[test]
    fn test_equality_treats_missing_label_as_empty() {
        let plain = Port::serial("COM3");
        assert_eq!(plain, Port::serial("COM3").with_label(""));
        assert_ne!(plain, Port::serial("COM3").with_label("USB"));
        assert_ne!(plain, Port::network("COM3"));
    }

    #[test]
    fn test_same_as_ignores_protocol() {
        let serial = Port::serial("/dev/ttyUSB0");
        let network = Port::network("/dev/ttyUSB0");
        assert!(Port::same_as(Some(&serial), Some("/dev/ttyUSB0")));
        assert!(Port::same_as(Some(&network), Some("/dev/ttyUSB0")));
        assert!(!Port::same_as(Some(&serial), Some("/dev/ttyUSB1")));
        assert!(!Port::same_as(None, Some("/dev/ttyUSB0")));
        assert!(!Port::same_as(Some(&serial), None));
    }

    #[test]
    fn test_compare_orders_board_ports_first() {
        let platform = HostPlatform::Linux;
        let legacy = Port::serial("/dev/ttyS0");
        let board = Port::serial("/dev/ttyUSB0");
        assert_eq!(board.compare(&legacy, platform), Ordering::Less);
        assert_eq!(legacy.compare(&board, platform), Ordering::Greater);
    }

    #[test]
    fn test_compare_uses_natural_address_order() {
        let platform = HostPlatform::Windows;
        let mut ports = vec![
            Port::serial("COM10"),
            Port::network("192.168.0.7"),
            Port::serial("COM2"),
            Port::serial("COM1"),
        ];
        ports.sort_by(|a, b| a.compare(b, platform));
        let addresses: Vec<_> = ports.iter().map(|p| p.address.as_str()).collect();
        assert_eq!(addresses, vec!["192.168.0.7", "COM2", "COM10", "COM1"]);
    }
}
