//! Board-related data models

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::utils::natural::locale_compare;

/// Historical co-branding suffix carried by some board names
const GENUINO_SUFFIX: &str = "/Genuino";

/// A board definition as known to the backend.
///
/// A board is installed when its FQBN is known; without a FQBN the
/// board package providing it is missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqbn: Option<String>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fqbn: None,
        }
    }

    pub fn with_fqbn(name: impl Into<String>, fqbn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fqbn: Some(fqbn.into()),
        }
    }

    pub fn is_installed(&self) -> bool {
        self.fqbn.is_some()
    }

    /// Same board definition, without the FQBN
    pub fn without_fqbn(&self) -> Self {
        Self::new(self.name.clone())
    }

    /// Identity check between a selected board and a candidate.
    ///
    /// FQBNs win when both sides have one, otherwise the names are compared
    /// with the `/Genuino` suffix stripped.
    pub fn same_as(&self, other: &Board) -> bool {
        if let (Some(left), Some(right)) = (&self.fqbn, &other.fqbn) {
            return left == right;
        }
        self.same_name_as(&other.name)
    }

    pub fn same_name_as(&self, name: &str) -> bool {
        strip_genuino(&self.name) == strip_genuino(name)
    }

    /// Name first, then FQBN (a missing FQBN sorts as empty)
    pub fn compare(&self, other: &Board) -> Ordering {
        locale_compare(&self.name, &other.name).then_with(|| {
            locale_compare(
                self.fqbn.as_deref().unwrap_or(""),
                other.fqbn.as_deref().unwrap_or(""),
            )
        })
    }

    /// `Name [fqbn]` when asked and known, otherwise just the name
    pub fn to_display_string(&self, use_fqbn: bool) -> String {
        match &self.fqbn {
            Some(fqbn) if use_fqbn => format!("{} [{}]", self.name, fqbn),
            _ => self.name.clone(),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string(true))
    }
}

fn strip_genuino(name: &str) -> String {
    name.replacen(GENUINO_SUFFIX, "", 1)
}

/// A board reported by the backend as physically present.
///
/// The connection kind is fixed when the backend reports the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttachedBoard {
    /// Identified, but no port was reported for it
    Detected { board: Board },
    /// Attached to a serial port
    Serial { board: Board, port: String },
    /// Discovered on the network
    Network {
        board: Board,
        address: String,
        port: String,
    },
}

impl AttachedBoard {
    pub fn detected(board: Board) -> Self {
        AttachedBoard::Detected { board }
    }

    pub fn serial(board: Board, port: impl Into<String>) -> Self {
        AttachedBoard::Serial {
            board,
            port: port.into(),
        }
    }

    pub fn network(board: Board, address: impl Into<String>, port: impl Into<String>) -> Self {
        AttachedBoard::Network {
            board,
            address: address.into(),
            port: port.into(),
        }
    }

    pub fn board(&self) -> &Board {
        match self {
            AttachedBoard::Detected { board }
            | AttachedBoard::Serial { board, .. }
            | AttachedBoard::Network { board, .. } => board,
        }
    }

    pub fn name(&self) -> &str {
        &self.board().name
    }

    pub fn fqbn(&self) -> Option<&str> {
        self.board().fqbn.as_deref()
    }

    /// The port the board is reachable on, if it carries one
    pub fn port(&self) -> Option<&str> {
        match self {
            AttachedBoard::Detected { .. } => None,
            AttachedBoard::Serial { port, .. } | AttachedBoard::Network { port, .. } => {
                Some(port)
            }
        }
    }

    pub fn is_serial(&self) -> bool {
        matches!(self, AttachedBoard::Serial { .. })
    }
}

impl fmt::Display for AttachedBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port() {
            Some(port) => write!(f, "{} @ {}", self.board(), port),
            None => write!(f, "{}", self.board()),
        }
    }
}

/// An installable bundle of board definitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardsPackage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    /// `None` while the package is not installed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<String>,
    #[serde(default)]
    pub available_versions: Vec<String>,
    #[serde(default)]
    pub boards: Vec<Board>,
}

impl BoardsPackage {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author: String::new(),
            installed_version: None,
            available_versions: Vec::new(),
            boards: Vec::new(),
        }
    }

    pub fn installed(mut self, version: impl Into<String>) -> Self {
        self.installed_version = Some(version.into());
        self
    }

    pub fn with_boards(mut self, boards: Vec<Board>) -> Self {
        self.boards = boards;
        self
    }

    pub fn is_installed(&self) -> bool {
        self.installed_version.is_some()
    }

    /// The package's board carrying the given name, if any
    pub fn board_named(&self, name: &str) -> Option<&Board> {
        self.boards.iter().find(|board| board.name == name)
    }
}

/// A tool required to build for a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub packager: String,
    pub name: String,
    pub version: String,
}

/// Detailed board information returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetails {
    pub fqbn: String,
    #[serde(default)]
    pub required_tools: Vec<Tool>,
    #[serde(default)]
    pub config_options: Vec<crate::models::config_option::ConfigOption>,
}

/// Catalog search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSearchResult {
    #[serde(flatten)]
    pub board: Board,
    pub package_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_as_prefers_fqbn() {
        let uno = Board::with_fqbn("Arduino Uno", "arduino:avr:uno");
        assert!(uno.same_as(&Board::with_fqbn("Renamed", "arduino:avr:uno")));
        assert!(!uno.same_as(&Board::with_fqbn("Arduino Uno", "arduino:avr:nano")));
        assert!(uno.same_as(&Board::new("Arduino Uno")));
    }

    #[test]
    fn test_same_as_strips_genuino() {
        let board = Board::new("Arduino/Genuino Uno");
        assert!(board.same_as(&Board::new("Arduino Uno")));
        assert!(Board::new("Arduino Uno").same_name_as("Arduino/Genuino Uno"));
        assert!(!board.same_as(&Board::new("Arduino Mega")));
    }

    #[test]
    fn test_compare_and_display() {
        let nano = Board::with_fqbn("Arduino Nano", "arduino:avr:nano");
        let uno = Board::with_fqbn("Arduino Uno", "arduino:avr:uno");
        assert_eq!(nano.compare(&uno), Ordering::Less);
        assert_eq!(nano.compare(&nano.clone()), Ordering::Equal);
        assert_eq!(nano.to_display_string(true), "Arduino Nano [arduino:avr:nano]");
        assert_eq!(nano.to_display_string(false), "Arduino Nano");
        assert_eq!(Board::new("Unknown").to_display_string(true), "Unknown");
        assert!(nano.is_installed());
        assert!(!nano.without_fqbn().is_installed());
    }

    #[test]
    fn test_attached_board_port() {
        let mkr = Board::with_fqbn("Arduino MKR1000", "arduino:samd:mkr1000");
        let serial = AttachedBoard::serial(mkr.clone(), "/dev/cu.usbmodem14601");
        assert_eq!(serial.port(), Some("/dev/cu.usbmodem14601"));
        assert!(serial.is_serial());

        let network = AttachedBoard::network(mkr.clone(), "192.168.1.20", "8266");
        assert_eq!(network.port(), Some("8266"));
        assert!(!network.is_serial());

        assert_eq!(AttachedBoard::detected(mkr).port(), None);
    }

    #[test]
    fn test_attached_board_serde_tag() {
        let board = AttachedBoard::serial(Board::new("ESP32 Dev Module"), "/dev/ttyUSB0");
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["kind"], "serial");
        assert_eq!(json["port"], "/dev/ttyUSB0");
        let back: AttachedBoard = serde_json::from_value(json).unwrap();
        assert_eq!(back, board);
    }
}
