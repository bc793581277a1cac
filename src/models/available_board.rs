//! Reconciled, ready-to-offer boards

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::models::board::Board;
use crate::models::port::Port;
use crate::platform::HostPlatform;
use crate::utils::natural::locale_compare;

/// Name given to boards on ports nothing is known about
pub const UNKNOWN_BOARD_NAME: &str = "Unknown";

/// How much is known about the board behind an available port
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailableBoardState {
    /// Reported by the backend as attached to this port
    Recognized = 0,
    /// Replayed from the last board the user selected on this port
    Guessed = 1,
    /// Nothing known; the user has not selected a board for this port yet
    Incomplete = 2,
}

impl fmt::Display for AvailableBoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailableBoardState::Recognized => write!(f, "recognized"),
            AvailableBoardState::Guessed => write!(f, "guessed"),
            AvailableBoardState::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// A board paired with the port it can be reached on.
///
/// The board is not necessarily recognized by the backend (e.g. a third
/// party board), but it always has a port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableBoard {
    #[serde(flatten)]
    pub board: Board,
    pub port: Port,
    pub state: AvailableBoardState,
    #[serde(default)]
    pub selected: bool,
}

impl AvailableBoard {
    pub fn new(board: Board, port: Port, state: AvailableBoardState, selected: bool) -> Self {
        Self {
            board,
            port,
            state,
            selected,
        }
    }

    /// Placeholder for a board port with no board information
    pub fn unknown(port: Port) -> Self {
        Self::new(
            Board::new(UNKNOWN_BOARD_NAME),
            port,
            AvailableBoardState::Incomplete,
            false,
        )
    }

    pub fn name(&self) -> &str {
        &self.board.name
    }

    pub fn fqbn(&self) -> Option<&str> {
        self.board.fqbn.as_deref()
    }

    /// Order by name, FQBN, port, selected first, then state
    pub fn compare(&self, other: &AvailableBoard, platform: HostPlatform) -> Ordering {
        let result = locale_compare(&self.board.name, &other.board.name);
        if result != Ordering::Equal {
            return result;
        }
        if let (Some(left), Some(right)) = (self.fqbn(), other.fqbn()) {
            let result = locale_compare(left, right);
            if result != Ordering::Equal {
                return result;
            }
        }
        let result = self.port.compare(&other.port, platform);
        if result != Ordering::Equal {
            return result;
        }
        match (self.selected, other.selected) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        self.state.cmp(&other.state)
    }
}

impl fmt::Display for AvailableBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} on {} ({})",
            if self.selected { "* " } else { "" },
            self.board,
            self.port.to_display_string(true),
            self.state
        )
    }
}
