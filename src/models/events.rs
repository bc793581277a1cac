//! Event types flowing into and out of the boards engine

use serde::{Deserialize, Serialize};

use crate::models::available_board::AvailableBoard;
use crate::models::board::{AttachedBoard, BoardsPackage};
use crate::models::boards_config::BoardsConfig;
use crate::models::port::Port;

/// Boards and ports known at one moment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedSnapshot {
    pub boards: Vec<AttachedBoard>,
    pub ports: Vec<Port>,
}

impl AttachedSnapshot {
    pub fn new(boards: Vec<AttachedBoard>, ports: Vec<Port>) -> Self {
        Self { boards, ports }
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty() && self.ports.is_empty()
    }
}

/// Attached boards or available ports changed, e.g. a board was unplugged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedBoardsChangeEvent {
    pub old_state: AttachedSnapshot,
    pub new_state: AttachedSnapshot,
}

/// What appeared and what disappeared between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachedBoardsDiff {
    pub attached: AttachedSnapshot,
    pub detached: AttachedSnapshot,
}

impl AttachedBoardsChangeEvent {
    pub fn new(old_state: AttachedSnapshot, new_state: AttachedSnapshot) -> Self {
        Self {
            old_state,
            new_state,
        }
    }

    pub fn diff(&self) -> AttachedBoardsDiff {
        fn missing<T: PartialEq + Clone>(left: &[T], right: &[T]) -> Vec<T> {
            left.iter()
                .filter(|item| !right.contains(item))
                .cloned()
                .collect()
        }

        let old = &self.old_state;
        let new = &self.new_state;
        AttachedBoardsDiff {
            attached: AttachedSnapshot::new(
                missing(&new.boards, &old.boards),
                missing(&new.ports, &old.ports),
            ),
            detached: AttachedSnapshot::new(
                missing(&old.boards, &new.boards),
                missing(&old.ports, &new.ports),
            ),
        }
    }
}

/// A boards package was installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInstalledEvent {
    pub pkg: BoardsPackage,
}

/// A boards package was uninstalled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardUninstalledEvent {
    pub pkg: BoardsPackage,
}

/// Notifications pushed by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendNotification {
    AttachedBoardsChanged(AttachedBoardsChangeEvent),
    BoardInstalled(BoardInstalledEvent),
    BoardUninstalled(BoardUninstalledEvent),
}

/// Notifications published to presentation layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardsEvent {
    /// The attached boards or available ports changed
    BoardsChanged(AttachedBoardsChangeEvent),
    BoardInstalled(BoardInstalledEvent),
    BoardUninstalled(BoardUninstalledEvent),
    /// The selected board or port changed, from the user or from a
    /// package (un)install
    BoardsConfigChanged(BoardsConfig),
    AvailableBoardsChanged(Vec<AvailableBoard>),
    /// Stored configuration options changed for these FQBNs
    ConfigOptionsChanged(Vec<String>),
}

impl BoardsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BoardsEvent::BoardsChanged(_) => "boards-changed",
            BoardsEvent::BoardInstalled(_) => "board-installed",
            BoardsEvent::BoardUninstalled(_) => "board-uninstalled",
            BoardsEvent::BoardsConfigChanged(_) => "boards-config-changed",
            BoardsEvent::AvailableBoardsChanged(_) => "available-boards-changed",
            BoardsEvent::ConfigOptionsChanged(_) => "config-options-changed",
        }
    }
}
