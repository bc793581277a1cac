//! Tracked attached boards and available ports
//!
//! Used by backends that learn about hardware one item at a time and must
//! report whole before/after snapshots.

use crate::errors::{BoardsError, Result};
use crate::models::{AttachedBoard, AttachedBoardsChangeEvent, AttachedSnapshot, Port};

/// Something that can be plugged in or out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachable {
    Board(AttachedBoard),
    Port(Port),
}

impl From<AttachedBoard> for Attachable {
    fn from(board: AttachedBoard) -> Self {
        Attachable::Board(board)
    }
}

impl From<Port> for Attachable {
    fn from(port: Port) -> Self {
        Attachable::Port(port)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttachedState {
    boards: Vec<AttachedBoard>,
    ports: Vec<Port>,
}

impl AttachedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AttachedSnapshot {
        AttachedSnapshot::new(self.boards.clone(), self.ports.clone())
    }

    pub fn boards(&self) -> &[AttachedBoard] {
        &self.boards
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// The tracked port a board is reachable on
    pub fn port_for(&self, board: &AttachedBoard) -> Option<&Port> {
        let address = board.port()?;
        self.ports.iter().find(|port| port.address == address)
    }

    /// Start tracking `item`.
    ///
    /// A serial board brings its port along. Returns `None` if nothing
    /// changed.
    pub fn attach(&mut self, item: impl Into<Attachable>) -> Option<AttachedBoardsChangeEvent> {
        let old_state = self.snapshot();
        match item.into() {
            Attachable::Board(board) => {
                if let AttachedBoard::Serial { port, .. } = &board {
                    self.add_port(Port::serial(port.clone()));
                }
                if !self.boards.contains(&board) {
                    self.boards.push(board);
                }
            }
            Attachable::Port(port) => self.add_port(port),
        }
        self.change_from(old_state)
    }

    /// Stop tracking `item`.
    ///
    /// Detaching a port also detaches the boards reachable on it. Nothing is
    /// modified when `item` is not tracked.
    pub fn detach(&mut self, item: impl Into<Attachable>) -> Result<AttachedBoardsChangeEvent> {
        let old_state = self.snapshot();
        match item.into() {
            Attachable::Board(board) => {
                let Some(index) = self.boards.iter().position(|b| *b == board) else {
                    return Err(self.not_attached(board.to_string()));
                };
                self.boards.remove(index);
            }
            Attachable::Port(port) => {
                let Some(index) = self.ports.iter().position(|p| *p == port) else {
                    return Err(self.not_attached(port.to_string()));
                };
                self.ports.remove(index);
                self.boards
                    .retain(|board| board.port() != Some(port.address.as_str()));
            }
        }
        Ok(AttachedBoardsChangeEvent::new(old_state, self.snapshot()))
    }

    /// Replace everything at once, e.g. after a rescan
    pub fn replace(
        &mut self,
        boards: Vec<AttachedBoard>,
        ports: Vec<Port>,
    ) -> Option<AttachedBoardsChangeEvent> {
        let old_state = self.snapshot();
        self.boards = boards;
        self.ports = ports;
        self.change_from(old_state)
    }

    fn add_port(&mut self, port: Port) {
        if !self.ports.contains(&port) {
            self.ports.push(port);
        }
    }

    fn change_from(&self, old_state: AttachedSnapshot) -> Option<AttachedBoardsChangeEvent> {
        let new_state = self.snapshot();
        (old_state != new_state).then(|| AttachedBoardsChangeEvent::new(old_state, new_state))
    }

    fn not_attached(&self, what: String) -> BoardsError {
        let attached: Vec<String> = self
            .boards
            .iter()
            .map(ToString::to_string)
            .chain(self.ports.iter().map(ToString::to_string))
            .collect();
        BoardsError::NotAttached {
            what,
            attached: format!("[{}]", attached.join(", ")),
        }
    }
}
