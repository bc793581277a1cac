//! The user's board and port selection

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::BoardsError;
use crate::models::board::Board;
use crate::models::port::Port;

/// What the user wants to build for and upload to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_board: Option<Board>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_port: Option<Port>,
}

impl BoardsConfig {
    pub fn new(selected_board: Option<Board>, selected_port: Option<Port>) -> Self {
        Self {
            selected_board,
            selected_port,
        }
    }

    pub fn with_board(mut self, board: Board) -> Self {
        self.selected_board = Some(board);
        self
    }

    pub fn with_port(mut self, port: Port) -> Self {
        self.selected_port = Some(port);
        self
    }

    /// `true` if a board is selected, hence code can be compiled against it
    pub fn can_verify(&self, silent: bool) -> bool {
        if self.selected_board.is_none() {
            if !silent {
                log::warn!("No boards selected.");
            }
            return false;
        }
        true
    }

    /// `true` if `can_verify`, the board has a FQBN and a port is selected
    pub fn can_upload_to(&self, silent: bool) -> bool {
        let Some(board) = self.selected_board.as_ref() else {
            return self.can_verify(silent);
        };

        if self.selected_port.is_none() {
            if !silent {
                log::warn!("No ports selected for board: '{}'.", board.name);
            }
            return false;
        }

        if board.fqbn.is_none() {
            if !silent {
                log::warn!(
                    "The FQBN is not available for the selected board {}. Do you have the corresponding core installed?",
                    board.name
                );
            }
            return false;
        }

        true
    }

    /// `true` if `board` attached on `port` is the one this config selects
    pub fn same_as(&self, board: &Board, port: &Port) -> bool {
        match &self.selected_board {
            Some(selected) => {
                selected.same_as(board)
                    && Port::same_as(self.selected_port.as_ref(), Some(&port.address))
            }
            None => false,
        }
    }
}

impl fmt::Display for BoardsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self
            .selected_board
            .as_ref()
            .map(|board| board.to_display_string(true))
            .unwrap_or_else(|| "<no board>".to_string());
        let port = self
            .selected_port
            .as_ref()
            .map(|port| port.to_display_string(true))
            .unwrap_or_else(|| "<no port>".to_string());
        write!(f, "{} on {}", board, port)
    }
}

/// A config that is known to be upload capable: a board with a FQBN and a port.
///
/// Used to remember the last good selection for auto-reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardsConfig", into = "BoardsConfig")]
pub struct ValidBoardsConfig {
    board: Board,
    fqbn: String,
    port: Port,
}

impl ValidBoardsConfig {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn fqbn(&self) -> &str {
        &self.fqbn
    }

    pub fn port(&self) -> &Port {
        &self.port
    }

    /// Same board on a different port
    pub fn with_port(&self, port: Port) -> Self {
        Self {
            port,
            ..self.clone()
        }
    }

    pub fn to_config(&self) -> BoardsConfig {
        BoardsConfig::new(Some(self.board.clone()), Some(self.port.clone()))
    }
}

impl TryFrom<BoardsConfig> for ValidBoardsConfig {
    type Error = BoardsError;

    fn try_from(config: BoardsConfig) -> Result<Self, Self::Error> {
        match config {
            BoardsConfig {
                selected_board: Some(board),
                selected_port: Some(port),
            } => match board.fqbn.clone() {
                Some(fqbn) => Ok(Self { board, fqbn, port }),
                None => Err(BoardsError::Config(format!(
                    "board {} has no FQBN",
                    board.name
                ))),
            },
            _ => Err(BoardsError::Config(
                "boards config needs both a board and a port".to_string(),
            )),
        }
    }
}

impl From<ValidBoardsConfig> for BoardsConfig {
    fn from(valid: ValidBoardsConfig) -> Self {
        BoardsConfig::new(Some(valid.board), Some(valid.port))
    }
}
