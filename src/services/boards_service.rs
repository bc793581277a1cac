//! Backend seam: the service that knows boards, ports and packages
//!
//! In the IDE this is the CLI daemon; [`crate::services::LocalBoardsService`]
//! is a stand-in that only knows the serial ports of this machine.

use async_trait::async_trait;

use crate::errors::{BoardsError, Result};
use crate::models::{AttachedBoard, BoardDetails, BoardSearchResult, BoardsPackage, Port};

/// Operations consumed from the boards backend
#[async_trait]
pub trait BoardsService: Send + Sync {
    /// Boards currently attached and recognized
    async fn get_attached_boards(&self) -> Result<Vec<AttachedBoard>>;

    /// All ports currently available, board ports or not
    async fn get_available_ports(&self) -> Result<Vec<Port>>;

    /// Details of an installed board; fails for unknown FQBNs
    async fn get_board_details(&self, fqbn: &str) -> Result<BoardDetails>;

    async fn get_board_package(&self, id: &str) -> Result<Option<BoardsPackage>>;

    /// The package providing the board with this FQBN
    async fn get_container_board_package(&self, fqbn: &str) -> Result<Option<BoardsPackage>>;

    /// Fuzzy catalog search; `None` lists every known board
    async fn search_boards(&self, query: Option<&str>) -> Result<Vec<BoardSearchResult>>;

    /// Install `version` of a package, the latest when `None`
    async fn install(&self, pkg: &BoardsPackage, version: Option<&str>) -> Result<()> {
        let _ = version;
        Err(BoardsError::Backend(format!(
            "installing {} is not supported by this backend",
            pkg.id
        )))
    }

    async fn uninstall(&self, pkg: &BoardsPackage) -> Result<()> {
        Err(BoardsError::Backend(format!(
            "uninstalling {} is not supported by this backend",
            pkg.id
        )))
    }
}
