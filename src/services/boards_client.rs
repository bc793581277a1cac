//! Boards reconciliation engine
//!
//! Tracks the attached boards and available ports, the user's board/port
//! selection and the derived list of available boards. Every entry point
//! runs the whole pipeline (update snapshots, persist, reconcile,
//! reconnect) before returning, and reports what changed as a
//! [`BoardsChange`]. Forwarding those events to subscribers is up to the
//! caller.

use std::collections::HashMap;

use crate::errors::Result;
use crate::models::{
    AttachedBoard, AttachedBoardsChangeEvent, AvailableBoard, Board, BoardInstalledEvent,
    BoardUninstalledEvent, BoardsConfig, BoardsEvent, Port, ValidBoardsConfig,
};
use crate::platform::HostPlatform;
use crate::services::reconcile::{self, ReconcileInput};
use crate::storage::Storage;

/// Storage key of the last upload-capable config
pub const LATEST_VALID_BOARDS_CONFIG_KEY: &str = "latest-valid-boards-config";

const LAST_SELECTED_BOARD_ON_PORT_PREFIX: &str = "last-selected-board-on-port-";

/// Storage key of the last board selected on `port`
pub fn last_selected_board_on_port_key(port: &str) -> String {
    format!("{}{}", LAST_SELECTED_BOARD_ON_PORT_PREFIX, port)
}

/// Events produced by one pipeline run, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardsChange {
    pub events: Vec<BoardsEvent>,
    /// The selection was restored by auto-reconnect
    pub reconnected: bool,
}

impl BoardsChange {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, event: BoardsEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, other: BoardsChange) {
        self.reconnected |= other.reconnected;
        self.events.extend(other.events);
    }

    pub fn config_changed(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, BoardsEvent::BoardsConfigChanged(_)))
    }

    pub fn available_boards_changed(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, BoardsEvent::AvailableBoardsChanged(_)))
    }

    /// The most recent config emitted in this change, if any
    pub fn latest_config(&self) -> Option<&BoardsConfig> {
        self.events.iter().rev().find_map(|event| match event {
            BoardsEvent::BoardsConfigChanged(config) => Some(config),
            _ => None,
        })
    }
}

/// The boards reconciliation engine
#[derive(Debug)]
pub struct BoardsClient {
    storage: Storage,
    platform: HostPlatform,
    boards_config: BoardsConfig,
    /// Last config that could be uploaded to. Some boards re-enumerate on a
    /// different port after an upload; this is what auto-reconnect restores.
    latest_valid_boards_config: Option<ValidBoardsConfig>,
    /// Does not contain the `Unknown` boards, those only come from ports
    attached_boards: Vec<AttachedBoard>,
    available_ports: Vec<Port>,
    available_boards: Vec<AvailableBoard>,
}

impl BoardsClient {
    pub fn new(storage: Storage) -> Self {
        Self::with_platform(storage, HostPlatform::current())
    }

    pub fn with_platform(storage: Storage, platform: HostPlatform) -> Self {
        Self {
            storage,
            platform,
            boards_config: BoardsConfig::default(),
            latest_valid_boards_config: None,
            attached_boards: Vec::new(),
            available_ports: Vec::new(),
            available_boards: Vec::new(),
        }
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    pub fn boards_config(&self) -> &BoardsConfig {
        &self.boards_config
    }

    pub fn latest_valid_boards_config(&self) -> Option<&ValidBoardsConfig> {
        self.latest_valid_boards_config.as_ref()
    }

    pub fn attached_boards(&self) -> &[AttachedBoard] {
        &self.attached_boards
    }

    pub fn available_ports(&self) -> &[Port] {
        &self.available_ports
    }

    pub fn available_boards(&self) -> &[AvailableBoard] {
        &self.available_boards
    }

    /// See [`BoardsConfig::can_verify`]
    pub fn can_verify(&self, silent: bool) -> bool {
        self.boards_config.can_verify(silent)
    }

    /// See [`BoardsConfig::can_upload_to`]
    pub fn can_upload_to(&self, silent: bool) -> bool {
        self.boards_config.can_upload_to(silent)
    }

    /// Restore the persisted state.
    ///
    /// The latest valid config becomes the active selection.
    pub async fn start(&mut self) -> Result<BoardsChange> {
        let mut change = BoardsChange::default();
        let stored: Option<ValidBoardsConfig> =
            self.storage.get_data(LATEST_VALID_BOARDS_CONFIG_KEY).await?;
        if let Some(stored) = stored {
            log::info!("Restoring latest valid boards config: {}", stored.to_config());
            self.latest_valid_boards_config = Some(stored.clone());
            self.apply_config(stored.to_config(), &mut change).await?;
        }
        Ok(change)
    }

    /// Ingest the initial snapshot from the backend
    pub async fn init(
        &mut self,
        attached_boards: Vec<AttachedBoard>,
        available_ports: Vec<Port>,
    ) -> Result<BoardsChange> {
        let mut change = BoardsChange::default();
        self.attached_boards = attached_boards;
        self.available_ports = available_ports;
        self.reconcile_available_boards(&mut change).await?;
        self.try_reconnect(&mut change).await?;
        Ok(change)
    }

    /// Replace the selection. Persisting, event emission and
    /// reconciliation all happen before this returns.
    pub async fn set_boards_config(&mut self, config: BoardsConfig) -> Result<BoardsChange> {
        let mut change = BoardsChange::default();
        self.apply_config(config, &mut change).await?;
        Ok(change)
    }

    pub async fn notify_attached_boards_changed(
        &mut self,
        event: AttachedBoardsChangeEvent,
    ) -> Result<BoardsChange> {
        log::info!(
            "Attached boards and available ports changed: {} board(s), {} port(s)",
            event.new_state.boards.len(),
            event.new_state.ports.len()
        );
        let mut change = BoardsChange::default();
        let detached = event.diff().detached;

        let previous_boards =
            std::mem::replace(&mut self.attached_boards, event.new_state.boards.clone());
        let previous_ports =
            std::mem::replace(&mut self.available_ports, event.new_state.ports.clone());
        change.push(BoardsEvent::BoardsChanged(event));

        // A port disappears when the board is unplugged. Selections made
        // by address carry no label, so only the address is compared.
        let selected_port_detached = self
            .boards_config
            .selected_port
            .as_ref()
            .is_some_and(|selected| {
                detached
                    .ports
                    .iter()
                    .any(|port| Port::same_as(Some(selected), Some(&port.address)))
            });
        if selected_port_detached {
            let config = BoardsConfig::new(self.boards_config.selected_board.clone(), None);
            if let Err(err) = self.apply_config(config, &mut change).await {
                self.attached_boards = previous_boards;
                self.available_ports = previous_ports;
                return Err(err);
            }
        }

        self.reconcile_available_boards(&mut change).await?;
        self.try_reconnect(&mut change).await?;
        Ok(change)
    }

    /// A package install gives the selected board its FQBN
    pub async fn notify_board_installed(
        &mut self,
        event: BoardInstalledEvent,
    ) -> Result<BoardsChange> {
        log::info!("Board package installed: {}", event.pkg.id);
        let mut change = BoardsChange::default();
        let updated = self.boards_config.selected_board.as_ref().and_then(|selected| {
            event
                .pkg
                .board_named(&selected.name)
                .filter(|installed| selected.fqbn.is_none() || selected.fqbn == installed.fqbn)
                .cloned()
        });
        change.push(BoardsEvent::BoardInstalled(event.clone()));

        if let Some(installed) = updated {
            log::info!(
                "Board package {}[{}] was installed. Updating the FQBN of the currently selected {} board. [FQBN: {}]",
                event.pkg.id,
                event.pkg.installed_version.as_deref().unwrap_or("unknown"),
                installed.name,
                installed.fqbn.as_deref().unwrap_or("none")
            );
            let config = BoardsConfig::new(Some(installed), self.boards_config.selected_port.clone());
            self.apply_config(config, &mut change).await?;
        }
        Ok(change)
    }

    /// A package uninstall strips the FQBN from the selected board
    pub async fn notify_board_uninstalled(
        &mut self,
        event: BoardUninstalledEvent,
    ) -> Result<BoardsChange> {
        log::info!("Board package uninstalled: {}", event.pkg.id);
        let mut change = BoardsChange::default();
        let stripped = self
            .boards_config
            .selected_board
            .as_ref()
            .filter(|selected| selected.fqbn.is_some())
            .filter(|selected| {
                event
                    .pkg
                    .board_named(&selected.name)
                    .is_some_and(|uninstalled| uninstalled.fqbn == selected.fqbn)
            })
            .map(Board::without_fqbn);
        change.push(BoardsEvent::BoardUninstalled(event.clone()));

        if let Some(board) = stripped {
            log::info!(
                "Board package {} was uninstalled. Discarding the FQBN of the currently selected {} board.",
                event.pkg.id,
                board.name
            );
            let config = BoardsConfig::new(Some(board), self.boards_config.selected_port.clone());
            self.apply_config(config, &mut change).await?;
        }
        Ok(change)
    }

    /// The board last selected on `port`, used to guess third-party boards
    pub async fn last_selected_board_on_port(&self, port: &str) -> Result<Option<Board>> {
        self.storage
            .get_data(&last_selected_board_on_port_key(port))
            .await
    }

    /// Persist first, then commit: a storage failure leaves the previous
    /// selection in place.
    async fn apply_config(&mut self, config: BoardsConfig, change: &mut BoardsChange) -> Result<()> {
        log::info!("Board config changed: {}", config);
        let latest_valid = match ValidBoardsConfig::try_from(config.clone()) {
            Ok(valid) => Some(valid),
            Err(_) => self.latest_valid_boards_config.clone(),
        };

        self.save_state(&config, latest_valid.as_ref()).await?;

        self.boards_config = config;
        self.latest_valid_boards_config = latest_valid;
        change.push(BoardsEvent::BoardsConfigChanged(self.boards_config.clone()));
        self.reconcile_available_boards(change).await
    }

    async fn save_state(
        &self,
        config: &BoardsConfig,
        latest_valid: Option<&ValidBoardsConfig>,
    ) -> Result<()> {
        // Remember the board per port to guess third-party boards the
        // backend cannot identify
        let mut remembered = None;
        if let (Some(board), Some(port)) = (&config.selected_board, &config.selected_port) {
            let key = last_selected_board_on_port_key(&port.to_display_string(false));
            let previous: Option<Board> = self.storage.get_data(&key).await?;
            self.storage.set_data(&key, board).await?;
            remembered = Some((key, previous));
        }

        let saved = self
            .storage
            .set_data(LATEST_VALID_BOARDS_CONFIG_KEY, &latest_valid)
            .await;
        if saved.is_err() {
            // The selection is not committed, so neither is its guess
            if let Some((key, previous)) = remembered {
                if let Err(err) = self.storage.set_data(&key, &previous).await {
                    log::warn!("Failed to restore {}: {}", key, err);
                }
            }
        }
        saved
    }

    async fn reconcile_available_boards(&mut self, change: &mut BoardsChange) -> Result<()> {
        let mut guesses = HashMap::new();
        for port in reconcile::unclaimed_board_ports(
            &self.attached_boards,
            &self.available_ports,
            self.platform,
        ) {
            let address = port.to_display_string(false);
            if let Some(board) = self.last_selected_board_on_port(&address).await? {
                guesses.insert(address, board);
            }
        }

        let available_boards = reconcile::reconcile(ReconcileInput {
            attached_boards: &self.attached_boards,
            available_ports: &self.available_ports,
            boards_config: &self.boards_config,
            guesses: &guesses,
            platform: self.platform,
        });

        if reconcile::has_changed(&self.available_boards, &available_boards, self.platform) {
            log::debug!("Available boards changed: {} board(s)", available_boards.len());
            self.available_boards = available_boards;
            change.push(BoardsEvent::AvailableBoardsChanged(
                self.available_boards.clone(),
            ));
        }
        Ok(())
    }

    /// Restore the latest valid config if the current one cannot upload.
    ///
    /// First looks for the same board on the same port, then for the same
    /// board on any port.
    async fn try_reconnect(&mut self, change: &mut BoardsChange) -> Result<bool> {
        if self.boards_config.can_upload_to(true) {
            return Ok(false);
        }
        let Some(latest) = self.latest_valid_boards_config.clone() else {
            return Ok(false);
        };

        let same_board = |board: &AvailableBoard| {
            board.fqbn() == Some(latest.fqbn()) && board.name() == latest.board().name
        };

        let exact = self.available_boards.iter().any(|board| {
            same_board(board) && Port::same_as(Some(latest.port()), Some(&board.port.address))
        });
        if exact {
            log::info!("Reconnected {} on {}", latest.board(), latest.port());
            self.apply_config(latest.to_config(), change).await?;
            change.reconnected = true;
            return Ok(true);
        }

        let relocated = self
            .available_boards
            .iter()
            .find(|board| same_board(board))
            .map(|board| board.port.clone());
        if let Some(port) = relocated {
            log::info!(
                "Reconnected {} on {} (was {})",
                latest.board(),
                port,
                latest.port()
            );
            self.apply_config(latest.with_port(port).to_config(), change)
                .await?;
            change.reconnected = true;
            return Ok(true);
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(
            last_selected_board_on_port_key("/dev/ttyACM0"),
            "last-selected-board-on-port-/dev/ttyACM0"
        );
    }

    #[test]
    fn test_change_helpers() {
        let mut change = BoardsChange::default();
        assert!(change.is_empty());
        change.push(BoardsEvent::BoardsConfigChanged(BoardsConfig::default()));
        let config = BoardsConfig::default().with_board(Board::new("Arduino Uno"));
        change.push(BoardsEvent::BoardsConfigChanged(config.clone()));
        assert!(change.config_changed());
        assert!(!change.available_boards_changed());
        assert_eq!(change.latest_config(), Some(&config));

        let mut other = BoardsChange::default();
        other.reconnected = true;
        other.push(BoardsEvent::AvailableBoardsChanged(vec![]));
        change.extend(other);
        assert!(change.reconnected);
        assert!(change.available_boards_changed());
    }

    #[tokio::test]
    async fn test_start_without_state_is_empty() {
        let mut client = BoardsClient::with_platform(Storage::in_memory(), HostPlatform::Linux);
        let change = client.start().await.unwrap();
        assert!(change.is_empty());
        assert_eq!(client.boards_config(), &BoardsConfig::default());
        assert!(client.latest_valid_boards_config().is_none());
    }
}
