//! Glue between the backend, the reconciliation engine and subscribers
//!
//! Backend notifications are handled strictly one at a time: each one runs
//! the whole engine pipeline before the next is received, and the
//! resulting events are broadcast in emission order.

use std::sync::Arc;
use tokio::sync::{Notify, broadcast, mpsc};

use crate::errors::Result;
use crate::models::{BackendNotification, BoardsConfig, BoardsEvent};
use crate::platform::HostPlatform;
use crate::services::boards_client::{BoardsChange, BoardsClient};
use crate::services::config_store::BoardsConfigStore;
use crate::services::BoardsService;
use crate::storage::Storage;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Stops a running [`BoardsEventBridge::run`] loop
#[derive(Debug, Clone)]
pub struct StopHandle {
    notify: Arc<Notify>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.notify.notify_one();
    }
}

pub struct BoardsEventBridge {
    backend: Arc<dyn BoardsService>,
    client: BoardsClient,
    config_store: BoardsConfigStore,
    events: broadcast::Sender<BoardsEvent>,
    stop: Arc<Notify>,
}

impl BoardsEventBridge {
    pub fn new(backend: Arc<dyn BoardsService>, storage: Storage, platform: HostPlatform) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let config_store = BoardsConfigStore::new(backend.clone(), storage.clone(), events.clone());
        Self {
            backend,
            client: BoardsClient::with_platform(storage, platform),
            config_store,
            events,
            stop: Arc::new(Notify::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardsEvent> {
        self.events.subscribe()
    }

    pub fn client(&self) -> &BoardsClient {
        &self.client
    }

    pub fn config_store(&self) -> &BoardsConfigStore {
        &self.config_store
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            notify: self.stop.clone(),
        }
    }

    /// Restore persisted state, then ingest the backend's current snapshot
    pub async fn start(&mut self) -> Result<BoardsChange> {
        let mut change = self.client.start().await?;
        let attached_boards = self.backend.get_attached_boards().await?;
        let available_ports = self.backend.get_available_ports().await?;
        log::info!(
            "Initial snapshot: {} attached board(s), {} port(s)",
            attached_boards.len(),
            available_ports.len()
        );
        change.extend(self.client.init(attached_boards, available_ports).await?);
        self.publish(&change);
        Ok(change)
    }

    /// Run one backend notification through the engine
    pub async fn handle(&mut self, notification: BackendNotification) -> Result<BoardsChange> {
        let change = match notification {
            BackendNotification::AttachedBoardsChanged(event) => {
                self.client.notify_attached_boards_changed(event).await?
            }
            BackendNotification::BoardInstalled(event) => {
                let pkg = event.pkg.clone();
                let change = self.client.notify_board_installed(event).await?;
                self.publish(&change);
                self.config_store.on_board_installed(&pkg).await?;
                return Ok(change);
            }
            BackendNotification::BoardUninstalled(event) => {
                self.client.notify_board_uninstalled(event).await?
            }
        };
        self.publish(&change);
        Ok(change)
    }

    /// Selection made by the user
    pub async fn set_boards_config(&mut self, config: BoardsConfig) -> Result<BoardsChange> {
        let change = self.client.set_boards_config(config).await?;
        self.publish(&change);
        Ok(change)
    }

    /// Handle notifications until the channel closes or a stop is requested.
    ///
    /// A failing notification is logged and does not end the loop.
    pub async fn run(&mut self, mut rx: mpsc::Receiver<BackendNotification>) {
        let stop = self.stop.clone();
        loop {
            let notification = tokio::select! {
                biased;
                _ = stop.notified() => {
                    log::debug!("Boards event bridge stop requested");
                    break;
                }
                notification = rx.recv() => match notification {
                    Some(notification) => notification,
                    None => break,
                },
            };
            if let Err(e) = self.handle(notification).await {
                log::error!("Failed to handle backend notification: {}", e);
            }
        }
        log::debug!("Boards event bridge stopped");
    }

    fn publish(&self, change: &BoardsChange) {
        for event in &change.events {
            log::trace!("Publishing {}", event.name());
            // No subscribers is fine
            let _ = self.events.send(event.clone());
        }
    }
}
