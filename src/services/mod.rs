//! Services module containing the boards engine and its collaborators
//!
//! The backend seam ([`BoardsService`]) and storage are traits; everything
//! else here is concrete and driven by [`BoardsEventBridge`].

pub mod attached_state;
pub mod boards_client;
pub mod boards_service;
pub mod config_store;
pub mod event_bridge;
pub mod local_service;
pub mod port_watcher;
pub mod reconcile;

pub use attached_state::{Attachable, AttachedState};
pub use boards_client::{BoardsChange, BoardsClient};
pub use boards_service::BoardsService;
pub use config_store::{BoardsConfigStore, ConfigSelection};
pub use event_bridge::{BoardsEventBridge, StopHandle};
pub use local_service::LocalBoardsService;
pub use port_watcher::PortWatcher;
