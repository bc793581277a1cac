//! Data models and types used throughout boardsync

pub mod available_board;
pub mod board;
pub mod boards_config;
pub mod config_option;
pub mod events;
pub mod port;

// Re-export commonly used types
pub use available_board::*;
pub use board::*;
pub use boards_config::*;
pub use config_option::*;
pub use events::*;
pub use port::*;
