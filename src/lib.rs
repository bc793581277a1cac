//! boardsync - board and port selection that follows the hardware
//!
//! Reconciles the boards a backend reports as attached with the serial and
//! network ports that are available, remembers what the user selected on
//! each port, and restores the last uploadable selection when a board
//! re-enumerates on a different port.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod platform;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;
pub use platform::HostPlatform;

/// boardsync version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// boardsync application name
pub const APP_NAME: &str = "boardsync";
