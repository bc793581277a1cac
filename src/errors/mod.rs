//! Error handling for boardsync

pub mod types;

pub use types::*;
