//! Utility functions and helpers used throughout boardsync

pub mod logging;
pub mod natural;
