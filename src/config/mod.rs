//! Configuration management for boardsync

pub mod app_config;

pub use app_config::*;
