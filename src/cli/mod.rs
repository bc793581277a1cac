//! Command Line Interface module

pub mod args;
pub mod commands;

pub use args::*;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::{RonFileStorage, Storage};
use crate::utils::logging::{init_cli_logging, level_from_flags};

/// Everything a command needs, resolved from the arguments and config file
pub struct CliContext {
    pub config: AppConfig,
    pub storage: Storage,
}

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = AppConfig::load(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let level = if cli.verbose > 0 || cli.quiet {
        level_from_flags(cli.verbose, cli.quiet)
    } else {
        config.level_filter()
    };
    init_cli_logging(level)?;
    log::debug!("Using config {}: {:?}", config_path.display(), config);

    let state_path = config.state_path();
    let file_storage = RonFileStorage::open(&state_path)
        .await
        .with_context(|| format!("Failed to open state file {}", state_path.display()))?;
    let context = CliContext {
        storage: Storage::new(Arc::new(file_storage)),
        config,
    };

    commands::execute_command(cli.command, &context).await
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(crate::APP_NAME)
        .join("config.toml")
}
