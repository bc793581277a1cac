//! CLI command implementations

pub mod decorate;
pub mod ports;
pub mod select;
pub mod state;
pub mod watch;

use crate::cli::CliContext;
use crate::cli::args::Commands;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute_command(command: Commands, context: &CliContext) -> Result<()> {
    match command {
        Commands::Ports { all } => ports::execute_ports_command(context, all).await,
        Commands::Decorate {
            fqbn,
            options,
            no_validate,
        } => decorate::execute_decorate_command(&fqbn, &options, !no_validate),
        Commands::Select { board, fqbn, port } => {
            select::execute_select_command(context, board, fqbn, port).await
        }
        Commands::Watch => watch::execute_watch_command(context).await,
        Commands::State => state::execute_state_command(context).await,
    }
}
