//! Select command implementation - Persist a board/port selection

use anyhow::Result;

use crate::cli::CliContext;
use crate::models::{Board, BoardsConfig, Port};
use crate::services::BoardsClient;

pub async fn execute_select_command(
    context: &CliContext,
    board: String,
    fqbn: Option<String>,
    port: Option<String>,
) -> Result<()> {
    let mut client = BoardsClient::with_platform(context.storage.clone(), context.config.platform());
    client.start().await?;

    let board = match fqbn {
        Some(fqbn) => Board::with_fqbn(board, fqbn),
        None => Board::new(board),
    };
    let config = BoardsConfig::new(Some(board), port.map(Port::serial));
    client.set_boards_config(config).await?;

    println!("✅ Selected {}", client.boards_config());
    if client.can_upload_to(false) {
        println!("   Ready to upload");
    } else if client.can_verify(true) {
        println!("   Ready to verify");
    }
    Ok(())
}
