//! State command implementation - Show what is persisted

use anyhow::Result;

use crate::cli::CliContext;
use crate::models::{Board, ValidBoardsConfig};
use crate::services::boards_client::{
    LATEST_VALID_BOARDS_CONFIG_KEY, last_selected_board_on_port_key,
};

pub async fn execute_state_command(context: &CliContext) -> Result<()> {
    let storage = &context.storage;

    let latest: Option<ValidBoardsConfig> = storage.get_data(LATEST_VALID_BOARDS_CONFIG_KEY).await?;
    match latest {
        Some(latest) => println!("📌 Latest valid selection: {}", latest.to_config()),
        None => println!("📌 No valid selection stored"),
    }

    let prefix = last_selected_board_on_port_key("");
    let mut keys: Vec<String> = storage
        .keys()
        .await?
        .into_iter()
        .filter(|key| key.starts_with(&prefix))
        .collect();
    keys.sort();

    if keys.is_empty() {
        return Ok(());
    }
    println!("🔌 Last selected board per port:");
    for key in keys {
        if let Some(board) = storage.get_data::<Board>(&key).await? {
            println!("  {} → {}", &key[prefix.len()..], board.to_display_string(true));
        }
    }
    Ok(())
}
