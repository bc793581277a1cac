//! Ports command implementation - List serial ports

use anyhow::Result;
use log::info;

use crate::cli::CliContext;
use crate::services::local_service::scan_serial_ports_async;

/// Execute the ports command to list available serial ports
pub async fn execute_ports_command(context: &CliContext, all: bool) -> Result<()> {
    let platform = context.config.platform();
    info!("Scanning serial ports ({})...", platform);

    let mut ports = scan_serial_ports_async().await?;
    ports.sort_by(|left, right| left.compare(right, platform));
    if !all {
        ports.retain(|port| port.is_board_port(platform));
    }

    if ports.is_empty() {
        println!("⚠️  No serial ports detected");
        return Ok(());
    }

    println!("🔍 Detected Serial Ports:");
    for port in &ports {
        let marker = if port.is_board_port(platform) { "●" } else { "○" };
        println!("  {} {}", marker, port.to_display_string(true));
    }
    Ok(())
}
