//! Watch command implementation - Follow board events until interrupted

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use crate::cli::CliContext;
use crate::models::BoardsEvent;
use crate::services::{BoardsEventBridge, BoardsService, LocalBoardsService, PortWatcher};

pub async fn execute_watch_command(context: &CliContext) -> Result<()> {
    let platform = context.config.platform();
    let backend: Arc<dyn BoardsService> = Arc::new(LocalBoardsService::new());
    let mut bridge = BoardsEventBridge::new(backend, context.storage.clone(), platform);

    let mut events = bridge.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Skipped {} board event(s)", skipped)
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    bridge.start().await?;
    println!("👀 Watching for boards, press Ctrl+C to stop");

    let (tx, rx) = mpsc::channel(16);
    let watcher = PortWatcher::new(
        context.config.scan_interval(),
        bridge.client().available_ports().to_vec(),
    );
    let watcher_task = tokio::spawn(watcher.run(tx));

    let stop = bridge.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    bridge.run(rx).await;
    watcher_task.abort();
    drop(bridge);
    let _ = printer.await;
    println!("🛑 Stopped");
    Ok(())
}

fn print_event(event: &BoardsEvent) {
    match event {
        BoardsEvent::BoardsChanged(change) => {
            let diff = change.diff();
            for port in &diff.attached.ports {
                println!("➕ {}", port.to_display_string(true));
            }
            for port in &diff.detached.ports {
                println!("➖ {}", port.to_display_string(true));
            }
        }
        BoardsEvent::BoardInstalled(event) => println!("📦 Installed {}", event.pkg.name),
        BoardsEvent::BoardUninstalled(event) => println!("🗑  Uninstalled {}", event.pkg.name),
        BoardsEvent::BoardsConfigChanged(config) => println!("🎯 Selected {}", config),
        BoardsEvent::AvailableBoardsChanged(boards) => {
            println!("📋 Available boards:");
            for board in boards {
                println!("   {}", board);
            }
        }
        BoardsEvent::ConfigOptionsChanged(fqbns) => {
            println!("⚙️  Options changed for {}", fqbns.join(", "))
        }
    }
}
