//! Serial port polling
//!
//! Turns periodic `serialport` enumerations into attached-boards change
//! notifications for the event bridge.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::errors::{BoardsError, Result};
use crate::models::{BackendNotification, Port};
use crate::services::attached_state::AttachedState;
use crate::services::local_service::scan_serial_ports;

pub type PortScanner = Arc<dyn Fn() -> Result<Vec<Port>> + Send + Sync>;

pub struct PortWatcher {
    interval: Duration,
    state: AttachedState,
    scanner: PortScanner,
}

impl PortWatcher {
    /// Watch the serial ports of this machine, starting from `initial_ports`
    pub fn new(interval: Duration, initial_ports: Vec<Port>) -> Self {
        Self::with_scanner(interval, initial_ports, Arc::new(scan_serial_ports))
    }

    pub fn with_scanner(interval: Duration, initial_ports: Vec<Port>, scanner: PortScanner) -> Self {
        let mut state = AttachedState::new();
        state.replace(Vec::new(), initial_ports);
        Self {
            interval,
            state,
            scanner,
        }
    }

    pub fn ports(&self) -> &[Port] {
        self.state.ports()
    }

    /// Enumerate once; a change of the port set yields a notification
    pub async fn scan_ports(&mut self) -> Result<Option<BackendNotification>> {
        let scanner = self.scanner.clone();
        let mut ports = tokio::task::spawn_blocking(move || scanner())
            .await
            .map_err(|e| BoardsError::Backend(format!("serial port scan task failed: {}", e)))??;

        // Keep the previous order for ports that are still there
        let previous = self.state.ports();
        ports.sort_by_key(|port| previous.iter().position(|p| p == port).unwrap_or(usize::MAX));

        let boards = self.state.boards().to_vec();
        Ok(self
            .state
            .replace(boards, ports)
            .map(BackendNotification::AttachedBoardsChanged))
    }

    /// Poll until the receiving side goes away. Scan failures are logged
    /// and retried on the next tick.
    pub async fn run(mut self, tx: mpsc::Sender<BackendNotification>) {
        log::info!("Watching serial ports every {:?}", self.interval);
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                _ = interval.tick() => {}
            }

            match self.scan_ports().await {
                Ok(Some(notification)) => {
                    if tx.send(notification).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("Serial port scan failed: {}", e),
            }
        }
        log::debug!("Port watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn scripted(scans: Vec<Vec<Port>>) -> PortScanner {
        let scans = Mutex::new(scans.into_iter());
        Arc::new(move || {
            let mut scans = scans.lock().map_err(|e| BoardsError::Backend(e.to_string()))?;
            Ok(scans.next().unwrap_or_default())
        })
    }

    #[tokio::test]
    async fn test_scan_reports_only_changes() {
        let scanner = scripted(vec![
            vec![Port::serial("/dev/ttyUSB0")],
            vec![Port::serial("/dev/ttyUSB0"), Port::serial("/dev/ttyACM0")],
        ]);
        let mut watcher = PortWatcher::with_scanner(
            Duration::from_millis(10),
            vec![Port::serial("/dev/ttyUSB0")],
            scanner,
        );

        assert!(watcher.scan_ports().await.unwrap().is_none());

        let Some(BackendNotification::AttachedBoardsChanged(event)) =
            watcher.scan_ports().await.unwrap()
        else {
            panic!("expected a change");
        };
        assert_eq!(event.diff().attached.ports, vec![Port::serial("/dev/ttyACM0")]);
        assert_eq!(watcher.ports().len(), 2);
    }

    #[tokio::test]
    async fn test_reordered_scan_is_no_change() {
        let scanner = scripted(vec![vec![Port::serial("COM4"), Port::serial("COM3")]]);
        let mut watcher = PortWatcher::with_scanner(
            Duration::from_millis(10),
            vec![Port::serial("COM3"), Port::serial("COM4")],
            scanner,
        );
        assert!(watcher.scan_ports().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_run_forwards_and_stops_when_receiver_closes() {
        let scanner = scripted(vec![vec![Port::serial("/dev/ttyACM0")]]);
        let watcher = PortWatcher::with_scanner(Duration::from_millis(5), vec![], scanner);
        let (tx, mut rx) = mpsc::channel(4);
        let task = tokio::spawn(watcher.run(tx));

        let notification = rx.recv().await.expect("one notification");
        assert!(matches!(
            notification,
            BackendNotification::AttachedBoardsChanged(_)
        ));

        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("watcher should stop")
            .unwrap();
    }
}
