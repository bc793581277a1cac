//! Boards backend limited to the serial ports of this machine

use async_trait::async_trait;
use serialport::{SerialPortInfo, SerialPortType};

use crate::errors::{BoardsError, Result};
use crate::models::{AttachedBoard, BoardDetails, BoardSearchResult, BoardsPackage, Port};
use crate::services::BoardsService;

/// Convert an enumerated serial port, labelled by its kind
pub fn port_from_info(info: &SerialPortInfo) -> Port {
    let label = match &info.port_type {
        SerialPortType::UsbPort(_) => "Serial Port (USB)",
        SerialPortType::PciPort => "Serial Port",
        SerialPortType::BluetoothPort => "Bluetooth Serial Port",
        SerialPortType::Unknown => "Serial Port",
    };
    Port::serial(info.port_name.clone()).with_label(label)
}

/// Enumerate the serial ports of this machine. Blocking.
pub fn scan_serial_ports() -> Result<Vec<Port>> {
    let ports = serialport::available_ports()?;
    log::trace!("Enumerated {} serial port(s)", ports.len());
    Ok(ports.iter().map(port_from_info).collect())
}

/// [`scan_serial_ports`] off the async runtime
pub async fn scan_serial_ports_async() -> Result<Vec<Port>> {
    tokio::task::spawn_blocking(scan_serial_ports)
        .await
        .map_err(|e| BoardsError::Backend(format!("serial port scan task failed: {}", e)))?
}

/// Knows ports but no boards: every board port shows up as `Unknown`
/// until the user picks a board for it.
#[derive(Debug, Clone, Default)]
pub struct LocalBoardsService;

impl LocalBoardsService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BoardsService for LocalBoardsService {
    async fn get_attached_boards(&self) -> Result<Vec<AttachedBoard>> {
        Ok(Vec::new())
    }

    async fn get_available_ports(&self) -> Result<Vec<Port>> {
        scan_serial_ports_async().await
    }

    async fn get_board_details(&self, fqbn: &str) -> Result<BoardDetails> {
        Err(BoardsError::Backend(format!(
            "no details for {}: no board platforms are installed",
            fqbn
        )))
    }

    async fn get_board_package(&self, _id: &str) -> Result<Option<BoardsPackage>> {
        Ok(None)
    }

    async fn get_container_board_package(&self, _fqbn: &str) -> Result<Option<BoardsPackage>> {
        Ok(None)
    }

    async fn search_boards(&self, _query: Option<&str>) -> Result<Vec<BoardSearchResult>> {
        Ok(Vec::new())
    }
}
