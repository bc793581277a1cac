//! Mock boards backend and storage for integration tests
//!
//! The backend tracks plugged hardware through `AttachedState` so tests
//! can attach and detach boards the way a real daemon reports them.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use boardsync::errors::{BoardsError, Result};
use boardsync::models::{
    AttachedBoard, AttachedBoardsChangeEvent, BoardDetails, BoardSearchResult, BoardsPackage,
    ConfigOption, ConfigValue, Port,
};
use boardsync::services::{Attachable, AttachedState, BoardsService};
use boardsync::storage::{MemoryStorage, StorageService};
use boardsync::{Board, HostPlatform};

/// Tests run with macOS port naming so `/dev/cu.*` are board ports
pub const PLATFORM: HostPlatform = HostPlatform::MacOs;

pub const UNO_PORT: &str = "/dev/cu.usbmodem14501";
pub const MKR_PORT: &str = "/dev/cu.usbmodem14601";
pub const OTHER_PORT: &str = "/dev/cu.usbmodem14701";
pub const CLONE_PORT: &str = "/dev/cu.usbserial-1420";

pub fn uno_board() -> Board {
    Board::with_fqbn("Arduino Uno", "arduino:avr:uno")
}

pub fn mkr1000_board() -> Board {
    Board::with_fqbn("Arduino MKR1000", "arduino:samd:mkr1000")
}

pub fn uno_on(port: &str) -> AttachedBoard {
    AttachedBoard::serial(uno_board(), port)
}

pub fn mkr1000_on(port: &str) -> AttachedBoard {
    AttachedBoard::serial(mkr1000_board(), port)
}

pub fn avr_package() -> BoardsPackage {
    BoardsPackage::new("arduino:avr", "Arduino AVR Boards")
        .installed("1.8.6")
        .with_boards(vec![
            uno_board(),
            Board::with_fqbn("Arduino Nano", "arduino:avr:nano"),
            Board::with_fqbn("Arduino Mega or Mega 2560", "arduino:avr:mega"),
        ])
}

pub fn cpu_option() -> ConfigOption {
    ConfigOption::new(
        "cpu",
        "Processor",
        vec![
            ConfigValue::new("ATmega328P", "atmega328", true),
            ConfigValue::new("ATmega328P (Old Bootloader)", "atmega328old", false),
        ],
    )
}

pub fn baud_option() -> ConfigOption {
    ConfigOption::new(
        "baud",
        "Baud rate",
        vec![
            ConfigValue::new("57600", "57600", false),
            ConfigValue::new("115200", "115200", true),
        ],
    )
}

/// Scriptable boards backend
#[derive(Default)]
pub struct MockBoardsService {
    state: Mutex<AttachedState>,
    details: Mutex<HashMap<String, Vec<ConfigOption>>>,
    failing_details: Mutex<HashSet<String>>,
    packages: Mutex<Vec<BoardsPackage>>,
    details_calls: AtomicUsize,
}

impl MockBoardsService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attach(&self, item: impl Into<Attachable>) -> AttachedBoardsChangeEvent {
        self.state
            .lock()
            .unwrap()
            .attach(item)
            .expect("attaching should change the state")
    }

    pub fn detach(&self, item: impl Into<Attachable>) -> AttachedBoardsChangeEvent {
        self.state.lock().unwrap().detach(item).unwrap()
    }

    pub fn set_options(&self, fqbn: &str, options: Vec<ConfigOption>) {
        self.details
            .lock()
            .unwrap()
            .insert(fqbn.to_string(), options);
    }

    pub fn fail_details_for(&self, fqbn: &str) {
        self.failing_details
            .lock()
            .unwrap()
            .insert(fqbn.to_string());
    }

    pub fn add_package(&self, pkg: BoardsPackage) {
        let mut packages = self.packages.lock().unwrap();
        packages.retain(|existing| existing.id != pkg.id);
        packages.push(pkg);
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BoardsService for MockBoardsService {
    async fn get_attached_boards(&self) -> Result<Vec<AttachedBoard>> {
        Ok(self.state.lock().unwrap().boards().to_vec())
    }

    async fn get_available_ports(&self) -> Result<Vec<Port>> {
        Ok(self.state.lock().unwrap().ports().to_vec())
    }

    async fn get_board_details(&self, fqbn: &str) -> Result<BoardDetails> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_details.lock().unwrap().contains(fqbn) {
            return Err(BoardsError::Backend(format!("details for {} failed", fqbn)));
        }
        let config_options = self
            .details
            .lock()
            .unwrap()
            .get(fqbn)
            .cloned()
            .unwrap_or_default();
        Ok(BoardDetails {
            fqbn: fqbn.to_string(),
            required_tools: Vec::new(),
            config_options,
        })
    }

    async fn get_board_package(&self, id: &str) -> Result<Option<BoardsPackage>> {
        Ok(self
            .packages
            .lock()
            .unwrap()
            .iter()
            .find(|pkg| pkg.id == id)
            .cloned())
    }

    async fn get_container_board_package(&self, fqbn: &str) -> Result<Option<BoardsPackage>> {
        Ok(self
            .packages
            .lock()
            .unwrap()
            .iter()
            .find(|pkg| {
                pkg.boards
                    .iter()
                    .any(|board| board.fqbn.as_deref() == Some(fqbn))
            })
            .cloned())
    }

    async fn search_boards(&self, query: Option<&str>) -> Result<Vec<BoardSearchResult>> {
        let query = query.map(str::to_lowercase);
        let packages = self.packages.lock().unwrap();
        Ok(packages
            .iter()
            .flat_map(|pkg| {
                pkg.boards.iter().map(move |board| BoardSearchResult {
                    board: board.clone(),
                    package_name: pkg.name.clone(),
                })
            })
            .filter(|hit| {
                query
                    .as_deref()
                    .is_none_or(|query| hit.board.name.to_lowercase().contains(query))
            })
            .collect())
    }
}

/// Memory storage whose writes can be switched to fail
#[derive(Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: AtomicBool,
    fail_key: Mutex<Option<String>>,
}

impl FlakyStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reject writes of a single key only
    pub fn fail_writes_to(&self, key: &str) {
        *self.fail_key.lock().unwrap() = Some(key.to_string());
    }
}

#[async_trait]
impl StorageService for FlakyStorage {
    async fn get_value(&self, key: &str) -> Result<Option<Value>> {
        self.inner.get_value(key).await
    }

    async fn set_value(&self, key: &str, value: Option<Value>) -> Result<()> {
        let rejected = self.fail_key.lock().unwrap().as_deref() == Some(key);
        if rejected || self.fail_writes.load(Ordering::SeqCst) {
            return Err(BoardsError::Storage(format!("write of {} rejected", key)));
        }
        self.inner.set_value(key, value).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys().await
    }
}
