//! RON file storage backend
//!
//! The whole store lives in one RON document which is rewritten on every
//! update; the data set is a handful of selections and option lists.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::StorageService;
use crate::errors::Result;

const STATE_FILE_VERSION: u32 = 1;

/// On-disk document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateFile {
    /// Format version for compatibility
    version: u32,
    /// Last write timestamp
    last_updated: DateTime<Local>,
    entries: BTreeMap<String, Value>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_FILE_VERSION,
            last_updated: Local::now(),
            entries: BTreeMap::new(),
        }
    }
}

/// Storage persisted to a RON file
#[derive(Debug)]
pub struct RonFileStorage {
    path: PathBuf,
    state: RwLock<StateFile>,
}

impl RonFileStorage {
    /// Open the store at `path`.
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file
    /// is logged and replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let state = if tokio::fs::try_exists(&path).await? {
            match Self::load(&path).await {
                Ok(state) => {
                    log::debug!(
                        "Loaded {} stored entries from {}",
                        state.entries.len(),
                        path.display()
                    );
                    state
                }
                Err(e) => {
                    log::warn!(
                        "Failed to load state from {}: {}. Starting with an empty store.",
                        path.display(),
                        e
                    );
                    StateFile::default()
                }
            }
        } else {
            StateFile::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// `<config dir>/boardsync/state.ron`
    pub fn default_path() -> PathBuf {
        let config_dir = match dirs::config_dir() {
            Some(config_dir) => config_dir.join("boardsync"),
            None => PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
                .join("boardsync"),
        };
        config_dir.join("state.ron")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> Result<StateFile> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(ron::from_str(&content)?)
    }

    async fn save(&self, state: &mut StateFile) -> Result<()> {
        state.last_updated = Local::now();
        let content = ron::ser::to_string_pretty(&*state, ron::ser::PrettyConfig::default())?;
        tokio::fs::write(&self.path, content).await?;
        log::trace!("Saved state to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl StorageService for RonFileStorage {
    async fn get_value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.state.read().await.entries.get(key).cloned())
    }

    async fn set_value(&self, key: &str, value: Option<Value>) -> Result<()> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        match value {
            Some(value) => {
                next.entries.insert(key.to_string(), value);
            }
            None => {
                if next.entries.remove(key).is_none() {
                    return Ok(());
                }
            }
        }
        self.save(&mut next).await?;
        *state = next;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.state.read().await.entries.keys().cloned().collect())
    }
}
