//! Durable key-value storage used to persist board selections and options
//!
//! Backends store `serde_json::Value`s; [`Storage`] is the typed handle the
//! services use on top of them.

pub mod memory;
pub mod ron_file;

pub use memory::MemoryStorage;
pub use ron_file::RonFileStorage;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::Result;

/// Object-safe storage backend
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Value stored under `key`, if any
    async fn get_value(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`; `None` removes the key
    async fn set_value(&self, key: &str, value: Option<Value>) -> Result<()>;

    /// All stored keys, in no particular order
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Typed access to a shared storage backend
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageService>,
}

impl Storage {
    pub fn new(backend: Arc<dyn StorageService>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Read and deserialize the value under `key`.
    ///
    /// A stored `null` reads as absent.
    pub async fn get_data<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get_value(key).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Like [`Storage::get_data`], falling back to `default`
    pub async fn get_data_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get_data(key).await?.unwrap_or(default))
    }

    /// Serialize and store `value`; values serializing to `null` remove the key
    pub async fn set_data<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        if value.is_null() {
            self.backend.set_value(key, None).await
        } else {
            self.backend.set_value(key, Some(value)).await
        }
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        self.backend.set_value(key, None).await
    }

    pub async fn contains(&self, key: &str) -> Result<bool> {
        Ok(!matches!(
            self.backend.get_value(key).await?,
            None | Some(Value::Null)
        ))
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        self.backend.keys().await
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Board;

    #[tokio::test]
    async fn test_typed_round_trip() {
        let storage = Storage::in_memory();
        let uno = Board::with_fqbn("Arduino Uno", "arduino:avr:uno");

        storage.set_data("board", &uno).await.unwrap();
        assert!(storage.contains("board").await.unwrap());
        let loaded: Option<Board> = storage.get_data("board").await.unwrap();
        assert_eq!(loaded, Some(uno));
    }

    #[tokio::test]
    async fn test_none_removes_key() {
        let storage = Storage::in_memory();
        storage.set_data("key", &Some(42u32)).await.unwrap();
        assert_eq!(storage.get_data::<u32>("key").await.unwrap(), Some(42));

        storage.set_data("key", &None::<u32>).await.unwrap();
        assert_eq!(storage.get_data::<u32>("key").await.unwrap(), None);
        assert!(!storage.contains("key").await.unwrap());
        assert_eq!(storage.get_data_or("key", 7u32).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_mismatched_type_is_an_error() {
        let storage = Storage::in_memory();
        storage.set_data("key", "text").await.unwrap();
        assert!(storage.get_data::<Vec<Board>>("key").await.is_err());
    }
}
