//! Key-value storage port used by the session store.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub const PLAYER_DATA_KEY: &str = "trivia_player_data";
pub const QUIZ_HISTORY_KEY: &str = "trivia_quiz_history";
pub const SESSION_KEY: &str = "quiz-storage";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid stored JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Synchronous string key-value storage. There is a single writer, so no
/// locking is done.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read and parse a JSON value. Missing keys and unparseable content both
/// read as `None`; the latter is logged and left on disk until overwritten.
pub fn read_json<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, %err, "failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "ignoring malformed stored value");
            None
        }
    }
}

/// Serialize and write a JSON value. Failures are logged, never returned.
pub fn write_json<T: Serialize + ?Sized>(storage: &mut impl Storage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|json| storage.set(key, &json));

    if let Err(err) = result {
        warn!(key, %err, "failed to persist value");
    }
}

/// In-memory storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open the directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerRecord;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("data")).unwrap();

        assert_eq!(storage.get(PLAYER_DATA_KEY).unwrap(), None);
        storage.set(PLAYER_DATA_KEY, "{}").unwrap();
        assert_eq!(storage.get(PLAYER_DATA_KEY).unwrap().as_deref(), Some("{}"));
        assert!(dir.path().join("data/trivia_player_data.json").exists());
    }

    #[test]
    fn test_malformed_json_reads_as_missing() {
        let mut storage = MemoryStorage::new();
        storage.set(PLAYER_DATA_KEY, "{not json").unwrap();

        let record: Option<PlayerRecord> = read_json(&storage, PLAYER_DATA_KEY);
        assert!(record.is_none());
        assert_eq!(storage.get(PLAYER_DATA_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_write_then_read_json() {
        let mut storage = MemoryStorage::new();
        write_json(&mut storage, PLAYER_DATA_KEY, &PlayerRecord::new("Ana"));

        let record: PlayerRecord = read_json(&storage, PLAYER_DATA_KEY).unwrap();
        assert_eq!(record, PlayerRecord::new("Ana"));
    }
}
