//! Persistence of the document set and settings
//!
//! State is stored as two JSON blobs under fixed keys. A [`SnapshotStore`]
//! maps keys to blobs; the directory store writes one `<key>.json` per key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{Document, Settings};

pub const DOCUMENTS_KEY: &str = "twinmark-documents";
pub const SETTINGS_KEY: &str = "twinmark-settings";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/blob persistence backend
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&mut self, key: &str, blob: &str) -> Result<(), StorageError>;
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl SnapshotStore for DirectoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, blob).map_err(|source| StorageError::Io { path, source })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Everything that survives a restart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub documents: Vec<Document>,
    pub settings: Settings,
}

impl Snapshot {
    /// Load from `store`. Missing or unreadable blobs fall back to defaults.
    pub fn load(store: &dyn SnapshotStore) -> Result<Self, StorageError> {
        let documents = match store.get(DOCUMENTS_KEY)? {
            Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse stored documents: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        let settings = match store.get(SETTINGS_KEY)? {
            Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse stored settings: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        };
        tracing::debug!(documents = documents.len(), "snapshot loaded");
        Ok(Self {
            documents,
            settings,
        })
    }

    /// Encode as `(documents blob, settings blob)`
    pub fn encode(&self) -> Result<(String, String), StorageError> {
        Ok((
            serde_json::to_string(&self.documents)?,
            serde_json::to_string(&self.settings)?,
        ))
    }

    pub fn save(&self, store: &mut dyn SnapshotStore) -> Result<(), StorageError> {
        let (documents, settings) = self.encode()?;
        store.put(DOCUMENTS_KEY, &documents)?;
        store.put(SETTINGS_KEY, &settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentId, ThemeMode};

    fn snapshot() -> Snapshot {
        Snapshot {
            documents: vec![Document::new(DocumentId(1), "Notes", "# Notes\n")],
            settings: Settings {
                theme: ThemeMode::Light,
                ..Settings::default()
            },
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        snapshot().save(&mut store).unwrap();
        assert_eq!(Snapshot::load(&store).unwrap(), snapshot());
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(Snapshot::load(&store).unwrap(), Snapshot::default());
    }

    #[test]
    fn test_corrupt_blob_falls_back() {
        let mut store = MemoryStore::new();
        store.put(DOCUMENTS_KEY, "{not json").unwrap();
        store.put(SETTINGS_KEY, r#"{"theme":"light"}"#).unwrap();
        let loaded = Snapshot::load(&store).unwrap();
        assert!(loaded.documents.is_empty());
        assert_eq!(loaded.settings.theme, ThemeMode::Light);
    }

    #[test]
    fn test_directory_store_writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::new(dir.path().join("data"));
        snapshot().save(&mut store).unwrap();
        assert!(dir.path().join("data/twinmark-documents.json").exists());
        assert!(dir.path().join("data/twinmark-settings.json").exists());
        assert_eq!(Snapshot::load(&store).unwrap(), snapshot());
    }
}
