use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::StoreError;

/// String-keyed blob storage. No transactions, last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Keeps every key in one JSON document that is rewritten on each change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    let backup = sibling(&path, "corrupt");
                    tokio::fs::rename(&path, &backup).await?;
                    tracing::warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "state file unreadable, moved aside and starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        let store = Self {
            path,
            entries: Mutex::new(entries),
        };
        {
            let guard = store.entries.lock().await;
            store.write(&guard).await?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(entries)?;
        // Staged then renamed; the target is never partially written.
        let staging = sibling(&self.path, "tmp");
        tokio::fs::write(&staging, payload).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().await;
        guard.insert(key.to_string(), value);
        self.write(&guard).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().await;
        if guard.remove(key).is_some() {
            self.write(&guard).await?;
        }
        Ok(())
    }
}
