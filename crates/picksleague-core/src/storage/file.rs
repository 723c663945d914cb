use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{KeyValueStore, StorageError, StorageKey};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Stores all keys in a single JSON object on disk.
///
/// Writes go through a lock so concurrent rotations cannot interleave a
/// read-modify-write of the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::at_path(data_dir.as_ref().join(SESSION_FILE))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored value. An unreadable file is discarded and reads as
    /// empty, so a torn write cannot lock the session out.
    async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&contents) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                match tokio::fs::remove_file(&self.path).await {
                    Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                    _ => Ok(BTreeMap::new()),
                }
            }
        }
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if values.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_vec_pretty(values)?;

        // Write to a temporary file first, then rename over the session file
        let temp_path = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(&contents).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key.as_str()))
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.as_str().to_string(), value.to_string());
        self.write_all(&values).await
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read_all().await?;
        if values.remove(key.as_str()).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }
}
