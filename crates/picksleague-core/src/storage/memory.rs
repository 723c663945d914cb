use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StorageError, StorageKey};

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(StorageKey::AuthToken, token.into());
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.values.write().await.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.values.write().await.remove(&key);
        Ok(())
    }
}
