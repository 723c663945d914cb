use async_trait::async_trait;
use keyring::Entry;

use super::{KeyValueStore, StorageError, StorageKey};

const SERVICE_NAME: &str = "picksleague";

/// Stores values in the OS keychain, one entry per key.
///
/// `keyring` is blocking, so every access runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    async fn blocking<T, F>(&self, key: StorageKey, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, key.as_str())?;
            op(entry)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
        .map_err(StorageError::from)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for KeyringStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        self.blocking(key, |entry| match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let value = value.to_string();
        self.blocking(key, move |entry| entry.set_password(&value))
            .await
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.blocking(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        })
        .await
    }
}
