//! Persistent key-value storage for the credential and the current user.
//!
//! Storage is an external, fallible resource. Every backend implements
//! [`KeyValueStore`], and callers inside the request pipeline log failures
//! instead of propagating them.
//!
//! - `KeyringStore`: OS keychain via the `keyring` crate
//! - `FileStore`: a JSON file in the data directory
//! - `MemoryStore`: in-process map, for tests and ephemeral sessions

pub mod file;
pub mod keyring;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub use self::file::FileStore;
pub use self::keyring::KeyringStore;
pub use self::memory::MemoryStore;

/// Keys the client reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AuthToken,
    CurrentUser,
}

impl StorageKey {
    pub const ALL: [StorageKey; 2] = [StorageKey::AuthToken, StorageKey::CurrentUser];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::AuthToken => "auth_token",
            StorageKey::CurrentUser => "current_user",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Keychain error: {0}")]
    Keyring(#[from] ::keyring::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage task failed: {0}")]
    Task(String),
}

/// Async, fallible get/set/remove of string values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Removing a key that is not present succeeds.
    async fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}
