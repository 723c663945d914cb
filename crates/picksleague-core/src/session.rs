//! Typed access to the stored credential and current user.
//!
//! The credential and the user record are written and cleared together; a
//! user without a token (or the reverse) is treated as signed out by
//! consumers.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::User;
use crate::storage::{KeyValueStore, StorageError, StorageKey};

/// Cheap to clone; all clones share one backing store.
#[derive(Clone)]
pub struct SessionStorage {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn from_store<S: KeyValueStore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// The bearer token, if one is stored.
    pub async fn token(&self) -> Result<Option<String>, StorageError> {
        self.store.get(StorageKey::AuthToken).await
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(StorageKey::AuthToken, token).await
    }

    /// The stored user. A record that no longer parses is discarded.
    pub async fn current_user(&self) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.store.get(StorageKey::CurrentUser).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable stored user");
                self.store.remove(StorageKey::CurrentUser).await?;
                Ok(None)
            }
        }
    }

    pub async fn set_current_user(&self, user: &User) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.store.set(StorageKey::CurrentUser, &raw).await
    }

    /// Persist a fresh login.
    pub async fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        self.set_token(token).await?;
        self.set_current_user(user).await
    }

    /// Remove both the credential and the user.
    ///
    /// Both removals are attempted even if the first fails; the first error
    /// is returned.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in StorageKey::ALL {
            if let Err(e) = self.store.remove(key).await {
                warn!(key = %key, error = %e, "Failed to remove stored value");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                debug!("Session cleared");
                Ok(())
            }
        }
    }

    /// True when a credential is stored. Storage failures read as signed out.
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.token().await, Ok(Some(_)))
    }
}
