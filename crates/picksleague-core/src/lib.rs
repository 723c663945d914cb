//! Core library for the picks league client.
//!
//! - `config`: runtime settings and API endpoint resolution
//! - `storage`: persistent key-value stores for the credential and user
//! - `session`: typed access to the stored session
//! - `api`: the authenticated client, its middleware and named operations
//! - `models`: API payload types
//!
//! The application builds one [`ApiClient`] at start-up and passes it to
//! whatever needs the backend:
//!
//! ```no_run
//! use picksleague_core::{ApiClient, KeyringStore, SessionStorage, Settings};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::from_env()?;
//! let session = SessionStorage::from_store(KeyringStore::new());
//! let client = ApiClient::new(settings.endpoint, session)?;
//!
//! let joined = client.leagues().join_by_code("ABC123").await?;
//! if !joined.success {
//!     println!("{}", joined.message_or("Could not join league"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiError, ApiResponse, ErrorKind};
pub use config::{ApiEndpoint, ConfigError, RuntimeMode, Settings, StorageBackend};
pub use session::SessionStorage;
pub use storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore, StorageError, StorageKey};
