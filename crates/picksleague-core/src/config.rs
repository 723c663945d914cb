//! Runtime configuration and API endpoint resolution.
//!
//! The API origin comes from the environment (`PICKSLEAGUE_API_URL`). In a
//! development runtime a local default is used when it is missing; in any
//! other runtime a missing origin is a fatal configuration error, so requests
//! can never silently go to the wrong host.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use thiserror::Error;

/// Application name used for data directory paths
const APP_NAME: &str = "picksleague";

/// Path suffix every API route lives under.
pub const API_SUFFIX: &str = "/api";

/// Origin used when running in development without an explicit API URL.
pub const DEV_DEFAULT_ORIGIN: &str = "http://localhost:3000";

pub const ENV_API_URL: &str = "PICKSLEAGUE_API_URL";
pub const ENV_RUNTIME_MODE: &str = "PICKSLEAGUE_ENV";
pub const ENV_DATA_DIR: &str = "PICKSLEAGUE_DATA_DIR";
pub const ENV_STORAGE: &str = "PICKSLEAGUE_STORAGE";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PICKSLEAGUE_API_URL is not set; an API origin is required outside development")]
    MissingApiUrl,

    #[error("API URL {0} repeats the /api suffix")]
    RepeatedApiSuffix(String),

    #[error("Unknown runtime mode: {0}")]
    UnknownMode(String),

    #[error("Unknown storage backend: {0}")]
    UnknownStorage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
    Test,
}

impl RuntimeMode {
    /// Mode implied by the build profile when nothing is configured.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            RuntimeMode::Development
        } else {
            RuntimeMode::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == RuntimeMode::Development
    }
}

impl FromStr for RuntimeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "production" | "prod" => Ok(RuntimeMode::Production),
            "test" => Ok(RuntimeMode::Test),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Development => write!(f, "development"),
            RuntimeMode::Production => write!(f, "production"),
            RuntimeMode::Test => write!(f, "test"),
        }
    }
}

/// The resolved API location. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    api_url: String,
}

impl ApiEndpoint {
    /// Resolve the API URL from an optional configured origin.
    ///
    /// Blank values count as unset. Trailing slashes are dropped and the
    /// `/api` suffix is appended only when it is not already present. An
    /// origin that repeats the suffix (`https://h/api/api`) is rejected.
    pub fn resolve(origin: Option<&str>, mode: RuntimeMode) -> Result<Self, ConfigError> {
        let origin = origin.map(str::trim).filter(|s| !s.is_empty());

        let api_url = match origin {
            Some(origin) => {
                let trimmed = origin.trim_end_matches('/');
                let base = trimmed.strip_suffix(API_SUFFIX).unwrap_or(trimmed);
                if base.trim_end_matches('/').ends_with(API_SUFFIX) {
                    return Err(ConfigError::RepeatedApiSuffix(origin.to_string()));
                }
                format!("{}{}", base, API_SUFFIX)
            }
            None if mode.is_development() => format!("{}{}", DEV_DEFAULT_ORIGIN, API_SUFFIX),
            None => return Err(ConfigError::MissingApiUrl),
        };

        Ok(Self { api_url })
    }

    /// Full API URL including the `/api` suffix.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Origin without the API suffix, for static assets such as avatars.
    pub fn base_origin(&self) -> &str {
        self.api_url
            .strip_suffix(API_SUFFIX)
            .unwrap_or(&self.api_url)
    }

    /// Absolute URL for an API route, e.g. `/leagues/7`.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_url, path)
        } else {
            format!("{}/{}", self.api_url, path)
        }
    }

    /// Absolute URL for a static asset path returned by the API.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_origin(), path.trim_start_matches('/'))
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.api_url)
    }
}

/// Where the credential and current user are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Keyring,
    File,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" => Ok(StorageBackend::Keyring),
            "file" => Ok(StorageBackend::File),
            other => Err(ConfigError::UnknownStorage(other.to_string())),
        }
    }
}

/// Process configuration read once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: RuntimeMode,
    pub endpoint: ApiEndpoint,
    pub storage: StorageBackend,
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &str| std::env::var(name).ok();
        Self::from_vars(
            var(ENV_API_URL).as_deref(),
            var(ENV_RUNTIME_MODE).as_deref(),
            var(ENV_STORAGE).as_deref(),
            var(ENV_DATA_DIR).as_deref(),
        )
    }

    pub fn from_vars(
        api_url: Option<&str>,
        mode: Option<&str>,
        storage: Option<&str>,
        data_dir: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mode = match mode {
            Some(m) => m.parse()?,
            None => RuntimeMode::from_build(),
        };
        let endpoint = ApiEndpoint::resolve(api_url, mode)?;
        let storage = match storage {
            Some(s) => s.parse()?,
            None => StorageBackend::default(),
        };

        Ok(Self {
            mode,
            endpoint,
            storage,
            data_dir: data_dir.filter(|d| !d.trim().is_empty()).map(PathBuf::from),
        })
    }

    /// Directory for the session file and logs.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }
}
