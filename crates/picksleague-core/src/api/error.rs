use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Three-way classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A response was received with a non-success status.
    Server,
    /// The request went out but no response came back.
    Network,
    /// The request failed locally, or the response could not be understood.
    Client,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server error {status} from {url}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: StatusCode,
        url: String,
        /// Envelope `message`, when the body carried one.
        message: Option<String>,
        body: String,
    },

    #[error("Network error contacting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out after {}s", .after.as_secs())]
    Timeout { url: String, after: Duration },

    #[error("Request error: {0}")]
    Client(String),

    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Maximum length for error response bodies in logs and messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Network { .. } | ApiError::Timeout { .. } => ErrorKind::Network,
            ApiError::Client(_) | ApiError::Decode { .. } => ErrorKind::Client,
        }
    }

    /// Original HTTP status, for server errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    /// Request URL, where one is known.
    pub fn url(&self) -> Option<&str> {
        match self {
            ApiError::Server { url, .. }
            | ApiError::Network { url, .. }
            | ApiError::Timeout { url, .. }
            | ApiError::Decode { url, .. } => Some(url.as_str()),
            ApiError::Client(_) => None,
        }
    }

    /// Text suitable for showing to a user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message: Some(m), .. } => m.clone(),
            ApiError::Server { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Server { status, .. } => format!(
                "The server could not complete the request ({}).",
                status.as_u16()
            ),
            ApiError::Timeout { .. } => {
                "Request timed out. Please check your connection and try again.".to_string()
            }
            ApiError::Network { .. } => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            ApiError::Client(_) | ApiError::Decode { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Map a transport failure where no response was received.
    pub fn from_transport(url: &str, err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
                after: timeout,
            }
        } else if err.is_builder() {
            ApiError::Client(err.to_string())
        } else {
            ApiError::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Truncate a response body to avoid logging excessive data
    pub fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }
}
