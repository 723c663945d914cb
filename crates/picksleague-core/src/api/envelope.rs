use serde::{Deserialize, Serialize};

/// Uniform response body: `{ success, message?, data? }`.
///
/// A `success: false` envelope delivered with a 2xx status is a normal
/// result, not an error; callers branch on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Envelope used for 2xx responses with an empty body.
    pub fn empty() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Server message, or `fallback` when none was sent.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

/// Just the message fields of an error body, tolerant of any `data` shape.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    /// Best-effort extraction of a server-provided message.
    pub(crate) fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
    }
}
