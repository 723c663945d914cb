//! Request and response stages applied to every call.
//!
//! Stages are composed once, when the client is built. Request stages run in
//! order before the transport; response stages run in order on whatever the
//! transport produced. The standard pipeline is:
//!
//! - request: [`BearerAuth`]
//! - response: [`TokenRotation`], [`ErrorClassifier`], [`AuthEviction`]
//!
//! Storage failures inside a stage are logged and never become the call's
//! error.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::{debug, error, info, warn};

use super::envelope::ErrorBody;
use super::error::ErrorKind;
use super::transport::{ApiRequest, RawResponse};
use super::ApiError;
use crate::session::SessionStorage;

/// Response header carrying a replacement credential.
pub const NEW_TOKEN_HEADER: &str = "x-new-token";

/// What the transport (or an earlier stage) produced.
pub type Outcome = Result<RawResponse, ApiError>;

#[async_trait]
pub trait RequestStage: Send + Sync {
    async fn on_request(&self, request: ApiRequest) -> ApiRequest;
}

#[async_trait]
pub trait ResponseStage: Send + Sync {
    async fn on_response(&self, outcome: Outcome) -> Outcome;
}

/// Ordered request and response stages.
#[derive(Clone, Default)]
pub struct Pipeline {
    request: Vec<Arc<dyn RequestStage>>,
    response: Vec<Arc<dyn ResponseStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credential attachment, rotation, classification and eviction.
    pub fn standard(session: &SessionStorage) -> Self {
        Self::new()
            .with_request_stage(BearerAuth::new(session.clone()))
            .with_response_stage(TokenRotation::new(session.clone()))
            .with_response_stage(ErrorClassifier)
            .with_response_stage(AuthEviction::new(session.clone()))
    }

    pub fn with_request_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.request.push(Arc::new(stage));
        self
    }

    pub fn with_response_stage(mut self, stage: impl ResponseStage + 'static) -> Self {
        self.response.push(Arc::new(stage));
        self
    }

    pub async fn prepare(&self, mut request: ApiRequest) -> ApiRequest {
        for stage in &self.request {
            request = stage.on_request(request).await;
        }
        request
    }

    pub async fn complete(&self, mut outcome: Outcome) -> Outcome {
        for stage in &self.response {
            outcome = stage.on_response(outcome).await;
        }
        outcome
    }
}

/// Attaches `Authorization: Bearer <token>` from storage, read fresh on
/// every request.
pub struct BearerAuth {
    session: SessionStorage,
}

impl BearerAuth {
    pub fn new(session: SessionStorage) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RequestStage for BearerAuth {
    async fn on_request(&self, mut request: ApiRequest) -> ApiRequest {
        let token = match self.session.token().await {
            Ok(Some(token)) => token,
            Ok(None) => return request,
            Err(e) => {
                warn!(url = %request.url, error = %e, "Could not read stored token; sending without it");
                return request;
            }
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(e) => {
                warn!(error = %e, "Stored token is not a valid header value; sending without it");
            }
        }
        request
    }
}

/// Persists a replacement credential sent in [`NEW_TOKEN_HEADER`].
pub struct TokenRotation {
    session: SessionStorage,
}

impl TokenRotation {
    pub fn new(session: SessionStorage) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ResponseStage for TokenRotation {
    async fn on_response(&self, outcome: Outcome) -> Outcome {
        if let Ok(ref raw) = outcome {
            if let Some(token) = raw.header(NEW_TOKEN_HEADER).filter(|t| !t.is_empty()) {
                match self.session.set_token(token).await {
                    Ok(()) => debug!(url = %raw.url, "Stored rotated token"),
                    Err(e) => warn!(url = %raw.url, error = %e, "Failed to store rotated token"),
                }
            }
        }
        outcome
    }
}

/// Turns non-success responses into [`ApiError::Server`] and logs every
/// failure with what is known about it.
pub struct ErrorClassifier;

#[async_trait]
impl ResponseStage for ErrorClassifier {
    async fn on_response(&self, outcome: Outcome) -> Outcome {
        match outcome {
            Ok(raw) if raw.is_success() => Ok(raw),
            Ok(raw) => {
                error!(
                    status = raw.status.as_u16(),
                    status_text = raw.status.canonical_reason().unwrap_or(""),
                    url = %raw.url,
                    body = %ApiError::truncate_body(&raw.body),
                    "API server error"
                );
                Err(ApiError::Server {
                    status: raw.status,
                    message: ErrorBody::message_from(&raw.body),
                    url: raw.url,
                    body: raw.body,
                })
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::Network => {
                        error!(url = e.url().unwrap_or(""), error = %e, "API network error: no response received")
                    }
                    ErrorKind::Client | ErrorKind::Server => {
                        error!(error = %e, "API request error")
                    }
                }
                Err(e)
            }
        }
    }
}

/// Clears the credential and current user when the server answers 401.
pub struct AuthEviction {
    session: SessionStorage,
}

impl AuthEviction {
    pub fn new(session: SessionStorage) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ResponseStage for AuthEviction {
    async fn on_response(&self, outcome: Outcome) -> Outcome {
        if let Err(ref e) = outcome {
            if e.is_unauthorized() {
                // clear() logs each failed removal itself
                if self.session.clear().await.is_ok() {
                    info!(url = e.url().unwrap_or(""), "Credential rejected; session cleared");
                }
            }
        }
        outcome
    }
}
