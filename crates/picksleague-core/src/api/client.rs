//! API client for the picks league backend.
//!
//! `ApiClient` is built once by the application and handed to whoever needs
//! it. Every named operation funnels through [`ApiClient::execute`], which
//! runs the middleware pipeline around the transport and decodes the
//! response envelope.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use super::envelope::ApiResponse;
use super::middleware::Pipeline;
use super::transport::{ApiRequest, HttpTransport, Transport, REQUEST_TIMEOUT_SECS};
use super::ApiError;
use crate::config::ApiEndpoint;
use crate::session::SessionStorage;

/// API client.
/// Clone is cheap - the transport, pipeline and storage are shared.
#[derive(Clone)]
pub struct ApiClient {
    endpoint: ApiEndpoint,
    transport: Arc<dyn Transport>,
    pipeline: Pipeline,
    session: SessionStorage,
}

impl ApiClient {
    /// Create a client with the HTTP transport and the standard pipeline.
    pub fn new(endpoint: ApiEndpoint, session: SessionStorage) -> Result<Self, ApiError> {
        Self::builder(endpoint, session).build()
    }

    pub fn builder(endpoint: ApiEndpoint, session: SessionStorage) -> ApiClientBuilder {
        ApiClientBuilder {
            endpoint,
            session,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            transport: None,
            pipeline: None,
        }
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    pub fn session(&self) -> &SessionStorage {
        &self.session
    }

    /// Start a request for an API route such as `/leagues/7`.
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(method, self.endpoint.url_for(path))
    }

    /// Run one request through the pipeline and decode its envelope.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        debug!(method = %request.method, url = %request.url, "API request");

        let request = self.pipeline.prepare(request).await;
        let outcome = self.transport.send(request).await;
        let raw = self.pipeline.complete(outcome).await?;

        if raw.body.trim().is_empty() {
            return Ok(ApiResponse::empty());
        }

        let envelope: ApiResponse<Value> = serde_json::from_str(&raw.body)
            .map_err(|e| Self::decode_error(&raw.url, &raw.body, e))?;

        // A failure envelope is returned as-is; its data is never interpreted
        if !envelope.success {
            return Ok(ApiResponse {
                success: false,
                message: envelope.message,
                data: None,
            });
        }

        let data = envelope
            .data
            .map(serde_json::from_value::<T>)
            .transpose()
            .map_err(|e| Self::decode_error(&raw.url, &raw.body, e))?;

        Ok(ApiResponse {
            success: true,
            message: envelope.message,
            data,
        })
    }

    fn decode_error(url: &str, body: &str, e: serde_json::Error) -> ApiError {
        error!(
            url = %url,
            error = %e,
            body = %ApiError::truncate_body(body),
            "Failed to parse API response"
        );
        ApiError::Decode {
            url: url.to_string(),
            source: e,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(self.request(Method::POST, path).json(body)?).await
    }

    /// POST with no body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(self.request(Method::POST, path)).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(self.request(Method::PUT, path).json(body)?).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(self.request(Method::DELETE, path)).await
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    endpoint: ApiEndpoint,
    session: SessionStorage,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
    pipeline: Option<Pipeline>,
}

impl ApiClientBuilder {
    /// Request timeout for the default HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the HTTP transport, e.g. with a fake in tests.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the standard pipeline.
    pub fn pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpTransport::builder()
                    .timeout(self.timeout)
                    .user_agent(concat!("picksleague/", env!("CARGO_PKG_VERSION")))
                    .build()?,
            ),
        };
        let pipeline = self
            .pipeline
            .unwrap_or_else(|| Pipeline::standard(&self.session));

        Ok(ApiClient {
            endpoint: self.endpoint,
            transport,
            pipeline,
            session: self.session,
        })
    }
}
