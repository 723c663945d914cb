//! HTTP transport: the one place requests touch the network.
//!
//! The transport returns every received response as a [`RawResponse`],
//! whatever its status. Deciding what counts as a failure is left to the
//! response stages of the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use tracing::debug;

use super::ApiError;

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FilePart>),
}

/// A request as seen by the pipeline stages and the transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        match self.body {
            RequestBody::Multipart(ref mut parts) => parts.push(part),
            _ => self.body = RequestBody::Multipart(vec![part]),
        }
        self
    }

    /// Value of a header set on this request, if it is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A received response, success or not, with its body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Sends one request and reports what came back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

/// reqwest-backed transport.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn multipart_form(parts: Vec<FilePart>) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for part in parts {
            let file = Part::bytes(part.bytes)
                .file_name(part.file_name)
                .mime_str(&part.mime)
                .map_err(|e| ApiError::Client(format!("Invalid MIME type {}: {}", part.mime, e)))?;
            form = form.part(part.field, file);
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let ApiRequest {
            method,
            url,
            query,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            // Sets a per-request multipart content type; the client default stays JSON
            RequestBody::Multipart(parts) => builder.multipart(Self::multipart_form(parts)?),
        };

        debug!(%method, url = %url, "Sending HTTP request");

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&url, e, self.timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();
        debug!(%method, url = %final_url, %status, "Received HTTP response");

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&final_url, e, self.timeout))?;

        Ok(RawResponse {
            url: final_url,
            status,
            headers,
            body,
        })
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl HttpTransportBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpTransport, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers);
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Client(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpTransport {
            client,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::new(Method::GET, "https://x/api/activity/3")
            .query("limit", 20)
            .query("offset", 40);
        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "20".to_string()),
                ("offset".to_string(), "40".to_string())
            ]
        );
        assert_eq!(request.body, RequestBody::Empty);

        let request = ApiRequest::new(Method::POST, "https://x/api/leagues/join")
            .json(&serde_json::json!({ "code": "ABC123" }))
            .unwrap();
        assert_eq!(
            request.body,
            RequestBody::Json(serde_json::json!({ "code": "ABC123" }))
        );
    }

    #[test]
    fn test_file_parts_accumulate() {
        let part = |name: &str| FilePart {
            field: name.to_string(),
            file_name: "a.png".to_string(),
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let request = ApiRequest::new(Method::POST, "https://x/api/auth/avatar")
            .file(part("avatar"))
            .file(part("thumbnail"));
        match request.body {
            RequestBody::Multipart(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        let transport = HttpTransport::builder().build().unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(30));

        let transport = HttpTransport::builder()
            .timeout(Duration::from_millis(250))
            .build()
            .unwrap();
        assert_eq!(transport.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_mime_is_a_client_error() {
        let result = HttpTransport::multipart_form(vec![FilePart {
            field: "avatar".to_string(),
            file_name: "a.png".to_string(),
            mime: "not a mime".to_string(),
            bytes: Vec::new(),
        }]);
        assert!(matches!(result, Err(ApiError::Client(_))));
    }
}
