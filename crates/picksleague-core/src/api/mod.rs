//! REST API client for the picks league backend.
//!
//! This module provides the `ApiClient` and the named operations built on
//! it, grouped by area (`client.leagues().join_by_code("ABC123")`).
//!
//! The API uses bearer token authentication. Tokens are read from session
//! storage on every request, replaced when the server sends a rotated one,
//! and cleared when the server rejects them with 401.

pub mod activity;
pub mod admin;
pub mod auth;
pub mod chat;
pub mod client;
pub mod drivers;
pub mod envelope;
pub mod error;
pub mod leagues;
pub mod middleware;
pub mod notifications;
pub mod picks;
pub mod races;
pub mod stats;
pub mod transport;

pub use client::{ApiClient, ApiClientBuilder};
pub use envelope::ApiResponse;
pub use error::{ApiError, ErrorKind};
pub use middleware::{Pipeline, RequestStage, ResponseStage, NEW_TOKEN_HEADER};
pub use transport::{ApiRequest, FilePart, HttpTransport, RawResponse, RequestBody, Transport};

/// Percent-encode one path segment.
pub(crate) fn segment(value: impl std::fmt::Display) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}
