//! Transport port.
//!
//! The invoker never builds HTTP framing itself. It hands a resolved
//! [`RawRequest`] to a [`Transport`] implementation and classifies the
//! [`RawResponse`] it gets back. TLS, connection pooling, header encoding of
//! [`Auth`] and retries all belong to the implementation.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::credentials::Auth;
use crate::descriptor::HttpMethod;
use crate::error::ErrorCode;

/// A fully resolved request: concrete path, routed fields, credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path with every placeholder substituted, or a job location when polling.
    pub path: String,
    /// Query fields (`GET`/`DELETE`).
    pub query: Option<Map<String, Value>>,
    /// Body (`POST`/`PUT`).
    pub body: Option<Value>,
    /// Authorization to attach, if the caller supplied usable credentials.
    pub auth: Option<Auth>,
    /// Originating client address.
    pub request_ip: Option<String>,
}

impl RawRequest {
    /// Request with no payload and no credentials.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            auth: None,
            request_ip: None,
        }
    }

    /// Follow-up `GET` for a job location, reusing the original credentials.
    #[must_use]
    pub fn poll(location: &str, origin: &Self) -> Self {
        Self {
            auth: origin.auth.clone(),
            request_ip: origin.request_ip.clone(),
            ..Self::new(HttpMethod::Get, location)
        }
    }
}

/// What the transport got back: status code and decoded JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body; `None` when the body was empty.
    pub body: Option<Value>,
}

impl RawResponse {
    /// Response with an arbitrary status and body.
    #[must_use]
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// `200 OK` with a JSON body.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::new(200, Some(body))
    }

    /// `204 No Content`.
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(204, None)
    }

    /// `202 Accepted` pointing at a job location.
    #[must_use]
    pub fn accepted(location: impl Into<String>) -> Self {
        Self::new(202, Some(json!({ "location": location.into() })))
    }

    /// Error status carrying a structured error body.
    #[must_use]
    pub fn error(status: u16, error: &ErrorCode) -> Self {
        Self::new(status, Some(json!(error)))
    }
}

/// Network or connection failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Create a transport error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Port trait for delivering requests.
///
/// Implemented outside this crate (an HTTP client, a test double); shared
/// across concurrent invocations, so implementations must be thread-safe.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send one request and return the raw response.
    async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportError>;
}
