use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use zsdk_schema::ValidationError;

use crate::transport::TransportError;

/// Structured failure descriptor, as reported by the server or synthesised
/// by the client for local failures.
///
/// Wire shape: `{"code": "...", "description": "...", "details": "..."}`.
/// Missing or `null` members decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode {
    /// Machine-readable code, e.g. `SYS.1001` or `CLIENT.VALIDATION`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code: String,
    /// Short human-readable summary.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Free-form detail text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: String,
}

impl ErrorCode {
    /// Create an error code from its three parts.
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            details: details.into(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error[code: {}, description: {}, details: {}]",
            self.code, self.description, self.details
        )
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error raised on demand from a failed [`ActionResult`](crate::ActionResult).
///
/// Only produced by
/// [`throw_exception_if_error`](crate::ActionResult::throw_exception_if_error)
/// and [`into_result`](crate::ActionResult::into_result); the invocation
/// paths themselves never fail with it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    error: ErrorCode,
}

impl ApiError {
    /// The error code carried by this error.
    #[must_use]
    pub fn error_code(&self) -> &ErrorCode {
        &self.error
    }

    /// Consume into the carried error code.
    #[must_use]
    pub fn into_error_code(self) -> ErrorCode {
        self.error
    }
}

impl From<ErrorCode> for ApiError {
    fn from(error: ErrorCode) -> Self {
        Self { error }
    }
}

/// Every way a single invocation can fail.
///
/// Local failures (`Validation`, `AuthenticationRequired`,
/// `MissingPathParameter`, `Encode`) are raised before the transport is
/// touched. None of them is retried by this layer.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum InvokeError {
    /// Field values violate the action's parameter schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The action needs a session and none was supplied.
    #[error("action `{action}` requires a session id or an access key pair")]
    AuthenticationRequired {
        /// Name of the rejected action.
        action: &'static str,
    },

    /// A `{placeholder}` in the path template has no populated field.
    #[error("path `{path}` has no value for placeholder `{{{placeholder}}}`")]
    MissingPathParameter {
        /// The path template.
        path: &'static str,
        /// The unresolved placeholder name.
        placeholder: String,
    },

    /// The transport collaborator failed to deliver the request.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a structured error.
    #[error("server error: {0}")]
    Server(ErrorCode),

    /// A polled job did not reach a terminal state within its budget.
    #[error("job `{location}` did not finish after {attempts} polls in {elapsed:?}")]
    PollTimeout {
        /// Job location that was polled.
        location: String,
        /// Poll requests issued.
        attempts: u32,
        /// Time spent polling.
        elapsed: Duration,
    },

    /// The whole invocation exceeded its timeout.
    #[error("invocation exceeded {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the invocation at a poll checkpoint.
    #[error("invocation cancelled")]
    Cancelled,

    /// The action could not be serialized into field values.
    #[error("cannot encode action: {0}")]
    Encode(String),

    /// A response body could not be decoded.
    #[error("cannot decode response: {0}")]
    Decode(String),

    /// The invocation task panicked or was dropped before finishing.
    #[error("internal failure: {0}")]
    Internal(String),
}

impl InvokeError {
    /// Machine-readable code; server errors keep the remote code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Validation(_) => "CLIENT.VALIDATION",
            Self::AuthenticationRequired { .. } => "CLIENT.AUTHENTICATION_REQUIRED",
            Self::MissingPathParameter { .. } => "CLIENT.MISSING_PATH_PARAMETER",
            Self::Transport(_) => "CLIENT.TRANSPORT",
            Self::Server(error) => &error.code,
            Self::PollTimeout { .. } => "CLIENT.POLL_TIMEOUT",
            Self::Timeout(_) => "CLIENT.TIMEOUT",
            Self::Cancelled => "CLIENT.CANCELLED",
            Self::Encode(_) => "CLIENT.ENCODE",
            Self::Decode(_) => "CLIENT.DECODE",
            Self::Internal(_) => "CLIENT.INTERNAL",
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_)
            | Self::AuthenticationRequired { .. }
            | Self::MissingPathParameter { .. }
            | Self::Encode(_) => "preflight",
            Self::Transport(_) | Self::Decode(_) => "transport",
            Self::Server(_) => "server",
            Self::PollTimeout { .. } | Self::Timeout(_) | Self::Cancelled => "deadline",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the failure happened before anything was sent.
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        self.category() == "preflight"
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Validation(_) => "parameter validation failed",
            Self::AuthenticationRequired { .. } => "authentication required",
            Self::MissingPathParameter { .. } => "missing path parameter",
            Self::Transport(_) => "transport failure",
            Self::Server(_) => "server error",
            Self::PollTimeout { .. } => "polling timed out",
            Self::Timeout(_) => "invocation timed out",
            Self::Cancelled => "invocation cancelled",
            Self::Encode(_) => "cannot encode request",
            Self::Decode(_) => "cannot decode response",
            Self::Internal(_) => "internal client failure",
        }
    }

    /// Convert into the error code delivered inside an
    /// [`ActionResult`](crate::ActionResult).
    #[must_use]
    pub fn into_error_code(self) -> ErrorCode {
        match self {
            Self::Server(error) => error,
            other => ErrorCode::new(other.code(), other.description(), other.to_string()),
        }
    }
}

impl From<InvokeError> for ErrorCode {
    fn from(err: InvokeError) -> Self {
        err.into_error_code()
    }
}
