//! Classifying raw responses.

use serde_json::Value;

use crate::error::{ErrorCode, InvokeError};
use crate::transport::RawResponse;

/// Non-error outcome of one round-trip.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reply {
    /// Terminal success, with the body if there was one.
    Done(Option<Value>),
    /// Job accepted or still running; poll this location.
    Accepted(String),
}

/// `2xx` success, `202` job handle, anything else a server error.
pub(crate) fn classify(response: RawResponse) -> Result<Reply, InvokeError> {
    let RawResponse { status, body } = response;
    let body = body.filter(|b| !b.is_null());

    match status {
        202 => {
            let location = body
                .as_ref()
                .and_then(|b| b.get("location"))
                .and_then(Value::as_str)
                .ok_or_else(|| InvokeError::Decode("202 response without a job location".into()))?;
            Ok(Reply::Accepted(location.to_owned()))
        }
        200..=299 => Ok(Reply::Done(body)),
        _ => Err(InvokeError::Server(error_code(status, body))),
    }
}

/// Extract the structured error from a failed response.
///
/// Accepts a bare `{code, description, details}` object or one wrapped as
/// `{"error": {...}}`; anything else becomes `HTTP.<status>`.
fn error_code(status: u16, body: Option<Value>) -> ErrorCode {
    let structured = body.as_ref().and_then(|b| {
        let candidate = b.get("error").filter(|e| e.is_object()).unwrap_or(b);
        candidate
            .get("code")
            .is_some()
            .then(|| serde_json::from_value::<ErrorCode>(candidate.clone()).ok())
            .flatten()
    });

    structured.unwrap_or_else(|| {
        ErrorCode::new(
            format!("HTTP.{status}"),
            format!("unexpected HTTP status {status}"),
            body.map(|b| b.to_string()).unwrap_or_default(),
        )
    })
}
