use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ErrorCode, InvokeError};

/// Outcome of one invocation: exactly one of a value or an error.
///
/// Both invocation disciplines deliver this type, and no failure is ever
/// raised instead of it. Callers that prefer `?`-style propagation opt in
/// with [`throw_exception_if_error`](Self::throw_exception_if_error) or
/// [`into_result`](Self::into_result).
///
/// ```rust
/// use zsdk_action::{ActionResult, ErrorCode};
///
/// let ok: ActionResult<u32> = ActionResult::success(7);
/// assert_eq!(ok.value(), Some(&7));
/// assert!(ok.error().is_none());
///
/// let failed: ActionResult<u32> = ActionResult::failure(ErrorCode::new("X", "d", "t"));
/// let err = failed.throw_exception_if_error().unwrap_err();
/// assert_eq!(err.to_string(), "error[code: X, description: d, details: t]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult<T> {
    outcome: Outcome<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome<T> {
    Value(T),
    Error(ErrorCode),
}

impl<T> ActionResult<T> {
    /// Successful result.
    pub fn success(value: T) -> Self {
        Self {
            outcome: Outcome::Value(value),
        }
    }

    /// Failed result.
    pub fn failure(error: impl Into<ErrorCode>) -> Self {
        Self {
            outcome: Outcome::Error(error.into()),
        }
    }

    /// The value, if the invocation succeeded.
    pub fn value(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Value(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }

    /// The error, if the invocation failed.
    pub fn error(&self) -> Option<&ErrorCode> {
        match &self.outcome {
            Outcome::Value(_) => None,
            Outcome::Error(e) => Some(e),
        }
    }

    /// Returns `true` on success.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Value(_))
    }

    /// Returns `true` on failure.
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Raise the carried error, or hand the result back unchanged.
    pub fn throw_exception_if_error(self) -> Result<Self, ApiError> {
        match self.outcome {
            Outcome::Error(error) => Err(ApiError::from(error)),
            outcome @ Outcome::Value(_) => Ok(Self { outcome }),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self.outcome {
            Outcome::Value(v) => Ok(v),
            Outcome::Error(e) => Err(ApiError::from(e)),
        }
    }

    /// Transform the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self.outcome {
            Outcome::Value(v) => ActionResult::success(f(v)),
            Outcome::Error(e) => ActionResult::failure(e),
        }
    }
}

impl<T: DeserializeOwned + Default> ActionResult<T> {
    /// Adapt the invoker's raw outcome into a typed result.
    ///
    /// An absent body, `null`, or a body that decodes to nothing still
    /// yields a default-valued `T`: a declared success is never empty.
    /// A body that fails to decode becomes a `CLIENT.DECODE` error.
    pub fn from_raw(raw: Result<Option<Value>, InvokeError>) -> Self {
        match raw {
            Err(err) => {
                debug!(code = err.code(), category = err.category(), "invocation failed");
                Self::failure(err)
            }
            Ok(None) => Self::success(T::default()),
            Ok(Some(body)) => match serde_json::from_value::<Option<T>>(body) {
                Ok(value) => Self::success(value.unwrap_or_default()),
                Err(e) => Self::failure(InvokeError::Decode(e.to_string())),
            },
        }
    }
}

impl<T> From<ActionResult<T>> for Result<T, ErrorCode> {
    fn from(result: ActionResult<T>) -> Self {
        match result.outcome {
            Outcome::Value(v) => Ok(v),
            Outcome::Error(e) => Err(e),
        }
    }
}
