use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use zsdk_schema::ParameterValues;

use crate::credentials::Credentials;
use crate::descriptor::ActionSpec;
use crate::error::InvokeError;

/// A typed request bound to one remote endpoint.
///
/// An action value is built fresh for every call and consumed by it. Its
/// serialized form (with `serde`) is the field map that gets validated
/// against [`ActionSpec::schema`] and routed into the request. Credentials
/// and [`CallOptions`] live beside the domain fields and must be excluded
/// from serialization (`#[serde(skip)]`).
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use zsdk_action::{Action, ActionSpec, Credentials, RestDescriptor};
/// use zsdk_schema::{ParameterSchema, ParameterSpec};
///
/// #[derive(Debug, Default, Deserialize)]
/// pub struct DeleteZoneResult {}
///
/// #[derive(Debug, Default, Serialize)]
/// #[serde(rename_all = "camelCase")]
/// pub struct DeleteZoneAction {
///     pub uuid: Option<String>,
///     #[serde(skip)]
///     pub credentials: Credentials,
/// }
///
/// static SPEC: ActionSpec = ActionSpec::new(
///     "DeleteZone",
///     RestDescriptor::delete("/zones/{uuid}"),
///     ParameterSchema::new(&[ParameterSpec::string("uuid").required().nonempty()]),
/// );
///
/// impl Action for DeleteZoneAction {
///     type Output = DeleteZoneResult;
///
///     fn spec() -> &'static ActionSpec {
///         &SPEC
///     }
///
///     fn credentials(&self) -> &Credentials {
///         &self.credentials
///     }
/// }
/// ```
pub trait Action: Serialize + Send + Sync + 'static {
    /// Value materialised on success. `Default` backs empty success bodies.
    type Output: DeserializeOwned + Default + Send + 'static;

    /// The static descriptor for this action type.
    fn spec() -> &'static ActionSpec;

    /// Credential fields of this instance.
    fn credentials(&self) -> &Credentials;

    /// Per-call overrides; none by default.
    fn options(&self) -> &CallOptions {
        &NO_OPTIONS
    }

    /// The instance's field values, keyed by wire name.
    fn values(&self) -> Result<ParameterValues, InvokeError> {
        let json = serde_json::to_value(self).map_err(|e| InvokeError::Encode(e.to_string()))?;
        ParameterValues::from_json(json)
            .ok_or_else(|| InvokeError::Encode("action must serialize to a JSON object".into()))
    }
}

static NO_OPTIONS: CallOptions = CallOptions::new();

/// Per-call overrides of the client configuration.
///
/// Not sent to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Upper bound on the whole invocation.
    pub timeout: Option<Duration>,
    /// Delay between job status polls.
    pub poll_interval: Option<Duration>,
    /// Upper bound on the time spent polling.
    pub poll_timeout: Option<Duration>,
}

impl CallOptions {
    /// No overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            poll_interval: None,
            poll_timeout: None,
        }
    }

    /// Override the invocation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Override the poll budget.
    #[must_use]
    pub const fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }
}
