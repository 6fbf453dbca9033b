use std::sync::Arc;

use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

use crate::action::Action;
use crate::config::{ClientConfig, PollPolicy};
use crate::error::InvokeError;
use crate::request::build_request;
use crate::response::{Reply, classify};
use crate::transport::{RawRequest, Transport};

/// Runs one action invocation end to end.
///
/// Order of operations: schema validation, credential check, path and
/// payload resolution, transport round-trip, then (for polled actions) the
/// poll loop. Everything before the round-trip is local; a failure there
/// means the transport is never called.
///
/// Shared by the blocking and non-blocking paths of
/// [`Client`](crate::Client), which only differ in how the outcome is
/// delivered.
#[derive(Clone)]
pub struct ActionInvoker {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl ActionInvoker {
    /// Create an invoker over a transport.
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Effective configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Local checks and request resolution, without touching the network.
    pub fn prepare<A: Action>(&self, action: &A) -> Result<RawRequest, InvokeError> {
        let spec = A::spec();
        let values = spec.schema.validate(&action.values()?)?;

        let credentials = action.credentials();
        if spec.rest.need_session && credentials.auth().is_none() {
            return Err(InvokeError::AuthenticationRequired { action: spec.name });
        }

        build_request(spec, values, credentials)
    }

    /// Invoke `action` and return the terminal response body.
    ///
    /// The whole invocation, polling included, is bounded by the call
    /// timeout. `cancel` is observed before every poll.
    #[instrument(skip_all, fields(action = A::spec().name))]
    pub async fn invoke<A: Action>(
        &self,
        action: &A,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, InvokeError> {
        let timeout = self.config.call_timeout_for(action.options());
        if let Ok(outcome) = tokio::time::timeout(timeout, self.run(action, cancel)).await {
            outcome
        } else {
            warn!(?timeout, "invocation timed out");
            Err(InvokeError::Timeout(timeout))
        }
    }

    async fn run<A: Action>(
        &self,
        action: &A,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, InvokeError> {
        let rest = &A::spec().rest;
        let request = self.prepare(action)?;
        let origin = rest.need_poll.then(|| request.clone());

        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.send(request).await?;

        match (classify(response)?, origin) {
            (Reply::Done(body), _) => Ok(body),
            (Reply::Accepted(location), Some(origin)) => {
                let policy = self.config.poll_policy_for(action.options());
                self.poll(&origin, location, policy, cancel).await
            }
            (Reply::Accepted(location), None) => Err(InvokeError::Decode(format!(
                "unexpected job handle `{location}` for an unpolled action"
            ))),
        }
    }

    /// Poll a job location until it succeeds, fails, or the budget runs out.
    async fn poll(
        &self,
        origin: &RawRequest,
        mut location: String,
        policy: PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, InvokeError> {
        let started = Instant::now();
        let deadline = started + policy.timeout;
        let mut attempts = 0_u32;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if attempts >= policy.max_attempts || remaining.is_zero() {
                warn!(%location, attempts, "job did not finish within the poll budget");
                return Err(InvokeError::PollTimeout {
                    location,
                    attempts,
                    elapsed: started.elapsed(),
                });
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(%location, attempts, "polling cancelled");
                    return Err(InvokeError::Cancelled);
                }
                () = tokio::time::sleep(policy.interval.min(remaining)) => {}
            }

            attempts += 1;
            let request = RawRequest::poll(&location, origin);
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Ok(response) = tokio::time::timeout(remaining, self.transport.send(request)).await
            else {
                continue;
            };

            match classify(response?)? {
                Reply::Done(body) => {
                    debug!(attempts, "job finished");
                    return Ok(body);
                }
                Reply::Accepted(next) => {
                    trace!(attempts, "job still running");
                    location = next;
                }
            }
        }
    }
}

impl std::fmt::Debug for ActionInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionInvoker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
