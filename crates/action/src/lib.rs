//! # zsdk Action
//!
//! The action-invocation contract of the zsdk client.
//!
//! An *action* is a typed, per-call request bound to one REST endpoint.
//! Invoking it runs the same pipeline whatever the calling style:
//!
//! 1. the action's fields are validated against its [`ParameterSchema`];
//! 2. credentials are checked when the endpoint needs a session;
//! 3. path placeholders are substituted and the remaining fields routed to
//!    the query or the body;
//! 4. the request goes through a [`Transport`];
//! 5. a `202` job handle is polled until the job finishes;
//! 6. the outcome is adapted into an [`ActionResult`] carrying exactly one of
//!    a value or an [`ErrorCode`].
//!
//! Steps 1 to 3 are local: when they fail, nothing is sent.
//!
//! ## Core Types
//!
//! - [`Action`]: trait implemented by every request type
//! - [`ActionSpec`] / [`RestDescriptor`]: static per-type descriptors
//! - [`Client`]: blocking, completion-based and awaitable entry points
//! - [`ActionInvoker`]: the shared invocation engine
//! - [`ActionResult`]: value-or-error outcome
//! - [`InvokeError`]: every local and remote failure, before adaptation
//! - [`Transport`]: port for the HTTP layer
//!
//! [`ParameterSchema`]: zsdk_schema::ParameterSchema

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// The action trait and per-call options.
pub mod action;
/// Caller-facing client and its builder.
pub mod client;
/// Client configuration and poll policy.
pub mod config;
/// Session and access-key credentials.
pub mod credentials;
/// Static REST descriptors.
pub mod descriptor;
/// Pending results and single-delivery completions.
pub mod dispatch;
/// Error codes and invocation errors.
pub mod error;
/// The invocation engine.
pub mod invoker;
/// Convenience re-exports for action authors.
pub mod prelude;
/// Descriptor catalogue.
pub mod registry;
mod request;
mod response;
/// Value-or-error invocation outcome.
pub mod result;
/// Transport port and raw request/response types.
pub mod transport;

// ── Public re-exports ───────────────────────────────────────────────────────

pub use action::{Action, CallOptions};
pub use client::{Client, ClientBuildError, ClientBuilder};
pub use config::{ClientConfig, ConfigError, PollPolicy};
pub use credentials::{Auth, Credentials, SecureString};
pub use descriptor::{ActionSpec, HttpMethod, RestDescriptor};
pub use dispatch::PendingResult;
pub use error::{ApiError, ErrorCode, InvokeError};
pub use invoker::ActionInvoker;
pub use registry::ActionRegistry;
pub use result::ActionResult;
pub use transport::{RawRequest, RawResponse, Transport, TransportError};

// Re-export schema types so action authors can declare parameters without
// depending on `zsdk-schema` directly.
pub use zsdk_schema::{ParameterSchema, ParameterSpec, ParameterValues, ValidationError};
