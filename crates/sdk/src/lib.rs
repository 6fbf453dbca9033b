//! # zsdk
//!
//! Client SDK for the ZStack management API.
//!
//! Build a [`Client`] over a [`Transport`], fill in an action, and call it:
//! blocking with [`Client::call`], with a completion through
//! [`Client::call_with`], or from async code with [`Client::call_async`].
//! Every path yields an [`ActionResult`] holding either the decoded value or
//! an [`ErrorCode`].
//!
//! ## Crates
//!
//! - [`zsdk_schema`]: parameter contracts and validation
//! - [`zsdk_action`]: the invocation engine
//! - [`log`]: logging setup

pub mod actions;
pub mod inventory;
pub mod types;

use std::sync::LazyLock;

pub use zsdk_action::{
    Action, ActionRegistry, ActionResult, ActionSpec, ApiError, Auth, CallOptions, Client,
    ClientBuildError, ClientBuilder, ClientConfig, ConfigError, Credentials, ErrorCode,
    HttpMethod, InvokeError, PendingResult, PollPolicy, RawRequest, RawResponse, RestDescriptor,
    SecureString, Transport, TransportError,
};
pub use zsdk_log as log;
pub use zsdk_schema::{ParameterSchema, ParameterSpec, ParameterValues, ValidationError};

static REGISTRY: LazyLock<ActionRegistry> = LazyLock::new(|| {
    let mut registry = ActionRegistry::new();
    registry
        .register::<actions::GetEipAttachableVmNicsAction>()
        .register::<actions::AttachEipAction>();
    registry
});

/// Every action this SDK ships, by name.
pub fn registry() -> &'static ActionRegistry {
    &REGISTRY
}

/// Convenience re-exports for SDK users.
pub mod prelude {
    pub use crate::actions::*;
    pub use zsdk_action::prelude::*;
}
