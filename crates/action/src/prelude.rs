//! Convenience re-exports for action authors.
//!
//! ```rust
//! use zsdk_action::prelude::*;
//! ```

pub use crate::action::{Action, CallOptions};
pub use crate::client::Client;
pub use crate::credentials::Credentials;
pub use crate::descriptor::{ActionSpec, RestDescriptor};
pub use crate::error::{ApiError, ErrorCode, InvokeError};
pub use crate::result::ActionResult;

pub use zsdk_schema::{ParameterSchema, ParameterSpec};
