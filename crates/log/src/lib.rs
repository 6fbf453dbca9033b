//! # zsdk Log
//!
//! Structured logging setup for zsdk applications and tests.
//!
//! The SDK crates only emit `tracing` events and spans; installing a
//! subscriber is left to the application. This crate provides the usual
//! setups in one call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! fn main() -> zsdk_log::LogResult<()> {
//!     // ZSDK_LOG / RUST_LOG if set, otherwise a build-profile preset
//!     let _guard = zsdk_log::auto_init()?;
//!
//!     zsdk_log::info!(endpoint = "https://zstack.local:8080", "client ready");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;

use std::sync::OnceLock;

pub use builder::{LoggerBuilder, LoggerGuard, ReloadHandle};
pub use config::{Config, DisplayConfig, ENV_LOG, ENV_LOG_FORMAT, Format, Level, Writer};
pub use error::{LogError, LogResult};

// Re-export tracing macros
pub use tracing::{debug, error, info, instrument, span, trace, warn};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Config, Level, LogResult, auto_init, debug, error, info, init, init_with, instrument,
        trace, warn,
    };

    pub use tracing::{Span, field};
}

static TEST_INIT: OnceLock<()> = OnceLock::new();

/// Initialize from the environment, or from a preset chosen by build profile.
///
/// `ZSDK_LOG` / `RUST_LOG` select [`Config::from_env`]; otherwise debug
/// builds get [`Config::development`] and release builds
/// [`Config::production`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    if Config::env_configured() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize for tests: output goes through libtest capture.
///
/// Safe to call from every test; only the first call in a process installs
/// a subscriber.
pub fn init_test() -> LoggerGuard {
    let mut installed = None;
    TEST_INIT.get_or_init(|| {
        if !tracing::dispatcher::has_been_set() {
            installed = init_with(Config::test()).ok();
        }
    });
    installed.unwrap_or_default()
}
