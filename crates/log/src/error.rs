//! Error types for logger setup

/// Result alias for logging operations.
pub type LogResult<T> = Result<T, LogError>;

/// Logger setup failures.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The filter directive could not be parsed.
    #[error("invalid filter `{filter}`: {reason}")]
    Filter {
        /// The rejected directive.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),

    /// Swapping the filter at runtime failed.
    #[error("cannot reload filter: {0}")]
    Reload(String),
}

impl LogError {
    pub(crate) fn filter(filter: &str, reason: impl ToString) -> Self {
        Self::Filter {
            filter: filter.to_owned(),
            reason: reason.to_string(),
        }
    }
}
