use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::CallOptions;

/// Environment variable overriding [`ClientConfig::call_timeout`].
pub const ENV_CALL_TIMEOUT: &str = "ZSDK_CALL_TIMEOUT";
/// Environment variable overriding [`PollPolicy::interval`].
pub const ENV_POLL_INTERVAL: &str = "ZSDK_POLL_INTERVAL";
/// Environment variable overriding [`PollPolicy::timeout`].
pub const ENV_POLL_TIMEOUT: &str = "ZSDK_POLL_TIMEOUT";
/// Environment variable overriding [`PollPolicy::max_attempts`].
pub const ENV_POLL_MAX_ATTEMPTS: &str = "ZSDK_POLL_MAX_ATTEMPTS";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A value is outside its accepted range.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// An environment variable could not be parsed.
    #[error("cannot parse {var}=`{value}`: {reason}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// How a job handle is polled.
///
/// Fixed interval, no backoff. Polling stops at the first terminal state,
/// after `max_attempts` status requests, or once `timeout` has elapsed,
/// whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Delay before every status request.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Total polling budget.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Cap on status requests.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(60 * 60),
            max_attempts: 3600,
        }
    }
}

/// Client-wide invocation settings.
///
/// ```rust
/// use std::time::Duration;
/// use zsdk_action::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(
///     r#"{ "call_timeout": "5m", "poll": { "interval": "500ms" } }"#,
/// ).unwrap();
/// assert_eq!(config.call_timeout, Duration::from_secs(300));
/// assert_eq!(config.poll.interval, Duration::from_millis(500));
/// assert_eq!(config.poll.max_attempts, 3600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Upper bound on one whole invocation, polling included.
    #[serde(with = "humantime_serde")]
    pub call_timeout: Duration,
    /// Job polling policy.
    pub poll: PollPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(2 * 60 * 60),
            poll: PollPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `ZSDK_*` environment variables.
    ///
    /// Durations use humantime syntax (`30s`, `1h 30m`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(d) = parse_env_duration(ENV_CALL_TIMEOUT, lookup(ENV_CALL_TIMEOUT))? {
            self.call_timeout = d;
        }
        if let Some(d) = parse_env_duration(ENV_POLL_INTERVAL, lookup(ENV_POLL_INTERVAL))? {
            self.poll.interval = d;
        }
        if let Some(d) = parse_env_duration(ENV_POLL_TIMEOUT, lookup(ENV_POLL_TIMEOUT))? {
            self.poll.timeout = d;
        }
        if let Some(raw) = lookup(ENV_POLL_MAX_ATTEMPTS) {
            self.poll.max_attempts = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Env {
                    var: ENV_POLL_MAX_ATTEMPTS,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject zero durations and a zero attempt cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero = |field: &'static str| ConfigError::Invalid {
            field,
            reason: "must be greater than zero".into(),
        };
        if self.call_timeout.is_zero() {
            return Err(zero("call_timeout"));
        }
        if self.poll.interval.is_zero() {
            return Err(zero("poll.interval"));
        }
        if self.poll.timeout.is_zero() {
            return Err(zero("poll.timeout"));
        }
        if self.poll.max_attempts == 0 {
            return Err(zero("poll.max_attempts"));
        }
        Ok(())
    }

    /// Invocation timeout after applying per-call overrides.
    #[must_use]
    pub fn call_timeout_for(&self, options: &CallOptions) -> Duration {
        options.timeout.unwrap_or(self.call_timeout)
    }

    /// Poll policy after applying per-call overrides.
    #[must_use]
    pub fn poll_policy_for(&self, options: &CallOptions) -> PollPolicy {
        PollPolicy {
            interval: options.poll_interval.unwrap_or(self.poll.interval),
            timeout: options.poll_timeout.unwrap_or(self.poll.timeout),
            max_attempts: self.poll.max_attempts,
        }
    }
}

fn parse_env_duration(
    var: &'static str,
    raw: Option<String>,
) -> Result<Option<Duration>, ConfigError> {
    raw.map(|value| {
        humantime_serde::re::humantime::parse_duration(value.trim()).map_err(|e| ConfigError::Env {
            var,
            reason: e.to_string(),
            value,
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, (*v).to_owned())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll.interval, Duration::from_secs(1));
        assert_eq!(config.poll.timeout, Duration::from_secs(3600));
    }

    #[test]
    fn env_overrides_apply() {
        let config = ClientConfig::default()
            .with_overrides(lookup(&[
                (ENV_CALL_TIMEOUT, "10m"),
                (ENV_POLL_INTERVAL, "250ms"),
                (ENV_POLL_MAX_ATTEMPTS, " 12 "),
            ]))
            .unwrap();
        assert_eq!(config.call_timeout, Duration::from_secs(600));
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.poll.max_attempts, 12);
        assert_eq!(config.poll.timeout, PollPolicy::default().timeout);
    }

    #[test]
    fn bad_env_values_are_reported() {
        let err = ClientConfig::default()
            .with_overrides(lookup(&[(ENV_POLL_TIMEOUT, "forever")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_POLL_TIMEOUT, .. }));

        let err = ClientConfig::default()
            .with_overrides(lookup(&[(ENV_POLL_MAX_ATTEMPTS, "0")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "poll.max_attempts",
                reason: "must be greater than zero".into()
            }
        );
    }

    #[test]
    fn call_options_override_config() {
        let config = ClientConfig::default();
        let options = CallOptions::new()
            .with_timeout(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(10));

        assert_eq!(config.call_timeout_for(&options), Duration::from_secs(5));
        let policy = config.poll_policy_for(&options);
        assert_eq!(policy.interval, Duration::from_millis(10));
        assert_eq!(policy.timeout, config.poll.timeout);
        assert_eq!(config.call_timeout_for(&CallOptions::new()), config.call_timeout);
    }

    #[test]
    fn serde_round_trips_humantime() {
        let json = serde_json::to_value(ClientConfig::default()).unwrap();
        assert_eq!(json["call_timeout"], "2h");
        assert_eq!(json["poll"]["interval"], "1s");
    }
}
