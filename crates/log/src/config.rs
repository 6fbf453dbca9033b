//! Logging configuration and presets

use serde::{Deserialize, Serialize};

/// Variable holding the filter directive; takes precedence over `RUST_LOG`.
pub const ENV_LOG: &str = "ZSDK_LOG";
/// Variable selecting the output format (`pretty`, `compact`, `json`).
pub const ENV_LOG_FORMAT: &str = "ZSDK_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter directive (e.g., "info", "zsdk_action=debug,warn")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Where events are written
    pub writer: Writer,

    /// Display options
    pub display: DisplayConfig,

    /// Keep a handle for changing the filter at runtime
    pub reloadable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::Info.to_string(),
            format: Format::Compact,
            writer: Writer::Stderr,
            display: DisplayConfig::default(),
            reloadable: false,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable, multi-line
    Pretty,
    /// Single line per event
    Compact,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

/// Output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Writer {
    /// Standard error
    Stderr,
    /// Standard output
    Stdout,
    /// libtest's captured output
    Test,
}

/// Display toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// ANSI colors
    pub colors: bool,
    /// Timestamps
    pub time: bool,
    /// Event target (module path)
    pub target: bool,
    /// Source file and line
    pub source: bool,
    /// Thread ids
    pub thread_ids: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: false,
            time: true,
            target: true,
            source: false,
            thread_ids: false,
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Trace level
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

impl Config {
    /// Defaults overridden by `ZSDK_LOG` (or `RUST_LOG`) and `ZSDK_LOG_FORMAT`.
    ///
    /// An unrecognised format falls back to compact.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LOG).or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.format = format.parse().unwrap_or(Format::Compact);
        }

        config
    }

    /// Whether either filter variable is set.
    pub(crate) fn env_configured() -> bool {
        std::env::var_os(ENV_LOG).is_some() || std::env::var_os("RUST_LOG").is_some()
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::Debug.to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: Level::Info.to_string(),
            format: Format::Json,
            ..Self::default()
        }
    }

    /// Test configuration (captured, no colors or timestamps)
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: Level::Trace.to_string(),
            format: Format::Compact,
            writer: Writer::Test,
            display: DisplayConfig {
                colors: false,
                time: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Replace the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Keep a reload handle in the guard.
    #[must_use]
    pub fn reloadable(mut self) -> Self {
        self.reloadable = true;
        self
    }
}
