//! Logger builder implementation

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::Subscriber;
use tracing_subscriber::fmt::TestWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{Config, Format, Writer};
use crate::error::{LogError, LogResult};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps logger resources alive.
///
/// Holds the reload handle when the logger was built reloadable.
#[derive(Debug, Default)]
pub struct LoggerGuard {
    reload: Option<ReloadHandle>,
}

impl LoggerGuard {
    /// Guard for a logger somebody else installed.
    #[must_use]
    pub fn noop() -> Self {
        Self::default()
    }

    /// Runtime filter control, if the logger is reloadable.
    pub fn reload_handle(&self) -> Option<&ReloadHandle> {
        self.reload.as_ref()
    }
}

/// Handle for changing the filter at runtime
#[derive(Clone)]
pub struct ReloadHandle {
    filter: tracing_subscriber::reload::Handle<EnvFilter, Registry>,
    current: Arc<ArcSwap<String>>,
}

impl ReloadHandle {
    /// Replace the active filter directive.
    ///
    /// # Errors
    ///
    /// Returns an error if the directive does not parse or the subscriber
    /// is gone.
    pub fn reload(&self, directive: &str) -> LogResult<()> {
        let filter = EnvFilter::try_new(directive).map_err(|e| LogError::filter(directive, e))?;
        self.filter
            .reload(filter)
            .map_err(|e| LogError::Reload(e.to_string()))?;
        self.current.store(Arc::new(directive.to_owned()));
        Ok(())
    }

    /// The active filter directive.
    pub fn current_filter(&self) -> Arc<String> {
        self.current.load_full()
    }
}

impl std::fmt::Debug for ReloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadHandle")
            .field("current", &self.current.load_full())
            .finish_non_exhaustive()
    }
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the filter directive cannot be parsed
    /// - a global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::filter(&self.config.level, e))?;

        let (filter_layer, reload) = filter_layer(filter, &self.config);

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer(&self.config))
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        Ok(LoggerGuard { reload })
    }
}

fn filter_layer(
    filter: EnvFilter,
    config: &Config,
) -> (BoxedLayer<Registry>, Option<ReloadHandle>) {
    if config.reloadable {
        let (layer, handle) = tracing_subscriber::reload::Layer::new(filter);
        let reload = ReloadHandle {
            filter: handle,
            current: Arc::new(ArcSwap::from_pointee(config.level.clone())),
        };
        (Box::new(layer), Some(reload))
    } else {
        (Box::new(filter), None)
    }
}

fn make_writer(writer: Writer) -> BoxMakeWriter {
    match writer {
        Writer::Stderr => BoxMakeWriter::new(std::io::stderr),
        Writer::Stdout => BoxMakeWriter::new(std::io::stdout),
        Writer::Test => BoxMakeWriter::new(TestWriter::default()),
    }
}

fn fmt_layer<S>(config: &Config) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let display = &config.display;
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(make_writer(config.writer))
        .with_ansi(display.colors)
        .with_target(display.target)
        .with_file(display.source)
        .with_line_number(display.source)
        .with_thread_ids(display.thread_ids);

    match (config.format, display.time) {
        (Format::Pretty, true) => layer.pretty().boxed(),
        (Format::Pretty, false) => layer.pretty().without_time().boxed(),
        (Format::Compact, true) => layer.compact().boxed(),
        (Format::Compact, false) => layer.compact().without_time().boxed(),
        (Format::Json, true) => layer.json().flatten_event(true).boxed(),
        (Format::Json, false) => layer.json().flatten_event(true).without_time().boxed(),
    }
}
