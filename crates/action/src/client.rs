//! Caller-facing entry point.

use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action::Action;
use crate::config::{ClientConfig, ConfigError};
use crate::dispatch::{PendingResult, dispatch};
use crate::invoker::ActionInvoker;
use crate::result::ActionResult;
use crate::transport::Transport;

/// Errors raised while building a [`Client`].
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The worker runtime could not be started.
    #[error("cannot start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Invokes actions over a [`Transport`].
///
/// Three ways to call, all backed by the same dispatch path and therefore
/// the same validation and error mapping:
///
/// - [`call`](Self::call) blocks the calling thread;
/// - [`call_with`](Self::call_with) returns at once and hands the result to
///   a completion on a worker thread;
/// - [`submit`](Self::submit) returns a [`PendingResult`] to await or wait on.
///
/// Cloning is cheap; clones share the transport and worker runtime.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    invoker: Arc<ActionInvoker>,
    handle: Handle,
    runtime: Option<Runtime>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            // Tasks still in flight are dropped; their completions fire with
            // an internal error.
            runtime.shutdown_background();
        }
    }
}

impl Client {
    /// Start building a client over `transport`.
    pub fn builder(transport: impl Transport) -> ClientBuilder {
        ClientBuilder {
            transport: Arc::new(transport),
            config: ClientConfig::default(),
            handle: None,
            worker_threads: None,
        }
    }

    /// Client with default configuration and its own worker runtime.
    pub fn new(transport: impl Transport) -> Result<Self, ClientBuildError> {
        Self::builder(transport).build()
    }

    /// Effective configuration.
    pub fn config(&self) -> &ClientConfig {
        self.inner.invoker.config()
    }

    /// The invoker shared by every call path.
    pub fn invoker(&self) -> &ActionInvoker {
        &self.inner.invoker
    }

    /// Invoke and block the calling thread until the result is available.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async runtime. Use
    /// [`call_async`](Self::call_async) there.
    pub fn call<A: Action>(&self, action: A) -> ActionResult<A::Output> {
        self.submit(action).wait()
    }

    /// Invoke without blocking; `completion` receives the result exactly
    /// once, on a worker thread.
    ///
    /// The returned token cancels the invocation at its next poll.
    pub fn call_with<A, F>(&self, action: A, completion: F) -> CancellationToken
    where
        A: Action,
        F: FnOnce(ActionResult<A::Output>) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        self.spawn(action, cancel.clone(), completion);
        cancel
    }

    /// Invoke without blocking and return a handle to the result.
    pub fn submit<A: Action>(&self, action: A) -> PendingResult<A::Output> {
        let (pending, completion) = PendingResult::channel();
        self.spawn(action, pending.cancellation_token().clone(), completion);
        pending
    }

    /// Invoke from async code.
    pub async fn call_async<A: Action>(&self, action: A) -> ActionResult<A::Output> {
        self.submit(action).await
    }

    fn spawn<A, F>(&self, action: A, cancel: CancellationToken, completion: F)
    where
        A: Action,
        F: FnOnce(ActionResult<A::Output>) + Send + 'static,
    {
        debug!(action = A::spec().name, "dispatching");
        dispatch(
            Arc::clone(&self.inner.invoker),
            &self.inner.handle,
            action,
            cancel,
            completion,
        );
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("invoker", &self.inner.invoker)
            .field("owns_runtime", &self.inner.runtime.is_some())
            .finish()
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    handle: Option<Handle>,
    worker_threads: Option<usize>,
}

impl ClientBuilder {
    /// Use `config` instead of the defaults.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Run invocations on an existing runtime instead of starting one.
    ///
    /// Blocking calls then need that runtime to be driven by other threads,
    /// so a multi-thread runtime is the usual choice.
    #[must_use]
    pub fn handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Worker thread count for an owned runtime.
    #[must_use]
    pub fn worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = Some(n);
        self
    }

    /// Validate the configuration and start the client.
    pub fn build(self) -> Result<Client, ClientBuildError> {
        self.config.validate()?;

        let (handle, runtime) = if let Some(handle) = self.handle {
            (handle, None)
        } else {
            let mut builder = Builder::new_multi_thread();
            builder.enable_all().thread_name("zsdk-worker");
            if let Some(n) = self.worker_threads {
                builder.worker_threads(n.max(1));
            }
            let runtime = builder.build()?;
            (runtime.handle().clone(), Some(runtime))
        };

        Ok(Client {
            inner: Arc::new(Inner {
                invoker: Arc::new(ActionInvoker::new(self.transport, self.config)),
                handle,
                runtime,
            }),
        })
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("handle", &self.handle.is_some())
            .field("worker_threads", &self.worker_threads)
            .finish_non_exhaustive()
    }
}
