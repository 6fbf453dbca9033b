//! Non-blocking delivery of invocation results.
//!
//! Every call, blocking or not, goes through [`dispatch`]: the invocation is
//! spawned on a worker runtime and its [`ActionResult`] is handed to a
//! single-use completion. [`PendingResult`] is that completion wired to a
//! oneshot channel, which gives the awaitable and the blocking disciplines.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug_span, error};

use crate::action::Action;
use crate::error::InvokeError;
use crate::invoker::ActionInvoker;
use crate::result::ActionResult;

type Completion<T> = Box<dyn FnOnce(ActionResult<T>) + Send>;

/// Holds a completion until it fires; fires it with an error if dropped
/// unfired.
///
/// The invocation task owns the guard. If the runtime drops the task
/// (shutdown, or a spawn after shutdown) the drop path still delivers, so a
/// caller is never left waiting.
struct Delivery<T> {
    completion: Option<Completion<T>>,
}

impl<T> Delivery<T> {
    fn new(completion: impl FnOnce(ActionResult<T>) + Send + 'static) -> Self {
        Self {
            completion: Some(Box::new(completion)),
        }
    }

    fn complete(mut self, result: ActionResult<T>) {
        if let Some(completion) = self.completion.take() {
            completion(result);
        }
    }
}

impl<T> Drop for Delivery<T> {
    fn drop(&mut self) {
        if let Some(completion) = self.completion.take() {
            completion(ActionResult::failure(InvokeError::Internal(
                "invocation was dropped before it completed".into(),
            )));
        }
    }
}

/// Spawn `action` on `handle` and hand its result to `completion` exactly
/// once.
///
/// The completion runs on the worker that finished the invocation.
pub(crate) fn dispatch<A, F>(
    invoker: Arc<ActionInvoker>,
    handle: &Handle,
    action: A,
    cancel: CancellationToken,
    completion: F,
) where
    A: Action,
    F: FnOnce(ActionResult<A::Output>) + Send + 'static,
{
    let delivery = Delivery::new(completion);
    let span = debug_span!("dispatch", action = A::spec().name);

    let task = async move {
        let raw = AssertUnwindSafe(invoker.invoke(&action, &cancel))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let message = panic_message(panic.as_ref());
                error!(%message, "invocation panicked");
                Err(InvokeError::Internal(format!("invocation panicked: {message}")))
            });
        delivery.complete(ActionResult::from_raw(raw));
    };

    drop(handle.spawn(task.instrument(span)));
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned())
}

/// Result of a submitted invocation that has not been consumed yet.
///
/// Await it from async code, or [`wait`](Self::wait) for it from a plain
/// thread. Either way it resolves exactly once, to exactly one of a value or
/// an error.
#[must_use = "a pending result does nothing unless awaited or waited on"]
#[derive(Debug)]
pub struct PendingResult<T> {
    rx: oneshot::Receiver<ActionResult<T>>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> PendingResult<T> {
    pub(crate) fn channel() -> (Self, impl FnOnce(ActionResult<T>) + Send + 'static) {
        let (tx, rx) = oneshot::channel();
        let pending = Self {
            rx,
            cancel: CancellationToken::new(),
        };
        let completion = move |result: ActionResult<T>| {
            // The receiver may be gone; that caller no longer wants the result.
            let _ = tx.send(result);
        };
        (pending, completion)
    }
}

impl<T> PendingResult<T> {
    /// Token observed by the invocation's poll loop.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Ask the invocation to stop at its next poll.
    ///
    /// The result still arrives, as a `CLIENT.CANCELLED` error unless the
    /// invocation had already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block the current thread until the result is available.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async runtime; await the pending
    /// result there instead.
    pub fn wait(self) -> ActionResult<T> {
        self.rx.blocking_recv().unwrap_or_else(|_| lost())
    }
}

impl<T> Future for PendingResult<T> {
    type Output = ActionResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| lost()))
    }
}

fn lost<T>() -> ActionResult<T> {
    ActionResult::failure(InvokeError::Internal(
        "invocation ended without delivering a result".into(),
    ))
}
