//! Marshals widget reads and writes onto the UI thread.
//!
//! A synchronous call enqueues the operation together with a one-shot result
//! slot, then blocks until the UI thread has filled the slot with a value or
//! a failure. Calls made from the UI thread itself run inline, so handlers
//! may nest dispatches without deadlocking.

use crate::errors::{RedDeerError, RedDeerResult};
use crate::platforms::DisplayEngine;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use tracing::{error, instrument, trace, warn};

#[derive(Clone)]
pub struct UiDispatcher {
    engine: Arc<dyn DisplayEngine>,
}

impl UiDispatcher {
    pub fn new(engine: Arc<dyn DisplayEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<dyn DisplayEngine> {
        &self.engine
    }

    /// Runs `operation` on the UI thread and blocks until its result is
    /// available.
    ///
    /// Failures returned by the operation are handed back unchanged; a panic
    /// is converted into [`RedDeerError::OperationPanicked`] carrying the
    /// panic message. Operations submitted from one thread execute in
    /// submission order.
    ///
    /// This blocks the calling thread. Async callers should go through
    /// [`crate::Locator`], which moves the call onto a blocking worker. If the
    /// UI thread hangs, the caller blocks with it.
    #[instrument(level = "trace", skip_all)]
    pub fn run_on_ui_thread<T, F>(&self, operation: F) -> RedDeerResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> RedDeerResult<T> + Send + 'static,
    {
        if self.engine.is_disposed() {
            return Err(RedDeerError::DisplayUnavailable(
                "display is disposed".to_string(),
            ));
        }
        if self.engine.is_ui_thread() {
            trace!("already on UI thread, running inline");
            return run_guarded(operation);
        }

        let (slot, result) = mpsc::sync_channel(1);
        self.engine.schedule(Box::new(move || {
            let outcome = run_guarded(operation);
            if slot.send(outcome).is_err() {
                warn!("caller stopped waiting for a UI operation result");
            }
        }))?;

        result.recv().map_err(|_| {
            RedDeerError::DisplayUnavailable(
                "UI thread dropped the operation before running it".to_string(),
            )
        })?
    }

    /// Queues `operation` on the UI thread and returns immediately.
    ///
    /// Nothing is known about completion when this returns; callers must not
    /// read state the operation produces without synchronizing first. A
    /// failure or panic inside the operation is logged, since no caller is
    /// left to receive it.
    #[instrument(level = "trace", skip_all)]
    pub fn post_on_ui_thread<F>(&self, operation: F) -> RedDeerResult<()>
    where
        F: FnOnce() -> RedDeerResult<()> + Send + 'static,
    {
        self.engine.schedule(Box::new(move || {
            if let Err(e) = run_guarded(operation) {
                error!("Asynchronous UI operation failed: {}", e);
            }
        }))
    }

    pub fn is_ui_thread(&self) -> bool {
        self.engine.is_ui_thread()
    }
}

fn run_guarded<T, F>(operation: F) -> RedDeerResult<T>
where
    F: FnOnce() -> RedDeerResult<T>,
{
    catch_unwind(AssertUnwindSafe(operation))
        .unwrap_or_else(|payload| Err(RedDeerError::OperationPanicked(panic_message(&payload))))
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
