//! Write side of a value cell
//!
//! A [`Promise`] is fulfilled exactly once, with a value or an error, from
//! any thread. All operations take `&self`, so a promise can be parked in
//! an `Arc` (or a queue of them) until whatever completes the work gets
//! to it.
//!
//! Dropping an unfulfilled promise fails its future with
//! [`FutureError::BrokenPromise`], so a consumer is never left waiting on a
//! producer that no longer exists.

use crate::cell::ValueCell;
use crate::future::Future;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strand_core::{Error, FutureError, Outcome, Result};
use tracing::{debug, error};

/// Producer handle of a promise/future pair
pub struct Promise<T: Send + 'static> {
    cell: Arc<ValueCell<T>>,
    retrieved: AtomicBool,
}

/// Create a connected promise/future pair
///
/// # Example
///
/// ```
/// use strand_future::contract;
///
/// let (promise, future) = contract::<u32>();
/// promise.set_value(42).unwrap();
/// assert_eq!(future.wait().unwrap(), 42);
/// ```
pub fn contract<T: Send + 'static>() -> (Promise<T>, Future<T>) {
    let promise = Promise::new();
    promise.retrieved.store(true, Ordering::Release);
    let future = Future::from_cell(Arc::clone(&promise.cell));
    (promise, future)
}

impl<T: Send + 'static> Promise<T> {
    /// Create an unfulfilled promise
    pub fn new() -> Self {
        Promise {
            cell: Arc::new(ValueCell::new()),
            retrieved: AtomicBool::new(false),
        }
    }

    /// Get the future connected to this promise
    ///
    /// # Errors
    ///
    /// `FutureError::FutureAlreadyRetrieved` on every call after the first.
    pub fn get_future(&self) -> Result<Future<T>> {
        if self.retrieved.swap(true, Ordering::AcqRel) {
            return Err(FutureError::FutureAlreadyRetrieved);
        }
        Ok(Future::from_cell(Arc::clone(&self.cell)))
    }

    /// Fulfill with a value
    ///
    /// See [`set_outcome`](Self::set_outcome).
    pub fn set_value(&self, value: T) -> Result<()> {
        self.set_outcome(Ok(value))
    }

    /// Fulfill with an error
    ///
    /// See [`set_outcome`](Self::set_outcome).
    pub fn set_error(&self, error: impl Into<Error>) -> Result<()> {
        self.set_outcome(Err(error.into()))
    }

    /// Fulfill with a value or an error
    ///
    /// If a continuation is attached to the future it runs synchronously,
    /// on this thread, before this call returns.
    ///
    /// # Errors
    ///
    /// `FutureError::DoubleFulfillment` if the promise was already
    /// fulfilled; the outcome passed in is discarded.
    pub fn set_outcome(&self, outcome: Outcome<T>) -> Result<()> {
        self.cell.set_result(outcome).map_err(|e| {
            error!(error = %e, "promise fulfilled more than once");
            e
        })
    }

    /// Register the handler invoked when the future is raised on
    ///
    /// If a request was raised before registration it is delivered to
    /// `handler` immediately. Registering again replaces the previous
    /// handler. Ignored once the promise is fulfilled.
    pub fn set_interrupt_handler<F>(&self, handler: F)
    where
        F: FnMut(Error) + Send + 'static,
    {
        self.cell.set_interrupt_handler(Box::new(handler));
    }

    /// Check if the promise has been fulfilled
    pub fn is_fulfilled(&self) -> bool {
        self.cell.is_ready()
    }
}

impl<T: Send + 'static> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Drop for Promise<T> {
    fn drop(&mut self) {
        if self.cell.is_ready() {
            return;
        }
        if self
            .cell
            .set_result(Err(FutureError::BrokenPromise.into()))
            .is_ok()
        {
            debug!("promise dropped unfulfilled");
        }
    }
}

impl<T: Send + 'static> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("fulfilled", &self.is_fulfilled())
            .finish()
    }
}
