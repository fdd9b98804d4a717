//! Read side of a value cell
//!
//! A [`Future`] never blocks inside the primitive. The ways to observe it:
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `set_callback` | attach the single raw continuation (`&self`) |
//! | `then_try` / `then` / `and_then` / `on_error` / `ensure` | consume and chain a new future |
//! | `is_ready` | non-blocking readiness query |
//! | `try_take` | non-blocking extraction |
//! | `wait` | blocking extraction, for the edge of the program |
//!
//! ## Interrupt Forwarding
//!
//! A chained future forwards `raise` to the future it was chained from, so
//! cancelling the tail of a chain reaches the producer at its head.

use crate::cell::ValueCell;
use crate::interrupt::InterruptHandle;
use crate::promise::{contract, Promise};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use strand_core::{Error, FutureError, Outcome, Result};
use tracing::error;

/// Consumer handle of a promise/future pair
pub struct Future<T> {
    cell: Arc<ValueCell<T>>,
}

/// Create a future that is already fulfilled with `value`
pub fn make_future<T: Send + 'static>(value: T) -> Future<T> {
    make_outcome_future(Ok(value))
}

/// Create a future that is already failed with `error`
pub fn make_error_future<T: Send + 'static>(error: impl Into<Error>) -> Future<T> {
    make_outcome_future(Err(error.into()))
}

/// Create a future that is already resolved with `outcome`
pub fn make_outcome_future<T: Send + 'static>(outcome: Outcome<T>) -> Future<T> {
    Future::from_cell(Arc::new(ValueCell::with_result(outcome)))
}

impl<T: Send + 'static> Future<T> {
    pub(crate) fn from_cell(cell: Arc<ValueCell<T>>) -> Self {
        Future { cell }
    }

    /// Attach the continuation
    ///
    /// `continuation` runs exactly once with the outcome: right now, on this
    /// thread, if the future is ready; otherwise on whichever thread
    /// fulfills the promise.
    ///
    /// # Errors
    ///
    /// `FutureError::AlreadyHasContinuation` if one is already attached;
    /// `continuation` is dropped without running.
    pub fn set_callback<F>(&self, continuation: F) -> Result<()>
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        self.cell.set_callback(Box::new(continuation))
    }

    /// Check if the promise has been fulfilled
    pub fn is_ready(&self) -> bool {
        self.cell.is_ready()
    }

    /// Request cancellation
    ///
    /// Advisory only: the producer's interrupt handler decides what, if
    /// anything, happens. If no handler is registered yet the request is
    /// kept until one is (only the most recent request is kept). Ignored
    /// once the future is ready.
    pub fn raise(&self, error: impl Into<Error>) {
        self.cell.raise(error.into());
    }

    /// Request cancellation with `FutureError::Cancelled`
    pub fn cancel(&self) {
        self.raise(FutureError::Cancelled);
    }

    /// Get a handle that can raise on this future without owning it
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle::new(&self.cell)
    }

    /// Take the outcome if the future is ready
    ///
    /// Returns the future back if it is not ready, or if its outcome was
    /// already handed to a continuation.
    pub fn try_take(self) -> std::result::Result<Outcome<T>, Self> {
        match self.cell.take_result() {
            Some(outcome) => Ok(outcome),
            None => Err(self),
        }
    }

    /// Block the calling thread until the future is ready
    ///
    /// Never called by the primitive or the combinators; meant for
    /// `main`, tests and other synchronous edges.
    pub fn wait(self) -> Outcome<T> {
        let baton = Arc::new((Mutex::new(None), Condvar::new()));
        let signal = Arc::clone(&baton);
        self.set_callback(move |outcome| {
            let (slot, ready) = &*signal;
            *slot.lock() = Some(outcome);
            ready.notify_one();
        })?;

        let (slot, ready) = &*baton;
        let mut guard = slot.lock();
        loop {
            if let Some(outcome) = guard.take() {
                return outcome;
            }
            ready.wait(&mut guard);
        }
    }

    /// Chain a continuation over the full outcome
    ///
    /// The returned future resolves with whatever `f` returns. Raising on
    /// it is forwarded to this future.
    pub fn then_try<U, F>(self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(Outcome<T>) -> Outcome<U> + Send + 'static,
    {
        let (promise, future) = contract::<U>();
        let upstream = self.interrupt_handle();
        promise.set_interrupt_handler(move |error| {
            upstream.raise(error);
        });

        let promise = Arc::new(promise);
        let fulfil = Arc::clone(&promise);
        self.chain(&promise, move |outcome| {
            let _ = fulfil.set_outcome(f(outcome));
        });
        future
    }

    /// Chain a continuation over the value; errors pass through unchanged
    pub fn then<U, F>(self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.then_try(move |outcome| outcome.map(f))
    }

    /// Chain a continuation that itself returns a future
    ///
    /// Raising on the returned future reaches this future until `f` has
    /// run, and the future `f` returned afterwards.
    pub fn and_then<U, F>(self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Future<U> + Send + 'static,
    {
        let (promise, future) = contract::<U>();
        let target = Arc::new(Mutex::new(self.interrupt_handle()));
        let forward = Arc::clone(&target);
        promise.set_interrupt_handler(move |error| {
            let handle = forward.lock().clone();
            handle.raise(error);
        });

        let promise = Arc::new(promise);
        let fulfil = Arc::clone(&promise);
        self.chain(&promise, move |outcome| match outcome {
            Ok(value) => {
                let inner = f(value);
                *target.lock() = inner.interrupt_handle();
                let relay = Arc::clone(&fulfil);
                inner.chain(&fulfil, move |outcome| {
                    let _ = relay.set_outcome(outcome);
                });
            }
            Err(e) => {
                let _ = fulfil.set_error(e);
            }
        });
        future
    }

    /// Recover from an error by mapping it to a value
    pub fn on_error<F>(self, f: F) -> Future<T>
    where
        F: FnOnce(Error) -> T + Send + 'static,
    {
        self.then_try(move |outcome| outcome.or_else(|e| Ok(f(e))))
    }

    /// Run `f` once the future resolves, either way, passing the outcome on
    pub fn ensure<F>(self, f: F) -> Future<T>
    where
        F: FnOnce() + Send + 'static,
    {
        self.then_try(move |outcome| {
            f();
            outcome
        })
    }

    /// Attach `continuation`, failing `promise` if this future already has one
    fn chain<U, F>(&self, promise: &Arc<Promise<U>>, continuation: F)
    where
        U: Send + 'static,
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        if let Err(e) = self.set_callback(continuation) {
            error!(error = %e, "cannot chain on a future that already has a continuation");
            let _ = promise.set_error(e);
        }
    }
}

impl<T: Send + 'static> fmt::Debug for Future<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Future")
            .field("ready", &self.is_ready())
            .finish()
    }
}
