//! Asynchronous while loop
//!
//! `while_do(pred, thunk)` returns a future that completes when `pred` first
//! returns false, or fails with the error of the first iteration that fails.
//!
//! ## Iteration Protocol
//!
//! ```text
//! 1. evaluate pred()              - synchronously, exactly once per pass
//! 2. IF false: fulfill result     - terminal, success
//! 3. future = thunk()             - exactly one iteration in flight
//! 4. on success: go to 1          - on the thread that fulfilled `future`
//! 5. on failure: fail result      - terminal, same error object
//! ```
//!
//! ## Stack Depth
//!
//! Step 4 does not call step 1 recursively. The loop is driven by a
//! trampoline: a continuation that fires while the driver is already
//! running (because `thunk` returned a ready future) only records that
//! another pass is due, and the running driver picks it up. A loop whose
//! iterations are all ready immediately runs in constant stack.
//!
//! ## Cancellation
//!
//! Raising on the returned future is forwarded to the iteration in flight
//! at that moment. The request is consumed by that iteration's cell; later
//! iterations never see it.
//!
//! ## Threading
//!
//! `pred` and `thunk` are never called concurrently with each other or
//! themselves. The first pass runs on the caller's thread. A later pass
//! runs on the thread that fulfilled the previous iteration, unless some
//! thread is still inside the driver at that moment; then that thread
//! runs it instead.

use crate::config::LoopConfig;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use strand_core::{Error, FutureError, Outcome};
use strand_future::{contract, Future, InterruptHandle, Promise};
use tracing::{debug, error, trace, warn};

/// Repeat `thunk` while `predicate` returns true
///
/// The first predicate evaluation (and the first `thunk` call, if any)
/// happens before this function returns.
///
/// # Panics
///
/// A panic in `predicate` or `thunk` is not caught; it unwinds through
/// whichever call drove the loop (this function, or the fulfillment of an
/// iteration's promise) and the loop is abandoned.
///
/// # Example
///
/// ```
/// use strand_combinator::while_do;
/// use strand_future::make_future;
///
/// let mut remaining = 3;
/// let done = while_do(
///     move || {
///         remaining -= 1;
///         remaining >= 0
///     },
///     || make_future(()),
/// );
/// assert!(done.is_ready());
/// ```
pub fn while_do<P, F>(predicate: P, thunk: F) -> Future<()>
where
    P: FnMut() -> bool + Send + 'static,
    F: FnMut() -> Future<()> + Send + 'static,
{
    while_do_with(LoopConfig::default(), predicate, thunk)
}

/// [`while_do`] with an explicit [`LoopConfig`]
pub fn while_do_with<P, F>(config: LoopConfig, predicate: P, thunk: F) -> Future<()>
where
    P: FnMut() -> bool + Send + 'static,
    F: FnMut() -> Future<()> + Send + 'static,
{
    let (result, future) = contract();
    let driver = Arc::new(LoopDriver {
        config,
        predicate: Mutex::new(predicate),
        thunk: Mutex::new(thunk),
        result,
        in_flight: Mutex::new(None),
        trampoline: Mutex::new(Trampoline::default()),
        iterations: AtomicU64::new(0),
    });

    let weak: Weak<LoopDriver<P, F>> = Arc::downgrade(&driver);
    driver.result.set_interrupt_handler(move |error| {
        if let Some(driver) = weak.upgrade() {
            driver.forward_interrupt(error);
        }
    });

    debug!(
        loop_id = %driver.config.id(),
        loop_name = driver.config.name(),
        "loop started"
    );
    driver.resume();
    future
}

/// Re-entrancy guard for the driver
#[derive(Debug, Default)]
struct Trampoline {
    /// A `resume` call is executing passes on some stack
    running: bool,
    /// An iteration succeeded while `running`; one more pass is due
    resume_requested: bool,
}

/// Run-state of one loop
///
/// Kept alive by the continuation of the iteration in flight. The result
/// promise's interrupt handler only holds a `Weak` reference.
struct LoopDriver<P, F> {
    config: LoopConfig,
    predicate: Mutex<P>,
    thunk: Mutex<F>,
    result: Promise<()>,
    /// Interrupt target of the current iteration
    in_flight: Mutex<Option<InterruptHandle>>,
    trampoline: Mutex<Trampoline>,
    iterations: AtomicU64,
}

impl<P, F> LoopDriver<P, F>
where
    P: FnMut() -> bool + Send + 'static,
    F: FnMut() -> Future<()> + Send + 'static,
{
    /// Run passes until the loop waits on an iteration or terminates
    fn resume(self: &Arc<Self>) {
        {
            let mut trampoline = self.trampoline.lock();
            if trampoline.running {
                trampoline.resume_requested = true;
                return;
            }
            trampoline.running = true;
        }

        loop {
            self.step();

            let mut trampoline = self.trampoline.lock();
            if trampoline.resume_requested {
                trampoline.resume_requested = false;
                continue;
            }
            trampoline.running = false;
            return;
        }
    }

    /// One pass: evaluate the predicate, then start an iteration or finish
    fn step(self: &Arc<Self>) {
        let proceed = {
            let mut predicate = self.predicate.lock();
            (*predicate)()
        };
        if !proceed {
            debug!(
                loop_id = %self.config.id(),
                loop_name = self.config.name(),
                iterations = self.iterations.load(Ordering::Relaxed),
                "loop completed"
            );
            self.finish(Ok(()));
            return;
        }

        let iteration = self.iterations.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(
            loop_id = %self.config.id(),
            loop_name = self.config.name(),
            iteration,
            "iteration started"
        );

        let future = {
            let mut thunk = self.thunk.lock();
            (*thunk)()
        };
        *self.in_flight.lock() = Some(future.interrupt_handle());

        let driver = Arc::clone(self);
        let attached = future.set_callback(move |outcome| match outcome {
            Ok(()) => driver.resume(),
            Err(error) => {
                if FutureError::find(&error).is_some_and(|e| e.is_broken_promise()) {
                    warn!(
                        loop_id = %driver.config.id(),
                        loop_name = driver.config.name(),
                        iteration,
                        "iteration promise dropped unfulfilled"
                    );
                }
                debug!(
                    loop_id = %driver.config.id(),
                    loop_name = driver.config.name(),
                    iteration,
                    error = %error,
                    "iteration failed"
                );
                driver.finish(Err(error));
            }
        });
        if let Err(e) = attached {
            error!(
                loop_id = %self.config.id(),
                loop_name = self.config.name(),
                iteration,
                error = %e,
                "iteration future already has a continuation"
            );
            self.finish(Err(e.into()));
        }
    }

    fn finish(&self, outcome: Outcome<()>) {
        self.in_flight.lock().take();
        // A failed fulfillment is already logged by the promise
        let _ = self.result.set_outcome(outcome);
    }

    /// Hand a cancellation request to the iteration in flight
    fn forward_interrupt(&self, error: Error) {
        let target = self.in_flight.lock().clone();
        match target {
            Some(handle) => {
                trace!(
                    loop_id = %self.config.id(),
                    loop_name = self.config.name(),
                    error = %error,
                    "forwarding interrupt to iteration in flight"
                );
                handle.raise(error);
            }
            None => trace!(
                loop_id = %self.config.id(),
                loop_name = self.config.name(),
                "no iteration in flight, interrupt dropped"
            ),
        }
    }
}
