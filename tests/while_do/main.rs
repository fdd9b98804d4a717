//! while_do Integration Test Suite
//!
//! Drives loops the way a real producer would: every iteration parks its
//! promise in a shared queue, and the test (or a worker thread) completes
//! them one at a time.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test while_do
//! cargo test --test while_do interrupt::
//! ```

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use strand::prelude::*;

// Test modules
mod failure;
mod interrupt;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Named failure used as an iteration error
#[derive(Debug, thiserror::Error)]
#[error("eggs")]
pub struct Eggs;

/// Promises of iterations that have been started but not completed
pub type PromiseQueue = Arc<Mutex<VecDeque<Arc<Promise<()>>>>>;

/// Install a test-writer subscriber so loop events show up with --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Predicate that holds for the first three evaluations
///
/// The shared counter is incremented on every evaluation.
pub fn make_pred(evaluations: &Arc<AtomicUsize>) -> impl FnMut() -> bool + Send + 'static {
    let evaluations = Arc::clone(evaluations);
    move || evaluations.fetch_add(1, Ordering::SeqCst) < 3
}

/// Thunk that queues each iteration's promise and counts interrupts
pub fn make_thunk(
    queue: &PromiseQueue,
    interrupts: &Arc<AtomicUsize>,
) -> impl FnMut() -> Future<()> + Send + 'static {
    let queue = Arc::clone(queue);
    let interrupts = Arc::clone(interrupts);
    move || {
        let (promise, future) = contract();
        let interrupts = Arc::clone(&interrupts);
        promise.set_interrupt_handler(move |_| {
            interrupts.fetch_add(1, Ordering::SeqCst);
        });
        queue.lock().push_back(Arc::new(promise));
        future
    }
}

/// Take the oldest queued promise
pub fn pop_promise(queue: &PromiseQueue) -> Arc<Promise<()>> {
    queue
        .lock()
        .pop_front()
        .expect("an iteration should be in flight")
}

/// Complete the oldest queued iteration successfully
pub fn pop_and_fulfill(queue: &PromiseQueue) {
    pop_promise(queue).set_value(()).unwrap();
}

/// Flags set by the continuations a caller chains onto a loop
#[derive(Default)]
pub struct Observed {
    pub complete: AtomicBool,
    pub failure: AtomicBool,
}

impl Observed {
    pub fn complete(&self) -> bool {
        self.complete.load(Ordering::SeqCst)
    }

    pub fn failure(&self) -> bool {
        self.failure.load(Ordering::SeqCst)
    }
}

/// Chain `.then(complete = true).on_error(failure = true)` onto `future`
pub fn observe(future: Future<()>, observed: &Arc<Observed>) -> Future<()> {
    let on_value = Arc::clone(observed);
    let on_failure = Arc::clone(observed);
    future
        .then(move |()| on_value.complete.store(true, Ordering::SeqCst))
        .on_error(move |_| on_failure.failure.store(true, Ordering::SeqCst))
}
