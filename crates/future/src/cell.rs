//! Single-assignment value cell shared by a promise and its future
//!
//! ## Phases
//!
//! ```text
//!            set_result               set_callback
//!   Start ──────────────▶ OnlyResult ──────────────▶ Done
//!     │                                                ▲
//!     │ set_callback                    set_result     │
//!     └──────────────────▶ OnlyCallback ───────────────┘
//! ```
//!
//! Whichever side arrives second runs the callback, after releasing the
//! lock. Completing the cell discards the interrupt handler and any
//! buffered interrupt.
//!
//! ## Interrupts
//!
//! At most one interrupt request is buffered. A request is consumed by the
//! first handler it is delivered to. Handlers run outside the lock; while a
//! handler runs its slot is empty, so a concurrent `raise` is buffered and
//! picked up when the handler is reinstalled. Every registration bumps a
//! generation counter; a handler that was replaced while it ran is not
//! reinstalled.

use parking_lot::Mutex;
use strand_core::{Error, FutureError, Outcome, Result};
use tracing::trace;

/// Continuation invoked with the cell's outcome
pub(crate) type Callback<T> = Box<dyn FnOnce(Outcome<T>) + Send + 'static>;

/// Handler invoked with each delivered interrupt request
pub(crate) type InterruptHandler = Box<dyn FnMut(Error) + Send + 'static>;

enum Phase<T> {
    Start,
    OnlyResult(Outcome<T>),
    OnlyCallback(Callback<T>),
    Done,
}

struct State<T> {
    phase: Phase<T>,
    interrupt_handler: Option<InterruptHandler>,
    /// Bumped by every `set_interrupt_handler`
    handler_generation: u64,
    interrupt: Option<Error>,
}

impl<T> State<T> {
    fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::OnlyResult(_) | Phase::Done)
    }
}

/// Shared state behind one `Promise`/`Future` pair
///
/// # Thread Safety
///
/// Every read and write of the phase, the continuation slot and the
/// interrupt slots happens under one mutex. User code (continuations,
/// interrupt handlers) never runs while it is held, so a continuation may
/// fulfill other promises or raise on other futures freely.
pub(crate) struct ValueCell<T> {
    state: Mutex<State<T>>,
}

impl<T: Send + 'static> ValueCell<T> {
    /// Create an empty cell
    pub(crate) fn new() -> Self {
        Self::with_phase(Phase::Start)
    }

    /// Create a cell that is already fulfilled
    pub(crate) fn with_result(outcome: Outcome<T>) -> Self {
        Self::with_phase(Phase::OnlyResult(outcome))
    }

    fn with_phase(phase: Phase<T>) -> Self {
        ValueCell {
            state: Mutex::new(State {
                phase,
                interrupt_handler: None,
                handler_generation: 0,
                interrupt: None,
            }),
        }
    }

    /// Fulfill the cell
    ///
    /// Runs the attached continuation, if any, on the calling thread.
    ///
    /// # Errors
    ///
    /// `FutureError::DoubleFulfillment` if the cell is already fulfilled.
    pub(crate) fn set_result(&self, outcome: Outcome<T>) -> Result<()> {
        let mut state = self.state.lock();
        let ready = match std::mem::replace(&mut state.phase, Phase::Done) {
            Phase::Start => {
                state.phase = Phase::OnlyResult(outcome);
                None
            }
            Phase::OnlyCallback(callback) => Some((callback, outcome)),
            previous @ (Phase::OnlyResult(_) | Phase::Done) => {
                state.phase = previous;
                return Err(FutureError::DoubleFulfillment);
            }
        };
        let handler = state.interrupt_handler.take();
        let interrupt = state.interrupt.take();
        drop(state);

        // Closures may capture anything; drop them unlocked
        drop(handler);
        drop(interrupt);

        if let Some((callback, outcome)) = ready {
            callback(outcome);
        }
        Ok(())
    }

    /// Attach the single continuation
    ///
    /// Runs it immediately on the calling thread if the cell is fulfilled.
    ///
    /// # Errors
    ///
    /// `FutureError::AlreadyHasContinuation` if a continuation was attached
    /// before.
    pub(crate) fn set_callback(&self, callback: Callback<T>) -> Result<()> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut state.phase, Phase::Done) {
            Phase::Start => {
                state.phase = Phase::OnlyCallback(callback);
                Ok(())
            }
            Phase::OnlyResult(outcome) => {
                drop(state);
                callback(outcome);
                Ok(())
            }
            previous @ (Phase::OnlyCallback(_) | Phase::Done) => {
                state.phase = previous;
                Err(FutureError::AlreadyHasContinuation)
            }
        }
    }

    /// Take the outcome if the cell is fulfilled and nothing consumed it yet
    pub(crate) fn take_result(&self) -> Option<Outcome<T>> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut state.phase, Phase::Done) {
            Phase::OnlyResult(outcome) => Some(outcome),
            previous => {
                state.phase = previous;
                None
            }
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.state.lock().is_complete()
    }

    /// Request cancellation
    ///
    /// Delivered synchronously if a handler is registered, buffered
    /// (replacing any earlier unconsumed request) otherwise. Ignored once
    /// the cell is fulfilled.
    pub(crate) fn raise(&self, error: Error) {
        let mut state = self.state.lock();
        if state.is_complete() {
            drop(state);
            trace!(error = %error, "interrupt ignored, cell already fulfilled");
            return;
        }
        match state.interrupt_handler.take() {
            Some(handler) => {
                let generation = state.handler_generation;
                drop(state);
                self.deliver(handler, generation, error);
            }
            None => {
                let replaced = state.interrupt.replace(error);
                drop(state);
                trace!(replaced = replaced.is_some(), "interrupt buffered");
            }
        }
    }

    /// Register the interrupt handler, replacing any earlier one
    ///
    /// A buffered request is delivered to the new handler right away.
    /// Ignored once the cell is fulfilled.
    pub(crate) fn set_interrupt_handler(&self, handler: InterruptHandler) {
        let mut state = self.state.lock();
        if state.is_complete() {
            drop(state);
            drop(handler);
            return;
        }
        state.handler_generation += 1;
        let generation = state.handler_generation;
        match state.interrupt.take() {
            Some(error) => {
                let previous = state.interrupt_handler.take();
                drop(state);
                drop(previous);
                self.deliver(handler, generation, error);
            }
            None => {
                let previous = state.interrupt_handler.replace(handler);
                drop(state);
                drop(previous);
            }
        }
    }

    /// Run `handler` with `error`, then with anything buffered meanwhile,
    /// then reinstall it
    ///
    /// `generation` is the registration `handler` belongs to. If a newer
    /// handler was registered while it ran, `handler` is dropped and the
    /// newer one keeps the slot (or keeps running elsewhere).
    fn deliver(&self, mut handler: InterruptHandler, generation: u64, mut error: Error) {
        loop {
            trace!(error = %error, "delivering interrupt");
            handler(error);

            let mut state = self.state.lock();
            if state.is_complete() || state.handler_generation != generation {
                // Fulfilled meanwhile, or superseded by a newer handler
                drop(state);
                drop(handler);
                return;
            }
            match state.interrupt.take() {
                Some(next) => error = next,
                None => {
                    state.interrupt_handler = Some(handler);
                    return;
                }
            }
        }
    }
}
