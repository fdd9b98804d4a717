//! Promise/future primitive for strand
//!
//! A [`Promise`] and a [`Future`] are the write and read sides of one
//! single-assignment value cell:
//! - The promise fulfills the cell exactly once, from any thread
//! - The future attaches exactly one continuation, queries readiness and
//!   requests cancellation
//! - Cancellation is advisory: `Future::raise` only reaches the interrupt
//!   handler the producer registered with `Promise::set_interrupt_handler`
//!
//! Continuations run synchronously: on the fulfilling thread if attached
//! first, on the attaching thread if the cell was already fulfilled.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cell;
pub mod future;
pub mod interrupt;
pub mod promise;

pub use future::{make_error_future, make_future, make_outcome_future, Future};
pub use interrupt::InterruptHandle;
pub use promise::{contract, Promise};

pub use strand_core::{Error, FutureError, Outcome, Result};
