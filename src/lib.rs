//! # Strand
//!
//! Non-blocking loop combinators over a minimal promise/future primitive.
//!
//! Strand lets a caller say "repeat this asynchronous step while a predicate
//! holds" without parking a thread for the duration of the loop. Each
//! iteration is a [`Future`] that some other party (a worker pool, a
//! network callback, a timer) eventually fulfills through its [`Promise`];
//! the loop advances from that fulfillment.
//!
//! ## Quick Start
//!
//! ```
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//! use strand::prelude::*;
//!
//! let pending: Arc<Mutex<Vec<Promise<()>>>> = Arc::default();
//! let queue = Arc::clone(&pending);
//!
//! let mut passes = 0;
//! let done = while_do(
//!     move || {
//!         passes += 1;
//!         passes <= 2
//!     },
//!     move || {
//!         let (promise, future) = contract();
//!         queue.lock().push(promise);
//!         future
//!     },
//! );
//!
//! // Somebody else completes the iterations, in order
//! for _ in 0..2 {
//!     let promise = pending.lock().remove(0);
//!     promise.set_value(()).unwrap();
//! }
//! assert!(done.is_ready());
//! ```
//!
//! ## Crates
//!
//! - `strand-core`: [`Error`], [`Outcome`], [`FutureError`], [`LoopId`]
//! - `strand-future`: [`Promise`], [`Future`], [`InterruptHandle`]
//! - `strand-combinator`: [`while_do`], [`times`], [`when`], [`LoopConfig`]

#![warn(missing_docs)]

pub mod prelude;

// Re-export core types
pub use strand_core::{Error, FutureError, LoopId, Outcome, Result};

// Re-export the primitive
pub use strand_future::{
    contract, make_error_future, make_future, make_outcome_future, Future, InterruptHandle,
    Promise,
};

// Re-export combinators
pub use strand_combinator::{times, when, while_do, while_do_with, LoopConfig};
