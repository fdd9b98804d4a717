//! Loop combinators for strand futures
//!
//! - [`while_do`]: repeat an asynchronous step while a predicate holds
//! - [`times`]: repeat an asynchronous step a fixed number of times
//! - [`when`]: run an asynchronous step only if a condition holds
//!
//! None of these block a thread. Between iterations nothing runs: the next
//! step is started by the continuation of the previous iteration's future,
//! on whichever thread fulfilled it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod repeat;
pub mod while_do;

pub use config::LoopConfig;
pub use repeat::{times, when};
pub use while_do::{while_do, while_do_with};
