//! Core types for strand
//!
//! This crate defines the vocabulary shared by the promise/future primitive
//! and the loop combinators built on it:
//! - [`Error`]: the type-erased failure payload a future resolves with
//! - [`Outcome`]: value-or-error, the thing a value cell is fulfilled with
//! - [`FutureError`]: misuse and lifecycle errors raised by the primitive itself
//! - [`LoopId`]: identifier used to correlate log events of one loop run

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, FutureError, Outcome, Result};
pub use types::LoopId;
