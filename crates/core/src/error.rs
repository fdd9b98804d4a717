//! Error types for the future primitive
//!
//! Two kinds of errors flow through strand:
//!
//! - **Payload errors** ([`Error`]): whatever a producer fails a promise with.
//!   They travel through futures unchanged, so a consumer can recover the
//!   concrete type with [`anyhow::Error::downcast_ref`].
//! - **Primitive errors** ([`FutureError`]): raised by the primitive itself when
//!   it is misused (double fulfillment, double continuation) or when a
//!   producer disappears without fulfilling.
//!
//! A [`FutureError`] converts into an [`Error`], so it can also be delivered
//! through a future (e.g. [`FutureError::BrokenPromise`]).

use thiserror::Error;

/// Failure payload carried by a future
///
/// Type-erased so that a loop can forward an iteration's error without
/// knowing (or losing) its concrete type.
pub type Error = anyhow::Error;

/// Resolved state of a value cell: a value or an error
pub type Outcome<T> = std::result::Result<T, Error>;

/// Result type for primitive operations (fulfill, attach, retrieve)
pub type Result<T> = std::result::Result<T, FutureError>;

/// Errors raised by the promise/future primitive
///
/// `DoubleFulfillment`, `AlreadyHasContinuation` and `FutureAlreadyRetrieved`
/// are programmer errors: the operation that triggered them did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FutureError {
    /// A promise was fulfilled after it had already been fulfilled
    #[error("promise already satisfied")]
    DoubleFulfillment,

    /// A continuation was attached to a future that already has one
    #[error("future already has a continuation")]
    AlreadyHasContinuation,

    /// The future of a promise was requested more than once
    #[error("future already retrieved")]
    FutureAlreadyRetrieved,

    /// The promise was dropped without being fulfilled
    #[error("broken promise")]
    BrokenPromise,

    /// Cancellation requested through `Future::cancel`
    #[error("future cancelled")]
    Cancelled,
}

impl FutureError {
    /// Check if this error indicates misuse of the primitive.
    ///
    /// Misuse is never a runtime condition to recover from; callers are
    /// expected to surface it loudly.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            FutureError::DoubleFulfillment
                | FutureError::AlreadyHasContinuation
                | FutureError::FutureAlreadyRetrieved
        )
    }

    /// Check if this is a broken-promise error.
    pub fn is_broken_promise(&self) -> bool {
        matches!(self, FutureError::BrokenPromise)
    }

    /// Check if this is a cancellation request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FutureError::Cancelled)
    }

    /// Look for a `FutureError` inside a payload error.
    pub fn find(error: &Error) -> Option<FutureError> {
        error.downcast_ref::<FutureError>().copied()
    }
}
