//! Convenient imports for Strand.
//!
//! ```
//! use strand::prelude::*;
//!
//! let done = times(3, || make_future(()));
//! assert!(done.wait().is_ok());
//! ```

// Primitive
pub use crate::{contract, make_error_future, make_future, Future, Promise};

// Combinators
pub use crate::{times, when, while_do, while_do_with, LoopConfig};

// Error handling
pub use crate::{Error, FutureError, Outcome};
