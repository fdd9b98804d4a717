//! Identifier types
//!
//! - [`LoopId`]: Unique identifier for one loop run, attached to every log
//!   event the loop emits

use uuid::Uuid;

/// Unique identifier for a loop run
///
/// A fresh id is assigned to every loop unless the caller supplies one,
/// so interleaved log output of concurrent loops can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopId(Uuid);

impl LoopId {
    /// Create a new random LoopId using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use strand_core::LoopId;
    ///
    /// let id1 = LoopId::new();
    /// let id2 = LoopId::new();
    /// assert_ne!(id1, id2);
    /// ```
    pub fn new() -> Self {
        LoopId(Uuid::new_v4())
    }

    /// Create LoopId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        LoopId(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for LoopId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LoopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
