//! Loop configuration
//!
//! Configuration only affects observability: every log event a loop emits
//! carries its name and id.

use std::borrow::Cow;
use strand_core::LoopId;

/// Name and identity of one loop run
///
/// # Example
///
/// ```
/// use strand_combinator::LoopConfig;
/// use strand_core::LoopId;
///
/// let id = LoopId::new();
/// let config = LoopConfig::new("poll-upstream").with_id(id);
/// assert_eq!(config.name(), "poll-upstream");
/// assert_eq!(config.id(), id);
/// ```
#[derive(Debug, Clone)]
pub struct LoopConfig {
    name: Cow<'static, str>,
    id: LoopId,
}

impl LoopConfig {
    /// Default loop name
    pub const DEFAULT_NAME: &'static str = "while_do";

    /// Create a config with the given name and a fresh id
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        LoopConfig {
            name: name.into(),
            id: LoopId::new(),
        }
    }

    /// Use a caller-supplied id, e.g. to correlate with an outer operation
    pub fn with_id(mut self, id: LoopId) -> Self {
        self.id = id;
        self
    }

    /// Loop name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loop id
    pub fn id(&self) -> LoopId {
        self.id
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}
