//! Configuration for a parallel search run

use crate::search::error::SearchError;

/// What a worker does with a goal once the result queue is full.
///
/// The queue holds `search_limit` entries and the caller never takes more
/// than that, so a full queue already contains everything the caller will
/// receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the goal and count it. Every depth barrier clears and the search
    /// runs to exhaustion.
    #[default]
    Discard,
    /// Block the worker until the queue has room. Once the caller stops
    /// draining, the worker parks forever, its depth never completes and the
    /// search is never reported as exhausted.
    Block,
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverflowPolicy::Discard => write!(f, "discard"),
            OverflowPolicy::Block => write!(f, "block"),
        }
    }
}

impl std::str::FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discard" | "drop" => Ok(OverflowPolicy::Discard),
            "block" | "blocking" => Ok(OverflowPolicy::Block),
            _ => Err(format!(
                "Unknown overflow policy: '{}'. Valid options: discard, block",
                s
            )),
        }
    }
}

/// Configuration for [`crate::search::ParallelSearch`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of worker threads processing nodes concurrently.
    pub pool_size: usize,
    /// Deepest level that is processed; nodes at this depth are never
    /// expanded. 0 evaluates only the roots.
    pub depth_limit: u32,
    /// Number of goals the caller waits for, and the result queue capacity.
    pub search_limit: usize,
    /// Behavior of workers that find a goal while the result queue is full.
    pub overflow: OverflowPolicy,
    /// Prefix for worker thread names.
    pub thread_name: String,
}

impl SearchConfig {
    /// Create a config from the three required parameters.
    pub fn new(pool_size: usize, depth_limit: u32, search_limit: usize) -> Self {
        Self {
            pool_size,
            depth_limit,
            search_limit,
            overflow: OverflowPolicy::default(),
            thread_name: "search".to_string(),
        }
    }

    /// Set what happens to goals found after the result queue fills up.
    pub fn with_overflow_policy(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Set the prefix used to name worker threads.
    pub fn with_thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.pool_size == 0 {
            return Err(SearchError::InvalidConfig(
                "pool_size must be at least 1".to_string(),
            ));
        }
        if self.search_limit == 0 {
            return Err(SearchError::InvalidConfig(
                "search_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
