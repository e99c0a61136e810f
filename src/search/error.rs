//! Errors raised by the search engine

use thiserror::Error;

/// Failures the engine reports to its caller.
///
/// Runtime stalls (see [`crate::search::OverflowPolicy::Block`]) are not
/// errors; they are only observable through a liveness timeout.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A configuration value is out of range.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    /// `start` was called on an engine that is already running.
    #[error("search has already been started; create a new engine per search")]
    AlreadyStarted,

    /// The OS refused to spawn a worker or announcer thread.
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] std::io::Error),
}
