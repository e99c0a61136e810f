//! Parallel breadth-first search over caller-supplied search trees
//!
//! The engine never looks inside a node. It only asks three things of it,
//! through the [`Searchable`] trait:
//! - expand: hand every legal child to a callback
//! - is_goal: whether the node is an accepted result
//! - score: an integer fitness used to rank the results
//!
//! [`ParallelSearch`] fans nodes out over a fixed pool of worker threads,
//! tracks per-depth completion, collects up to `search_limit` goals and
//! returns them best-first.

pub mod config;
pub mod error;
pub mod parallel;
pub mod result;

pub use config::{OverflowPolicy, SearchConfig};
pub use error::SearchError;
pub use parallel::ParallelSearch;
pub use result::{SearchStatistics, rank_by_score};

/// A node in a search tree.
///
/// Nodes are immutable snapshots. Each node is handed to exactly one worker,
/// so implementations need no internal synchronization, but they do cross
/// threads and must be `Send`.
pub trait Searchable: Send + Sized + 'static {
    /// Produce every child of this node, passing each to `emit` before
    /// returning.
    ///
    /// Must not mutate `self`. Producing no children is legitimate (a dead
    /// end).
    fn expand(&self, emit: &mut dyn FnMut(Self));

    /// Whether this node is an accepted result. Goal nodes are never expanded.
    fn is_goal(&self) -> bool;

    /// Fitness of this node; higher is better. Only used for ranking.
    fn score(&self) -> i64;
}
