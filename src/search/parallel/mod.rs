//! Parallel search execution.
//!
//! # Architecture
//!
//! The parallel search system consists of:
//! - A **worker pool** of fixed size draining an unbounded FIFO job queue
//! - A **depth tracker** with a processed counter and completion barrier per
//!   depth level
//! - A **result collector**, a bounded queue of found goals
//! - A **coordinator** that submits nodes, keeps the depth bookkeeping and
//!   announces completion level by level
//!
//! # Example
//!
//! ```ignore
//! use horizon::search::{ParallelSearch, SearchConfig};
//!
//! let search = ParallelSearch::new(SearchConfig::new(16, 8, 4))?;
//! search.start([root])?;
//! let best_first = search.wait_for_found();
//! ```

pub mod channel;
pub mod coordinator;
pub mod depth;
pub mod pool;

pub use coordinator::ParallelSearch;
