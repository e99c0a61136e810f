//! Depth-synchronized parallel breadth-first search.
//!
//! - [`search`]: the engine, generic over any [`search::Searchable`] node
//! - [`mission`]: a Mars Horizon mission solver built on it

pub mod mission;
pub mod search;
