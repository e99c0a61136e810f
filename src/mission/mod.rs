//! Mars Horizon mission solver
//!
//! A mission starts from a pool of resources and must reach a goal within a
//! fixed number of turns, each allowing a fixed number of actions. Every
//! action runs a command that consumes some resources and produces others.
//! A [`Sequence`] of commands is a [`crate::search::Searchable`] node, so the
//! parallel search engine can look for the best ways to complete a mission.

pub mod resources;
pub mod scenario;
pub mod sequence;

pub use resources::Resources;
pub use scenario::{Command, Scenario, ScenarioError};
pub use sequence::{MissionError, Sequence, play};
