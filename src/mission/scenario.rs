//! Mission scenarios loaded from JSON

use crate::mission::resources::Resources;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures loading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// An action that consumes `input` and then produces `output`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub input: Resources,
    #[serde(default)]
    pub output: Resources,
}

/// A mission: starting resources, available commands, the goal, and the
/// per-turn rules.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub turns: u32,
    pub actions_per_turn: u32,
    #[serde(default)]
    pub start: Resources,
    #[serde(default)]
    pub goal: Resources,
    pub commands: Vec<Command>,
    /// Applied at the start of every turn after the first.
    #[serde(default)]
    pub turn_cost: Resources,
    /// At every turn end, each resource must lie strictly above this bound.
    /// Fields left out of the document are unbounded.
    #[serde(default = "Resources::floor", deserialize_with = "lower_bound")]
    pub turn_must_end_above: Resources,
    /// At every turn end, each resource must lie strictly below this bound.
    /// Fields left out of the document are unbounded.
    #[serde(default = "Resources::ceiling", deserialize_with = "upper_bound")]
    pub turn_must_end_below: Resources,
}

fn lower_bound<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Resources, D::Error> {
    bound_over(Resources::floor(), deserializer)
}

fn upper_bound<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Resources, D::Error> {
    bound_over(Resources::ceiling(), deserializer)
}

/// Overlay the fields present in the document onto `base`.
fn bound_over<'de, D: Deserializer<'de>>(
    base: Resources,
    deserializer: D,
) -> Result<Resources, D::Error> {
    let overrides = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut merged = match serde_json::to_value(base).map_err(D::Error::custom)? {
        serde_json::Value::Object(fields) => fields,
        _ => return Err(D::Error::custom("resources must serialize as an object")),
    };
    merged.extend(overrides);
    serde_json::from_value(serde_json::Value::Object(merged)).map_err(D::Error::custom)
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(raw)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.actions_per_turn == 0 {
            return Err(ScenarioError::Invalid(
                "actions_per_turn must be at least 1".to_string(),
            ));
        }
        if self.commands.is_empty() {
            return Err(ScenarioError::Invalid("no commands defined".to_string()));
        }

        let mut names = HashSet::new();
        for command in &self.commands {
            if !names.insert(command.name.to_lowercase()) {
                return Err(ScenarioError::Invalid(format!(
                    "duplicate command '{}'",
                    command.name
                )));
            }
        }
        Ok(())
    }

    /// Most actions a mission can take: `turns * actions_per_turn`.
    pub fn total_actions(&self) -> u32 {
        self.turns.saturating_mul(self.actions_per_turn)
    }

    /// Look up a command by name, ignoring case.
    pub fn find_command(&self, name: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|command| command.name.eq_ignore_ascii_case(name))
    }
}
