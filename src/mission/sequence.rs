//! Command sequences: the search nodes of the mission solver

use crate::mission::resources::Resources;
use crate::mission::scenario::{Command, Scenario};
use crate::search::Searchable;
use std::sync::Arc;
use thiserror::Error;

/// Failures replaying a list of commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MissionError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("cannot take action '{command}' at step {step}")]
    IllegalAction { command: String, step: usize },

    #[error("no actions left for '{command}' at step {step}")]
    NoActionsLeft { command: String, step: usize },
}

/// The commands taken so far and the resources they lead to.
///
/// Sequences are immutable. Each one links to the sequence it extends, so
/// the full command path can be rebuilt from any node.
#[derive(Clone)]
pub struct Sequence {
    scenario: Arc<Scenario>,
    resources: Resources,
    command: Option<usize>,
    parent: Option<Arc<Sequence>>,
    size: u32,
}

impl Sequence {
    /// The empty sequence, holding the scenario's starting resources.
    pub fn start(scenario: Arc<Scenario>) -> Self {
        Self {
            resources: scenario.start,
            scenario,
            command: None,
            parent: None,
            size: 0,
        }
    }

    /// Number of commands taken.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The command that produced this sequence (`None` at the start).
    pub fn command(&self) -> Option<&Command> {
        self.command.map(|index| &self.scenario.commands[index])
    }

    pub fn command_name(&self) -> String {
        match self.command() {
            Some(command) => command.name.to_uppercase(),
            None => "[START]".to_string(),
        }
    }

    /// Every sequence from the first command up to this one.
    pub fn steps(&self) -> Vec<&Sequence> {
        let mut steps = Vec::with_capacity(self.size as usize);
        let mut current = Some(self);
        while let Some(sequence) = current {
            if sequence.size == 0 {
                break;
            }
            steps.push(sequence);
            current = sequence.parent.as_deref();
        }
        steps.reverse();
        steps
    }

    /// Commands taken, e.g. `SCAN -> CHARGE -> SCAN`.
    pub fn command_path(&self) -> String {
        if self.size == 0 {
            return self.command_name();
        }
        self.steps()
            .iter()
            .map(|step| step.command_name())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// One entry per turn: the commands taken that turn and the resources at
    /// its end.
    pub fn turn_summary(&self) -> String {
        let per_turn = self.scenario.actions_per_turn as usize;
        let mut summary = String::new();
        let steps = self.steps();
        for (turn, taken) in steps
            .chunks(per_turn)
            .take(self.scenario.turns as usize)
            .enumerate()
        {
            let Some(last) = taken.last() else {
                break;
            };
            let names: Vec<String> = taken.iter().map(|step| step.command_name()).collect();
            summary.push_str(&format!("[{}] {}\n", turn + 1, names.join(" -> ")));
            summary.push_str(&format!("\t{}\n", last.resources));
        }
        summary
    }

    fn is_new_turn(&self) -> bool {
        self.size > 0 && (self.size - 1) % self.scenario.actions_per_turn == 0
    }

    fn is_turn_end(&self) -> bool {
        self.size % self.scenario.actions_per_turn == 0
    }

    fn has_more_actions(&self) -> bool {
        self.size < self.scenario.total_actions()
    }

    fn is_invalid(&self) -> bool {
        let scenario = &self.scenario;
        if self.is_turn_end()
            && !self
                .resources
                .ends_within(&scenario.turn_must_end_above, &scenario.turn_must_end_below)
        {
            return true;
        }

        // Drift, thrust and radiation may go negative.
        let r = &self.resources;
        r.comm < 0 || r.data < 0 || r.nav < 0 || r.power < 0 || r.heat < 0 || r.crew < 0
    }

    fn is_success(&self) -> bool {
        let goal = &self.scenario.goal;
        let r = &self.resources;
        // Heat and radiation are not part of the goal.
        r.comm >= goal.comm
            && r.data >= goal.data
            && r.nav >= goal.nav
            && r.power >= goal.power
            && r.drift.abs() <= goal.drift
            && (r.thrust >= goal.thrust || goal.thrust == 0)
    }

    /// Take command `index` after this sequence, or `None` if the rules
    /// forbid it.
    pub fn attempt(self: &Arc<Self>, index: usize) -> Option<Sequence> {
        let scenario = &self.scenario;
        let command = &scenario.commands[index];
        let mut next = Sequence {
            scenario: Arc::clone(scenario),
            resources: self.resources,
            command: Some(index),
            parent: Some(Arc::clone(self)),
            size: self.size + 1,
        };

        // Turn upkeep applies from the second turn on.
        if next.size > 1 && next.is_new_turn() {
            if scenario.start.crew > 0 {
                next.resources.crew = scenario.start.crew;
            }
            next.resources += &scenario.turn_cost;
        }

        next.resources -= &command.input;
        if next.is_invalid() {
            return None;
        }

        next.resources += &command.output;
        if next.is_invalid() {
            return None;
        }

        Some(next)
    }
}

impl Searchable for Sequence {
    fn expand(&self, emit: &mut dyn FnMut(Self)) {
        if !self.has_more_actions() {
            return;
        }
        let parent = Arc::new(self.clone());
        for index in 0..self.scenario.commands.len() {
            if let Some(next) = parent.attempt(index) {
                emit(next);
            }
        }
    }

    fn is_goal(&self) -> bool {
        self.is_success()
    }

    /// Longer sequences score higher; among equal lengths, more leftover
    /// resources (power above all) and less radiation score higher.
    fn score(&self) -> i64 {
        i64::from(self.size)
            .saturating_mul(1000)
            .saturating_sub(self.resources.risk(&self.scenario.goal))
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("size", &self.size)
            .field("commands", &self.command_path())
            .field("resources", &self.resources)
            .finish()
    }
}

/// Replay `names` from the start of `scenario`, returning the sequence after
/// each command.
pub fn play<S: AsRef<str>>(
    scenario: Arc<Scenario>,
    names: &[S],
) -> Result<Vec<Arc<Sequence>>, MissionError> {
    let mut current = Arc::new(Sequence::start(scenario));
    let mut played = Vec::with_capacity(names.len());

    for (i, name) in names.iter().enumerate() {
        let name = name.as_ref();
        let step = i + 1;
        let index = current
            .scenario
            .find_command(name)
            .ok_or_else(|| MissionError::UnknownCommand(name.to_string()))?;
        if !current.has_more_actions() {
            return Err(MissionError::NoActionsLeft {
                command: name.to_string(),
                step,
            });
        }
        let next = current
            .attempt(index)
            .ok_or_else(|| MissionError::IllegalAction {
                command: name.to_string(),
                step,
            })?;
        current = Arc::new(next);
        played.push(Arc::clone(&current));
    }

    Ok(played)
}
