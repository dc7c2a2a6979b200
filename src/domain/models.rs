use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::errors::{DomainError, DomainResult};

/// One of the three fixed board lanes.
///
/// The serialized names are the keys of the persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    #[serde(rename = "TODO")]
    Todo,
    #[serde(rename = "IN-PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

impl Lane {
    /// All lanes in display order.
    pub const ALL: [Lane; 3] = [Lane::Todo, Lane::InProgress, Lane::Done];

    pub fn key(self) -> &'static str {
        match self {
            Lane::Todo => "TODO",
            Lane::InProgress => "IN-PROGRESS",
            Lane::Done => "DONE",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Lane::Todo => 0,
            Lane::InProgress => 1,
            Lane::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Lane> {
        Lane::ALL.get(index).copied()
    }

    /// The lane to the left, saturating at the first lane.
    pub fn prev(self) -> Lane {
        Lane::from_index(self.index().saturating_sub(1)).unwrap_or(self)
    }

    /// The lane to the right, saturating at the last lane.
    pub fn next(self) -> Lane {
        Lane::from_index(self.index() + 1).unwrap_or(self)
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub id: String,
    pub content: String,
}

impl Task {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// A slot inside a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub lane: Lane,
    pub index: usize,
}

impl Position {
    pub fn new(lane: Lane, index: usize) -> Self {
        Self { lane, index }
    }
}

/// The three lanes and their ordered tasks.
///
/// Serializes to the persisted document shape
/// `{"TODO": [...], "IN-PROGRESS": [...], "DONE": [...]}`. Deserialization
/// requires exactly those keys and well-formed task records; use
/// [`Board::validate`] afterwards to reject repeated ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Board {
    #[serde(rename = "TODO")]
    todo: Vec<Task>,
    #[serde(rename = "IN-PROGRESS")]
    in_progress: Vec<Task>,
    #[serde(rename = "DONE")]
    done: Vec<Task>,
}

impl Board {
    pub fn lane(&self, lane: Lane) -> &[Task] {
        match lane {
            Lane::Todo => &self.todo,
            Lane::InProgress => &self.in_progress,
            Lane::Done => &self.done,
        }
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut Vec<Task> {
        match lane {
            Lane::Todo => &mut self.todo,
            Lane::InProgress => &mut self.in_progress,
            Lane::Done => &mut self.done,
        }
    }

    pub fn len(&self) -> usize {
        Lane::ALL.iter().map(|lane| self.lane(*lane).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.tasks().any(|(_, task)| task.id == id)
    }

    pub fn task(&self, position: Position) -> Option<&Task> {
        self.lane(position.lane).get(position.index)
    }

    /// Iterates every task with its lane, lane by lane in display order.
    pub fn tasks(&self) -> impl Iterator<Item = (Lane, &Task)> {
        Lane::ALL
            .into_iter()
            .flat_map(move |lane| self.lane(lane).iter().map(move |task| (lane, task)))
    }

    /// Appends a task to the end of a lane.
    pub fn push(&mut self, lane: Lane, task: Task) {
        self.lane_mut(lane).push(task);
    }

    /// Moves one task with list-splice semantics.
    ///
    /// The task at `source` is removed first; it is then inserted so that it
    /// ends up at `destination.index` in the resulting destination lane. An
    /// index past the end of that lane appends. The board is left untouched
    /// when `source` names no task.
    pub fn move_task(&mut self, source: Position, destination: Position) -> DomainResult<()> {
        let source_len = self.lane(source.lane).len();
        if source.index >= source_len {
            return Err(DomainError::TaskIndexOutOfRange {
                lane: source.lane,
                index: source.index,
                len: source_len,
            });
        }

        let task = self.lane_mut(source.lane).remove(source.index);
        let target = self.lane_mut(destination.lane);
        let index = destination.index.min(target.len());
        target.insert(index, task);
        Ok(())
    }

    /// Checks that no task id appears twice across the board.
    pub fn validate(&self) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for (_, task) in self.tasks() {
            if !seen.insert(task.id.as_str()) {
                return Err(DomainError::DuplicateTaskId(task.id.clone()));
            }
        }
        Ok(())
    }
}
