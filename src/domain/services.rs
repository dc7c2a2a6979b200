//! Task identity and drag-gesture services for the kanban board.
//!
//! Ids are drawn from an [`IdGenerator`]; [`fresh_id`] keeps drawing until the
//! candidate is not already held by the board. A finished drag gesture is
//! reported as a [`DragResult`].

use super::models::{Board, Position};
use uuid::Uuid;

/// Source of candidate task identifiers.
pub trait IdGenerator: std::fmt::Debug {
    fn next_id(&mut self) -> String;
}

/// Random `task-<uuid>` identifiers.
///
/// # Examples
///
/// ```
/// use tkan::domain::{IdGenerator, UuidIds};
///
/// let mut ids = UuidIds;
/// let id = ids.next_id();
/// assert!(id.starts_with("task-"));
/// assert_ne!(id, ids.next_id());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        format!("task-{}", Uuid::new_v4())
    }
}

/// Monotonic `task-1`, `task-2`, ... identifiers.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("task-{}", self.counter)
    }
}

/// Draws ids from `ids` until one is not present on `board`.
pub fn fresh_id(ids: &mut dyn IdGenerator, board: &Board) -> String {
    loop {
        let candidate = ids.next_id();
        if !board.contains_id(&candidate) {
            return candidate;
        }
        tracing::debug!(id = %candidate, "generated id already on board, drawing again");
    }
}

/// Outcome of a drag gesture as reported by the input layer.
///
/// `destination` is `None` when the gesture was cancelled or released
/// outside every lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResult {
    pub source: Position,
    pub destination: Option<Position>,
}

impl DragResult {
    pub fn dropped(source: Position, destination: Position) -> Self {
        Self {
            source,
            destination: Some(destination),
        }
    }

    pub fn cancelled(source: Position) -> Self {
        Self {
            source,
            destination: None,
        }
    }
}
