//! The board state container.
//!
//! [`BoardStore`] owns the board, applies add and move operations, and writes
//! the whole board back to its key-value slot after every mutation.

use crate::domain::{
    fresh_id, Board, DomainError, DragResult, IdGenerator, Lane, Position, Task, UuidIds,
};
use crate::infrastructure::{KeyValueStore, StoreError};
use thiserror::Error;

/// Storage slot holding the serialized board.
pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Failed to save board: {0}")]
    Persist(#[from] StoreError),

    #[error("Failed to serialize board: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owns the board and keeps its storage slot in sync.
///
/// # Examples
///
/// ```
/// use tkan::application::BoardStore;
/// use tkan::domain::{Lane, Position};
/// use tkan::infrastructure::MemoryStore;
///
/// let store = MemoryStore::new();
/// let mut board = BoardStore::load(Box::new(store.clone()));
/// board.add_task(Lane::Todo, "write spec").unwrap();
/// board.add_task(Lane::Todo, "review spec").unwrap();
/// board
///     .move_task(Position::new(Lane::Todo, 0), Position::new(Lane::Done, 0))
///     .unwrap();
///
/// assert_eq!(board.board().lane(Lane::Todo)[0].content, "review spec");
/// assert_eq!(board.board().lane(Lane::Done)[0].content, "write spec");
/// assert_eq!(store.writes(), 3);
/// ```
#[derive(Debug)]
pub struct BoardStore {
    board: Board,
    store: Box<dyn KeyValueStore>,
    ids: Box<dyn IdGenerator>,
}

impl BoardStore {
    /// Loads the board from `store`, drawing new ids from [`UuidIds`].
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        Self::load_with_ids(store, Box::new(UuidIds))
    }

    /// Loads the board from `store`.
    ///
    /// Falls back to three empty lanes when the slot is absent, `null`,
    /// unreadable, or does not hold a valid board document.
    pub fn load_with_ids(store: Box<dyn KeyValueStore>, ids: Box<dyn IdGenerator>) -> Self {
        let board = match store.get(TASKS_KEY) {
            Ok(Some(raw)) => decode_board(&raw).unwrap_or_default(),
            Ok(None) => {
                tracing::debug!("no stored board, starting empty");
                Board::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored board, starting empty");
                Board::default()
            }
        };
        tracing::debug!(tasks = board.len(), "board loaded");
        Self { board, store, ids }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Appends a task with a fresh id to the end of `lane` and saves.
    ///
    /// A save failure is returned but the task stays on the board.
    pub fn add_task(&mut self, lane: Lane, content: impl Into<String>) -> Result<String, BoardError> {
        let id = fresh_id(self.ids.as_mut(), &self.board);
        self.board.push(lane, Task::new(id.clone(), content));
        tracing::info!(%lane, id = %id, "task added");
        self.persist()?;
        Ok(id)
    }

    /// Moves one task with list-splice semantics and saves.
    ///
    /// An invalid source leaves the board untouched and writes nothing.
    pub fn move_task(&mut self, source: Position, destination: Position) -> Result<(), BoardError> {
        self.board.move_task(source, destination)?;
        tracing::info!(
            from = %source.lane,
            from_index = source.index,
            to = %destination.lane,
            to_index = destination.index,
            "task moved"
        );
        self.persist()
    }

    /// Applies the end of a drag gesture.
    ///
    /// Returns `Ok(false)` without touching the board or the store when the
    /// gesture has no destination.
    pub fn apply_drag(&mut self, drag: DragResult) -> Result<bool, BoardError> {
        let Some(destination) = drag.destination else {
            tracing::debug!(lane = %drag.source.lane, index = drag.source.index, "drag cancelled");
            return Ok(false);
        };
        self.move_task(drag.source, destination)?;
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), BoardError> {
        let json = serde_json::to_string(&self.board)?;
        if let Err(e) = self.store.set(TASKS_KEY, &json) {
            tracing::error!(error = %e, "failed to save board");
            return Err(e.into());
        }
        tracing::debug!(bytes = json.len(), "board saved");
        Ok(())
    }
}

fn decode_board(raw: &str) -> Option<Board> {
    let board = match serde_json::from_str::<Option<Board>>(raw) {
        Ok(Some(board)) => board,
        Ok(None) => {
            tracing::debug!("stored board is null, starting empty");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored board is not a valid document, starting empty");
            return None;
        }
    };
    if let Err(e) = board.validate() {
        tracing::warn!(error = %e, "stored board is inconsistent, starting empty");
        return None;
    }
    Some(board)
}
