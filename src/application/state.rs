//! Application state management for the terminal kanban board.
//!
//! This module contains the main application state, mode management, the
//! per-lane entry field and the in-flight drag gesture.

use super::board::{BoardError, BoardStore};
use crate::domain::{DragResult, Lane, Position};

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation mode - arrow keys move the selection, shortcuts available
    Normal,
    /// The focused lane's entry field is receiving text
    Adding,
    /// A card is being dragged
    Dragging,
    /// Help screen is displayed
    Help,
}

/// Which device started the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    Mouse,
    Keyboard,
}

/// A drag gesture that has started but not been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub source: Position,
    /// Slot the card would land in if released now, `None` outside every lane.
    pub target: Option<Position>,
    pub origin: DragOrigin,
    /// Whether the pointer moved since the press; a release without movement
    /// is a click, not a drop.
    pub moved: bool,
}

/// Main application state containing the board and UI state.
///
/// # Examples
///
/// ```
/// use tkan::application::{App, AppMode, BoardStore};
/// use tkan::domain::Lane;
/// use tkan::infrastructure::MemoryStore;
///
/// let app = App::new(BoardStore::load(Box::new(MemoryStore::new())));
/// assert_eq!(app.focus, Lane::Todo);
/// assert_eq!(app.mode, AppMode::Normal);
/// ```
#[derive(Debug)]
pub struct App {
    /// The board state container
    pub board: BoardStore,
    /// Current application mode
    pub mode: AppMode,
    /// Lane holding the selection
    pub focus: Lane,
    /// Selected card index within the focused lane
    pub selected: usize,
    /// First visible card index per lane
    pub scroll: [usize; 3],
    /// Number of card rows visible in a lane
    pub list_rows: usize,
    /// Entry field buffer for the focused lane
    pub input: String,
    /// Cursor position within the entry field, in characters
    pub cursor_position: usize,
    /// Drag in progress, if any
    pub drag: Option<DragState>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
}

impl App {
    pub fn new(board: BoardStore) -> Self {
        Self {
            board,
            mode: AppMode::Normal,
            focus: Lane::Todo,
            selected: 0,
            scroll: [0; 3],
            list_rows: 10,
            input: String::new(),
            cursor_position: 0,
            drag: None,
            help_scroll: 0,
            status_message: None,
        }
    }

    fn lane_len(&self, lane: Lane) -> usize {
        self.board.board().lane(lane).len()
    }

    /// The selected card, if the focused lane has any.
    pub fn selected_position(&self) -> Option<Position> {
        let position = Position::new(self.focus, self.selected);
        self.board.board().task(position).map(|_| position)
    }

    pub fn focus_lane(&mut self, lane: Lane) {
        self.focus = lane;
        self.selected = self.selected.min(self.lane_len(lane).saturating_sub(1));
    }

    pub fn focus_prev_lane(&mut self) {
        self.focus_lane(self.focus.prev());
    }

    pub fn focus_next_lane(&mut self) {
        self.focus_lane(self.focus.next());
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.lane_len(self.focus) {
            self.selected += 1;
        }
    }

    pub fn select(&mut self, position: Position) {
        self.focus = position.lane;
        self.selected = position.index;
    }

    /// Focuses the entry field of the focused lane.
    pub fn start_adding(&mut self) {
        self.mode = AppMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
        self.status_message = None;
    }

    /// Leaves the entry field and discards its content.
    pub fn cancel_adding(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Adds the entry field's content to the focused lane and clears it.
    ///
    /// Empty input is ignored. The field stays focused for the next task.
    pub fn submit_input(&mut self) {
        if self.input.is_empty() {
            return;
        }

        let content = std::mem::take(&mut self.input);
        self.cursor_position = 0;
        let result = self.board.add_task(self.focus, content);
        // The task is on the board even when saving failed.
        self.selected = self.lane_len(self.focus).saturating_sub(1);
        if let Err(e) = result {
            self.report_error(&e);
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map(|(offset, _)| offset)
            .unwrap_or(self.input.len())
    }

    fn input_chars(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor_position);
        self.input.insert(offset, c);
        self.cursor_position += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let offset = self.byte_offset(self.cursor_position);
            self.input.remove(offset);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor_position < self.input_chars() {
            let offset = self.byte_offset(self.cursor_position);
            self.input.remove(offset);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor_position < self.input_chars() {
            self.cursor_position += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_chars();
    }

    /// Highest index a dragged card can land at in `lane`.
    ///
    /// Indices count the destination lane after the card left its source.
    pub fn drop_limit(&self, source: Position, lane: Lane) -> usize {
        let len = self.lane_len(lane);
        if lane == source.lane { len.saturating_sub(1) } else { len }
    }

    /// Picks up the card at `source`. Does nothing when there is no card there.
    pub fn begin_drag(&mut self, source: Position, origin: DragOrigin) {
        if self.board.board().task(source).is_none() {
            return;
        }
        self.select(source);
        self.drag = Some(DragState {
            source,
            target: Some(source),
            origin,
            moved: false,
        });
        self.mode = AppMode::Dragging;
        self.status_message = None;
    }

    /// Records where the card would land; `None` means outside every lane.
    pub fn update_drag_target(&mut self, target: Option<Position>) {
        let limits = self
            .drag
            .map(|drag| target.map(|t| (t, self.drop_limit(drag.source, t.lane))));
        if let (Some(drag), Some(resolved)) = (self.drag.as_mut(), limits) {
            drag.target = resolved.map(|(t, limit)| Position::new(t.lane, t.index.min(limit)));
            drag.moved = true;
        }
    }

    /// Moves the keyboard drag target one lane left or right.
    pub fn shift_drag_lane(&mut self, forward: bool) {
        let Some(drag) = self.drag else { return };
        let current = drag.target.unwrap_or(drag.source);
        let lane = if forward { current.lane.next() } else { current.lane.prev() };
        self.update_drag_target(Some(Position::new(lane, current.index)));
    }

    /// Moves the keyboard drag target one slot up or down.
    pub fn shift_drag_index(&mut self, down: bool) {
        let Some(drag) = self.drag else { return };
        let current = drag.target.unwrap_or(drag.source);
        let index = if down {
            current.index + 1
        } else {
            current.index.saturating_sub(1)
        };
        self.update_drag_target(Some(Position::new(current.lane, index)));
    }

    /// Releases the dragged card at `destination`.
    ///
    /// `None` cancels the gesture; the board is not touched.
    pub fn finish_drag(&mut self, destination: Option<Position>) {
        let Some(drag) = self.drag.take() else { return };
        self.mode = AppMode::Normal;

        let result = self.board.apply_drag(DragResult {
            source: drag.source,
            destination,
        });
        match result {
            Ok(false) => {}
            Ok(true) => self.select_dropped(destination),
            Err(BoardError::Domain(e)) => {
                self.status_message = Some(format!("Error: {e}"));
            }
            Err(e) => {
                self.select_dropped(destination);
                self.report_error(&e);
            }
        }
    }

    /// Releases the dragged card at its current target.
    pub fn drop_at_target(&mut self) {
        let destination = self.drag.and_then(|drag| drag.target);
        self.finish_drag(destination);
    }

    pub fn cancel_drag(&mut self) {
        self.finish_drag(None);
    }

    fn select_dropped(&mut self, destination: Option<Position>) {
        if let Some(position) = destination {
            self.focus = position.lane;
            self.selected = position.index.min(self.lane_len(position.lane).saturating_sub(1));
        }
    }

    fn report_error(&mut self, error: &BoardError) {
        self.status_message = Some(format!("Error: {error}"));
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Sets the number of visible card rows and scrolls lanes so the
    /// selection and the drag target stay on screen.
    pub fn update_viewport(&mut self, list_rows: usize) {
        self.list_rows = list_rows.max(1);
        for lane in Lane::ALL {
            let max_scroll = self.lane_len(lane).saturating_sub(self.list_rows);
            let scroll = &mut self.scroll[lane.index()];
            *scroll = (*scroll).min(max_scroll);
        }
        self.ensure_visible(Position::new(self.focus, self.selected));
        if let Some(target) = self.drag.and_then(|drag| drag.target) {
            self.ensure_visible(target);
        }
    }

    fn ensure_visible(&mut self, position: Position) {
        let rows = self.list_rows;
        let scroll = &mut self.scroll[position.lane.index()];
        if position.index < *scroll {
            *scroll = position.index;
        } else if position.index >= *scroll + rows {
            *scroll = position.index + 1 - rows;
        }
    }
}
