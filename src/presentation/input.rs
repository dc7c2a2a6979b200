use super::layout::BoardLayout;
use crate::application::{App, AppMode, DragOrigin};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key),
            AppMode::Adding => Self::handle_adding_mode(app, key),
            AppMode::Dragging => Self::handle_dragging_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode) {
        app.status_message = None;

        match key {
            KeyCode::Left | KeyCode::Char('h') => app.focus_prev_lane(),
            KeyCode::Right | KeyCode::Char('l') => app.focus_next_lane(),
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('i') => app.start_adding(),
            KeyCode::Char(' ') => {
                if let Some(position) = app.selected_position() {
                    app.begin_drag(position, DragOrigin::Keyboard);
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            _ => {}
        }
    }

    fn handle_adding_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.submit_input(),
            KeyCode::Esc => app.cancel_adding(),
            KeyCode::Backspace => app.delete_before_cursor(),
            KeyCode::Delete => app.delete_at_cursor(),
            KeyCode::Left => app.cursor_left(),
            KeyCode::Right => app.cursor_right(),
            KeyCode::Home => app.cursor_home(),
            KeyCode::End => app.cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_dragging_mode(app: &mut App, key: KeyCode) {
        // A mouse drag only ends on button release.
        if app.drag.is_some_and(|drag| drag.origin == DragOrigin::Mouse) {
            if key == KeyCode::Esc {
                app.cancel_drag();
            }
            return;
        }

        match key {
            KeyCode::Left | KeyCode::Char('h') => app.shift_drag_lane(false),
            KeyCode::Right | KeyCode::Char('l') => app.shift_drag_lane(true),
            KeyCode::Up | KeyCode::Char('k') => app.shift_drag_index(false),
            KeyCode::Down | KeyCode::Char('j') => app.shift_drag_index(true),
            KeyCode::Char(' ') | KeyCode::Enter => app.drop_at_target(),
            KeyCode::Esc => app.cancel_drag(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    /// Translates mouse presses, drags and releases into drag gestures.
    pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, layout: &BoardLayout) {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if app.mode != AppMode::Normal {
                    return;
                }
                app.status_message = None;
                if let Some(position) = layout.card_at(x, y) {
                    app.begin_drag(position, DragOrigin::Mouse);
                } else if let Some(lane) = layout.lane_at(x, y) {
                    app.focus_lane(lane);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = app.drag.filter(|d| d.origin == DragOrigin::Mouse) else {
                    return;
                };
                let target = layout.drop_target(app.board.board(), drag.source, x, y);
                app.update_drag_target(target);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(drag) = app.drag.filter(|d| d.origin == DragOrigin::Mouse) else {
                    return;
                };
                if !drag.moved {
                    // A click selects the card without moving it.
                    app.drag = None;
                    app.mode = AppMode::Normal;
                    return;
                }
                let destination = layout.drop_target(app.board.board(), drag.source, x, y);
                app.finish_drag(destination);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::BoardStore;
    use crate::domain::{Lane, Position, SequentialIds};
    use crate::infrastructure::MemoryStore;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn app_with(store: &MemoryStore, todo: &[&str]) -> App {
        let mut board =
            BoardStore::load_with_ids(Box::new(store.clone()), Box::new(SequentialIds::new()));
        for content in todo {
            board.add_task(Lane::Todo, *content).unwrap();
        }
        App::new(board)
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key);
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn layout(app: &App) -> BoardLayout {
        BoardLayout::compute(Rect::new(0, 0, 90, 30), app.board.board(), &app.scroll)
    }

    fn contents(app: &App, lane: Lane) -> Vec<String> {
        app.board
            .board()
            .lane(lane)
            .iter()
            .map(|t| t.content.clone())
            .collect()
    }

    #[test]
    fn test_typing_and_enter_adds_task() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &[]);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, AppMode::Adding);

        for c in "review".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        for c in "q?".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        assert_eq!(contents(&app, Lane::InProgress), ["review", "q?"]);
        assert_eq!(app.mode, AppMode::Normal);

        let writes = store.writes();
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(store.writes(), writes);
    }

    #[test]
    fn test_keyboard_grab_move_and_drop() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &["A", "B", "C"]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.mode, AppMode::Dragging);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(contents(&app, Lane::Todo), ["A", "C"]);
        assert_eq!(contents(&app, Lane::Done), ["B"]);
        assert_eq!(app.focus, Lane::Done);
    }

    #[test]
    fn test_keyboard_escape_cancels_drag() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &["A", "B"]);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Esc);

        assert_eq!(contents(&app, Lane::Todo), ["A", "B"]);
        assert_eq!(store.writes(), 2);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_space_on_empty_lane_does_nothing() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &[]);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_help_mode_toggle() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &[]);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 6);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_mouse_drag_to_other_lane() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &["A", "B", "C"]);
        let layout = layout(&app);

        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 2), &layout);
        assert_eq!(app.mode, AppMode::Dragging);
        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 40, 2), &layout);
        assert_eq!(app.drag.unwrap().target, Some(Position::new(Lane::InProgress, 0)));
        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 40, 2), &layout);

        assert_eq!(contents(&app, Lane::Todo), ["B", "C"]);
        assert_eq!(contents(&app, Lane::InProgress), ["A"]);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(store.writes(), 4);
    }

    #[test]
    fn test_mouse_reorder_within_lane() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &["A", "B"]);
        let layout = layout(&app);

        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), &layout);
        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 5, 2), &layout);
        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 2), &layout);

        assert_eq!(contents(&app, Lane::Todo), ["B", "A"]);
    }

    #[test]
    fn test_mouse_release_outside_lanes_is_noop() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &["A", "B"]);
        let layout = layout(&app);
        let before = app.board.board().clone();

        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 2), &layout);
        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 5, 0), &layout);
        assert_eq!(app.drag.unwrap().target, None);
        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 28), &layout);

        assert_eq!(app.board.board(), &before);
        assert_eq!(store.writes(), 2);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_mouse_click_selects_without_writing() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &["A", "B"]);
        let layout = layout(&app);

        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), &layout);
        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 3), &layout);

        assert_eq!(app.selected_position(), Some(Position::new(Lane::Todo, 1)));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.drag.is_none());
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_mouse_press_on_empty_lane_focuses_it() {
        let store = MemoryStore::new();
        let mut app = app_with(&store, &["A"]);
        let layout = layout(&app);

        InputHandler::handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 65, 10), &layout);
        assert_eq!(app.focus, Lane::Done);
        assert!(app.drag.is_none());
    }
}
