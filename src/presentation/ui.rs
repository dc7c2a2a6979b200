use super::layout::{BoardLayout, LaneLayout};
use crate::application::{App, AppMode, DragOrigin};
use crate::domain::{Lane, Position};
use ratatui::{
    layout::{Position as CursorPosition, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Draws the board and returns the geometry used for mouse hit-testing.
pub fn render_ui(f: &mut Frame, app: &mut App) -> BoardLayout {
    app.update_viewport(BoardLayout::list_rows(f.area()));
    let layout = BoardLayout::compute(f.area(), app.board.board(), &app.scroll);

    render_header(f, app, layout.header);
    for lane in Lane::ALL {
        render_lane(f, app, lane, layout.lane(lane));
    }
    render_status_bar(f, app, layout.status);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }

    layout
}

fn lane_color(lane: Lane) -> Color {
    match lane {
        Lane::Todo => Color::Red,
        Lane::InProgress => Color::Yellow,
        Lane::Done => Color::Green,
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "tkan - Terminal Kanban | Lane: {} | Tasks: {}",
        app.focus,
        app.board.board().len()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_lane(f: &mut Frame, app: &App, lane: Lane, layout: &LaneLayout) {
    let tasks = app.board.board().lane(lane);
    let drag = app.drag;
    let target = drag.and_then(|d| d.target).filter(|t| t.lane == lane);
    let focused = app.focus == lane;

    let border_style = if target.is_some() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(lane_color(lane))
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} ({})", lane, tasks.len()))
        .title_style(Style::default().fg(lane_color(lane)).add_modifier(Modifier::BOLD))
        .border_style(border_style);
    f.render_widget(block, layout.area);

    for slot in &layout.cards {
        let position = Position::new(lane, slot.index);
        let task = &tasks[slot.index];
        let is_source = drag.is_some_and(|d| d.source == position);
        let style = if is_source {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
        } else if focused && app.selected == slot.index && app.mode != AppMode::Adding {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };
        let marker = if target.is_some_and(|t| t.index == slot.index) { "▸ " } else { "  " };
        f.render_widget(
            Paragraph::new(format!("{marker}{}", task.content)).style(style),
            slot.area,
        );
    }

    // Drop slot past the last card.
    if let Some(t) = target {
        let row = t.index.saturating_sub(layout.scroll);
        let past_end = layout.cards.last().is_none_or(|slot| t.index > slot.index);
        if past_end && row < layout.list.height as usize {
            let area = Rect {
                y: layout.list.y + row as u16,
                height: 1,
                ..layout.list
            };
            f.render_widget(
                Paragraph::new("▸ drop here").style(Style::default().fg(Color::Cyan)),
                area,
            );
        }
    }

    render_input(f, app, lane, layout.input);
}

fn render_input(f: &mut Frame, app: &App, lane: Lane, area: Rect) {
    let editing = app.mode == AppMode::Adding && app.focus == lane;
    let (text, style) = if editing {
        (app.input.clone(), Style::default().fg(Color::Green))
    } else {
        ("Add a new task".to_string(), Style::default().fg(Color::DarkGray))
    };
    let inner_width = area.width.saturating_sub(2) as usize;
    let offset = if editing { input_offset(app.cursor_position, inner_width) } else { 0 };
    let input = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style)
        .scroll((0, u16::try_from(offset).unwrap_or(u16::MAX)));
    f.render_widget(input, area);

    if editing && inner_width > 0 {
        let column = u16::try_from(app.cursor_position - offset).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(column);
        f.set_cursor_position(CursorPosition::new(x, area.y.saturating_add(1)));
    }
}

/// First visible column of the entry field so the cursor cell stays inside
/// a field `width` columns wide.
fn input_offset(cursor: usize, width: usize) -> usize {
    (cursor + 1).saturating_sub(width)
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "←→/hl: lane | ↑↓/jk: card | a/Enter: add task | Space: grab | drag with mouse | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Adding => format!("Adding to {} (Enter to add, Esc to finish)", app.focus),
        AppMode::Dragging => drag_status(app),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal if app.status_message.is_some() => Style::default().fg(Color::Red),
            AppMode::Normal => Style::default(),
            AppMode::Adding => Style::default().fg(Color::Green),
            AppMode::Dragging => Style::default().fg(Color::Yellow),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn drag_status(app: &App) -> String {
    let Some(drag) = app.drag else {
        return String::new();
    };
    let target = match drag.target {
        Some(t) => format!("drop into {} at {}", t.lane, t.index + 1),
        None => "release outside lanes to cancel".to_string(),
    };
    match drag.origin {
        DragOrigin::Keyboard => format!("Moving card: {target} (arrows to aim, Space/Enter to drop, Esc to cancel)"),
        DragOrigin::Mouse => format!("Moving card: {target}"),
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("tkan Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"TKAN - TERMINAL KANBAN

=== LANES ===
TODO, IN-PROGRESS and DONE are fixed; cards keep their order.
The board is saved after every change.

=== NAVIGATION ===
←→ or h/l       Focus previous/next lane
↑↓ or k/j       Select previous/next card
F1 or ?         Show this help
q               Quit

=== ADDING TASKS ===
a, i or Enter   Focus the lane's "Add a new task" field
Enter           Add the typed task to the end of the lane
Esc             Leave the field

=== MOVING CARDS (KEYBOARD) ===
Space           Grab the selected card
←→ or h/l       Aim at another lane
↑↓ or k/j       Aim at another position
Space/Enter     Drop the card
Esc             Cancel, nothing changes

=== MOVING CARDS (MOUSE) ===
Press on a card, drag it over a lane and release.
Releasing outside every lane cancels the move.

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text
Page Up/Down    Scroll help text 5 lines
Home            Jump to top
Esc/F1/?/q      Close this help window"#;
