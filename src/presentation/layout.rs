//! Screen geometry shared by rendering and mouse hit-testing.

use crate::domain::{Board, Lane, Position};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the entry field under each lane's card list.
const INPUT_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardSlot {
    pub index: usize,
    pub area: Rect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneLayout {
    /// The whole bordered panel; releasing a drag anywhere in it drops here.
    pub area: Rect,
    /// Rows available for cards, inside the border.
    pub list: Rect,
    pub input: Rect,
    /// Index of the first card drawn in `list`.
    pub scroll: usize,
    pub cards: Vec<CardSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub header: Rect,
    pub status: Rect,
    pub lanes: [LaneLayout; 3],
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
}

fn split_screen(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

fn split_lane(area: Rect) -> (Rect, Rect) {
    let inner = Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_HEIGHT)])
        .split(inner);
    (chunks[0], chunks[1])
}

impl BoardLayout {
    /// Number of card rows each lane can show on a screen of this size.
    pub fn list_rows(area: Rect) -> usize {
        let (_, body, _) = split_screen(area);
        let (list, _) = split_lane(body);
        list.height as usize
    }

    pub fn compute(area: Rect, board: &Board, scroll: &[usize; 3]) -> Self {
        let (header, body, status) = split_screen(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(body);

        let lanes = Lane::ALL.map(|lane| {
            let area = columns[lane.index()];
            let (list, input) = split_lane(area);
            let scroll = scroll[lane.index()];
            let cards = (scroll..board.lane(lane).len())
                .take(list.height as usize)
                .enumerate()
                .map(|(row, index)| CardSlot {
                    index,
                    area: Rect {
                        x: list.x,
                        y: list.y + row as u16,
                        width: list.width,
                        height: 1,
                    },
                })
                .collect();
            LaneLayout {
                area,
                list,
                input,
                scroll,
                cards,
            }
        });

        Self {
            header,
            status,
            lanes,
        }
    }

    pub fn lane(&self, lane: Lane) -> &LaneLayout {
        &self.lanes[lane.index()]
    }

    /// The lane panel under the given cell.
    pub fn lane_at(&self, x: u16, y: u16) -> Option<Lane> {
        Lane::ALL
            .into_iter()
            .find(|lane| contains(self.lane(*lane).area, x, y))
    }

    /// The card drawn at the given cell.
    pub fn card_at(&self, x: u16, y: u16) -> Option<Position> {
        let lane = self.lane_at(x, y)?;
        self.lane(lane)
            .cards
            .iter()
            .find(|slot| contains(slot.area, x, y))
            .map(|slot| Position::new(lane, slot.index))
    }

    /// Where a card dragged from `source` lands when released at the given cell.
    ///
    /// The row under the pointer is read as an index into the destination
    /// lane after the card has left its source, clamped to that lane's end.
    /// Returns `None` outside every lane panel.
    pub fn drop_target(&self, board: &Board, source: Position, x: u16, y: u16) -> Option<Position> {
        let lane = self.lane_at(x, y)?;
        let layout = self.lane(lane);
        let row = y.saturating_sub(layout.list.y) as usize;
        let row = row.min(layout.list.height.saturating_sub(1) as usize);

        let len = board.lane(lane).len();
        let limit = if lane == source.lane { len.saturating_sub(1) } else { len };
        Some(Position::new(lane, (layout.scroll + row).min(limit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    fn board(todo: usize, done: usize) -> Board {
        let mut board = Board::default();
        for i in 0..todo {
            board.push(Lane::Todo, Task::new(format!("t{i}"), format!("todo {i}")));
        }
        for i in 0..done {
            board.push(Lane::Done, Task::new(format!("d{i}"), format!("done {i}")));
        }
        board
    }

    // 90x30 screen: header row 0, lanes rows 1..27, status rows 27..30.
    // Lanes are 30 columns wide; card rows start at y = 2.
    fn area() -> Rect {
        Rect::new(0, 0, 90, 30)
    }

    #[test]
    fn test_lane_geometry() {
        let layout = BoardLayout::compute(area(), &board(2, 0), &[0; 3]);
        assert_eq!(layout.lane(Lane::Todo).area, Rect::new(0, 1, 30, 26));
        assert_eq!(layout.lane(Lane::InProgress).area.x, 30);
        assert_eq!(layout.lane(Lane::Done).area.x, 60);
        assert_eq!(layout.lane(Lane::Todo).list, Rect::new(1, 2, 28, 21));
        assert_eq!(layout.lane(Lane::Todo).input, Rect::new(1, 23, 28, 3));
        assert_eq!(BoardLayout::list_rows(area()), 21);
    }

    #[test]
    fn test_card_at() {
        let layout = BoardLayout::compute(area(), &board(2, 1), &[0; 3]);
        assert_eq!(layout.card_at(5, 2), Some(Position::new(Lane::Todo, 0)));
        assert_eq!(layout.card_at(5, 3), Some(Position::new(Lane::Todo, 1)));
        assert_eq!(layout.card_at(5, 4), None);
        assert_eq!(layout.card_at(65, 2), Some(Position::new(Lane::Done, 0)));
        assert_eq!(layout.card_at(5, 0), None);
    }

    #[test]
    fn test_card_at_respects_scroll() {
        let layout = BoardLayout::compute(area(), &board(30, 0), &[5, 0, 0]);
        assert_eq!(layout.card_at(5, 2), Some(Position::new(Lane::Todo, 5)));
        assert_eq!(layout.lane(Lane::Todo).cards.len(), 21);
    }

    #[test]
    fn test_drop_target_other_lane() {
        let board = board(3, 1);
        let layout = BoardLayout::compute(area(), &board, &[0; 3]);
        let source = Position::new(Lane::Todo, 0);

        assert_eq!(
            layout.drop_target(&board, source, 65, 2),
            Some(Position::new(Lane::Done, 0))
        );
        // Below the last card appends.
        assert_eq!(
            layout.drop_target(&board, source, 65, 20),
            Some(Position::new(Lane::Done, 1))
        );
        // Empty lane.
        assert_eq!(
            layout.drop_target(&board, source, 40, 10),
            Some(Position::new(Lane::InProgress, 0))
        );
    }

    #[test]
    fn test_drop_target_same_lane_uses_post_removal_indices() {
        let board = board(3, 0);
        let layout = BoardLayout::compute(area(), &board, &[0; 3]);
        let source = Position::new(Lane::Todo, 0);

        assert_eq!(
            layout.drop_target(&board, source, 5, 4),
            Some(Position::new(Lane::Todo, 2))
        );
        assert_eq!(
            layout.drop_target(&board, source, 5, 25),
            Some(Position::new(Lane::Todo, 2))
        );
    }

    #[test]
    fn test_drop_target_outside_lanes() {
        let board = board(3, 0);
        let layout = BoardLayout::compute(area(), &board, &[0; 3]);
        let source = Position::new(Lane::Todo, 0);
        assert_eq!(layout.drop_target(&board, source, 5, 0), None);
        assert_eq!(layout.drop_target(&board, source, 5, 28), None);
    }
}
