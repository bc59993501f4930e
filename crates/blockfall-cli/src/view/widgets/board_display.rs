use std::iter;

use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, GameSnapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::{BlockDisplay, CellView};

type CellGrid = [[CellView; BOARD_WIDTH]; BOARD_HEIGHT];

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    snapshot: &'a GameSnapshot,
    show_ghost: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot) -> Self {
        Self {
            snapshot,
            show_ghost: false,
            block: None,
        }
    }

    pub fn ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * BlockDisplay::width() + super::block_margins(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        20 * BlockDisplay::height() + super::block_margins(self.block.as_ref()).1
    }

    /// Locked cells with the ghost and the active piece laid over them.
    fn cells(&self) -> CellGrid {
        let mut cells = self
            .snapshot
            .grid
            .map(|row| row.map(CellView::from_color_value));
        let mut paint = |(x, y): (i32, i32), cell: CellView| {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && let Some(slot) = cells.get_mut(y).and_then(|row| row.get_mut(x))
            {
                *slot = cell;
            }
        };
        if self.show_ghost {
            for &pos in &self.snapshot.ghost_cells {
                paint(pos, CellView::Ghost);
            }
        }
        if !self.snapshot.state.is_finished() {
            let active = &self.snapshot.active;
            for &pos in &active.cells {
                paint(pos, CellView::Piece(active.kind));
            }
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.cells()) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                BlockDisplay::from_cell(cell, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, GameSession, PieceKind, PieceSeed};

    use super::*;

    #[test]
    fn test_active_piece_drawn_over_ghost() {
        let session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_bytes([3; 16]));
        let mut snapshot = session.snapshot();
        snapshot.active.kind = PieceKind::T;
        snapshot.active.cells = [(4, 18), (5, 18), (6, 18), (5, 19)].into_iter().collect();
        snapshot.ghost_cells = [(4, 19), (5, 19), (6, 19), (5, 20)].into_iter().collect();
        snapshot.grid[19][0] = PieceKind::I.color_value();

        let cells = BoardDisplay::new(&snapshot).ghost(true).cells();
        assert_eq!(cells[19][0], CellView::Piece(PieceKind::I));
        assert_eq!(cells[18][5], CellView::Piece(PieceKind::T));
        assert_eq!(cells[19][5], CellView::Piece(PieceKind::T));
        assert_eq!(cells[19][4], CellView::Ghost);
        assert_eq!(cells[0][0], CellView::Empty);
    }

    #[test]
    fn test_cells_above_board_are_clipped() {
        let session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_bytes([3; 16]));
        let snapshot = session.snapshot();
        assert!(snapshot.active.cells.iter().all(|&(_, y)| y < 0));
        let cells = BoardDisplay::new(&snapshot).cells();
        assert!(cells.iter().flatten().all(|cell| *cell == CellView::Empty));
    }
}
