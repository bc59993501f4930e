use blockfall_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{BlockDisplay, CellView, style};

/// Spawn-orientation preview of a piece (hold and next slots).
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    dimmed: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            dimmed: false,
            block: None,
        }
    }

    pub fn piece(self, piece: Option<PieceKind>) -> Self {
        Self { piece, ..self }
    }

    /// Draws the piece gray, e.g. a hold slot that cannot be used right now.
    pub fn dimmed(self, dimmed: bool) -> Self {
        Self { dimmed, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_margins(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_margins(self.block.as_ref()).1
    }
}

/// Occupied cells of the spawn shape, shifted so the bounding box starts at `(0, 0)`,
/// plus the box size.
fn preview_cells(kind: PieceKind) -> (Vec<(u16, u16)>, (u16, u16)) {
    let offsets = kind.spawn_matrix().occupied_offsets().collect::<Vec<_>>();
    let min_x = offsets.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let min_y = offsets.iter().map(|&(_, y)| y).min().unwrap_or(0);
    let cells = offsets
        .iter()
        .filter_map(|&(x, y)| {
            Some((
                u16::try_from(x - min_x).ok()?,
                u16::try_from(y - min_y).ok()?,
            ))
        })
        .collect::<Vec<_>>();
    let width = cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
    let height = cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
    (cells, (width, height))
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty_block = BlockDisplay::from_cell(CellView::Empty, false);
        for y in area.top()..area.bottom() {
            let row = Rect::new(area.x, y, area.width, 1);
            Widget::render(&empty_block, row, buf);
        }

        let Some(piece) = self.piece else {
            return;
        };
        let (cells, (w, h)) = preview_cells(piece);
        let piece_area = area.centered(
            Constraint::Length(w * BlockDisplay::width()),
            Constraint::Length(h * BlockDisplay::height()),
        );
        let col_constraints = (0..w).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..h).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal))
            .collect::<Vec<_>>();

        let occupied_block = if self.dimmed {
            BlockDisplay::new(style::DIMMED, "")
        } else {
            BlockDisplay::from_cell(CellView::Piece(piece), false)
        };
        for (x, y) in cells {
            if let Some(&grid_cell) = grid_rows
                .get(usize::from(y))
                .and_then(|row| row.get(usize::from(x)))
            {
                Widget::render(&occupied_block, grid_cell, buf);
            }
        }
    }
}
