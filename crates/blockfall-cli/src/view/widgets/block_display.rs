use blockfall_engine::PieceKind;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::style;

/// What a single board cell shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellView {
    #[default]
    Empty,
    Ghost,
    Piece(PieceKind),
}

impl CellView {
    /// Cell for a grid color value (0 is empty).
    pub fn from_color_value(value: u8) -> Self {
        PieceKind::from_color_value(value).map_or(CellView::Empty, CellView::Piece)
    }
}

/// One cell drawn two columns wide, so cells look square.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: CellView, show_dots: bool) -> Self {
        match cell {
            CellView::Empty if show_dots => Self::new(style::EMPTY_DOT, "."),
            CellView::Empty => Self::new(style::EMPTY, ""),
            CellView::Ghost => Self::new(style::GHOST, "[]"),
            CellView::Piece(kind) => Self::new(style::piece(kind), ""),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Paragraph fills the whole area, not just the cells under the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
