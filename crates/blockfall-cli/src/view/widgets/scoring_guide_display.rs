use std::iter;

use blockfall_engine::LineClear;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{color, style};

/// Points per clear at level 0 and the back-to-back bonus.
#[derive(Debug, Default)]
pub struct ScoringGuideDisplay<'a> {
    block: Option<BlockWidget<'a>>,
}

#[derive(Debug, Clone, Copy)]
enum GuideRow {
    Empty,
    Heading(&'static str),
    Clear(&'static str, LineClear),
    Note(&'static str, &'static str),
}

const GUIDE: &[GuideRow] = &[
    GuideRow::Heading("NORMAL"),
    GuideRow::Clear("1 LINE", LineClear::Single),
    GuideRow::Clear("2 LINES", LineClear::Double),
    GuideRow::Clear("3 LINES", LineClear::Triple),
    GuideRow::Clear("4 LINES", LineClear::Tetris),
    GuideRow::Empty,
    GuideRow::Heading("T-SPIN"),
    GuideRow::Clear("DOUBLE", LineClear::TSpinDouble),
    GuideRow::Clear("TRIPLE", LineClear::TSpinTriple),
    GuideRow::Empty,
    GuideRow::Note("B2B", "+50%"),
    GuideRow::Note("LEVEL N", "xN+1"),
];

const GUIDE_STYLE: Style = Style::new().fg(color::GRAY).bg(color::BLACK);

impl<'a> ScoringGuideDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self { block: Some(block) }
    }

    pub fn width(&self) -> u16 {
        12 + super::block_margins(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        u16::try_from(GUIDE.len()).unwrap_or(u16::MAX)
            + super::block_margins(self.block.as_ref()).1
    }
}

impl Widget for ScoringGuideDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows_areas =
            Layout::vertical((0..GUIDE.len()).map(|_| Constraint::Length(1))).split(area);
        for (row, area) in iter::zip(GUIDE.iter().copied(), rows_areas.iter().copied()) {
            let (label, value) = match row {
                GuideRow::Empty => continue,
                GuideRow::Heading(heading) => {
                    Line::styled(heading, style::DEFAULT).render(area, buf);
                    continue;
                }
                GuideRow::Clear(label, clear) => (label, clear.base_points().to_string()),
                GuideRow::Note(label, note) => (label, note.to_owned()),
            };
            Line::styled(label, GUIDE_STYLE)
                .left_aligned()
                .render(area, buf);
            Line::styled(value, GUIDE_STYLE)
                .right_aligned()
                .render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn test_guide_shows_engine_points() {
        let guide = ScoringGuideDisplay::new();
        let area = Rect::new(0, 0, guide.width(), guide.height());
        let mut buf = Buffer::empty(area);
        guide.render(area, &mut buf);

        assert_eq!(row_text(&buf, 0).trim_end(), "NORMAL");
        assert_eq!(row_text(&buf, 1), "1 LINE     1");
        assert_eq!(row_text(&buf, 4), "4 LINES    8");
        assert_eq!(row_text(&buf, 7), "DOUBLE    12");
        assert_eq!(row_text(&buf, 8), "TRIPLE    36");
        assert_eq!(row_text(&buf, 10), "B2B     +50%");
        assert_eq!(row_text(&buf, 11), "LEVEL N xN+1");
    }
}
