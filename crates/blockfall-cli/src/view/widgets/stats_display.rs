use std::iter;

use blockfall_engine::GameSnapshot;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

pub struct StatsDisplay<'a> {
    snapshot: &'a GameSnapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot) -> Self {
        Self {
            snapshot,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_margins(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_margins(self.block.as_ref()).1
    }
}

type Value = fn(&GameSnapshot) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    /// Highlighted, right-aligned, blank when the value is empty.
    Flash(Value),
    LabelValue(&'static str, Value),
}

fn format_elapsed(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!(
        "{:0}:{:0>2}.{:0>2}",
        secs / 60,
        secs % 60,
        (elapsed_ms % 1000) / 10
    )
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(|snap| snap.score.to_string()),
    Row::Flash(|snap| {
        snap.points_display
            .map(|points| format!("+{points}"))
            .unwrap_or_default()
    }),
    Row::FullLabel("TIME:"),
    Row::FullValue(|snap| format_elapsed(snap.elapsed_ms)),
    Row::Empty,
    Row::LabelValue("LEVEL:", |snap| snap.level.to_string()),
    Row::LabelValue("LINES:", |snap| snap.lines.to_string()),
    Row::LabelValue("B2B:", |snap| {
        String::from(if snap.back_to_back { "ON" } else { "-" })
    }),
    Row::Empty,
    Row::LabelValue("PIECES:", |snap| snap.pieces.to_string()),
    Row::LabelValue("SINGLES:", |snap| snap.line_clears[1].to_string()),
    Row::LabelValue("DOUBLES:", |snap| snap.line_clears[2].to_string()),
    Row::LabelValue("TRIPLES:", |snap| snap.line_clears[3].to_string()),
    Row::LabelValue("TETRIS:", |snap| snap.line_clears[4].to_string()),
    Row::LabelValue("T-SPINS:", |snap| snap.tspin_clears.to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.snapshot), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::Flash(value) => {
                    Line::styled(value(self.snapshot), style::HIGHLIGHT)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.snapshot), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, GameSession, PieceSeed};

    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn test_counters_come_from_snapshot() {
        let session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_bytes([5; 16]));
        let mut snapshot = session.snapshot();
        snapshot.back_to_back = true;
        snapshot.pieces = 42;
        snapshot.line_clears = [30, 7, 0, 2, 3];
        snapshot.tspin_clears = 4;

        let stats = StatsDisplay::new(&snapshot);
        let area = Rect::new(0, 0, stats.width(), stats.height());
        let mut buf = Buffer::empty(area);
        stats.render(area, &mut buf);

        let row = |label: &str| {
            (0..area.height)
                .map(|y| row_text(&buf, y))
                .find(|text| text.starts_with(label))
                .unwrap()
        };
        assert!(row("B2B:").trim_end().ends_with("ON"));
        assert!(row("PIECES:").trim_end().ends_with("42"));
        assert!(row("SINGLES:").trim_end().ends_with('7'));
        assert!(row("TETRIS:").trim_end().ends_with('3'));
        assert!(row("T-SPINS:").trim_end().ends_with('4'));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00.00");
        assert_eq!(format_elapsed(61_234), "1:01.23");
        assert_eq!(format_elapsed(600_990), "10:00.99");
    }
}
