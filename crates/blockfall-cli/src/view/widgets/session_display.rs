use blockfall_engine::{GameOverError, GameSnapshot, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{
    BoardDisplay, PieceDisplay, ScoringGuideDisplay, StatsDisplay, color, style,
};

/// Board with hold, next, stats and scoring panels around it.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a GameSnapshot,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot) -> Self {
        Self {
            snapshot,
            show_ghost: true,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }
}

fn popup(state: SessionState) -> Option<(&'static str, &'static str, Style)> {
    match state {
        SessionState::Playing | SessionState::Abandoned => None,
        SessionState::Paused => Some((
            "PAUSED",
            "",
            Style::new().fg(color::BLACK).bg(color::YELLOW),
        )),
        SessionState::GameOver(reason) => {
            let detail = match reason {
                GameOverError::LockOut => "locked out",
                GameOverError::BlockOut => "blocked out",
            };
            Some((
                "GAME OVER!!",
                detail,
                Style::new().fg(color::WHITE).bg(color::RED),
            ))
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.snapshot.state {
            SessionState::Playing | SessionState::Abandoned => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver(_) => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style)
        };

        let game_board = BoardDisplay::new(self.snapshot)
            .ghost(self.show_ghost)
            .block(Block::bordered().border_style(border_style).style(style));
        let hold_panel = PieceDisplay::new()
            .piece(self.snapshot.hold)
            .dimmed(!self.snapshot.can_hold)
            .block(panel("HOLD"));
        let next_panel = PieceDisplay::new()
            .piece(Some(self.snapshot.next))
            .block(panel("NEXT"));
        let stats = StatsDisplay::new(self.snapshot).block(panel("STATS"));
        let guide = ScoringGuideDisplay::new().block(panel("SCORING"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(u16::max(next_panel.width(), guide.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area, guide_area] = Layout::vertical([
            Constraint::Length(next_panel.height()),
            Constraint::Length(guide.height()),
        ])
        .spacing(1)
        .areas(right_column);
        let next_area = next_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(next_panel.width())]).flex(Flex::Start),
        )[0];
        let guide_area = guide_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(guide.width())]).flex(Flex::Start),
        )[0];

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);
        guide.render(guide_area, buf);

        if let Some((title, detail, style)) = popup(self.snapshot.state) {
            let block = Block::new().style(style);
            let text = Text::from(vec![Line::from(title), Line::from(detail)])
                .style(style)
                .centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(4));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(2)), buf);
        }
    }
}
