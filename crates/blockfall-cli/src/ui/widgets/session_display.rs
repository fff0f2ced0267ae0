use blockfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{FieldDisplay, StatsDisplay, color, style};

/// The field next to the statistics panel, with a popup while paused or over.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    collapsed_row: Option<i32>,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            collapsed_row: None,
        }
    }

    pub fn collapsed_row(self, collapsed_row: Option<i32>) -> Self {
        Self {
            collapsed_row,
            ..self
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
        let border_style = match self.session.state() {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };

        let field = {
            let widget = FieldDisplay::new(self.session.field()).block(
                Block::bordered()
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
            let widget = match self.session.active_piece() {
                Some(piece) => widget.piece(piece),
                None => widget,
            };
            match self.collapsed_row {
                Some(y) if self.session.is_collapsing() => widget.collapsed_row(y),
                _ => widget,
            }
        };
        let stats = StatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::symmetric(1, 0))
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [field_column, stats_column] = Layout::horizontal([
            Constraint::Length(field.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);
        let [field_area] =
            Layout::vertical([Constraint::Length(field.height())]).areas(field_column);
        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);

        let field_width = field.width();
        field.render(field_area, buf);
        stats.render(stats_area, buf);

        let popup = match self.session.state() {
            SessionState::Playing => None,
            SessionState::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area = field_area.centered(Constraint::Length(field_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
