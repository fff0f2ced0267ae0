use std::time::Duration;

use blockfall_engine::{GameEvent, GameSession, SessionState, TickInput};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    tui::{App, Tui},
    ui::widgets::SessionDisplay,
};

const FPS: f64 = 60.0;

/// How long a collapsed row stays highlighted before the session may go on.
const COLLAPSE_HIGHLIGHT: Duration = Duration::from_millis(200);

/// Interactive game.
///
/// Key presses are collected between ticks and handed to the session as a single
/// [`TickInput`]; a held arrow key repeats at the terminal's key repeat rate,
/// throttled by the session's move delay.
#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    input: TickInput,
    collapsed_row: Option<i32>,
    highlight_elapsed: Option<Duration>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            input: TickInput::NONE,
            collapsed_row: None,
            highlight_elapsed: None,
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn is_playing(&self) -> bool {
        !self.is_exiting && self.session.state().is_playing()
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let is_playing = self.is_playing();
        let state = self.session.state();

        if let Some(event) = event.as_key_press_event() {
            match event.code {
                KeyCode::Left if is_playing => self.input.horizontal = -1.0,
                KeyCode::Right if is_playing => self.input.horizontal = 1.0,
                KeyCode::Up | KeyCode::Char('x') if is_playing => self.input.rotate = true,
                KeyCode::Down | KeyCode::Char(' ') if is_playing => self.input.drop = true,
                KeyCode::Char('p') if !state.is_game_over() => self.session.toggle_pause(),
                KeyCode::Char('r') if state.is_game_over() => {
                    self.session.restart();
                    self.collapsed_row = None;
                    self.highlight_elapsed = None;
                }
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session).collapsed_row(self.collapsed_row);
        let help_text = match self.session.state() {
            SessionState::Playing => {
                "Controls: ← → (Move) | ↑ X (Rotate) | ↓ Space (Drop) | P (Pause) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | Q (Quit)",
            SessionState::GameOver => "Controls: R (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _tui: &mut Tui, dt: Duration) {
        let input = std::mem::replace(&mut self.input, TickInput::NONE);
        self.session.advance(dt.as_secs_f32(), &input);

        let mut collapsed = false;
        for event in self.session.take_events() {
            if let GameEvent::RowCollapsed(collapse) = event {
                self.collapsed_row = Some(collapse.y);
                self.highlight_elapsed = Some(Duration::ZERO);
                collapsed = true;
            }
        }

        // A row that collapsed on this tick gets its full highlight time.
        if !collapsed
            && self.session.state().is_playing()
            && let Some(elapsed) = &mut self.highlight_elapsed
        {
            *elapsed += dt;
            if *elapsed >= COLLAPSE_HIGHLIGHT {
                self.highlight_elapsed = None;
                self.session.notify_collapse_settled();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, SequenceShapeSource, ShapeCatalog, ShapeDefinition};
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn app() -> PlayApp {
        let config = GameConfig::default();
        let catalog = ShapeCatalog::standard(config.max_shape_size).unwrap();
        PlayApp::new(GameSession::new(config, catalog, SequenceShapeSource::new(vec![1])).unwrap())
    }

    fn press(app: &mut PlayApp, tui: &mut Tui, code: KeyCode) {
        app.handle_event(tui, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_key_press_moves_piece_on_next_tick() {
        let mut tui = Tui::new();
        let mut app = app();
        let x = app.session().active_piece().unwrap().anchor_x();

        press(&mut app, &mut tui, KeyCode::Left);
        assert_eq!(app.session().active_piece().unwrap().anchor_x(), x);
        app.update(&mut tui, Duration::from_millis(16));
        assert_eq!(app.session().active_piece().unwrap().anchor_x(), x - 1);

        // The input is consumed by the tick.
        app.update(&mut tui, Duration::from_millis(200));
        assert_eq!(app.session().active_piece().unwrap().anchor_x(), x - 1);
    }

    #[test]
    fn test_pause_and_quit() {
        let mut tui = Tui::new();
        let mut app = app();

        press(&mut app, &mut tui, KeyCode::Char('p'));
        assert!(app.session().state().is_paused());
        press(&mut app, &mut tui, KeyCode::Char(' '));
        app.update(&mut tui, Duration::from_millis(16));
        assert!(!app.session().active_piece().unwrap().is_dropped());

        press(&mut app, &mut tui, KeyCode::Char('p'));
        press(&mut app, &mut tui, KeyCode::Char(' '));
        app.update(&mut tui, Duration::from_millis(16));
        assert!(app.session().active_piece().unwrap().is_dropped());

        assert!(!app.should_exit());
        press(&mut app, &mut tui, KeyCode::Char('q'));
        assert!(app.should_exit());
    }

    #[test]
    fn test_collapse_settles_without_session_timer() {
        let config = GameConfig {
            field_width: 2,
            field_height: 4,
            max_shape_size: 2,
            collapse_settle_time: None,
            ..GameConfig::default()
        };
        let catalog =
            ShapeCatalog::from_definitions(&[ShapeDefinition::new("O", &["11", "11"])], 2).unwrap();
        let session = GameSession::new(config, catalog, SequenceShapeSource::new(vec![0])).unwrap();
        let mut tui = Tui::new();
        let mut app = PlayApp::new(session);

        press(&mut app, &mut tui, KeyCode::Char(' '));
        let mut resumed = false;
        for _ in 0..600 {
            app.update(&mut tui, Duration::from_millis(16));
            if app.session().stats().total_rows_cleared() == 2 {
                resumed = true;
                break;
            }
        }
        assert!(resumed);
        assert!(!app.session().is_collapsing());
        assert!(app.session().active_piece().is_some());
        assert_eq!(app.session().field().occupied_playable_cells().count(), 0);
    }
}
