use blockfall_engine::{Action, GameSession, InputEvent, SessionState};
use blockfall_runtime::{App, FrameInput, Runtime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    keys::{KeyBindings, KeyLatch},
    view::widgets::{KeyBindingDisplay, KeyHint, SessionDisplay},
};

const FPS: f64 = 60.0;

const PLAYING_HINTS: &[(Action, &str)] = &[
    (Action::MoveLeft, "Left"),
    (Action::MoveRight, "Right"),
    (Action::SoftDrop, "Soft Drop"),
    (Action::HardDrop, "Hard Drop"),
    (Action::Rotate, "Rotate"),
    (Action::RotateCounterClockwise, "Rotate CCW"),
    (Action::Hold, "Hold"),
    (Action::Pause, "Pause"),
    (Action::Escape, "Quit"),
];
const PAUSED_HINTS: &[(Action, &str)] = &[(Action::Pause, "Resume"), (Action::Escape, "Quit")];
const GAME_OVER_HINTS: &[(Action, &str)] = &[(Action::Escape, "Quit")];

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    bindings: KeyBindings,
    latch: KeyLatch,
    show_ghost: bool,
    hints: [Vec<KeyHint>; 3],
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, bindings: KeyBindings, show_ghost: bool) -> Self {
        let hints = [PLAYING_HINTS, PAUSED_HINTS, GAME_OVER_HINTS]
            .map(|actions| KeyHint::for_actions(&bindings, actions));
        Self {
            session,
            bindings,
            latch: KeyLatch::new(false),
            show_ghost,
            hints,
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Maps this frame's terminal events to engine input, in arrival order.
    fn collect_input(&mut self, input: &FrameInput) -> Vec<InputEvent> {
        let mut events = vec![];
        for key in input.events.iter().filter_map(|event| event.as_key_event()) {
            if is_interrupt(key) {
                self.is_exiting = true;
                continue;
            }
            if let Some(action) = self.bindings.action(key.code) {
                self.latch
                    .key_event(action, key.kind, input.now_ms, &mut events);
            }
        }
        self.latch.expire(input.now_ms, &mut events);
        events
    }
}

fn is_interrupt(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_frame_rate(FPS);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn update(&mut self, runtime: &mut Runtime, input: FrameInput) {
        self.latch.set_release_events(runtime.key_release_events());
        let events = self.collect_input(&input);

        match *self.session.session_state() {
            SessionState::GameOver(_) => {
                let quit = events
                    .iter()
                    .any(|e| e.action == Action::Escape && e.transition.is_pressed());
                if quit {
                    self.is_exiting = true;
                }
            }
            SessionState::Abandoned => self.is_exiting = true,
            SessionState::Playing | SessionState::Paused => {
                self.session.update(input.now_ms, &events);
                if self.session.session_state().is_abandoned() {
                    self.is_exiting = true;
                }
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.session.snapshot();
        let session_display = SessionDisplay::new(&snapshot).show_ghost(self.show_ghost);
        let hints = match snapshot.state {
            SessionState::Playing | SessionState::Abandoned => &self.hints[0],
            SessionState::Paused => &self.hints[1],
            SessionState::GameOver(_) => &self.hints[2],
        };
        let help = KeyBindingDisplay::new(hints);

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(24), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, PieceSeed};
    use crossterm::event::Event;

    use super::*;

    fn app() -> PlayApp {
        let session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_bytes([1; 16]));
        PlayApp::new(session, KeyBindings::default(), true)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_collect_input_maps_bound_keys() {
        let mut app = app();
        let input = FrameInput {
            now_ms: 0,
            events: vec![
                key(KeyCode::Left, KeyModifiers::NONE),
                key(KeyCode::Char('m'), KeyModifiers::NONE),
                key(KeyCode::Char('Z'), KeyModifiers::SHIFT),
            ],
        };
        assert_eq!(
            app.collect_input(&input),
            [
                InputEvent::pressed(Action::MoveLeft),
                InputEvent::pressed(Action::RotateCounterClockwise)
            ]
        );
        assert!(!app.should_exit());
    }

    #[test]
    fn test_ctrl_c_exits() {
        let mut app = app();
        let input = FrameInput {
            now_ms: 0,
            events: vec![key(KeyCode::Char('c'), KeyModifiers::CONTROL)],
        };
        assert!(app.collect_input(&input).is_empty());
        assert!(app.should_exit());
    }
}
