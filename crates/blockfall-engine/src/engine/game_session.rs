use log::{debug, info, trace};
use serde::Serialize;

use crate::{
    GameOverError,
    core::piece::{Piece, RotationDirection},
};

use super::{
    config::{Difficulty, GameConfig},
    game_field::{GameField, LockEvent, SoftDrop},
    game_stats::GameStats,
    input::{Action, InputEvent, KeyTransition},
    piece_generator::PieceSeed,
    snapshot::GameSnapshot,
    timing::{AutoShift, ShiftDirection, soft_drop_delay_ms},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver(GameOverError),
    /// Left through `Escape`.
    Abandoned,
}

impl SessionState {
    /// Whether the session has ended and ignores further frames.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::GameOver(_) | SessionState::Abandoned)
    }
}

/// A single play session driven one frame at a time.
///
/// Each call to [`update`](Self::update) receives the current wall-clock time and the
/// input events gathered since the previous frame. The session keeps its own game clock,
/// which only advances while playing, so every timer (gravity, auto-shift, lock delay,
/// soft-drop acceleration, points display) freezes during a pause.
///
/// Within a frame, events are applied in arrival order, then horizontal auto-repeat, then
/// gravity.
#[derive(Debug, Clone)]
pub struct GameSession {
    field: GameField,
    stats: GameStats,
    config: GameConfig,
    state: SessionState,
    last_frame_at: Option<u64>,
    clock_ms: u64,
    drop_timer_ms: u64,
    auto_shift: AutoShift,
    soft_drop_started_at: Option<u64>,
}

impl GameSession {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_field(config, GameField::new())
    }

    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        Self::with_field(config, GameField::with_seed(seed))
    }

    /// Starts a session from a prepared field.
    #[must_use]
    pub fn with_field(config: GameConfig, field: GameField) -> Self {
        info!(
            "session started: difficulty {}, seed {}",
            config.difficulty,
            field.seed()
        );
        Self {
            field,
            stats: GameStats::new(),
            config,
            state: SessionState::Playing,
            last_frame_at: None,
            clock_ms: 0,
            drop_timer_ms: 0,
            auto_shift: AutoShift::new(),
            soft_drop_started_at: None,
        }
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.state
    }

    /// Game-clock time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.clock_ms
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        self.field.falling_piece()
    }

    /// Delay before the next automatic drop: the soft-drop delay while that key is held,
    /// the level's fall delay otherwise.
    #[must_use]
    pub fn current_fall_delay_ms(&self) -> u64 {
        match self.soft_drop_started_at {
            Some(started) => soft_drop_delay_ms(
                self.clock_ms.saturating_sub(started),
                &self.config.timing,
            ),
            None => self.config.fall_delay_ms(self.stats.level()),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            state => state,
        };
        debug!("session state: {:?}", self.state);
    }

    /// Advances the session to wall-clock time `now_ms` with this frame's events.
    pub fn update(&mut self, now_ms: u64, events: &[InputEvent]) {
        if self.state.is_finished() {
            return;
        }

        let delta = self
            .last_frame_at
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_frame_at = Some(now_ms);
        if self.state.is_playing() {
            self.clock_ms += delta;
        }

        for event in events {
            self.handle_event(*event);
            if self.state.is_finished() {
                return;
            }
        }

        if !self.state.is_playing() {
            return;
        }
        self.apply_auto_shift();
        self.apply_gravity();
    }

    fn handle_event(&mut self, event: InputEvent) {
        let InputEvent { action, transition } = event;
        if transition == KeyTransition::Released {
            // Releases are tracked even while paused so held keys do not stick.
            match action {
                Action::MoveLeft => self.auto_shift.release(ShiftDirection::Left),
                Action::MoveRight => self.auto_shift.release(ShiftDirection::Right),
                Action::SoftDrop => self.soft_drop_started_at = None,
                _ => {}
            }
            return;
        }

        match action {
            Action::Pause => {
                self.toggle_pause();
                return;
            }
            Action::Escape => {
                info!(
                    "session abandoned: score {}, lines {}",
                    self.stats.score(),
                    self.stats.total_cleared_lines()
                );
                self.state = SessionState::Abandoned;
                return;
            }
            _ => {}
        }
        if !self.state.is_playing() {
            return;
        }

        match action {
            Action::MoveLeft => self.press_shift(ShiftDirection::Left),
            Action::MoveRight => self.press_shift(ShiftDirection::Right),
            Action::SoftDrop => self.soft_drop_started_at = Some(self.clock_ms),
            Action::Rotate => {
                self.field.try_rotate(RotationDirection::Clockwise).ok();
            }
            Action::RotateCounterClockwise => {
                self.field
                    .try_rotate(RotationDirection::CounterClockwise)
                    .ok();
            }
            Action::HardDrop => {
                let result = self.field.hard_drop();
                self.complete_lock(result);
            }
            Action::Hold => {
                if let Err(e) = self.field.try_hold() {
                    debug!("hold rejected: {e}");
                }
            }
            Action::Pause | Action::Escape => {}
        }
    }

    fn press_shift(&mut self, direction: ShiftDirection) {
        self.auto_shift.press(direction, self.clock_ms);
        self.field.try_move(direction.dx()).ok();
    }

    fn apply_auto_shift(&mut self) {
        if let Some(direction) = self.auto_shift.poll(self.clock_ms, &self.config.timing) {
            self.field.try_move(direction.dx()).ok();
        }
    }

    fn apply_gravity(&mut self) {
        let delay = self.current_fall_delay_ms();
        if self.clock_ms.saturating_sub(self.drop_timer_ms) <= delay {
            return;
        }
        self.drop_timer_ms = self.clock_ms;
        trace!("gravity tick at {} ms (delay {delay} ms)", self.clock_ms);
        match self
            .field
            .soft_drop(self.clock_ms, self.config.timing.lock_delay_ms)
        {
            Ok(SoftDrop::Locked(event)) => self.complete_lock(Ok(event)),
            Ok(SoftDrop::Moved | SoftDrop::Grounded) => {}
            Err(e) => self.complete_lock(Err(e)),
        }
    }

    fn complete_lock(&mut self, result: Result<LockEvent, GameOverError>) {
        let result = result.and_then(|event| {
            self.stats.complete_piece_drop(&event, self.clock_ms);
            self.field.spawn()
        });
        if let Err(e) = result {
            info!(
                "game over ({e}): score {}, lines {}, level {}",
                self.stats.score(),
                self.stats.total_cleared_lines(),
                self.stats.level()
            );
            self.state = SessionState::GameOver(e);
        }
    }

    /// Captures everything a renderer needs for this frame.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let field = &self.field;
        GameSnapshot {
            grid: field.board().color_grid(),
            active: field.falling_piece().into(),
            ghost_cells: field.drop_position().occupied_positions().collect(),
            hold: field.held_piece().map(Piece::kind),
            next: field.next_piece().kind(),
            can_hold: !field.is_hold_used(),
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            back_to_back: self.stats.is_back_to_back(),
            pieces: self.stats.completed_pieces(),
            line_clears: *self.stats.line_cleared_counter(),
            tspin_clears: self.stats.tspin_clears(),
            points_display: self
                .stats
                .points_display(self.clock_ms, self.config.timing.points_display_ms),
            state: self.state,
            elapsed_ms: self.clock_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, PieceKind};

    const SEED: PieceSeed = PieceSeed::from_bytes([3; 16]);

    fn session_with(board: &str, kind: PieceKind) -> GameSession {
        let mut field = GameField::with_board(Board::from_ascii(board), SEED).unwrap();
        field.set_falling_piece(Piece::new(kind)).unwrap();
        GameSession::with_field(GameConfig::default(), field)
    }

    fn press(action: Action) -> InputEvent {
        InputEvent::pressed(action)
    }

    fn release(action: Action) -> InputEvent {
        InputEvent::released(action)
    }

    fn x(session: &GameSession) -> i32 {
        session.falling_piece().position().x()
    }

    fn y(session: &GameSession) -> i32 {
        session.falling_piece().position().y()
    }

    #[test]
    fn test_gravity_uses_strict_delay() {
        let mut session = session_with("", PieceKind::O);
        session.update(0, &[]);
        session.update(1500, &[]);
        assert_eq!(y(&session), -2);
        session.update(1501, &[]);
        assert_eq!(y(&session), -1);
        session.update(3001, &[]);
        assert_eq!(y(&session), -1);
        session.update(3002, &[]);
        assert_eq!(y(&session), 0);
    }

    #[test]
    fn test_difficulty_changes_fall_delay() {
        let mut session = session_with("", PieceKind::O);
        session.set_difficulty(Difficulty::Hard);
        assert_eq!(session.current_fall_delay_ms(), 200);
        session.update(0, &[]);
        session.update(201, &[]);
        assert_eq!(y(&session), -1);
    }

    #[test]
    fn test_move_and_auto_repeat() {
        let mut session = session_with("", PieceKind::O);
        session.update(0, &[press(Action::MoveLeft)]);
        assert_eq!(x(&session), 3);
        session.update(199, &[]);
        assert_eq!(x(&session), 3);
        session.update(200, &[]);
        assert_eq!(x(&session), 2);
        session.update(239, &[]);
        assert_eq!(x(&session), 2);
        session.update(240, &[]);
        assert_eq!(x(&session), 1);
        session.update(280, &[]);
        session.update(320, &[]);
        assert_eq!(x(&session), 0);
        session.update(330, &[release(Action::MoveLeft)]);
        session.update(1000, &[]);
        assert_eq!(x(&session), 0);
    }

    #[test]
    fn test_opposite_direction_takes_over() {
        let mut session = session_with("", PieceKind::O);
        session.update(0, &[press(Action::MoveLeft)]);
        session.update(100, &[press(Action::MoveRight)]);
        assert_eq!(x(&session), 4);
        session.update(150, &[release(Action::MoveLeft)]);
        session.update(299, &[]);
        assert_eq!(x(&session), 4);
        session.update(300, &[]);
        assert_eq!(x(&session), 5);
    }

    #[test]
    fn test_soft_drop_uses_fast_delay() {
        let mut session = session_with("", PieceKind::O);
        session.update(0, &[press(Action::SoftDrop)]);
        assert_eq!(session.current_fall_delay_ms(), 120);
        session.update(120, &[]);
        assert_eq!(y(&session), -2);
        session.update(121, &[]);
        assert_eq!(y(&session), -1);

        session.update(200, &[release(Action::SoftDrop)]);
        assert_eq!(session.current_fall_delay_ms(), 1500);
    }

    #[test]
    fn test_hard_drop_spawns_next_piece() {
        let mut session = session_with("", PieceKind::O);
        let next = session.field().next_piece().kind();
        session.update(0, &[press(Action::HardDrop)]);

        let o = PieceKind::O.color_value();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.grid[18], [0, 0, 0, 0, o, o, 0, 0, 0, 0]);
        assert_eq!(snapshot.grid[19], [0, 0, 0, 0, o, o, 0, 0, 0, 0]);
        assert_eq!(snapshot.active.kind, next);
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.stats().score(), 0);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut session = session_with("", PieceKind::O);
        session.update(0, &[]);
        session.update(100, &[press(Action::Pause)]);
        assert!(session.session_state().is_paused());
        assert_eq!(session.elapsed_ms(), 100);

        session.update(5000, &[press(Action::HardDrop), press(Action::MoveLeft)]);
        assert_eq!(session.elapsed_ms(), 100);
        assert_eq!(session.stats().completed_pieces(), 0);
        assert_eq!((x(&session), y(&session)), (4, -2));

        session.update(5100, &[press(Action::Pause)]);
        assert!(session.session_state().is_playing());
        assert_eq!(session.elapsed_ms(), 100);
        session.update(5200, &[]);
        assert_eq!(session.elapsed_ms(), 200);
        assert_eq!(y(&session), -2);
    }

    #[test]
    fn test_escape_abandons_session() {
        let mut session = session_with("", PieceKind::O);
        session.update(0, &[press(Action::Escape), press(Action::HardDrop)]);
        assert_eq!(*session.session_state(), SessionState::Abandoned);
        assert!(session.session_state().is_finished());

        session.update(10_000, &[press(Action::HardDrop)]);
        assert_eq!(session.stats().completed_pieces(), 0);
        assert_eq!(session.elapsed_ms(), 0);
    }

    #[test]
    fn test_tspin_double_scores_and_displays() {
        let board = "
            ###...####
            ####.#####
        ";
        let mut session = session_with(board, PieceKind::T);
        session.update(
            0,
            &[
                press(Action::Rotate),
                press(Action::Rotate),
                press(Action::MoveLeft),
                release(Action::MoveLeft),
                press(Action::HardDrop),
            ],
        );
        assert_eq!(session.stats().score(), 12);
        assert_eq!(session.stats().tspin_clears(), 1);
        assert!(session.stats().is_back_to_back());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.points_display, Some(12));
        assert_eq!(snapshot.lines, 2);
        assert!(snapshot.back_to_back);
        assert_eq!(snapshot.pieces, 1);
        assert_eq!(snapshot.line_clears, [0, 0, 1, 0, 0]);
        assert_eq!(snapshot.tspin_clears, 1);
        assert!(snapshot.grid.iter().flatten().all(|&c| c == 0));

        session.update(1500, &[]);
        assert_eq!(session.snapshot().points_display, Some(12));
        session.update(1501, &[]);
        assert_eq!(session.snapshot().points_display, None);
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let mut session = session_with("", PieceKind::T);
        session.update(0, &[press(Action::RotateCounterClockwise)]);
        assert_eq!(session.falling_piece().rotation().value(), 3);
        assert!(session.field().has_rotated());
    }

    #[test]
    fn test_lock_out_ends_session() {
        let mut field =
            GameField::with_board(Board::from_ascii(&".........#\n".repeat(19)), SEED).unwrap();
        let piece = Piece::new(PieceKind::I)
            .rotated(RotationDirection::Clockwise)
            .shifted(4, -1);
        field.set_falling_piece(piece).unwrap();
        let mut session = GameSession::with_field(GameConfig::default(), field);

        session.update(0, &[press(Action::HardDrop)]);
        assert_eq!(
            *session.session_state(),
            SessionState::GameOver(GameOverError::LockOut)
        );
        assert_eq!(session.stats().completed_pieces(), 0);
        session.update(20, &[press(Action::Pause)]);
        assert!(session.session_state().is_game_over());
    }

    #[test]
    fn test_snapshot() {
        let mut session = session_with("", PieceKind::O);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.active.kind, PieceKind::O);
        assert_eq!(snapshot.active.rotation, 0);
        assert_eq!(
            snapshot.active.cells.as_slice(),
            [(4, -2), (5, -2), (4, -1), (5, -1)]
        );
        assert_eq!(
            snapshot.ghost_cells.as_slice(),
            [(4, 18), (5, 18), (4, 19), (5, 19)]
        );
        assert_eq!(snapshot.hold, None);
        assert!(snapshot.can_hold);
        assert_eq!(snapshot.state, SessionState::Playing);

        session.update(0, &[press(Action::Hold)]);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.hold, Some(PieceKind::O));
        assert!(!snapshot.can_hold);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["hold"], "O");
        assert_eq!(json["state"], "Playing");
    }
}
