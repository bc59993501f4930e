use log::{debug, trace};

use crate::{
    GameOverError, HoldError, PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceKind, RotationDirection},
    },
};

use super::piece_generator::{PieceGenerator, PieceSeed};

/// Outcome of locking the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub cleared_lines: usize,
    /// `T` piece, rotated at least once since spawn, and at least one line cleared.
    pub is_tspin: bool,
}

/// Outcome of a single [`GameField::soft_drop`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SoftDrop {
    /// The piece moved one row down.
    Moved,
    /// The piece is resting and its lock delay is running.
    Grounded,
    /// The lock delay ran out and the piece was locked.
    Locked(LockEvent),
}

/// Piece controller: the board plus the active, next and held pieces.
///
/// The field validates every move against the board and tracks the per-piece state
/// needed by the rules: whether hold was used, whether the piece rotated (for T-spin
/// detection), and when the lock delay started.
///
/// Locking does not spawn the next piece; callers lock, score, then [`spawn`](Self::spawn).
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Piece,
    next_piece: Piece,
    held_piece: Option<Piece>,
    generator: PieceGenerator,
    hold_used: bool,
    rotated: bool,
    lock_started_at: Option<u64>,
}

impl Default for GameField {
    fn default() -> Self {
        Self::new()
    }
}

impl GameField {
    #[must_use]
    pub fn new() -> Self {
        Self::from_generator(Board::EMPTY, PieceGenerator::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_generator(Board::EMPTY, PieceGenerator::with_seed(seed))
    }

    /// Starts from a prepared board.
    ///
    /// Fails with [`GameOverError::BlockOut`] if the first piece cannot spawn.
    pub fn with_board(board: Board, seed: PieceSeed) -> Result<Self, GameOverError> {
        let field = Self::from_generator(board, PieceGenerator::with_seed(seed));
        if field.board.is_colliding(&field.falling_piece) {
            return Err(GameOverError::BlockOut);
        }
        Ok(field)
    }

    fn from_generator(board: Board, mut generator: PieceGenerator) -> Self {
        let falling_piece = Piece::new(generator.next_kind());
        let next_piece = Piece::new(generator.next_kind());
        Self {
            board,
            falling_piece,
            next_piece,
            held_piece: None,
            generator,
            hold_used: false,
            rotated: false,
            lock_started_at: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<&Piece> {
        self.held_piece.as_ref()
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    #[must_use]
    pub fn is_hold_used(&self) -> bool {
        self.hold_used
    }

    /// Whether the active piece has rotated since it spawned.
    #[must_use]
    pub fn has_rotated(&self) -> bool {
        self.rotated
    }

    /// Game-clock time at which the active piece first failed to move down, if it is
    /// currently resting.
    #[must_use]
    pub fn lock_started_at(&self) -> Option<u64> {
        self.lock_started_at
    }

    /// Ghost position: where a hard drop would land.
    #[must_use]
    pub fn drop_position(&self) -> Piece {
        self.falling_piece.drop_position(&self.board)
    }

    /// Replaces the active piece, e.g. for scripted setups.
    ///
    /// The rotated flag and the lock delay are reset as if the piece had just spawned.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        self.rotated = false;
        self.lock_started_at = None;
        Ok(())
    }

    /// Promotes the next piece to active and draws a new next piece.
    ///
    /// The new active piece starts at the spawn position in rotation state 0 and may use
    /// hold again. Fails with [`GameOverError::BlockOut`] if it overlaps locked cells.
    pub fn spawn(&mut self) -> Result<(), GameOverError> {
        let next = Piece::new(self.generator.next_kind());
        self.falling_piece = std::mem::replace(&mut self.next_piece, next).respawned();
        self.hold_used = false;
        self.rotated = false;
        self.lock_started_at = None;
        debug!(
            "spawned {:?}, next {:?}",
            self.falling_piece.kind(),
            self.next_piece.kind()
        );
        if self.board.is_colliding(&self.falling_piece) {
            return Err(GameOverError::BlockOut);
        }
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_move(-1)
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_move(1)
    }

    /// Shifts the active piece one column; cancels a running lock delay on success.
    pub fn try_move(&mut self, dx: i32) -> Result<(), PieceCollisionError> {
        let piece = self.falling_piece.shifted(dx, 0);
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        self.lock_started_at = None;
        Ok(())
    }

    /// Rotates with wall kicks; cancels a running lock delay on success.
    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), PieceCollisionError> {
        let piece = self
            .falling_piece
            .super_rotated(direction, &self.board)
            .ok_or(PieceCollisionError)?;
        self.falling_piece = piece;
        self.rotated = true;
        self.lock_started_at = None;
        Ok(())
    }

    /// Moves the piece down one row, or runs the lock delay if it cannot move.
    ///
    /// The first blocked call arms the lock delay at `now_ms`. A later blocked call locks
    /// the piece once `lock_delay_ms` have passed since then. A successful move down
    /// disarms the delay.
    pub fn soft_drop(&mut self, now_ms: u64, lock_delay_ms: u64) -> Result<SoftDrop, GameOverError> {
        let piece = self.falling_piece.down();
        if self.board.is_valid_position(&piece) {
            self.falling_piece = piece;
            self.lock_started_at = None;
            return Ok(SoftDrop::Moved);
        }
        match self.lock_started_at {
            None => {
                trace!("lock delay armed at {now_ms} ms");
                self.lock_started_at = Some(now_ms);
                Ok(SoftDrop::Grounded)
            }
            Some(started) if now_ms.saturating_sub(started) >= lock_delay_ms => {
                self.lock().map(SoftDrop::Locked)
            }
            Some(_) => Ok(SoftDrop::Grounded),
        }
    }

    /// Drops the piece to its landing row and locks it immediately.
    pub fn hard_drop(&mut self) -> Result<LockEvent, GameOverError> {
        self.falling_piece = self.drop_position();
        self.lock()
    }

    /// Stores the active piece in the hold slot.
    ///
    /// With an empty slot, the next piece becomes active; otherwise the active and held
    /// pieces swap. The incoming piece is placed at the spawn position in rotation state 0.
    /// Allowed once per spawned piece, and rejected without any change if the incoming
    /// piece would collide.
    pub fn try_hold(&mut self) -> Result<(), HoldError> {
        if self.hold_used {
            return Err(HoldError::HoldAlreadyUsed);
        }
        let incoming = self.held_piece.unwrap_or(self.next_piece).respawned();
        if self.board.is_colliding(&incoming) {
            return Err(HoldError::PieceCollision(PieceCollisionError));
        }

        let outgoing = std::mem::replace(&mut self.falling_piece, incoming).respawned();
        if self.held_piece.replace(outgoing).is_none() {
            self.next_piece = Piece::new(self.generator.next_kind());
        }
        self.hold_used = true;
        self.rotated = false;
        self.lock_started_at = None;
        debug!(
            "held {:?}, active {:?}",
            outgoing.kind(),
            self.falling_piece.kind()
        );
        Ok(())
    }

    /// Writes the active piece into the board and clears completed rows.
    pub fn lock(&mut self) -> Result<LockEvent, GameOverError> {
        let piece = self.falling_piece;
        let cleared_lines = self.board.lock_piece(&piece)?;
        self.lock_started_at = None;
        let is_tspin = piece.kind() == PieceKind::T && self.rotated && cleared_lines > 0;
        debug!(
            "locked {:?} at ({}, {}), cleared {cleared_lines}{}",
            piece.kind(),
            piece.position().x(),
            piece.position().y(),
            if is_tspin { " (T-spin)" } else { "" }
        );
        Ok(LockEvent {
            kind: piece.kind(),
            cleared_lines,
            is_tspin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);
    const CW: RotationDirection = RotationDirection::Clockwise;

    fn field_with(board: &str, kind: PieceKind) -> GameField {
        let mut field = GameField::with_board(Board::from_ascii(board), SEED).unwrap();
        field.set_falling_piece(Piece::new(kind)).unwrap();
        field
    }

    #[test]
    fn test_spawn_promotes_next_piece() {
        let mut field = GameField::with_seed(SEED);
        let next = field.next_piece().kind();
        field.spawn().unwrap();
        assert_eq!(field.falling_piece().kind(), next);
        assert_eq!(*field.falling_piece(), Piece::new(next));
    }

    #[test]
    fn test_spawn_sits_above_board() {
        // Spawn orientations only occupy rows -2 and -1, so even a full stack does not
        // block a spawn; the game ends when the next piece locks out instead.
        let mut field = GameField::with_seed(SEED);
        field.board = Board::from_ascii(&"#########.\n".repeat(20));
        field.spawn().unwrap();
        assert!(field.falling_piece().occupied_positions().all(|(_, y)| y < 0));
        assert!(field.soft_drop(0, 500).unwrap().is_grounded());
        assert_eq!(field.soft_drop(500, 500), Err(GameOverError::LockOut));
    }

    #[test]
    fn test_move_respects_walls() {
        let mut field = field_with("", PieceKind::O);
        for _ in 0..4 {
            field.try_move_left().unwrap();
        }
        assert_eq!(field.try_move_left(), Err(PieceCollisionError));
        assert_eq!(field.falling_piece().position().x(), 0);
        for _ in 0..8 {
            field.try_move_right().unwrap();
        }
        assert_eq!(field.try_move_right(), Err(PieceCollisionError));
        assert_eq!(field.falling_piece().position().x(), 8);
    }

    #[test]
    fn test_hard_drop_o_piece() {
        let mut field = field_with("", PieceKind::O);
        let event = field.hard_drop().unwrap();
        assert_eq!(
            event,
            LockEvent {
                kind: PieceKind::O,
                cleared_lines: 0,
                is_tspin: false
            }
        );
        let grid = field.board().color_grid();
        let o = PieceKind::O.color_value();
        assert_eq!(grid[18], [0, 0, 0, 0, o, o, 0, 0, 0, 0]);
        assert_eq!(grid[19], [0, 0, 0, 0, o, o, 0, 0, 0, 0]);
    }

    #[test]
    fn test_lock_delay() {
        let mut field = field_with("", PieceKind::O);
        let mut now = 0;
        while field.soft_drop(now, 500).unwrap().is_moved() {
            now += 10;
        }
        let grounded_at = now;
        assert_eq!(field.lock_started_at(), Some(grounded_at));
        assert_eq!(field.soft_drop(grounded_at + 250, 500), Ok(SoftDrop::Grounded));
        assert_eq!(field.soft_drop(grounded_at + 499, 500), Ok(SoftDrop::Grounded));
        assert!(field.soft_drop(grounded_at + 500, 500).unwrap().is_locked());
        assert_eq!(field.lock_started_at(), None);
    }

    #[test]
    fn test_move_cancels_lock_delay() {
        let mut field = field_with("", PieceKind::O);
        field.falling_piece = field.drop_position();
        assert_eq!(field.soft_drop(0, 500), Ok(SoftDrop::Grounded));
        field.try_move_left().unwrap();
        assert_eq!(field.lock_started_at(), None);

        // Re-armed by the next blocked drop, so the old start time no longer counts.
        assert_eq!(field.soft_drop(600, 500), Ok(SoftDrop::Grounded));
        assert_eq!(field.soft_drop(1099, 500), Ok(SoftDrop::Grounded));
        assert!(field.soft_drop(1100, 500).unwrap().is_locked());
    }

    #[test]
    fn test_failed_move_keeps_lock_delay() {
        let mut field = field_with("", PieceKind::O);
        field.falling_piece = field.drop_position();
        for _ in 0..4 {
            field.try_move_left().unwrap();
        }
        assert_eq!(field.soft_drop(0, 500), Ok(SoftDrop::Grounded));
        assert!(field.try_move_left().is_err());
        assert_eq!(field.lock_started_at(), Some(0));
    }

    #[test]
    fn test_hold_into_empty_slot() {
        let mut field = field_with("", PieceKind::T);
        let next = field.next_piece().kind();
        field.try_rotate(CW).unwrap();
        field.try_hold().unwrap();

        assert_eq!(field.held_piece(), Some(&Piece::new(PieceKind::T)));
        assert_eq!(*field.falling_piece(), Piece::new(next));
        assert!(field.is_hold_used());
        assert!(!field.has_rotated());
    }

    #[test]
    fn test_hold_once_per_piece() {
        let mut field = field_with("", PieceKind::I);
        field.try_hold().unwrap();
        let active = *field.falling_piece();
        let next = *field.next_piece();

        assert_eq!(field.try_hold(), Err(HoldError::HoldAlreadyUsed));
        assert_eq!(*field.falling_piece(), active);
        assert_eq!(*field.next_piece(), next);
        assert_eq!(field.held_piece().map(Piece::kind), Some(PieceKind::I));

        field.hard_drop().unwrap();
        field.spawn().unwrap();
        assert!(!field.is_hold_used());
        field.try_hold().unwrap();
        assert_eq!(field.falling_piece().kind(), PieceKind::I);
    }

    #[test]
    fn test_hold_swap_resets_position() {
        let mut field = field_with("", PieceKind::L);
        field.try_hold().unwrap();
        field.hard_drop().unwrap();
        field.spawn().unwrap();
        let swapped_out = field.falling_piece().kind();
        field.try_rotate(CW).unwrap();
        field.try_move_right().unwrap();

        field.try_hold().unwrap();
        assert_eq!(*field.falling_piece(), Piece::new(PieceKind::L));
        assert_eq!(field.held_piece(), Some(&Piece::new(swapped_out)));
    }

    #[test]
    fn test_rotation_sets_tspin_flag() {
        let board = "
            ###...####
            ####.#####
        ";
        let mut field = field_with(board, PieceKind::T);
        field.try_rotate(CW).unwrap();
        field.try_rotate(CW).unwrap();
        field.try_move_left().unwrap();
        let event = field.hard_drop().unwrap();
        assert_eq!(event.cleared_lines, 2);
        assert!(event.is_tspin);
        assert_eq!(field.board(), &Board::EMPTY);
    }

    #[test]
    fn test_unrotated_t_is_not_tspin() {
        let mut field = field_with("###...####", PieceKind::T);
        field.try_move_left().unwrap();
        // Flat T: top cell on row 18, bottom row fills columns 3-5 of row 19.
        let event = field.hard_drop().unwrap();
        assert_eq!(event.cleared_lines, 1);
        assert!(!event.is_tspin);
    }

    #[test]
    fn test_lock_out() {
        let mut field = field_with(&".........#\n".repeat(19), PieceKind::I);
        // Vertical I in column 9, resting on the tower with three cells above the board.
        let piece = Piece::new(PieceKind::I).rotated(CW).shifted(4, -1);
        field.set_falling_piece(piece).unwrap();
        assert_eq!(field.drop_position(), piece);
        assert_eq!(field.hard_drop(), Err(GameOverError::LockOut));
        assert_eq!(field.board(), &Board::from_ascii(&".........#\n".repeat(19)));
    }
}
