use arrayvec::ArrayVec;
use serde::Serialize;

use crate::core::{BOARD_HEIGHT, BOARD_WIDTH, Piece, PieceKind};

use super::game_session::SessionState;

/// Board coordinates `(column, row)` of the four cells of a piece.
pub type PieceCells = ArrayVec<(i32, i32), 4>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivePieceSnapshot {
    pub kind: PieceKind,
    /// Rotation state, 0–3.
    pub rotation: u8,
    /// May include cells above the visible board (negative rows).
    pub cells: PieceCells,
}

impl From<&Piece> for ActivePieceSnapshot {
    fn from(piece: &Piece) -> Self {
        Self {
            kind: piece.kind(),
            rotation: piece.rotation().value(),
            cells: piece.occupied_positions().collect(),
        }
    }
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Locked cells as color values, row 0 at the top. 0 is empty.
    pub grid: [[u8; BOARD_WIDTH]; BOARD_HEIGHT],
    pub active: ActivePieceSnapshot,
    /// Landing cells of the active piece.
    pub ghost_cells: PieceCells,
    pub hold: Option<PieceKind>,
    pub next: PieceKind,
    pub can_hold: bool,
    pub score: usize,
    pub level: usize,
    pub lines: usize,
    /// Whether the next difficult clear earns the back-to-back bonus.
    pub back_to_back: bool,
    pub pieces: usize,
    /// Locks by lines cleared, index 0 to 4.
    pub line_clears: [usize; 5],
    pub tspin_clears: usize,
    /// Points of the latest clear while its display has not expired.
    pub points_display: Option<usize>,
    pub state: SessionState,
    /// Game-clock time, which stands still while paused.
    pub elapsed_ms: u64,
}
