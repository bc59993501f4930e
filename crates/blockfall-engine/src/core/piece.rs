use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{BOARD_WIDTH, SPAWN_ROW, board::Board};

/// A falling piece: its kind, rotation state, origin and occupancy matrix.
///
/// Pieces are plain values. Movement and rotation return new `Piece` instances,
/// so a rejected rotation never leaves a half-rotated piece behind.
///
/// # Coordinate System
///
/// - `x` is the column of the matrix's top-left cell, `y` its row
/// - rows grow downward, row 0 is the top visible row
/// - `y` may be negative while the piece is still above the visible board
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind, RotationDirection};
///
/// let board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::T).shifted(0, 5);
/// let rotated = piece.super_rotated(RotationDirection::Clockwise, &board).unwrap();
/// assert_eq!(rotated.rotation().value(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    position: PiecePosition,
    matrix: PieceMatrix,
}

impl Piece {
    /// Creates a piece in its spawn orientation at the spawn position.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: PieceRotation::SPAWN,
            position: PiecePosition::spawn(kind),
            matrix: kind.spawn_matrix(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn matrix(&self) -> &PieceMatrix {
        &self.matrix
    }

    /// Enumerates every occupied cell as `(column, row, kind)`.
    ///
    /// The sequence is a pure function of the piece and can be restarted freely.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, PieceKind)> + '_ {
        self.occupied_positions().map(|(x, y)| (x, y, self.kind))
    }

    /// Enumerates the board coordinates of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let PiecePosition { x, y } = self.position;
        self.matrix
            .occupied_offsets()
            .map(move |(dx, dy)| (x + dx, y + dy))
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Returns the same kind of piece back at the spawn position in rotation state 0.
    #[must_use]
    pub fn respawned(&self) -> Self {
        Self::new(self.kind)
    }

    /// Rotates the matrix in place without any kick or collision test.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            rotation: self.rotation.rotated(direction),
            matrix: self.matrix.rotated(direction),
            ..*self
        }
    }

    /// Rotates with wall kicks.
    ///
    /// The kick offsets for the `(old, new)` rotation-state transition are tried in table
    /// order and the first one that yields a valid position wins. The O piece never rotates
    /// and always succeeds in place.
    ///
    /// Returns `None` if every offset collides.
    #[must_use]
    pub fn super_rotated(&self, direction: RotationDirection, board: &Board) -> Option<Self> {
        if self.kind == PieceKind::O {
            return Some(*self);
        }
        let rotated = self.rotated(direction);
        self.kind
            .kick_offsets(self.rotation, direction)
            .iter()
            .map(|&(dx, dy)| rotated.shifted(dx, dy))
            .find(|piece| board.is_valid_position(piece))
    }

    /// Mutating form of [`Self::super_rotated`].
    ///
    /// Returns `false` and leaves the piece untouched when no kick succeeds.
    pub fn rotate(&mut self, direction: RotationDirection, board: &Board) -> bool {
        match self.super_rotated(direction, board) {
            Some(piece) => {
                *self = piece;
                true
            }
            None => false,
        }
    }

    /// Returns the piece moved straight down as far as it can go.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while board.is_valid_position(&dropped.down()) {
            dropped = dropped.down();
        }
        dropped
    }
}

/// Origin of a piece's occupancy matrix on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontally centered, above the visible board.
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        let size = kind.spawn_matrix().size();
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_possible_wrap,
            clippy::cast_lossless
        )]
        let x = (BOARD_WIDTH / 2) as i32 - (size / 2) as i32;
        Self::new(x, SPAWN_ROW)
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 90° counterclockwise
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % 4),
            RotationDirection::CounterClockwise => Self((self.0 + 3) % 4),
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    const fn as_usize(self) -> usize {
        match self {
            RotationDirection::Clockwise => 0,
            RotationDirection::CounterClockwise => 1,
        }
    }
}

/// Square occupancy matrix of a piece (2×2 for O, 4×4 for I, 3×3 otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceMatrix {
    size: u8,
    cells: [[bool; 4]; 4],
}

impl PieceMatrix {
    const fn new(size: u8, cells: [[bool; 4]; 4]) -> Self {
        Self { size, cells }
    }

    #[must_use]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Enumerates occupied `(dx, dy)` offsets in row-major order.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.size).flat_map(move |y| {
            (0..self.size)
                .filter(move |&x| self.cells[usize::from(y)][usize::from(x)])
                .map(move |x| (i32::from(x), i32::from(y)))
        })
    }

    /// Rotates the matrix 90° about its center.
    ///
    /// Clockwise sends cell `(x, y)` to `(size - 1 - y, x)`; counterclockwise sends it to
    /// `(y, size - 1 - x)`.
    #[must_use]
    pub const fn rotated(&self, direction: RotationDirection) -> Self {
        let n = self.size as usize;
        let mut cells = [[false; 4]; 4];
        let mut y = 0;
        while y < n {
            let mut x = 0;
            while x < n {
                if self.cells[y][x] {
                    match direction {
                        RotationDirection::Clockwise => cells[x][n - 1 - y] = true,
                        RotationDirection::CounterClockwise => cells[n - 1 - x][y] = true,
                    }
                }
                x += 1;
            }
            y += 1;
        }
        Self::new(self.size, cells)
    }
}

/// The seven piece kinds.
///
/// The discriminant order fixes the cosmetic color value carried into the grid
/// (`I` = 1 through `Z` = 7; 0 is reserved for empty cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
}

/// Uniform choice among the seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Non-zero color value written into the grid when this kind locks.
    #[must_use]
    pub const fn color_value(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub const fn from_color_value(value: u8) -> Option<Self> {
        match value {
            1..=7 => Some(Self::ALL[(value - 1) as usize]),
            _ => None,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('S'), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Occupancy matrix in rotation state 0.
    #[must_use]
    pub const fn spawn_matrix(self) -> PieceMatrix {
        SPAWN_MATRICES[self as usize]
    }

    /// Kick offsets `(dx, dy)` for rotating out of `from` in `direction`, in trial order.
    ///
    /// `dy` grows downward.
    #[must_use]
    pub const fn kick_offsets(
        self,
        from: PieceRotation,
        direction: RotationDirection,
    ) -> &'static [(i32, i32); KICK_TESTS] {
        let table = match self {
            PieceKind::I => &I_KICKS,
            _ => &JLSTZ_KICKS,
        };
        &table[from.as_usize()][direction.as_usize()]
    }
}

const SPAWN_MATRICES: [PieceMatrix; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    [
        // I-piece
        PieceMatrix::new(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // J-piece
        PieceMatrix::new(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        PieceMatrix::new(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // O-piece
        PieceMatrix::new(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        PieceMatrix::new(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // T-piece
        PieceMatrix::new(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // Z-piece
        PieceMatrix::new(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
    ]
};

/// Number of kick offsets tried per rotation.
pub const KICK_TESTS: usize = 5;

/// Indexed by `[from_state][direction]`; clockwise first, then counterclockwise.
type KickTable = [[[(i32, i32); KICK_TESTS]; 2]; 4];

const JLSTZ_KICKS: KickTable = [
    [
        // 0 -> 1
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        // 0 -> 3
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    [
        // 1 -> 2
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        // 1 -> 0
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        // 2 -> 3
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        // 2 -> 1
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
    [
        // 3 -> 0
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        // 3 -> 2
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
];

const I_KICKS: KickTable = [
    [
        // 0 -> 1
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
        // 0 -> 3
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    ],
    [
        // 1 -> 2
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
        // 1 -> 0
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    ],
    [
        // 2 -> 3
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
        // 2 -> 1
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    ],
    [
        // 3 -> 0
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
        // 3 -> 2
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    ],
];
