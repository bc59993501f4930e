use std::fmt;

use crate::GameOverError;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, PieceKind},
};

/// A single cell of the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked cell, tagged with the kind of the piece that left it.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Grid color value: 0 for empty, 1–7 for the piece kinds.
    #[must_use]
    pub const fn color_value(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.color_value(),
        }
    }
}

/// One row of the playfield.
pub type BlockRow = [Block; BOARD_WIDTH];

const EMPTY_ROW: BlockRow = [Block::Empty; BOARD_WIDTH];

fn is_filled(row: &BlockRow) -> bool {
    row.iter().all(|b| !b.is_empty())
}

/// Fixed 10×20 grid of locked cells.
///
/// The board knows nothing about the falling piece or about time: validity checks take
/// the piece as an argument, and the only mutations are locking a piece and compacting
/// full rows.
///
/// Rows are indexed top to bottom. Cells of a piece that are still above row 0 are
/// exempt from the bottom and overlap checks, but not from the side walls.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::O).drop_position(&board);
/// assert_eq!(board.lock_piece(&piece), Ok(0));
/// assert_eq!(board.color_grid()[19][4], PieceKind::O.color_value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BlockRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Builds a board from ASCII art, one line per row.
    ///
    /// `.` is empty, a piece letter (`IJLOSTZ`) is a locked cell of that kind and `#` is a
    /// filler cell stored as an `I` block. Lines are aligned to the bottom of the board;
    /// blank lines and surrounding whitespace are ignored.
    ///
    /// # Panics
    ///
    /// Panics on rows of the wrong width, too many rows, or unknown characters.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(lines.len() <= BOARD_HEIGHT, "too many rows: {}", lines.len());

        let mut board = Self::EMPTY;
        let top = BOARD_HEIGHT - lines.len();
        for (row, line) in board.rows[top..].iter_mut().zip(lines) {
            assert_eq!(line.chars().count(), BOARD_WIDTH, "bad row width: {line:?}");
            for (cell, c) in row.iter_mut().zip(line.chars()) {
                *cell = match c {
                    '.' => Block::Empty,
                    '#' => Block::Piece(PieceKind::I),
                    c => Block::Piece(
                        PieceKind::from_char(c).unwrap_or_else(|| panic!("bad cell: {c:?}")),
                    ),
                };
            }
        }
        board
    }

    /// Returns the rows from top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[BlockRow; BOARD_HEIGHT] {
        &self.rows
    }

    /// Returns the block at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn block_at(&self, x: i32, y: i32) -> Option<Block> {
        let (x, y) = grid_index(x, y)?;
        Some(self.rows[y][x])
    }

    /// Returns the grid as color values (0 empty, 1–7 piece kinds).
    #[must_use]
    pub fn color_grid(&self) -> [[u8; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.rows.map(|row| row.map(Block::color_value))
    }

    /// Checks whether the piece fits where it stands.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        self.is_valid_offset(piece, 0, 0)
    }

    /// Checks whether the piece would fit after being translated by `(dx, dy)`.
    ///
    /// A cell is rejected when its column is outside `[0, 10)`, its row is at or below the
    /// floor, or its row is visible and the grid cell there is occupied. Cells above the
    /// board only have to respect the side walls.
    #[must_use]
    pub fn is_valid_offset(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        const WIDTH: i32 = BOARD_WIDTH as i32;
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        const HEIGHT: i32 = BOARD_HEIGHT as i32;

        piece.occupied_positions().all(|(x, y)| {
            let (x, y) = (x + dx, y + dy);
            if !(0..WIDTH).contains(&x) || y >= HEIGHT {
                return false;
            }
            y < 0 || self.block_at(x, y).is_some_and(Block::is_empty)
        })
    }

    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        !self.is_valid_position(piece)
    }

    /// Writes the piece into the grid and clears any rows it completes.
    ///
    /// Fails with [`GameOverError::LockOut`] if any cell is still above the visible board;
    /// in that case the grid is left untouched.
    ///
    /// # Returns
    ///
    /// The number of rows cleared (0–4).
    pub fn lock_piece(&mut self, piece: &Piece) -> Result<usize, GameOverError> {
        debug_assert!(self.is_valid_position(piece), "locking invalid piece");
        if piece.occupied_positions().any(|(_, y)| y < 0) {
            return Err(GameOverError::LockOut);
        }
        for (x, y, kind) in piece.cells() {
            let Some((x, y)) = grid_index(x, y) else {
                continue;
            };
            self.rows[y][x] = Block::Piece(kind);
        }
        Ok(self.clear_lines())
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Remaining rows keep their relative order and settle at the bottom; empty rows are
    /// inserted at the top so the board always has exactly 20 rows.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if is_filled(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for block in row {
                let c = match block {
                    Block::Empty => '.',
                    Block::Piece(kind) => kind.as_char(),
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn grid_index(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)?;
    let y = usize::try_from(y).ok().filter(|&y| y < BOARD_HEIGHT)?;
    Some((x, y))
}
