pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns in the playfield.
pub const BOARD_WIDTH: usize = 10;
/// Number of visible rows in the playfield.
pub const BOARD_HEIGHT: usize = 20;

/// Row a freshly spawned piece's matrix origin is placed at (above the visible board).
pub const SPAWN_ROW: i32 = -2;
