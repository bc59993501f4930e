//! Rules and timing core of a falling-block puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - pure data: the playfield [`Board`], the seven [`Piece`] shapes and the
//!   wall-kick rotation system. Nothing here knows about time.
//! - [`engine`] - the piece controller ([`GameField`]), scoring ([`GameStats`]), timing
//!   helpers and the per-frame state machine ([`GameSession`]) that turns input events
//!   and a millisecond clock into game progress.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Action, GameConfig, GameSession, InputEvent, PieceSeed};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut session = GameSession::with_seed(GameConfig::default(), seed);
//!
//! session.update(0, &[]);
//! session.update(16, &[InputEvent::pressed(Action::HardDrop)]);
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.grid.iter().flatten().filter(|&&c| c != 0).count(), 4);
//! ```

use serde::Serialize;

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A move, rotation or drop request was blocked by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum HoldError {
    #[display("piece colliding when holding piece")]
    PieceCollision(PieceCollisionError),
    #[display("hold already used in this turn")]
    HoldAlreadyUsed,
}

/// Terminal outcome of a session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum GameOverError {
    /// A piece locked with at least one cell above the visible board.
    #[display("piece locked above the visible board")]
    LockOut,
    /// A freshly spawned piece overlaps locked cells.
    #[display("spawned piece overlaps locked cells")]
    BlockOut,
}

/// A game configuration document could not be parsed.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
#[display("invalid game configuration: {_0}")]
pub struct ConfigError(#[error(source)] serde_json::Error);
