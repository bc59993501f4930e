//! Game logic and per-frame state management.
//!
//! - [`GameField`] - piece controller: board, active/next/held pieces, lock delay
//! - [`GameStats`] - scoring, level and counters
//! - [`GameSession`] - frame-driven state machine over a field and its stats
//! - [`PieceGenerator`] / [`PieceSeed`] - seeded uniform piece source
//! - [`GameConfig`] - difficulty and timing constants
//!
//! # Game Flow
//!
//! 1. The input layer gathers [`InputEvent`]s for a frame
//! 2. [`GameSession::update`] applies them in order, then auto-repeat and gravity
//! 3. Gravity or a hard drop locks the piece; the stats score it and the next piece spawns
//! 4. The renderer pulls a [`GameSnapshot`]
//! 5. Repeat until a piece locks above the board
//!
//! Time is always supplied by the caller in milliseconds; nothing here reads a clock.

pub use self::{
    config::*, game_field::*, game_session::*, game_stats::*, input::*, piece_generator::*,
    snapshot::*, timing::*,
};

mod config;
mod game_field;
mod game_session;
mod game_stats;
mod input;
mod piece_generator;
mod snapshot;
mod timing;
