//! Frame loop for terminal games.
//!
//! The [`Runtime`] owns the terminal and a fixed-rate frame clock. Every frame it hands
//! the [`App`] the batch of terminal events that arrived since the previous frame together
//! with a monotonic millisecond timestamp, then redraws.

pub use self::{
    app::App,
    event_loop::{FrameInput, FrameLoop},
    runtime::Runtime,
};

mod app;
mod event_loop;
mod keyboard;
mod runtime;
