use ratatui::Frame;

use crate::{FrameInput, Runtime};

/// Trait for frame-driven TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Runtime::run()`. Use this to configure the frame rate.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Advances the application by one frame.
    ///
    /// `input` carries every terminal event received since the previous frame, in arrival
    /// order, and the frame's timestamp.
    fn update(&mut self, runtime: &mut Runtime, input: FrameInput);

    /// Draws the screen (called after every `update`).
    fn draw(&self, frame: &mut Frame);
}
