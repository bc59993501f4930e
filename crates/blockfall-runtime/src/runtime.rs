use std::{io, time::Duration};

use crate::{App, FrameLoop, keyboard::KeyReleaseReporting};

/// TUI application runtime.
///
/// Owns the frame loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Runtime {
    frames: FrameLoop,
    key_release_events: bool,
}

impl Runtime {
    /// Creates a new Runtime running at 60 frames per second.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frame rate (Hz, frames per second).
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.frames
            .set_frame_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Whether the terminal reports key releases and distinguishes repeats.
    ///
    /// Only meaningful once `run()` has started.
    #[must_use]
    pub fn key_release_events(&self) -> bool {
        self.key_release_events
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Until `app.should_exit()` returns true, once per frame:
    ///    - gathers pending terminal events and calls `app.update()`
    ///    - calls `app.draw()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            let reporting = KeyReleaseReporting::enable()?;
            self.key_release_events = reporting.is_enabled();
            while !app.should_exit() {
                let input = self.frames.next_frame()?;
                app.update(&mut self, input);
                terminal.draw(|f| app.draw(f))?;
            }
            Ok(())
        })
    }
}
