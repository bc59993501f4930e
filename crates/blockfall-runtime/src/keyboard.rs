use std::io;

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};
use log::{debug, warn};

/// Enables key-release reporting for as long as it is alive, where the terminal supports
/// it.
#[derive(Debug)]
pub(crate) struct KeyReleaseReporting {
    enabled: bool,
}

impl KeyReleaseReporting {
    pub(crate) fn enable() -> io::Result<Self> {
        let enabled = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enabled {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        debug!("key release reporting: {enabled}");
        Ok(Self { enabled })
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for KeyReleaseReporting {
    fn drop(&mut self) {
        if self.enabled
            && let Err(e) = execute!(io::stdout(), PopKeyboardEnhancementFlags)
        {
            warn!("failed to restore keyboard flags: {e}");
        }
    }
}
