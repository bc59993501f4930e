//! Millisecond timing rules: gravity, soft-drop acceleration and horizontal auto-repeat.

use super::config::TimingConfig;

/// Automatic fall delay: `max(floor, floor(base * decay^level))`.
#[must_use]
pub fn fall_delay_ms(base_ms: u64, level: usize, timing: &TimingConfig) -> u64 {
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let scaled = (base_ms as f64 * timing.gravity_decay.powf(level as f64)).floor() as u64;
    scaled.max(timing.gravity_floor_ms)
}

/// Fall delay while the soft-drop key is held.
///
/// Starts at `soft_drop_initial_ms` and shortens by `soft_drop_step_ms` for every
/// `soft_drop_accel_every_ms` the key has been down, never going below the floor.
#[must_use]
pub fn soft_drop_delay_ms(held_ms: u64, timing: &TimingConfig) -> u64 {
    let steps = held_ms / timing.soft_drop_accel_every_ms.max(1);
    timing
        .soft_drop_initial_ms
        .saturating_sub(steps.saturating_mul(timing.soft_drop_step_ms))
        .max(timing.soft_drop_floor_ms)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            ShiftDirection::Left => -1,
            ShiftDirection::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveShift {
    direction: ShiftDirection,
    pressed_at: u64,
    last_shift_at: u64,
}

/// Delayed auto-shift state for the horizontal keys.
///
/// Only one direction is active at a time: pressing a direction replaces the other, and
/// releasing a key only stops the repeat if it is the active direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AutoShift {
    active: Option<ActiveShift>,
}

impl AutoShift {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    #[must_use]
    pub fn direction(&self) -> Option<ShiftDirection> {
        self.active.map(|a| a.direction)
    }

    /// Arms both timers. The caller performs the immediate first move itself.
    pub fn press(&mut self, direction: ShiftDirection, now_ms: u64) {
        self.active = Some(ActiveShift {
            direction,
            pressed_at: now_ms,
            last_shift_at: now_ms,
        });
    }

    pub fn release(&mut self, direction: ShiftDirection) {
        if self.direction() == Some(direction) {
            self.active = None;
        }
    }

    /// Returns the direction to shift in this frame, if a repeat is due.
    ///
    /// A repeat is due once the key has been held for `das_ms` and `arr_ms` have passed
    /// since the previous shift. At most one repeat is produced per call.
    pub fn poll(&mut self, now_ms: u64, timing: &TimingConfig) -> Option<ShiftDirection> {
        let active = self.active.as_mut()?;
        let held = now_ms.saturating_sub(active.pressed_at);
        let since_last = now_ms.saturating_sub(active.last_shift_at);
        if held >= timing.das_ms && since_last >= timing.arr_ms {
            active.last_shift_at = now_ms;
            return Some(active.direction);
        }
        None
    }
}
