use serde::{Deserialize, Serialize};

/// Logical action, decoupled from physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    /// Clockwise rotation.
    Rotate,
    RotateCounterClockwise,
    HardDrop,
    Hold,
    Pause,
    Escape,
}

impl Action {
    pub const ALL: [Self; 9] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::Rotate,
        Action::RotateCounterClockwise,
        Action::HardDrop,
        Action::Hold,
        Action::Pause,
        Action::Escape,
    ];

    /// Actions whose key-up matters (held keys).
    #[must_use]
    pub const fn is_held(self) -> bool {
        matches!(
            self,
            Action::MoveLeft | Action::MoveRight | Action::SoftDrop
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum KeyTransition {
    Pressed,
    Released,
}

/// A key-down or key-up of a logical action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    pub action: Action,
    pub transition: KeyTransition,
}

impl InputEvent {
    #[must_use]
    pub const fn pressed(action: Action) -> Self {
        Self {
            action,
            transition: KeyTransition::Pressed,
        }
    }

    #[must_use]
    pub const fn released(action: Action) -> Self {
        Self {
            action,
            transition: KeyTransition::Released,
        }
    }
}
