use std::{fmt, str::FromStr};

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ConfigError;

/// Difficulty setting, selecting the base fall delay at level 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Difficulty {
    /// 1500 ms per row.
    #[default]
    Easy,
    /// 800 ms per row.
    Normal,
    /// 200 ms per row.
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Base fall delay in milliseconds before level scaling.
    #[must_use]
    pub const fn base_fall_delay_ms(self) -> u64 {
        match self {
            Difficulty::Easy => 1500,
            Difficulty::Normal => 800,
            Difficulty::Hard => 200,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Resolves a settings label, falling back to [`Difficulty::Easy`] for anything
    /// unrecognized.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            warn!("unknown difficulty {label:?}, falling back to {}", Self::default());
            Self::default()
        })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown difficulty {_0:?} (expected Easy, Normal or Hard)")]
pub struct ParseDifficultyError(#[error(not(source))] String);

/// Strict parse, case-insensitive.
impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseDifficultyError(s.to_owned()))
    }
}

/// Configuration files go through [`Difficulty::from_label`], so a bad label never
/// rejects the whole file.
impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.label().to_owned()
    }
}

/// Timing constants of the input and gravity model, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before a held horizontal key starts repeating.
    pub das_ms: u64,
    /// Interval between horizontal repeats.
    pub arr_ms: u64,
    /// How long a grounded piece may rest before it locks.
    pub lock_delay_ms: u64,
    /// Fastest automatic fall delay.
    pub gravity_floor_ms: u64,
    /// Per-level multiplier applied to the base fall delay.
    pub gravity_decay: f64,
    pub soft_drop_initial_ms: u64,
    pub soft_drop_step_ms: u64,
    pub soft_drop_accel_every_ms: u64,
    pub soft_drop_floor_ms: u64,
    /// How long a points award stays visible.
    pub points_display_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            das_ms: 200,
            arr_ms: 40,
            lock_delay_ms: 500,
            gravity_floor_ms: 50,
            gravity_decay: 0.85,
            soft_drop_initial_ms: 120,
            soft_drop_step_ms: 10,
            soft_drop_accel_every_ms: 200,
            soft_drop_floor_ms: 20,
            points_display_ms: 1500,
        }
    }
}

/// Configuration read by a [`GameSession`](crate::GameSession) every frame.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub timing: TimingConfig,
}

impl GameConfig {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            timing: TimingConfig::default(),
        }
    }

    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Automatic fall delay at `level`.
    #[must_use]
    pub fn fall_delay_ms(&self, level: usize) -> u64 {
        super::timing::fall_delay_ms(self.difficulty.base_fall_delay_ms(), level, &self.timing)
    }
}
