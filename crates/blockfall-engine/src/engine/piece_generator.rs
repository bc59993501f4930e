use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Seed for deterministic piece generation.
///
/// A 128-bit value written as 32 hex digits (big-endian) in text and JSON form.
/// Two generators built from the same seed yield the same piece sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// let a: Vec<_> = PieceGenerator::with_seed(seed).take(10).collect();
/// let b: Vec<_> = PieceGenerator::with_seed(seed).take(10).collect();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid hex: unexpected character {_0:?}")]
    InvalidDigit(#[error(not(source))] char),
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength(s.len()));
        }
        let num = s.chars().try_fold(0_u128, |acc, c| {
            let digit = c.to_digit(16).ok_or(ParsePieceSeedError::InvalidDigit(c))?;
            Ok((acc << 4) | u128::from(digit))
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Source of upcoming piece kinds.
///
/// Every draw is an independent uniform choice among the seven kinds; there is no bag,
/// so repeats and droughts are possible. The generator is an endless iterator.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator with a seed drawn from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    pub fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

impl Iterator for PieceGenerator {
    type Item = PieceKind;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_display_is_big_endian_hex() {
        let seed = PieceSeed([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        assert_eq!(
            PieceSeed([0; 16]).to_string(),
            "00000000000000000000000000000000"
        );
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "0123".parse::<PieceSeed>(),
            Err(ParsePieceSeedError::InvalidLength(4))
        );
        assert!(
            "ghijklmnopqrstuvwxyzghijklmnopqr"
                .parse::<PieceSeed>()
                .unwrap_err()
                .to_string()
                .contains("invalid hex")
        );
        assert_eq!(
            "+123456789abcdef0123456789abcdef".parse::<PieceSeed>(),
            Err(ParsePieceSeedError::InvalidDigit('+'))
        );
        assert!("".parse::<PieceSeed>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&SEED).unwrap();
        assert_eq!(json, "\"123456789abcdef01122334455667788\"");
        let back: PieceSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SEED);

        let err = serde_json::from_str::<PieceSeed>("\"abc\"").unwrap_err();
        assert!(err.to_string().contains("invalid hex"));
    }

    #[test]
    fn test_deterministic_sequence() {
        let mut a = PieceGenerator::with_seed(SEED);
        let mut b = PieceGenerator::with_seed(SEED);
        for _ in 0..50 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
        assert_eq!(a.seed(), SEED);
    }

    #[test]
    fn test_every_kind_eventually_appears() {
        let mut seen = [false; PieceKind::LEN];
        for kind in PieceGenerator::with_seed(SEED).take(500) {
            seen[kind as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
