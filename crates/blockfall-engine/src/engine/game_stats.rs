use log::debug;
use serde::Serialize;

use super::game_field::LockEvent;

/// Points for an ordinary clear, indexed by line count, before the level multiplier.
const LINE_CLEAR_POINTS: [usize; 5] = [0, 1, 3, 5, 8];
const TSPIN_DOUBLE_POINTS: usize = 12;
const TSPIN_TRIPLE_POINTS: usize = 36;

/// Scoring class of a lock event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::IsVariant)]
pub enum LineClear {
    None,
    Single,
    Double,
    Triple,
    Tetris,
    TSpinDouble,
    TSpinTriple,
}

impl LineClear {
    /// Classifies a lock. A T-spin single scores as an ordinary single, and four lines
    /// are a Tetris whether or not the piece spun.
    #[must_use]
    pub const fn classify(cleared_lines: usize, is_tspin: bool) -> Self {
        match (cleared_lines, is_tspin) {
            (0, _) => LineClear::None,
            (1, _) => LineClear::Single,
            (2, true) => LineClear::TSpinDouble,
            (2, false) => LineClear::Double,
            (3, true) => LineClear::TSpinTriple,
            (3, false) => LineClear::Triple,
            _ => LineClear::Tetris,
        }
    }

    /// Points at level 0, without back-to-back.
    #[must_use]
    pub const fn base_points(self) -> usize {
        match self {
            LineClear::None => LINE_CLEAR_POINTS[0],
            LineClear::Single => LINE_CLEAR_POINTS[1],
            LineClear::Double => LINE_CLEAR_POINTS[2],
            LineClear::Triple => LINE_CLEAR_POINTS[3],
            LineClear::Tetris => LINE_CLEAR_POINTS[4],
            LineClear::TSpinDouble => TSPIN_DOUBLE_POINTS,
            LineClear::TSpinTriple => TSPIN_TRIPLE_POINTS,
        }
    }

    /// Difficult clears chain back-to-back bonuses.
    #[must_use]
    pub const fn is_difficult(self) -> bool {
        matches!(
            self,
            LineClear::Tetris | LineClear::TSpinDouble | LineClear::TSpinTriple
        )
    }
}

/// The most recent scoring clear, kept for a transient on-screen display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointsAward {
    pub points: usize,
    pub clear: LineClear,
    pub back_to_back: bool,
    /// Game-clock time of the award.
    pub awarded_at_ms: u64,
}

/// Score, level and counters for a session.
///
/// # Scoring
///
/// Each lock is classified with [`LineClear`]. Points are the class's base points times
/// `level + 1`; a difficult clear directly following another difficult clear earns
/// 1.5× (rounded down). A lock that clears nothing breaks the back-to-back chain and
/// scores nothing.
///
/// The level rises by at most one per lock, whenever `lines / 10` exceeds it.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameStats, LockEvent, PieceKind};
///
/// let tetris = LockEvent { kind: PieceKind::I, cleared_lines: 4, is_tspin: false };
/// let mut stats = GameStats::new();
/// assert_eq!(stats.complete_piece_drop(&tetris, 0), 8);
/// assert_eq!(stats.complete_piece_drop(&tetris, 100), 12);
/// assert_eq!(stats.score(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    total_cleared_lines: usize,
    back_to_back: bool,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
    tspin_clears: usize,
    back_to_back_bonuses: usize,
    last_award: Option<PointsAward>,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            total_cleared_lines: 0,
            back_to_back: false,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
            tspin_clears: 0,
            back_to_back_bonuses: 0,
            last_award: None,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Whether the last scoring clear was difficult.
    #[must_use]
    pub const fn is_back_to_back(&self) -> bool {
        self.back_to_back
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Histogram of locks by lines cleared: `[0]` counts locks that cleared nothing,
    /// `[4]` counts Tetrises.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    #[must_use]
    pub const fn tspin_clears(&self) -> usize {
        self.tspin_clears
    }

    #[must_use]
    pub const fn back_to_back_bonuses(&self) -> usize {
        self.back_to_back_bonuses
    }

    #[must_use]
    pub const fn last_award(&self) -> Option<&PointsAward> {
        self.last_award.as_ref()
    }

    /// Points of the last award while it is still displayed.
    ///
    /// The award is visible for `display_ms` inclusive, then reports nothing.
    #[must_use]
    pub fn points_display(&self, now_ms: u64, display_ms: u64) -> Option<usize> {
        self.last_award
            .filter(|award| now_ms.saturating_sub(award.awarded_at_ms) <= display_ms)
            .map(|award| award.points)
    }

    /// Records a lock and returns the points it earned.
    pub fn complete_piece_drop(&mut self, event: &LockEvent, now_ms: u64) -> usize {
        let cleared = event.cleared_lines.min(4);
        self.completed_pieces += 1;
        self.line_cleared_counter[cleared] += 1;

        let clear = LineClear::classify(cleared, event.is_tspin);
        if clear.is_none() {
            self.back_to_back = false;
            return 0;
        }

        let mut points = clear.base_points() * (self.level + 1);
        let back_to_back = clear.is_difficult() && self.back_to_back;
        if back_to_back {
            points = points * 3 / 2;
            self.back_to_back_bonuses += 1;
        }
        if event.is_tspin {
            self.tspin_clears += 1;
        }
        self.score += points;
        self.back_to_back = clear.is_difficult();

        self.total_cleared_lines += cleared;
        if self.total_cleared_lines / 10 > self.level {
            self.level += 1;
            debug!("level up: {}", self.level);
        }

        self.last_award = Some(PointsAward {
            points,
            clear,
            back_to_back,
            awarded_at_ms: now_ms,
        });
        debug!("{clear:?} for {points} points (score {})", self.score);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn lock(kind: PieceKind, cleared_lines: usize, is_tspin: bool) -> LockEvent {
        LockEvent {
            kind,
            cleared_lines,
            is_tspin,
        }
    }

    fn lines(n: usize) -> LockEvent {
        lock(PieceKind::I, n, false)
    }

    #[test]
    fn test_ordinary_clears_at_level_zero() {
        for (n, expected) in [(1, 1), (2, 3), (3, 5), (4, 8)] {
            let mut stats = GameStats::new();
            assert_eq!(stats.complete_piece_drop(&lines(n), 0), expected);
            assert_eq!(stats.score(), expected);
            assert_eq!(stats.total_cleared_lines(), n);
        }
    }

    #[test]
    fn test_no_clear_scores_nothing_and_breaks_chain() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(&lines(4), 0);
        assert!(stats.is_back_to_back());
        assert_eq!(stats.complete_piece_drop(&lines(0), 0), 0);
        assert!(!stats.is_back_to_back());
        assert_eq!(stats.complete_piece_drop(&lines(4), 0), 8);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 2]);
    }

    #[test]
    fn test_back_to_back_tetris() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(&lines(4), 0), 8);
        assert!(stats.is_back_to_back());
        assert_eq!(stats.complete_piece_drop(&lines(4), 0), 12);
        assert_eq!(stats.back_to_back_bonuses(), 1);
        assert!(stats.last_award().unwrap().back_to_back);
    }

    #[test]
    fn test_ordinary_clear_breaks_chain() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(&lines(4), 0);
        assert_eq!(stats.complete_piece_drop(&lines(1), 0), 1);
        assert!(!stats.is_back_to_back());
        assert_eq!(stats.complete_piece_drop(&lines(4), 0), 8);
        assert_eq!(stats.back_to_back_bonuses(), 0);
    }

    #[test]
    fn test_tspin_scoring() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(&lock(PieceKind::T, 2, true), 0), 12);
        // Back-to-back T-spin triple: 36 * 1.5.
        assert_eq!(stats.complete_piece_drop(&lock(PieceKind::T, 3, true), 0), 54);
        // T-spin single counts as a plain single and breaks the chain.
        assert_eq!(stats.complete_piece_drop(&lock(PieceKind::T, 1, true), 0), 1);
        assert!(!stats.is_back_to_back());
        assert_eq!(stats.tspin_clears(), 3);
    }

    #[test]
    fn test_classify() {
        assert_eq!(LineClear::classify(0, true), LineClear::None);
        assert_eq!(LineClear::classify(1, true), LineClear::Single);
        assert_eq!(LineClear::classify(2, true), LineClear::TSpinDouble);
        assert_eq!(LineClear::classify(3, false), LineClear::Triple);
        assert_eq!(LineClear::classify(4, true), LineClear::Tetris);
        assert!(!LineClear::Triple.is_difficult());
        assert!(LineClear::TSpinDouble.is_difficult());
    }

    #[test]
    fn test_level_multiplier_and_single_increment() {
        let mut stats = GameStats::new();
        // 12 lines at level 0: level rises once.
        for _ in 0..3 {
            stats.complete_piece_drop(&lines(4), 0);
        }
        assert_eq!(stats.total_cleared_lines(), 12);
        assert_eq!(stats.level(), 1);
        // A single at level 1 is worth 2.
        assert_eq!(stats.complete_piece_drop(&lines(1), 0), 2);
    }

    #[test]
    fn test_level_rises_at_most_once_per_lock() {
        let mut stats = GameStats::new();
        for _ in 0..6 {
            stats.complete_piece_drop(&lines(4), 0);
        }
        // Level follows lines / 10 one step at a time.
        assert_eq!(stats.total_cleared_lines(), 24);
        assert_eq!(stats.level(), 2);
        stats.complete_piece_drop(&lines(0), 0);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_points_display_expires() {
        let mut stats = GameStats::new();
        assert_eq!(stats.points_display(0, 1500), None);
        stats.complete_piece_drop(&lines(2), 1000);
        assert_eq!(stats.points_display(1000, 1500), Some(3));
        assert_eq!(stats.points_display(2500, 1500), Some(3));
        assert_eq!(stats.points_display(2501, 1500), None);
        // A non-clearing lock does not replace the award.
        stats.complete_piece_drop(&lines(0), 1200);
        assert_eq!(stats.points_display(1300, 1500), Some(3));
    }
}
