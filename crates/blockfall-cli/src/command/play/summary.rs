use std::fmt;

use blockfall_engine::{Difficulty, GameOverError, GameSession, PieceSeed, SessionState};
use serde::Serialize;

/// End-of-game report printed after the terminal is restored.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub seed: PieceSeed,
    pub difficulty: Difficulty,
    pub outcome: SessionState,
    pub score: usize,
    pub level: usize,
    pub lines: usize,
    pub pieces: usize,
    /// Indexed by lines cleared at once; index 0 counts locks that cleared nothing.
    pub line_clears: [usize; 5],
    pub tspin_clears: usize,
    pub back_to_back_bonuses: usize,
    pub elapsed_ms: u64,
}

impl SessionSummary {
    pub fn new(session: &GameSession) -> Self {
        let stats = session.stats();
        Self {
            seed: session.field().seed(),
            difficulty: session.config().difficulty,
            outcome: *session.session_state(),
            score: stats.score(),
            level: stats.level(),
            lines: stats.total_cleared_lines(),
            pieces: stats.completed_pieces(),
            line_clears: *stats.line_cleared_counter(),
            tspin_clears: stats.tspin_clears(),
            back_to_back_bonuses: stats.back_to_back_bonuses(),
            elapsed_ms: session.elapsed_ms(),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            SessionState::Playing | SessionState::Paused => "interrupted",
            SessionState::GameOver(GameOverError::LockOut) => "game over (lock out)",
            SessionState::GameOver(GameOverError::BlockOut) => "game over (block out)",
            SessionState::Abandoned => "quit",
        };
        let secs = self.elapsed_ms / 1000;
        writeln!(f, "Result:      {outcome}")?;
        writeln!(f, "Difficulty:  {}", self.difficulty)?;
        writeln!(f, "Seed:        {}", self.seed)?;
        writeln!(f, "Time:        {}:{:0>2}", secs / 60, secs % 60)?;
        writeln!(f, "Score:       {}", self.score)?;
        writeln!(f, "Level:       {}", self.level)?;
        writeln!(f, "Lines:       {}", self.lines)?;
        writeln!(f, "Pieces:      {}", self.pieces)?;
        let [_, singles, doubles, triples, tetrises] = self.line_clears;
        writeln!(
            f,
            "Clears:      {singles} single / {doubles} double / {triples} triple / {tetrises} tetris"
        )?;
        writeln!(f, "T-spins:     {}", self.tspin_clears)?;
        writeln!(f, "B2B bonuses: {}", self.back_to_back_bonuses)
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Action, GameConfig, InputEvent};

    use super::*;

    #[test]
    fn test_summary_of_finished_session() {
        let seed = PieceSeed::from_bytes([9; 16]);
        let mut session = GameSession::with_seed(GameConfig::new(Difficulty::Hard), seed);
        session.update(0, &[]);
        session.update(16, &[InputEvent::pressed(Action::HardDrop)]);
        session.update(32, &[InputEvent::pressed(Action::Escape)]);

        let summary = SessionSummary::new(&session);
        assert_eq!(summary.seed, seed);
        assert_eq!(summary.difficulty, Difficulty::Hard);
        assert!(summary.outcome.is_abandoned());
        assert_eq!(summary.pieces, 1);
        assert_eq!(summary.line_clears[0], 1);

        let text = summary.to_string();
        assert!(text.contains("Result:      quit"));
        assert!(text.contains(&format!("Seed:        {seed}")));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["seed"], seed.to_string());
        assert_eq!(json["difficulty"], Difficulty::Hard.to_string());
        assert_eq!(json["outcome"], "Abandoned");
    }
}
