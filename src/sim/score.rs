//! Run score and in-memory high score

use serde::{Deserialize, Serialize};

/// Score counters for one session
///
/// `score` only grows during a run; `high_score` is always at least `score`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u64,
    high_score: u64,
}

impl Scoreboard {
    /// Fresh board seeded with a previously persisted high score
    pub fn with_high_score(high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Add points (saturating) and lift the high score along with it
    pub fn add(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.high_score = self.high_score.max(self.score);
    }

    /// Fold in a high score learned from elsewhere (e.g. storage)
    pub fn observe_high_score(&mut self, high_score: u64) {
        self.high_score = self.high_score.max(high_score);
    }

    /// Explicit reset for a new run; the high score survives
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_lifts_high_score() {
        let mut board = Scoreboard::with_high_score(25);
        board.add(10);
        assert_eq!(board.score(), 10);
        assert_eq!(board.high_score(), 25);
        board.add(20);
        assert_eq!(board.score(), 30);
        assert_eq!(board.high_score(), 30);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut board = Scoreboard::default();
        board.add(40);
        board.reset();
        assert_eq!(board.score(), 0);
        assert_eq!(board.high_score(), 40);
    }

    #[test]
    fn test_saturates() {
        let mut board = Scoreboard::default();
        board.add(u64::MAX);
        board.add(5);
        assert_eq!(board.score(), u64::MAX);
    }
}
