//! Session leaderboard
//!
//! Keeps the best runs of the current session, fed by `GameState::game_over`.
//! Lives only as long as the `GameState` that owns it.

use serde::{Deserialize, Serialize};

/// Runs kept on the board
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached (1-based)
    pub level: u32,
    /// Simulation tick the run ended on
    pub tick: u64,
}

impl HighScoreEntry {
    /// Board order: score, then level reached
    fn rank_key(&self) -> (u64, u32) {
        (self.score, self.level)
    }
}

/// Best runs, highest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Would a run ending with `score` at `level` make the board?
    ///
    /// Empty runs never do. On a full board the run has to strictly beat the
    /// last entry, so an equal run does not bump an older one.
    pub fn qualifies(&self, score: u64, level: u32) -> bool {
        if score == 0 {
            return false;
        }
        self.entries.len() < MAX_HIGH_SCORES
            || self
                .entries
                .last()
                .is_some_and(|last| (score, level) > last.rank_key())
    }

    /// Record a finished run; returns its 1-based rank if it made the board
    pub fn add_score(&mut self, score: u64, level: u32, tick: u64) -> Option<usize> {
        if !self.qualifies(score, level) {
            return None;
        }
        // Earlier runs stay ahead of later ties
        let index = self
            .entries
            .partition_point(|e| e.rank_key() >= (score, level));
        self.entries
            .insert(index, HighScoreEntry { score, level, tick });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_score_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 3, 10), None);
        assert!(scores.entries.is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(5, 1, 10), Some(1));
        assert_eq!(scores.add_score(12, 3, 20), Some(1));
        assert_eq!(scores.add_score(7, 2, 30), Some(2));
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![12, 7, 5]);
        assert_eq!(scores.top_score(), Some(12));
    }

    #[test]
    fn test_ties_break_on_level_then_age() {
        let mut scores = HighScores::new();
        scores.add_score(100, 2, 10);
        // Same score, deeper run ranks higher
        assert_eq!(scores.add_score(100, 4, 20), Some(1));
        // Exact tie lands behind the earlier run
        assert_eq!(scores.add_score(100, 2, 30), Some(3));
        let ticks: Vec<u64> = scores.entries.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![20, 10, 30]);
    }

    #[test]
    fn test_full_board_trims_lowest() {
        let mut scores = HighScores::new();
        for score in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(score * 10, 1, score);
        }
        assert!(!scores.qualifies(10, 1));
        // A deeper run with the lowest score still beats the last entry
        assert!(scores.qualifies(10, 2));
        assert_eq!(scores.add_score(55, 2, 99), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(20));
    }
}
