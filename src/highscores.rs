//! Per-game high score records
//!
//! One record per mini-game, stored as JSON under the portal's storage key.
//! Older builds stored a bare number under the same key; that still loads.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PLAYER_NAME;
use crate::games::GameId;
use crate::persistence::ScoreStore;

/// The best run recorded for a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Best final score
    pub score: u64,
    /// Display name of the player who set it
    #[serde(default)]
    pub player_name: String,
    /// Level, round or height reached in that run
    #[serde(default)]
    pub progress: u32,
}

/// High score record for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    pub game: GameId,
    pub entry: Option<HighScoreEntry>,
}

/// Outcome of finalizing a run against the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finalized {
    /// Stored best before this run (0 when unknown)
    pub previous: u64,
    /// Best after this run, whether or not the write succeeded
    pub best: u64,
    /// The run beat the previous best
    pub improved: bool,
}

impl HighScores {
    /// Empty record
    pub fn new(game: GameId) -> Self {
        Self { game, entry: None }
    }

    /// Load the record, surfacing store and parse errors
    pub fn try_load(store: &dyn ScoreStore, game: GameId) -> anyhow::Result<Self> {
        let Some(raw) = store.get(game.storage_key())? else {
            return Ok(Self::new(game));
        };
        let entry = match serde_json::from_str::<HighScoreEntry>(&raw) {
            Ok(entry) => entry,
            Err(json_err) => match raw.trim().parse::<u64>() {
                Ok(score) => HighScoreEntry {
                    score,
                    player_name: DEFAULT_PLAYER_NAME.to_string(),
                    progress: 0,
                },
                Err(_) => return Err(json_err.into()),
            },
        };
        Ok(Self {
            game,
            entry: Some(entry),
        })
    }

    /// Load the record; any failure yields an empty record
    pub fn load(store: &dyn ScoreStore, game: GameId) -> Self {
        Self::try_load(store, game).unwrap_or_else(|err| {
            log::warn!("Could not load {} high score: {err:#}", game.name());
            Self::new(game)
        })
    }

    /// Best score on record (0 when none)
    pub fn best(&self) -> u64 {
        self.entry.as_ref().map(|e| e.score).unwrap_or(0)
    }

    /// Whether `score` would replace the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best()
    }

    /// Replace the record if `score` beats it. Returns true when replaced.
    pub fn record(&mut self, score: u64, player_name: &str, progress: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.entry = Some(HighScoreEntry {
            score,
            player_name: player_name.to_string(),
            progress,
        });
        true
    }

    pub fn save(&self, store: &mut dyn ScoreStore) -> anyhow::Result<()> {
        if let Some(entry) = &self.entry {
            let json = serde_json::to_string(entry)?;
            store.set(self.game.storage_key(), &json)?;
            log::info!("{} high score saved ({})", self.game.name(), entry.score);
        }
        Ok(())
    }

    /// Compare a final score with the stored record and overwrite it if
    /// greater. Never fails: store errors are logged and swallowed.
    ///
    /// `known_best` is the best the caller knew before the run; when the
    /// store cannot be read it guards against overwriting a better record.
    pub fn finalize(
        store: &mut dyn ScoreStore,
        game: GameId,
        score: u64,
        player_name: &str,
        progress: u32,
        known_best: u64,
    ) -> Finalized {
        let (mut record, floor) = match Self::try_load(store, game) {
            Ok(record) => {
                let floor = record.best();
                (record, floor)
            }
            Err(err) => {
                log::warn!("Could not read {} high score: {err:#}", game.name());
                (Self::new(game), known_best)
            }
        };

        let improved = score > floor && record.record(score, player_name, progress);
        if improved {
            if let Err(err) = record.save(store) {
                log::warn!("Could not save {} high score: {err:#}", game.name());
            }
        }

        Finalized {
            previous: floor,
            best: floor.max(score),
            improved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{BrokenStore, MemoryStore};
    use proptest::prelude::*;

    #[test]
    fn test_empty_store() {
        let store = MemoryStore::new();
        let scores = HighScores::load(&store, GameId::Snake);
        assert_eq!(scores.best(), 0);
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_finalize_only_raises() {
        let mut store = MemoryStore::new();
        let first = HighScores::finalize(&mut store, GameId::Asteroids, 300, "Ada", 2, 0);
        assert!(first.improved);
        assert_eq!(first.best, 300);

        let second = HighScores::finalize(&mut store, GameId::Asteroids, 120, "Bob", 1, 300);
        assert!(!second.improved);
        assert_eq!(second.previous, 300);
        assert_eq!(second.best, 300);

        let stored = HighScores::load(&store, GameId::Asteroids);
        let entry = stored.entry.unwrap();
        assert_eq!(entry.score, 300);
        assert_eq!(entry.player_name, "Ada");
        assert_eq!(entry.progress, 2);
    }

    #[test]
    fn test_games_are_scoped() {
        let mut store = MemoryStore::new();
        HighScores::finalize(&mut store, GameId::Snake, 50, "Ada", 0, 0);
        assert_eq!(HighScores::load(&store, GameId::Snake).best(), 50);
        assert_eq!(HighScores::load(&store, GameId::DuckHunt).best(), 0);
    }

    #[test]
    fn test_legacy_plain_number() {
        let mut store = MemoryStore::new();
        store.set(GameId::Snake.storage_key(), "140").unwrap();
        let scores = HighScores::load(&store, GameId::Snake);
        assert_eq!(scores.best(), 140);
    }

    #[test]
    fn test_garbage_record_treated_as_absent() {
        let mut store = MemoryStore::new();
        store.set(GameId::StrkJump.storage_key(), "{oops").unwrap();
        assert_eq!(HighScores::load(&store, GameId::StrkJump).best(), 0);
    }

    #[test]
    fn test_broken_store_is_swallowed() {
        let mut store = BrokenStore;
        let outcome = HighScores::finalize(&mut store, GameId::Snake, 90, "Ada", 0, 40);
        assert!(outcome.improved);
        assert_eq!(outcome.best, 90);

        let outcome = HighScores::finalize(&mut store, GameId::Snake, 30, "Ada", 0, 40);
        assert!(!outcome.improved);
        assert_eq!(outcome.best, 40);
    }

    proptest! {
        #[test]
        fn persisted_high_score_is_running_max(scores in proptest::collection::vec(0u64..10_000, 1..30)) {
            let mut store = MemoryStore::new();
            let mut expected = 0u64;
            for score in scores {
                let before = HighScores::load(&store, GameId::DuckHunt).best();
                HighScores::finalize(&mut store, GameId::DuckHunt, score, "p", 0, before);
                expected = expected.max(score);
                let after = HighScores::load(&store, GameId::DuckHunt).best();
                prop_assert_eq!(after, before.max(score));
                prop_assert_eq!(after, expected);
            }
        }
    }
}
