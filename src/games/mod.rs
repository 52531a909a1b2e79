//! The portal's mini-games
//!
//! Each game is a `sim::Game` implementation: a tagged-variant world plus the
//! per-kind update rules. The session drives them in the fixed stage order.

pub mod asteroids;
pub mod duckhunt;
pub mod jump;
pub mod snake;

use serde::{Deserialize, Serialize};

pub use asteroids::{Asteroids, AsteroidsConfig, AsteroidsInput};
pub use duckhunt::{DuckHunt, DuckHuntConfig, DuckHuntInput};
pub use jump::{Jump, JumpConfig, JumpInput};
pub use snake::{Direction, Snake, SnakeConfig};

/// Mini-game identifiers, numbered as the portal's score contract expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    DuckHunt = 1,
    Snake = 2,
    Asteroids = 3,
    StrkJump = 4,
}

impl GameId {
    pub const ALL: [GameId; 4] = [
        GameId::DuckHunt,
        GameId::Snake,
        GameId::Asteroids,
        GameId::StrkJump,
    ];

    /// Contract identifier
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|game| game.id() == id)
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            GameId::DuckHunt => "Duck Hunt",
            GameId::Snake => "Snake",
            GameId::Asteroids => "Asteroids",
            GameId::StrkJump => "StrkJump",
        }
    }

    /// Look up a game from its route segment (`/games/duck-hunt` etc.)
    pub fn from_path(path: &str) -> Option<Self> {
        let segment = path.trim_matches('/').rsplit('/').next()?;
        match segment.to_ascii_lowercase().as_str() {
            "duckhunt" | "duck-hunt" => Some(GameId::DuckHunt),
            "snake" => Some(GameId::Snake),
            "asteroids" => Some(GameId::Asteroids),
            "strkjump" | "strk-jump" => Some(GameId::StrkJump),
            _ => None,
        }
    }

    /// Key of the high score record in the portal's storage
    pub fn storage_key(self) -> &'static str {
        match self {
            GameId::DuckHunt => "duckhunt-best-score",
            GameId::Snake => "snake-high-score",
            GameId::Asteroids => "asteroids-high-score",
            GameId::StrkJump => "strkjump-high-score",
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_ids() {
        assert_eq!(GameId::DuckHunt.id(), 1);
        assert_eq!(GameId::Snake.id(), 2);
        assert_eq!(GameId::Asteroids.id(), 3);
        assert_eq!(GameId::StrkJump.id(), 4);
        assert_eq!(GameId::from_id(3), Some(GameId::Asteroids));
        assert_eq!(GameId::from_id(0), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(GameId::from_path("/games/duck-hunt"), Some(GameId::DuckHunt));
        assert_eq!(GameId::from_path("duckhunt"), Some(GameId::DuckHunt));
        assert_eq!(GameId::from_path("/games/Snake/"), Some(GameId::Snake));
        assert_eq!(GameId::from_path("/games/strkjump"), Some(GameId::StrkJump));
        assert_eq!(GameId::from_path("/games/pong"), None);
        assert_eq!(GameId::from_path(""), None);
    }

    #[test]
    fn test_storage_keys_unique() {
        let mut keys: Vec<_> = GameId::ALL.iter().map(|g| g.storage_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }
}
