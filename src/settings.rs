//! Player settings and per-game tuning
//!
//! Persisted as one JSON document under its own store key, apart from the
//! high score records.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PLAYER_NAME;
use crate::games::{AsteroidsConfig, DuckHuntConfig, JumpConfig, SnakeConfig};
use crate::persistence::ScoreStore;

/// Settings shared by every mini-game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display name from the portal profile (empty means "Player")
    pub player_name: String,
    /// Fixed RNG seed for replays; random per mount when unset
    pub seed: Option<u64>,

    // === Per-game tuning ===
    pub snake: SnakeConfig,
    pub asteroids: AsteroidsConfig,
    pub jump: JumpConfig,
    pub duck_hunt: DuckHuntConfig,
}

impl Settings {
    /// Store key
    pub const STORAGE_KEY: &'static str = "bitwave_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Name shown in greetings and score records
    pub fn display_name(&self) -> &str {
        match self.player_name.trim() {
            "" => DEFAULT_PLAYER_NAME,
            name => name,
        }
    }

    /// Seed for the next mount: the fixed one, or fresh entropy
    #[cfg(not(target_arch = "wasm32"))]
    pub fn session_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Seed for the next mount: the fixed one, or the page clock
    #[cfg(target_arch = "wasm32")]
    pub fn session_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| js_sys::Date::now() as u64)
    }

    /// Load from a store, falling back to defaults on any failure
    pub fn load(store: &dyn ScoreStore) -> Self {
        let json = match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(err) => {
                log::warn!("Could not read settings: {err:#}");
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(err) => {
                log::warn!("Discarding unreadable settings: {err:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn ScoreStore) -> anyhow::Result<()> {
        store.set(Self::STORAGE_KEY, &self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{BrokenStore, MemoryStore};

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"player_name":"Ada","snake":{"board_width":30}}"#).unwrap();
        assert_eq!(settings.display_name(), "Ada");
        assert_eq!(settings.snake.board_width, 30);
        assert_eq!(settings.snake.board_height, 20);
        assert_eq!(settings.asteroids, AsteroidsConfig::default());
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("[1, 2").is_err());
    }

    #[test]
    fn test_display_name_default() {
        let settings = Settings {
            player_name: "  ".into(),
            ..Default::default()
        };
        assert_eq!(settings.display_name(), "Player");
    }

    #[test]
    fn test_fixed_seed() {
        let settings = Settings {
            seed: Some(99),
            ..Default::default()
        };
        assert_eq!(settings.session_seed(), 99);
    }

    #[test]
    fn test_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        let mut settings = Settings::default();
        settings.player_name = "Grace".into();
        settings.duck_hunt.round_quota = 7;
        settings.save(&mut store).unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_falls_back_on_errors() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
        assert_eq!(Settings::load(&BrokenStore), Settings::default());
    }
}
