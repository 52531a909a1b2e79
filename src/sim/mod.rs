//! Deterministic simulation module
//!
//! Everything a mini-game needs to run a session lives here. This module must be
//! pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only (one source per session, re-derived per run)
//! - Stable iteration order (entities kept in insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod phase;
pub mod rng;
pub mod score;
pub mod session;
pub mod spawner;

pub use collision::{Aabb, circles_overlap};
pub use entity::{Bounds, Lifetime};
pub use phase::{Command, SessionPhase};
pub use rng::SimRng;
pub use score::Scoreboard;
pub use session::{Game, GameOverReport, Session, TickContext};
pub use spawner::{
    Cooldown, KindTable, ProgressionTable, SpawnCursor, Tier, drop_trailing, evict_furthest_behind,
    place_spaced,
};
