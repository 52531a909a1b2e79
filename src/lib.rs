//! Bitwave Arcade - session lifecycle and procedural spawning core
//!
//! Core modules:
//! - `sim`: Deterministic simulation primitives (phases, spawner, session driver)
//! - `games`: The mini-games built on top of `sim`
//! - `platform`: Frame clock and explicit game handles for the embedding UI
//! - `persistence`: Key-value score stores (memory, file, LocalStorage)
//! - `highscores`: Per-game high score records
//! - `settings`: Player name, seed and per-game tuning

pub mod games;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use games::GameId;
pub use highscores::{HighScoreEntry, HighScores};
pub use settings::Settings;

/// Engine-level constants shared by every game
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the portal's frame budget)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest real frame delta fed to the accumulator (tab switches, stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Display name used when the portal passes none
    pub const DEFAULT_PLAYER_NAME: &str = "Player";
    /// Width of the zero-padded score readout
    pub const SCORE_DIGITS: usize = 6;
}

/// Wrap a coordinate into `[min, max]`, however far outside it lies.
///
/// A degenerate range (`max <= min`) or a non-finite value collapses to `min`.
#[inline]
pub fn wrap_coord(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || !value.is_finite() {
        return min;
    }
    if (min..=max).contains(&value) {
        return value;
    }
    // rem_euclid can round up to exactly `span` for tiny negative offsets
    (min + (value - min).rem_euclid(span)).clamp(min, max)
}

/// Zero-pad a score to a fixed number of digits (`42` -> `000042`)
pub fn format_score(score: u64, digits: usize) -> String {
    format!("{score:0digits$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_coord_in_range_untouched() {
        assert_eq!(wrap_coord(12.5, 0.0, 100.0), 12.5);
        assert_eq!(wrap_coord(100.0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn test_wrap_coord_far_out_of_range() {
        assert!((wrap_coord(-10.0, 0.0, 100.0) - 90.0).abs() < 1e-4);
        assert!((wrap_coord(1050.0, 0.0, 100.0) - 50.0).abs() < 1e-3);
        assert!((wrap_coord(-60.0, -50.0, 850.0) - 840.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_coord_degenerate() {
        assert_eq!(wrap_coord(5.0, 10.0, 10.0), 10.0);
        assert_eq!(wrap_coord(f32::NAN, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(42, 6), "000042");
        assert_eq!(format_score(1234567, 6), "1234567");
    }

    proptest! {
        #[test]
        fn wrap_stays_in_bounds(value in -1.0e6f32..1.0e6, min in -500.0f32..500.0, span in 1.0f32..2000.0) {
            let max = min + span;
            let wrapped = wrap_coord(value, min, max);
            prop_assert!(wrapped >= min && wrapped <= max);
        }
    }
}
