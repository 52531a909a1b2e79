//! Procedural spawning primitives
//!
//! - `KindTable`: normalized weighted kind selection (one uniform draw)
//! - `ProgressionTable`: kind tables biased by progression with a fallback
//! - `SpawnCursor`: monotonic frontier of generated content
//! - `Cooldown`: interval + probability gate measured in active time
//! - `place_spaced`: bounded-attempt placement with minimum spacing
//! - `drop_trailing` / `evict_furthest_behind`: population cleanup

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::SimRng;

/// Weighted table over a closed set of kinds; weights are normalized to sum 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindTable<K> {
    entries: Vec<(K, f32)>,
}

impl<K: Copy> KindTable<K> {
    /// Build from raw weights. Rejects empty tables, negative or non-finite
    /// weights and tables whose weights sum to zero.
    pub fn new(weights: &[(K, f32)]) -> Option<Self> {
        if weights.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return None;
        }
        Some(Self {
            entries: weights.iter().map(|&(k, w)| (k, w / total)).collect(),
        })
    }

    /// Table that always yields `kind`
    pub fn single(kind: K) -> Self {
        Self {
            entries: vec![(kind, 1.0)],
        }
    }

    /// Normalized `(kind, probability)` pairs
    pub fn entries(&self) -> &[(K, f32)] {
        &self.entries
    }

    /// Map a uniform draw in `[0, 1)` to a kind
    pub fn pick(&self, roll: f32) -> K {
        let mut cumulative = 0.0;
        for &(kind, p) in &self.entries {
            cumulative += p;
            if roll < cumulative {
                return kind;
            }
        }
        // Rounding can leave the cumulative sum a hair below 1.0
        self.entries
            .iter()
            .rev()
            .find(|(_, p)| *p > 0.0)
            .map(|&(k, _)| k)
            .unwrap_or(self.entries[0].0)
    }

    pub fn sample(&self, rng: &mut SimRng) -> K {
        self.pick(rng.unit())
    }
}

/// A kind table used while progression is below `until`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier<K> {
    pub until: f32,
    pub table: KindTable<K>,
}

/// Kind tables selected by progression (height, score, round...)
///
/// Tiers are checked in ascending `until` order; progression past the last
/// tier, or non-finite progression, uses `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionTable<K> {
    tiers: Vec<Tier<K>>,
    fallback: KindTable<K>,
}

impl<K: Copy> ProgressionTable<K> {
    pub fn new(mut tiers: Vec<Tier<K>>, fallback: KindTable<K>) -> Self {
        tiers.sort_by(|a, b| a.until.total_cmp(&b.until));
        Self { tiers, fallback }
    }

    /// Single table regardless of progression
    pub fn flat(table: KindTable<K>) -> Self {
        Self {
            tiers: Vec::new(),
            fallback: table,
        }
    }

    pub fn table_for(&self, progression: f32) -> &KindTable<K> {
        if !progression.is_finite() {
            return &self.fallback;
        }
        self.tiers
            .iter()
            .find(|tier| progression < tier.until)
            .map(|tier| &tier.table)
            .unwrap_or(&self.fallback)
    }

    pub fn sample(&self, progression: f32, rng: &mut SimRng) -> K {
        self.table_for(progression).sample(rng)
    }
}

/// Frontier of generated content along the progression axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCursor {
    frontier: f32,
}

impl SpawnCursor {
    pub fn new(start: f32) -> Self {
        Self { frontier: start }
    }

    pub fn frontier(&self) -> f32 {
        self.frontier
    }

    /// Candidate position one random step beyond the frontier (not committed)
    pub fn propose(&self, rng: &mut SimRng, min_step: f32, max_step: f32) -> f32 {
        self.frontier + rng.range(min_step.max(0.0), max_step.max(0.0))
    }

    /// Move the frontier forward; positions behind it are ignored
    pub fn advance_to(&mut self, position: f32) {
        if position > self.frontier {
            self.frontier = position;
        }
    }
}

/// Rate limiter for spawns: an interval since the last spawn, then a chance
/// per tick. Time is the session's active (unpaused) clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    pub interval: f32,
    pub chance: f32,
    last_fired: f32,
}

impl Cooldown {
    pub fn new(interval: f32, chance: f32) -> Self {
        Self {
            interval,
            chance,
            last_fired: 0.0,
        }
    }

    pub fn last_fired(&self) -> f32 {
        self.last_fired
    }

    /// Interval elapsed since the last spawn
    pub fn ready(&self, now: f32) -> bool {
        now - self.last_fired >= self.interval
    }

    /// Roll for a spawn; on success the cooldown restarts at `now`
    pub fn try_fire(&mut self, now: f32, rng: &mut SimRng) -> bool {
        if self.ready(now) && rng.chance(self.chance) {
            self.last_fired = now;
            true
        } else {
            false
        }
    }

    /// Restart the interval without spawning (e.g. a skipped placement)
    pub fn restart(&mut self, now: f32) {
        self.last_fired = now;
    }
}

/// Try up to `attempts` candidates and return the first one at least
/// `min_distance` away from every position in `existing`. `None` means the
/// spawn is skipped for this tick.
pub fn place_spaced<F>(
    rng: &mut SimRng,
    attempts: u32,
    min_distance: f32,
    existing: &[Vec2],
    mut candidate: F,
) -> Option<Vec2>
where
    F: FnMut(&mut SimRng) -> Vec2,
{
    let min_sq = min_distance * min_distance;
    for _ in 0..attempts {
        let pos = candidate(rng);
        if !pos.is_finite() {
            continue;
        }
        if existing.iter().all(|other| other.distance_squared(pos) >= min_sq) {
            return Some(pos);
        }
    }
    None
}

/// Remove entities whose progression coordinate fell below `threshold`.
/// Returns how many were removed.
pub fn drop_trailing<T>(items: &mut Vec<T>, threshold: f32, progress: impl Fn(&T) -> f32) -> usize {
    let before = items.len();
    items.retain(|item| progress(item) >= threshold);
    before - items.len()
}

/// Once `items` exceeds `max_len`, keep the `keep` most advanced entities and
/// drop the rest (furthest behind first). Survivors keep their relative order.
pub fn evict_furthest_behind<T>(
    items: &mut Vec<T>,
    max_len: usize,
    keep: usize,
    progress: impl Fn(&T) -> f32,
) -> usize {
    if items.len() <= max_len {
        return 0;
    }
    let keep = keep.min(max_len);
    let mut ranked: Vec<(usize, f32)> = items.iter().map(&progress).enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut survivors = vec![false; items.len()];
    for &(idx, _) in ranked.iter().take(keep) {
        survivors[idx] = true;
    }
    let before = items.len();
    let mut idx = 0;
    items.retain(|_| {
        let keep_it = survivors[idx];
        idx += 1;
        keep_it
    });
    before - items.len()
}
