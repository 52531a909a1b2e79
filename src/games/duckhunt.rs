//! Duck Hunt
//!
//! Rounds of ten hunts. Each hunt releases one duck with three bullets to
//! bring it down; a duck that outlives its flight time or the bullets flies
//! away. A round with fewer than six ducks shot ends the run, a perfect round
//! pays a bonus. Ducks get faster every round.
//!
//! Screen coordinates: y grows downward, the sky ends at `ground_y`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::GameId;
use crate::sim::{
    Bounds, Game, KindTable, Lifetime, ProgressionTable, SimRng, TickContext, Tier, circles_overlap,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuckHuntConfig {
    pub field_width: f32,
    pub field_height: f32,
    /// Lower edge of the sky; ducks take off from here
    pub ground_y: f32,
    pub duck_radius: f32,
    /// Distance from a duck's center that still counts as a hit
    pub hit_radius: f32,

    pub prey_speed: f32,
    pub speed_per_round: f32,
    pub escape_speed: f32,
    pub fall_speed: f32,
    /// Seconds a duck flies before escaping
    pub flight_time: f32,
    /// Seconds a shot duck hangs in the air before falling
    pub shot_freeze: f32,

    pub bullets_per_hunt: u32,
    pub hunts_per_round: u32,
    /// Ducks a round needs to continue
    pub round_quota: u32,
    pub perfect_round_bonus: u64,
    pub round_start_delay: f32,
    pub hunt_end_delay: f32,

    /// Kind weights by round, earliest first
    pub duck_tiers: Vec<DuckTier>,
    /// Weights once the round leaves every tier
    pub late_duck_weights: DuckWeights,
}

impl Default for DuckHuntConfig {
    fn default() -> Self {
        Self {
            field_width: 256.0,
            field_height: 224.0,
            ground_y: 160.0,
            duck_radius: 8.0,
            hit_radius: 12.0,

            prey_speed: 100.0,
            speed_per_round: 50.0,
            escape_speed: 200.0,
            fall_speed: 150.0,
            flight_time: 5.0,
            shot_freeze: 0.3,

            bullets_per_hunt: 3,
            hunts_per_round: 10,
            round_quota: 6,
            perfect_round_bonus: 500,
            round_start_delay: 1.0,
            hunt_end_delay: 1.0,

            duck_tiers: vec![
                DuckTier {
                    until: 3.0,
                    weights: DuckWeights::new(0.7, 0.25, 0.05),
                },
                DuckTier {
                    until: 6.0,
                    weights: DuckWeights::new(0.5, 0.35, 0.15),
                },
            ],
            late_duck_weights: DuckWeights::new(0.3, 0.4, 0.3),
        }
    }
}

impl DuckHuntConfig {
    /// Rarer ducks show up more often in later rounds
    fn duck_kinds(&self) -> ProgressionTable<DuckKind> {
        let tiers = self
            .duck_tiers
            .iter()
            .map(|tier| Tier {
                until: tier.until,
                table: tier.weights.table(),
            })
            .collect();
        ProgressionTable::new(tiers, self.late_duck_weights.table())
    }
}

/// Relative weights of each duck kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuckWeights {
    pub black: f32,
    pub blue: f32,
    pub red: f32,
}

impl DuckWeights {
    pub const fn new(black: f32, blue: f32, red: f32) -> Self {
        Self { black, blue, red }
    }

    fn table(&self) -> KindTable<DuckKind> {
        KindTable::new(&[
            (DuckKind::Black, self.black),
            (DuckKind::Blue, self.blue),
            (DuckKind::Red, self.red),
        ])
        .unwrap_or_else(|| {
            log::warn!("duckhunt: invalid duck weights {self:?}, using black only");
            KindTable::single(DuckKind::Black)
        })
    }
}

/// Duck weights used before round `until`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuckTier {
    pub until: f32,
    pub weights: DuckWeights,
}

/// Sub-phases inside the session's `playing` phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HuntPhase {
    /// Round banner, counting down
    RoundStart { timer: f32 },
    /// A duck is (or is about to be) in the air
    Hunt,
    /// Dog animation after a duck is caught or escapes
    HuntEnd { timer: f32 },
    /// All hunts of the round are done; quota and bonus are settled
    RoundEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuckKind {
    Black,
    Blue,
    Red,
}

impl DuckKind {
    pub fn points(self) -> u64 {
        match self {
            DuckKind::Black => 500,
            DuckKind::Blue => 1000,
            DuckKind::Red => 1500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DuckState {
    Flying,
    /// Flying straight up and out of the sky
    Escaping,
    /// Hit, frozen for a moment
    Shot { timer: f32 },
    Falling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Duck {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: DuckKind,
    pub state: DuckState,
    pub flight: Lifetime,
}

impl Duck {
    pub fn spawn(kind: DuckKind, speed: f32, config: &DuckHuntConfig, rng: &mut SimRng) -> Self {
        let r = config.duck_radius;
        let x = rng.range(r * 2.0, config.field_width - r * 2.0);
        // Diagonal take-off, up-left or up-right
        let heading = Vec2::new(rng.sign(), -1.0).normalize();
        Self {
            pos: Vec2::new(x, config.ground_y - r),
            vel: heading * speed,
            kind,
            state: DuckState::Flying,
            flight: Lifetime::new(config.flight_time),
        }
    }

    pub fn was_shot(&self) -> bool {
        matches!(self.state, DuckState::Shot { .. } | DuckState::Falling)
    }

    /// Left the sky (escaped) or hit the ground (caught)
    pub fn is_gone(&self, sky: &Bounds, radius: f32) -> bool {
        match self.state {
            DuckState::Escaping => self.pos.y < sky.min.y - radius,
            DuckState::Falling => self.pos.y >= sky.max.y,
            _ => false,
        }
    }

    fn escape(&mut self, speed: f32) {
        self.state = DuckState::Escaping;
        self.vel = Vec2::new(0.0, -speed);
    }

    fn advance(&mut self, dt: f32, sky: &Bounds, config: &DuckHuntConfig) {
        match self.state {
            DuckState::Flying => {
                self.pos += self.vel * dt;
                let inner = sky.expand(-config.duck_radius);
                if self.pos.x < inner.min.x {
                    self.vel.x = self.vel.x.abs();
                } else if self.pos.x > inner.max.x {
                    self.vel.x = -self.vel.x.abs();
                }
                if self.pos.y < inner.min.y {
                    self.vel.y = self.vel.y.abs();
                } else if self.pos.y > inner.max.y {
                    self.vel.y = -self.vel.y.abs();
                }
                self.pos = self.pos.clamp(inner.min, inner.max.max(inner.min));
                if self.flight.tick(dt) {
                    self.escape(config.escape_speed);
                }
            }
            DuckState::Escaping | DuckState::Falling => self.pos += self.vel * dt,
            DuckState::Shot { timer } => {
                let timer = timer - dt;
                if timer > 0.0 {
                    self.state = DuckState::Shot { timer };
                } else {
                    self.state = DuckState::Falling;
                    self.vel = Vec2::new(0.0, config.fall_speed);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DuckHuntInput {
    /// Aim point of a trigger pull this tick
    pub shot: Option<Vec2>,
}

#[derive(Debug, Clone)]
pub struct DuckHunt {
    config: DuckHuntConfig,
    sky: Bounds,
    kinds: ProgressionTable<DuckKind>,
    phase: HuntPhase,
    round: u32,
    /// Hunts started this round
    hunt: u32,
    prey_speed: f32,
    bullets: u32,
    ducks_shot: u32,
    /// Hit or miss per finished hunt of the round
    tally: Vec<bool>,
    duck: Option<Duck>,
    pending_shot: Option<Vec2>,
}

impl DuckHunt {
    pub fn phase(&self) -> HuntPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn hunt(&self) -> u32 {
        self.hunt
    }

    pub fn prey_speed(&self) -> f32 {
        self.prey_speed
    }

    pub fn bullets(&self) -> u32 {
        self.bullets
    }

    pub fn ducks_shot(&self) -> u32 {
        self.ducks_shot
    }

    pub fn tally(&self) -> &[bool] {
        &self.tally
    }

    pub fn duck(&self) -> Option<&Duck> {
        self.duck.as_ref()
    }

    fn finish_hunt(&mut self) {
        let hit = self.duck.take().is_some_and(|d| d.was_shot());
        self.tally.push(hit);
        log::debug!(
            "duckhunt: hunt {}/{} {}",
            self.hunt,
            self.config.hunts_per_round,
            if hit { "caught" } else { "escaped" }
        );
        self.phase = HuntPhase::HuntEnd {
            timer: self.config.hunt_end_delay,
        };
    }

    fn release_duck(&mut self, rng: &mut SimRng) {
        self.hunt += 1;
        self.bullets = self.config.bullets_per_hunt;
        let kind = self.kinds.sample(self.round as f32, rng);
        self.duck = Some(Duck::spawn(kind, self.prey_speed, &self.config, rng));
    }

    fn next_round(&mut self, ctx: &mut TickContext) {
        if self.ducks_shot >= self.config.hunts_per_round {
            ctx.score.add(self.config.perfect_round_bonus);
            log::info!("duckhunt: perfect round {}", self.round);
        }
        self.round += 1;
        self.prey_speed += self.config.speed_per_round;
        self.hunt = 0;
        self.ducks_shot = 0;
        self.tally.clear();
        self.phase = HuntPhase::RoundStart {
            timer: self.config.round_start_delay,
        };
        log::info!("duckhunt: round {} (prey speed {})", self.round, self.prey_speed);
    }
}

impl Game for DuckHunt {
    type Config = DuckHuntConfig;
    type Input = DuckHuntInput;

    const ID: GameId = GameId::DuckHunt;

    fn start(config: &DuckHuntConfig, _rng: &mut SimRng) -> Self {
        Self {
            config: config.clone(),
            sky: Bounds::new(Vec2::ZERO, Vec2::new(config.field_width, config.ground_y)),
            kinds: config.duck_kinds(),
            phase: HuntPhase::RoundStart {
                timer: config.round_start_delay,
            },
            round: 1,
            hunt: 0,
            prey_speed: config.prey_speed,
            bullets: config.bullets_per_hunt,
            ducks_shot: 0,
            tally: Vec::new(),
            duck: None,
            pending_shot: None,
        }
    }

    fn advance(&mut self, input: &DuckHuntInput, ctx: &mut TickContext) {
        self.pending_shot = None;
        match self.phase {
            HuntPhase::RoundStart { timer } => {
                let timer = timer - ctx.dt;
                self.phase = if timer > 0.0 {
                    HuntPhase::RoundStart { timer }
                } else {
                    HuntPhase::Hunt
                };
            }
            HuntPhase::Hunt => {
                if let Some(duck) = self.duck.as_mut() {
                    duck.advance(ctx.dt, &self.sky, &self.config);
                    if duck.is_gone(&self.sky, self.config.duck_radius) {
                        self.finish_hunt();
                    } else if duck.state == DuckState::Flying && self.bullets > 0 {
                        self.pending_shot = input.shot;
                    }
                }
            }
            HuntPhase::HuntEnd { timer } => {
                let timer = timer - ctx.dt;
                self.phase = if timer > 0.0 {
                    HuntPhase::HuntEnd { timer }
                } else if self.hunt >= self.config.hunts_per_round {
                    HuntPhase::RoundEnd
                } else {
                    HuntPhase::Hunt
                };
            }
            HuntPhase::RoundEnd => {}
        }
    }

    fn resolve_collisions(&mut self, ctx: &mut TickContext) {
        let (Some(aim), Some(duck)) = (self.pending_shot, self.duck.as_mut()) else {
            return;
        };
        if duck.state != DuckState::Flying
            || !circles_overlap(aim, 0.0, duck.pos, self.config.hit_radius)
        {
            return;
        }
        duck.state = DuckState::Shot {
            timer: self.config.shot_freeze,
        };
        duck.vel = Vec2::ZERO;
        self.ducks_shot += 1;
        ctx.score.add(duck.kind.points());
    }

    fn resolve_player_hits(&mut self, _ctx: &mut TickContext) {
        if self.pending_shot.take().is_none() {
            return;
        }
        self.bullets = self.bullets.saturating_sub(1);
        if self.bullets == 0 {
            if let Some(duck) = self.duck.as_mut().filter(|d| d.state == DuckState::Flying) {
                duck.escape(self.config.escape_speed);
            }
        }
    }

    fn is_lost(&self) -> bool {
        self.phase == HuntPhase::RoundEnd && self.ducks_shot < self.config.round_quota
    }

    fn spawn_and_cleanup(&mut self, ctx: &mut TickContext) {
        match self.phase {
            HuntPhase::RoundEnd => self.next_round(ctx),
            HuntPhase::Hunt if self.duck.is_none() => self.release_duck(ctx.rng),
            _ => {}
        }
    }

    fn progress(&self) -> u32 {
        self.round
    }
}
