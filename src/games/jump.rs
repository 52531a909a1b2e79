//! StrkJump
//!
//! Vertical climber with the y axis pointing up. The player bounces off
//! platforms generated above a rising frontier; platform kinds get harder
//! with height. Hazards end the run, pickups add score or a double jump.
//! Falling out of the bottom of the view loses.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::GameId;
use crate::sim::{
    Aabb, Bounds, Cooldown, Game, KindTable, ProgressionTable, SimRng, SpawnCursor, TickContext,
    Tier, drop_trailing, evict_furthest_behind, place_spaced,
};

/// Relative weights of each platform kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformWeights {
    pub normal: f32,
    pub moving: f32,
    pub breaking: f32,
    pub bouncy: f32,
}

impl PlatformWeights {
    pub const fn new(normal: f32, moving: f32, breaking: f32, bouncy: f32) -> Self {
        Self {
            normal,
            moving,
            breaking,
            bouncy,
        }
    }

    fn table(&self) -> KindTable<PlatformKind> {
        KindTable::new(&[
            (PlatformKind::Normal, self.normal),
            (PlatformKind::Moving, self.moving),
            (PlatformKind::Breaking, self.breaking),
            (PlatformKind::Bouncy, self.bouncy),
        ])
        .unwrap_or_else(|| {
            log::warn!("strkjump: invalid platform weights {self:?}, using normal only");
            KindTable::single(PlatformKind::Normal)
        })
    }
}

/// Platform weights used below `until` pixels of height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformTier {
    pub until: f32,
    pub weights: PlatformWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub view_width: f32,
    pub view_height: f32,

    pub player_size: f32,
    pub player_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Camera keeps the player at or below this fraction of the view
    pub camera_anchor: f32,
    /// How far below the view bottom the player may fall before losing
    pub fall_margin: f32,

    pub platform_width: f32,
    pub platform_height: f32,
    pub step_min: f32,
    pub step_max: f32,
    pub min_spacing: f32,
    pub placement_attempts: u32,
    pub patrol_speed_min: f32,
    pub patrol_speed_max: f32,
    pub patrol_range_min: f32,
    pub patrol_range_max: f32,
    /// Seconds a breaking platform survives after the first landing
    pub break_delay: f32,
    pub bounce_multiplier: f32,
    /// Kind weights by height, easiest first
    pub platform_tiers: Vec<PlatformTier>,
    /// Weights once the height leaves every tier
    pub late_weights: PlatformWeights,

    pub hazard_interval: f32,
    pub hazard_chance: f32,
    pub hazard_size: f32,
    pub hazard_speed: f32,
    /// Share of falling hazards (the rest patrol)
    pub falling_hazard_share: f32,
    pub pickup_interval: f32,
    pub pickup_chance: f32,
    pub pickup_size: f32,
    /// Share of double-jump pickups (the rest are coins)
    pub double_jump_share: f32,
    pub coin_points: u64,
    pub double_jump_points: u64,
    /// Minimum distance between hazards and pickups
    pub item_spacing: f32,

    /// Platforms further than this below the view are dropped
    pub trailing_margin: f32,
    pub max_platforms: usize,
    pub keep_platforms: usize,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            view_width: 320.0,
            view_height: 480.0,

            player_size: 16.0,
            player_speed: 160.0,
            // Apex of jump_speed^2 / (2 * gravity) = 144 px clears step_max
            jump_speed: 480.0,
            gravity: 800.0,
            max_fall_speed: 400.0,
            camera_anchor: 0.5,
            fall_margin: 100.0,

            platform_width: 60.0,
            platform_height: 12.0,
            step_min: 80.0,
            step_max: 120.0,
            min_spacing: 70.0,
            placement_attempts: 8,
            patrol_speed_min: 40.0,
            patrol_speed_max: 100.0,
            patrol_range_min: 50.0,
            patrol_range_max: 120.0,
            break_delay: 0.5,
            bounce_multiplier: 1.5,
            platform_tiers: vec![
                PlatformTier {
                    until: 400.0,
                    weights: PlatformWeights::new(0.6, 0.25, 0.15, 0.0),
                },
                PlatformTier {
                    until: 1000.0,
                    weights: PlatformWeights::new(0.4, 0.3, 0.2, 0.1),
                },
            ],
            late_weights: PlatformWeights::new(0.2, 0.3, 0.3, 0.2),

            hazard_interval: 3.0,
            hazard_chance: 0.2,
            hazard_size: 16.0,
            hazard_speed: 60.0,
            falling_hazard_share: 0.3,
            pickup_interval: 5.0,
            pickup_chance: 0.15,
            pickup_size: 12.0,
            double_jump_share: 0.25,
            coin_points: 50,
            double_jump_points: 100,
            item_spacing: 40.0,

            trailing_margin: 1000.0,
            max_platforms: 500,
            keep_platforms: 400,
        }
    }
}

impl JumpConfig {
    fn platform_table(&self) -> ProgressionTable<PlatformKind> {
        let tiers = self
            .platform_tiers
            .iter()
            .map(|tier| Tier {
                until: tier.until,
                table: tier.weights.table(),
            })
            .collect();
        ProgressionTable::new(tiers, self.late_weights.table())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    Moving,
    Breaking,
    Bouncy,
}

impl PlatformKind {
    /// Points for the first landing
    pub fn points(self) -> u64 {
        match self {
            PlatformKind::Normal => 10,
            PlatformKind::Moving => 15,
            PlatformKind::Breaking => 20,
            PlatformKind::Bouncy => 25,
        }
    }
}

/// Horizontal back-and-forth motion of a moving platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    pub origin_x: f32,
    pub range: f32,
    pub speed: f32,
    pub dir: f32,
}

impl Patrol {
    fn step(&mut self, x: f32, dt: f32, min_x: f32, max_x: f32) -> f32 {
        let x = x + self.speed * self.dir * dt;
        if x <= (self.origin_x - self.range).max(min_x) {
            self.dir = 1.0;
        } else if x >= (self.origin_x + self.range).min(max_x) {
            self.dir = -1.0;
        }
        x.clamp(min_x, max_x)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Center
    pub pos: Vec2,
    pub width: f32,
    pub kind: PlatformKind,
    pub patrol: Option<Patrol>,
    /// Landed on at least once (scored)
    pub landed: bool,
    /// Seconds until a breaking platform gives way, once triggered
    pub break_timer: Option<f32>,
    pub broken: bool,
}

impl Platform {
    pub fn new(pos: Vec2, kind: PlatformKind, config: &JumpConfig, rng: &mut SimRng) -> Self {
        let patrol = (kind == PlatformKind::Moving).then(|| Patrol {
            origin_x: pos.x,
            range: rng.range(config.patrol_range_min, config.patrol_range_max),
            speed: rng.range(config.patrol_speed_min, config.patrol_speed_max),
            dir: rng.sign(),
        });
        Self {
            pos,
            width: config.platform_width,
            kind,
            patrol,
            landed: false,
            break_timer: None,
            broken: false,
        }
    }

    pub fn aabb(&self, height: f32) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, height))
    }

    fn advance(&mut self, dt: f32, view_width: f32) {
        let half = self.width * 0.5;
        if let Some(patrol) = self.patrol.as_mut() {
            self.pos.x = patrol.step(self.pos.x, dt, half, (view_width - half).max(half));
        }
        if let Some(timer) = self.break_timer.as_mut() {
            *timer -= dt;
            if *timer <= 0.0 {
                self.broken = true;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Walks left and right across the view
    Patrolling,
    /// Drifts downward
    Falling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub pos: Vec2,
    pub kind: HazardKind,
    pub dir: f32,
}

impl Hazard {
    fn advance(&mut self, dt: f32, speed: f32, half: f32, view_width: f32) {
        match self.kind {
            HazardKind::Patrolling => {
                self.pos.x += speed * self.dir * dt;
                if self.pos.x <= half {
                    self.dir = 1.0;
                } else if self.pos.x >= view_width - half {
                    self.dir = -1.0;
                }
                self.pos.x = self.pos.x.clamp(half, (view_width - half).max(half));
            }
            HazardKind::Falling => self.pos.y -= speed * 0.5 * dt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Coin,
    DoubleJump,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub pos: Vec2,
    pub kind: PickupKind,
    pub collected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    /// Bottom edge before this tick's move
    pub previous_bottom: f32,
    pub double_jump: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpInput {
    /// -1.0 (left) to 1.0 (right)
    pub steer: f32,
    /// Spend a double jump if one is held
    pub jump: bool,
}

#[derive(Debug, Clone)]
pub struct Jump {
    config: JumpConfig,
    view: Bounds,
    platform_table: ProgressionTable<PlatformKind>,
    hazard_table: KindTable<HazardKind>,
    pickup_table: KindTable<PickupKind>,
    player: Player,
    platforms: Vec<Platform>,
    hazards: Vec<Hazard>,
    pickups: Vec<Pickup>,
    cursor: SpawnCursor,
    hazard_cooldown: Cooldown,
    pickup_cooldown: Cooldown,
    /// Bottom edge of the view in world space; only rises
    camera_y: f32,
    start_y: f32,
    max_height: f32,
    dead: bool,
}

/// Hard cap on platforms generated in one tick
const MAX_PLATFORMS_PER_TICK: usize = 32;

impl Jump {
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn platforms_mut(&mut self) -> &mut Vec<Platform> {
        &mut self.platforms
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn camera_y(&self) -> f32 {
        self.camera_y
    }

    pub fn frontier(&self) -> f32 {
        self.cursor.frontier()
    }

    /// Highest climb above the start, in pixels
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    fn player_aabb(&self) -> Aabb {
        Aabb::new(self.player.pos, Vec2::splat(self.config.player_size))
    }

    fn view_top(&self) -> f32 {
        self.camera_y + self.config.view_height
    }

    fn generate_platforms(&mut self, rng: &mut SimRng) {
        let horizon = self.view_top() + self.config.view_height;
        let half = self.config.platform_width * 0.5;
        let (lo_x, hi_x) = (half, (self.config.view_width - half).max(half));

        for _ in 0..MAX_PLATFORMS_PER_TICK {
            if self.cursor.frontier() >= horizon {
                break;
            }
            let y = self
                .cursor
                .propose(rng, self.config.step_min, self.config.step_max);
            let existing: Vec<Vec2> = self.platforms.iter().map(|p| p.pos).collect();
            let placed = place_spaced(
                rng,
                self.config.placement_attempts,
                self.config.min_spacing,
                &existing,
                |rng| Vec2::new(rng.range(lo_x, hi_x), y),
            );
            // Advance even on a skip so the frontier keeps moving
            self.cursor.advance_to(y.max(self.cursor.frontier() + 1.0));
            let Some(pos) = placed else {
                log::debug!("strkjump: no room for a platform at {y:.0}");
                continue;
            };
            let kind = self.platform_table.sample(y - self.start_y, rng);
            self.platforms
                .push(Platform::new(pos, kind, &self.config, rng));
        }
    }

    /// Candidate spot hovering over a random platform in or above the view
    fn item_candidate(&self, rng: &mut SimRng, lift: f32) -> Option<Vec2> {
        let ahead: Vec<&Platform> = self
            .platforms
            .iter()
            .filter(|p| !p.broken && p.pos.y >= self.camera_y)
            .collect();
        let platform = ahead.get(rng.index(ahead.len())?)?;
        let half = platform.width * 0.5;
        Some(Vec2::new(
            platform.pos.x + rng.range(-half, half),
            platform.pos.y + lift,
        ))
    }

    fn item_positions(&self) -> Vec<Vec2> {
        self.hazards
            .iter()
            .map(|h| h.pos)
            .chain(self.pickups.iter().map(|p| p.pos))
            .collect()
    }

    fn place_item(&self, rng: &mut SimRng, lift: f32) -> Option<Vec2> {
        let existing = self.item_positions();
        // Non-finite candidates are discarded by the placement
        place_spaced(rng, 4, self.config.item_spacing, &existing, |rng| {
            self.item_candidate(rng, lift).unwrap_or(Vec2::NAN)
        })
    }

    fn spawn_items(&mut self, ctx: &mut TickContext) {
        if self.hazard_cooldown.try_fire(ctx.now, ctx.rng) {
            if let Some(pos) = self.place_item(ctx.rng, 50.0) {
                let kind = self.hazard_table.sample(ctx.rng);
                let dir = ctx.rng.sign();
                log::debug!("strkjump: {kind:?} hazard at {pos}");
                self.hazards.push(Hazard { pos, kind, dir });
            }
        }
        if self.pickup_cooldown.try_fire(ctx.now, ctx.rng) {
            if let Some(pos) = self.place_item(ctx.rng, 30.0) {
                let kind = self.pickup_table.sample(ctx.rng);
                log::debug!("strkjump: {kind:?} pickup at {pos}");
                self.pickups.push(Pickup {
                    pos,
                    kind,
                    collected: false,
                });
            }
        }
    }

    fn cleanup(&mut self) {
        let floor = self.camera_y - self.config.trailing_margin;
        let item_floor = self.camera_y - self.config.fall_margin;

        self.platforms.retain(|p| !p.broken);
        self.pickups.retain(|p| !p.collected);
        let dropped = drop_trailing(&mut self.platforms, floor, |p| p.pos.y)
            + drop_trailing(&mut self.hazards, item_floor, |h| h.pos.y)
            + drop_trailing(&mut self.pickups, item_floor, |p| p.pos.y);
        let evicted = evict_furthest_behind(
            &mut self.platforms,
            self.config.max_platforms,
            self.config.keep_platforms,
            |p| p.pos.y,
        );
        if dropped + evicted > 0 {
            log::debug!("strkjump: cleaned {dropped} trailing, evicted {evicted}");
        }
    }
}

impl Game for Jump {
    type Config = JumpConfig;
    type Input = JumpInput;

    const ID: GameId = GameId::StrkJump;

    fn start(config: &JumpConfig, rng: &mut SimRng) -> Self {
        let view = Bounds::from_size(config.view_width, config.view_height);
        let base = Vec2::new(config.view_width * 0.5, 40.0);
        let launch = base.y + (config.platform_height + config.player_size) * 0.5;

        let hazard_table = KindTable::new(&[
            (HazardKind::Patrolling, 1.0 - config.falling_hazard_share),
            (HazardKind::Falling, config.falling_hazard_share),
        ])
        .unwrap_or_else(|| KindTable::single(HazardKind::Patrolling));
        let pickup_table = KindTable::new(&[
            (PickupKind::Coin, 1.0 - config.double_jump_share),
            (PickupKind::DoubleJump, config.double_jump_share),
        ])
        .unwrap_or_else(|| KindTable::single(PickupKind::Coin));

        let mut start_platform = Platform::new(base, PlatformKind::Normal, config, rng);
        // Standing start, nothing to score
        start_platform.landed = true;

        let mut game = Self {
            config: config.clone(),
            view,
            platform_table: config.platform_table(),
            hazard_table,
            pickup_table,
            player: Player {
                pos: Vec2::new(base.x, launch),
                vel: Vec2::new(0.0, config.jump_speed),
                previous_bottom: base.y + config.platform_height * 0.5,
                double_jump: false,
            },
            platforms: vec![start_platform],
            hazards: Vec::new(),
            pickups: Vec::new(),
            cursor: SpawnCursor::new(base.y),
            hazard_cooldown: Cooldown::new(config.hazard_interval, config.hazard_chance),
            pickup_cooldown: Cooldown::new(config.pickup_interval, config.pickup_chance),
            camera_y: 0.0,
            start_y: launch,
            max_height: 0.0,
            dead: false,
        };
        game.generate_platforms(rng);
        game
    }

    fn advance(&mut self, input: &JumpInput, ctx: &mut TickContext) {
        let c = &self.config;
        let dt = ctx.dt;
        let player = &mut self.player;

        player.vel.x = input.steer.clamp(-1.0, 1.0) * c.player_speed;
        if input.jump && player.double_jump && player.vel.y < 0.0 {
            player.vel.y = c.jump_speed;
            player.double_jump = false;
        }
        player.vel.y = (player.vel.y - c.gravity * dt).max(-c.max_fall_speed);
        player.previous_bottom = player.pos.y - c.player_size * 0.5;
        player.pos += player.vel * dt;
        player.pos = self.view.wrap_x(player.pos);

        self.max_height = self.max_height.max(player.pos.y - self.start_y);
        self.camera_y = self
            .camera_y
            .max(player.pos.y - c.view_height * c.camera_anchor);

        for platform in &mut self.platforms {
            platform.advance(dt, c.view_width);
        }
        let half = c.hazard_size * 0.5;
        for hazard in &mut self.hazards {
            hazard.advance(dt, c.hazard_speed, half, c.view_width);
        }
    }

    fn resolve_collisions(&mut self, ctx: &mut TickContext) {
        if self.player.vel.y <= 0.0 {
            let body = self.player_aabb();
            let previous_bottom = self.player.previous_bottom;
            let height = self.config.platform_height;
            let landing = self
                .platforms
                .iter_mut()
                .filter(|p| !p.broken && body.lands_on(previous_bottom, &p.aabb(height)))
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

            if let Some(platform) = landing {
                let top = platform.pos.y + height * 0.5;
                let boost = match platform.kind {
                    PlatformKind::Bouncy => self.config.bounce_multiplier,
                    _ => 1.0,
                };
                if platform.kind == PlatformKind::Breaking && platform.break_timer.is_none() {
                    platform.break_timer = Some(self.config.break_delay);
                }
                if !platform.landed {
                    platform.landed = true;
                    ctx.score.add(platform.kind.points());
                }
                self.player.pos.y = top + self.config.player_size * 0.5;
                self.player.vel.y = self.config.jump_speed * boost;
            }
        }

        let body = self.player_aabb();
        let size = Vec2::splat(self.config.pickup_size);
        for pickup in &mut self.pickups {
            if pickup.collected || !body.overlaps(&Aabb::new(pickup.pos, size)) {
                continue;
            }
            pickup.collected = true;
            match pickup.kind {
                PickupKind::Coin => ctx.score.add(self.config.coin_points),
                PickupKind::DoubleJump => {
                    self.player.double_jump = true;
                    ctx.score.add(self.config.double_jump_points);
                }
            }
        }
    }

    fn resolve_player_hits(&mut self, _ctx: &mut TickContext) {
        let body = self.player_aabb();
        let size = Vec2::splat(self.config.hazard_size);
        if self
            .hazards
            .iter()
            .any(|h| body.overlaps(&Aabb::new(h.pos, size)))
        {
            log::info!("strkjump: hit a hazard");
            self.dead = true;
        }
    }

    fn is_lost(&self) -> bool {
        self.dead || self.player.pos.y < self.camera_y - self.config.fall_margin
    }

    fn spawn_and_cleanup(&mut self, ctx: &mut TickContext) {
        self.generate_platforms(ctx.rng);
        self.spawn_items(ctx);
        self.cleanup();
    }

    /// Height reached in meters (10 px each)
    fn progress(&self) -> u32 {
        (self.max_height / 10.0).max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Scoreboard;
    use proptest::prelude::*;

    fn tick(game: &mut Jump, input: JumpInput, now: f32, rng: &mut SimRng, score: &mut Scoreboard) -> bool {
        let mut ctx = TickContext {
            dt: 1.0 / 60.0,
            now,
            rng,
            score,
        };
        game.advance(&input, &mut ctx);
        game.resolve_collisions(&mut ctx);
        game.resolve_player_hits(&mut ctx);
        if game.is_lost() {
            return false;
        }
        game.spawn_and_cleanup(&mut ctx);
        true
    }

    fn platform(pos: Vec2, kind: PlatformKind) -> Platform {
        Platform {
            pos,
            width: 60.0,
            kind,
            patrol: None,
            landed: false,
            break_timer: None,
            broken: false,
        }
    }

    /// Put the player just above a platform, falling
    fn drop_onto(game: &mut Jump, platform_top: f32, x: f32) {
        game.player.pos = Vec2::new(x, platform_top + 8.5);
        game.player.vel = Vec2::new(0.0, -100.0);
    }

    #[test]
    fn test_start_fills_lookahead() {
        let mut rng = SimRng::new(21);
        let game = Jump::start(&JumpConfig::default(), &mut rng);
        assert!(game.platforms().len() > 5);
        assert!(game.frontier() >= game.view_top() + 480.0);
        assert!(game.player().vel.y > 0.0);
    }

    #[test]
    fn test_first_landing_scores_once() {
        let mut rng = SimRng::new(22);
        let mut score = Scoreboard::default();
        let mut game = Jump::start(&JumpConfig::default(), &mut rng);
        game.platforms.clear();
        game.platforms
            .push(platform(Vec2::new(160.0, 200.0), PlatformKind::Moving));
        drop_onto(&mut game, 206.0, 160.0);

        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        assert_eq!(score.score(), 15);
        assert!((game.player().vel.y - game.config.jump_speed).abs() < 1e-3);

        drop_onto(&mut game, 206.0, 160.0);
        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        assert_eq!(score.score(), 15);
    }

    #[test]
    fn test_rising_player_passes_through() {
        let mut rng = SimRng::new(23);
        let mut score = Scoreboard::default();
        let mut game = Jump::start(&JumpConfig::default(), &mut rng);
        game.platforms.clear();
        game.platforms
            .push(platform(Vec2::new(160.0, 200.0), PlatformKind::Normal));
        game.player.pos = Vec2::new(160.0, 200.0);
        game.player.vel = Vec2::new(0.0, 200.0);
        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        assert_eq!(score.score(), 0);
    }

    #[test]
    fn test_bouncy_launches_higher() {
        let mut rng = SimRng::new(24);
        let mut score = Scoreboard::default();
        let mut game = Jump::start(&JumpConfig::default(), &mut rng);
        game.platforms.clear();
        game.platforms
            .push(platform(Vec2::new(160.0, 200.0), PlatformKind::Bouncy));
        drop_onto(&mut game, 206.0, 160.0);
        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        assert!((game.player().vel.y - game.config.jump_speed * 1.5).abs() < 1e-3);
        assert_eq!(score.score(), 25);
    }

    #[test]
    fn test_breaking_platform_gives_way() {
        let mut rng = SimRng::new(25);
        let mut score = Scoreboard::default();
        let mut game = Jump::start(&JumpConfig::default(), &mut rng);
        game.platforms.clear();
        game.platforms
            .push(platform(Vec2::new(160.0, 200.0), PlatformKind::Breaking));
        drop_onto(&mut game, 206.0, 160.0);
        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        assert_eq!(score.score(), 20);
        assert!(game.platforms().iter().any(|p| p.kind == PlatformKind::Breaking));

        // 0.5 s break delay
        for _ in 0..40 {
            tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        }
        let spot = Vec2::new(160.0, 200.0);
        assert!(!game.platforms().iter().any(|p| p.pos.distance(spot) < 1e-3));
    }

    #[test]
    fn test_falling_below_view_loses() {
        let mut rng = SimRng::new(26);
        let mut score = Scoreboard::default();
        let mut game = Jump::start(&JumpConfig::default(), &mut rng);
        game.platforms.clear();
        game.player.pos.y = game.camera_y() - 99.0;
        game.player.vel.y = -400.0;
        assert!(!tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score));
        assert!(game.is_lost());
    }

    #[test]
    fn test_camera_only_rises() {
        let mut rng = SimRng::new(27);
        let mut score = Scoreboard::default();
        let mut game = Jump::start(&JumpConfig::default(), &mut rng);
        game.player.pos.y = 2000.0;
        game.player.vel.y = 0.0;
        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        let high = game.camera_y();
        assert!(high > 1000.0);
        game.player.pos.y = 1900.0;
        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        assert_eq!(game.camera_y(), high);
    }

    #[test]
    fn test_hazard_contact_loses() {
        let mut rng = SimRng::new(28);
        let mut score = Scoreboard::default();
        let mut game = Jump::start(&JumpConfig::default(), &mut rng);
        let pos = game.player().pos;
        game.hazards.push(Hazard {
            pos,
            kind: HazardKind::Falling,
            dir: 1.0,
        });
        assert!(!tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score));
    }

    #[test]
    fn test_double_jump_pickup() {
        let mut rng = SimRng::new(29);
        let mut score = Scoreboard::default();
        let mut game = Jump::start(&JumpConfig::default(), &mut rng);
        let pos = game.player().pos;
        game.pickups.push(Pickup {
            pos,
            kind: PickupKind::DoubleJump,
            collected: false,
        });
        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        assert_eq!(score.score(), 100);
        assert!(game.player().double_jump);
        assert!(game.pickups().is_empty());

        game.player.vel.y = -50.0;
        let jump = JumpInput {
            steer: 0.0,
            jump: true,
        };
        tick(&mut game, jump, 0.0, &mut rng, &mut score);
        assert!(game.player().vel.y > 250.0);
        assert!(!game.player().double_jump);
    }

    #[test]
    fn test_platform_bias_grows_with_height() {
        let table = JumpConfig::default().platform_table();
        let normal = |h: f32| {
            table
                .table_for(h)
                .entries()
                .iter()
                .find(|(k, _)| *k == PlatformKind::Normal)
                .map(|(_, p)| *p)
                .unwrap_or(0.0)
        };
        assert!(normal(0.0) > normal(500.0));
        assert!(normal(500.0) > normal(5000.0));
        assert_eq!(normal(f32::INFINITY), normal(5000.0));
    }

    #[test]
    fn test_invalid_weights_fall_back_to_normal() {
        let weights = PlatformWeights::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(weights.table().pick(0.9), PlatformKind::Normal);
    }

    #[test]
    fn test_eviction_caps_platforms() {
        let mut rng = SimRng::new(30);
        let config = JumpConfig {
            max_platforms: 10,
            keep_platforms: 6,
            trailing_margin: 1e9,
            ..Default::default()
        };
        let mut game = Jump::start(&config, &mut rng);
        let mut score = Scoreboard::default();
        for i in 0..20 {
            game.platforms
                .push(platform(Vec2::new(20.0, -5000.0 - i as f32), PlatformKind::Normal));
        }
        tick(&mut game, JumpInput::default(), 0.0, &mut rng, &mut score);
        assert!(game.platforms().len() <= 10);
    }

    /// Steer under the lowest platform above the highest one landed on.
    /// After a miss, fall back to the best landed platform still below.
    fn autopilot(game: &Jump) -> JumpInput {
        let player = game.player();
        let feet = player.pos.y - game.config.player_size * 0.5;
        let top = |p: &Platform| p.pos.y + game.config.platform_height * 0.5;
        let floor = game
            .platforms()
            .iter()
            .filter(|p| p.landed)
            .map(|p| p.pos.y)
            .fold(f32::NEG_INFINITY, f32::max);
        let ahead = game
            .platforms()
            .iter()
            .filter(|p| !p.broken && !p.landed && p.pos.y > floor)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        let target = match ahead {
            Some(p) if player.vel.y < 0.0 && feet < top(p) => game
                .platforms()
                .iter()
                .filter(|q| q.landed && !q.broken && top(*q) <= feet)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)),
            other => other,
        };
        let width = game.config.view_width;
        let steer = target.map_or(0.0, |p| {
            let dx = (p.pos.x - player.pos.x + width * 0.5).rem_euclid(width) - width * 0.5;
            (dx / 10.0).clamp(-1.0, 1.0)
        });
        JumpInput { steer, jump: false }
    }

    #[test]
    fn test_default_config_climbs_generated_platforms() {
        let config = JumpConfig {
            hazard_chance: 0.0,
            ..Default::default()
        };
        for seed in 0..8 {
            let mut rng = SimRng::new(seed);
            let mut score = Scoreboard::default();
            let mut game = Jump::start(&config, &mut rng);
            let start_y = game.platforms()[0].pos.y;
            let mut highest_landing = start_y;
            for i in 0..1800 {
                let input = autopilot(&game);
                if !tick(&mut game, input, i as f32 / 60.0, &mut rng, &mut score) {
                    break;
                }
                for p in game.platforms().iter().filter(|p| p.landed) {
                    highest_landing = highest_landing.max(p.pos.y);
                }
            }
            assert!(highest_landing > start_y, "seed {seed}: never left the start platform");
            assert!(game.max_height() > config.step_max, "seed {seed}: climbed {}", game.max_height());
            assert!(score.score() > 0);
        }
    }

    proptest! {
        #[test]
        fn generated_platforms_keep_their_distance(seed in any::<u64>()) {
            // Steps shorter than the spacing force the placement to reject
            // candidates that sit straight above the previous platform
            let config = JumpConfig {
                step_min: 30.0,
                step_max: 60.0,
                min_spacing: 70.0,
                hazard_chance: 0.0,
                platform_tiers: Vec::new(),
                late_weights: PlatformWeights::new(1.0, 0.0, 0.0, 0.0),
                ..Default::default()
            };
            let mut rng = SimRng::new(seed);
            let mut score = Scoreboard::default();
            let mut game = Jump::start(&config, &mut rng);
            for i in 0..300 {
                let input = autopilot(&game);
                if !tick(&mut game, input, i as f32 / 60.0, &mut rng, &mut score) {
                    break;
                }
            }

            let spots: Vec<Vec2> = game.platforms().iter().map(|p| p.pos).collect();
            let mut close_rows = 0;
            for (i, a) in spots.iter().enumerate() {
                for b in &spots[i + 1..] {
                    prop_assert!(a.distance(*b) >= config.min_spacing - 1e-3);
                    if (a.y - b.y).abs() < config.min_spacing {
                        close_rows += 1;
                    }
                }
            }
            prop_assert!(close_rows > 0);
        }
    }
}
