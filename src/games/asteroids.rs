//! Asteroids
//!
//! The ship drifts with friction and wraps around the field. Bullets expire
//! after a second or when they leave the field. Asteroids wrap with a margin
//! of their own diameter and split into smaller pieces when shot.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::GameId;
use crate::sim::{Bounds, Game, Lifetime, SimRng, TickContext, circles_overlap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidsConfig {
    pub field_width: f32,
    pub field_height: f32,

    pub ship_radius: f32,
    /// Degrees per second
    pub rotation_speed: f32,
    pub thrust: f32,
    pub max_speed: f32,
    /// Velocity kept per 1/60 s
    pub friction: f32,
    /// Seconds of invincibility after a respawn
    pub invincibility: f32,
    pub starting_lives: u32,
    pub bonus_life_every: u64,

    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub bullet_radius: f32,
    pub max_bullets: usize,

    pub starting_asteroids: usize,
    pub max_asteroids: usize,
    pub asteroid_min_speed: f32,
    pub asteroid_max_speed: f32,
    /// Added to both speed bounds per level past the first
    pub speed_per_level: f32,
    pub split_min_speed: f32,
    pub split_max_speed: f32,
    /// Degrees of random spread around each child's heading
    pub split_jitter: f32,
    /// How far outside the field new waves appear
    pub edge_offset: f32,
}

impl Default for AsteroidsConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,

            ship_radius: 7.5,
            rotation_speed: 250.0,
            thrust: 200.0,
            max_speed: 300.0,
            friction: 0.98,
            invincibility: 2.0,
            starting_lives: 3,
            bonus_life_every: 10_000,

            bullet_speed: 300.0,
            bullet_lifetime: 1.0,
            bullet_radius: 1.5,
            max_bullets: 4,

            starting_asteroids: 4,
            max_asteroids: 12,
            asteroid_min_speed: 30.0,
            asteroid_max_speed: 80.0,
            speed_per_level: 10.0,
            split_min_speed: 60.0,
            split_max_speed: 100.0,
            split_jitter: 30.0,
            edge_offset: 40.0,
        }
    }
}

/// Asteroid kinds, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn diameter(self) -> f32 {
        match self {
            AsteroidSize::Large => 60.0,
            AsteroidSize::Medium => 35.0,
            AsteroidSize::Small => 18.0,
        }
    }

    pub fn radius(self) -> f32 {
        self.diameter() * 0.5
    }

    pub fn points(self) -> u64 {
        match self {
            AsteroidSize::Large => 100,
            AsteroidSize::Medium => 60,
            AsteroidSize::Small => 40,
        }
    }

    /// Kind of the pieces this asteroid breaks into
    pub fn smaller(self) -> Option<Self> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: AsteroidSize,
    /// Radians, cosmetic
    pub rotation: f32,
    /// Radians per second, cosmetic
    pub spin: f32,
}

impl Asteroid {
    pub fn new(pos: Vec2, vel: Vec2, size: AsteroidSize, rng: &mut SimRng) -> Self {
        Self {
            pos,
            vel,
            size,
            rotation: rng.range(0.0, TAU),
            spin: rng.range(-100.0, 100.0).to_radians(),
        }
    }

    pub fn advance(&mut self, dt: f32, field: &Bounds) {
        self.pos += self.vel * dt;
        self.rotation = (self.rotation + self.spin * dt).rem_euclid(TAU);
        self.pos = field.expand(self.size.diameter()).wrap(self.pos);
    }

    /// Pieces of the next smaller kind, spread evenly with random jitter.
    /// The smallest kind yields none.
    pub fn split(&self, config: &AsteroidsConfig, rng: &mut SimRng) -> Vec<Asteroid> {
        let Some(size) = self.size.smaller() else {
            return Vec::new();
        };
        let count = rng.choose(&[2usize, 3]).unwrap_or(2);
        let jitter = config.split_jitter.to_radians();
        (0..count)
            .map(|i| {
                let heading = TAU / count as f32 * i as f32 + rng.range(-jitter, jitter);
                let speed = rng.range(config.split_min_speed, config.split_max_speed);
                Asteroid::new(self.pos, Vec2::from_angle(heading) * speed, size, rng)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: Lifetime,
    /// Left the field or hit something
    pub spent: bool,
}

impl Bullet {
    pub fn advance(&mut self, dt: f32, field: &Bounds) {
        self.pos += self.vel * dt;
        if self.life.tick(dt) || !field.contains(self.pos) {
            self.spent = true;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians
    pub angle: f32,
    /// Seconds of invincibility left
    pub invincible: f32,
}

impl Ship {
    fn spawn(field: &Bounds) -> Self {
        Self {
            pos: field.center(),
            vel: Vec2::ZERO,
            // Nose up (screen y grows downward)
            angle: -FRAC_PI_2,
            invincible: 0.0,
        }
    }

    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AsteroidsInput {
    /// -1.0 (counter-clockwise) to 1.0 (clockwise)
    pub rotate: f32,
    pub thrust: bool,
    /// Fire this tick (edge-triggered by the host)
    pub fire: bool,
}

#[derive(Debug, Clone)]
pub struct Asteroids {
    config: AsteroidsConfig,
    field: Bounds,
    ship: Ship,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    lives: u32,
    level: u32,
    next_bonus_life: u64,
}

impl Asteroids {
    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    /// Asteroid list, for scripted scenarios
    pub fn asteroids_mut(&mut self) -> &mut Vec<Asteroid> {
        &mut self.asteroids
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn field(&self) -> &Bounds {
        &self.field
    }

    /// Large asteroids in the wave for `level`
    pub fn wave_size(config: &AsteroidsConfig, level: u32) -> usize {
        let extra = 2 * level.saturating_sub(1) as usize;
        (config.starting_asteroids + extra).min(config.max_asteroids)
    }

    fn spawn_wave(&mut self, rng: &mut SimRng) {
        let count = Self::wave_size(&self.config, self.level);
        let bonus = self.config.speed_per_level * self.level.saturating_sub(1) as f32;
        let (min_speed, max_speed) = (
            self.config.asteroid_min_speed + bonus,
            self.config.asteroid_max_speed + bonus,
        );
        for _ in 0..count {
            let pos = self.edge_position(rng);
            let vel = rng.velocity(min_speed, max_speed);
            self.asteroids
                .push(Asteroid::new(pos, vel, AsteroidSize::Large, rng));
        }
        log::info!("asteroids: level {} ({count} asteroids)", self.level);
    }

    fn edge_position(&self, rng: &mut SimRng) -> Vec2 {
        let f = &self.field;
        let offset = self.config.edge_offset;
        match rng.index(4).unwrap_or(0) {
            0 => Vec2::new(rng.range(f.min.x, f.max.x), f.min.y - offset),
            1 => Vec2::new(rng.range(f.min.x, f.max.x), f.max.y + offset),
            2 => Vec2::new(f.min.x - offset, rng.range(f.min.y, f.max.y)),
            _ => Vec2::new(f.max.x + offset, rng.range(f.min.y, f.max.y)),
        }
    }

    fn fire(&mut self) {
        let live = self.bullets.iter().filter(|b| !b.spent).count();
        if live >= self.config.max_bullets {
            return;
        }
        let heading = self.ship.heading();
        self.bullets.push(Bullet {
            pos: self.ship.pos + heading * self.config.ship_radius,
            vel: heading * self.config.bullet_speed,
            life: Lifetime::new(self.config.bullet_lifetime),
            spent: false,
        });
    }

    fn steer(&mut self, input: &AsteroidsInput, dt: f32) {
        let c = &self.config;
        let ship = &mut self.ship;
        ship.angle += input.rotate.clamp(-1.0, 1.0) * c.rotation_speed.to_radians() * dt;
        if input.thrust {
            ship.vel += ship.heading() * c.thrust * dt;
        }
        ship.vel = ship.vel.clamp_length_max(c.max_speed);
        ship.vel *= c.friction.powf(dt * 60.0);
        ship.pos = self.field.wrap(ship.pos + ship.vel * dt);
        ship.invincible = (ship.invincible - dt).max(0.0);
    }

    fn award(&mut self, points: u64, ctx: &mut TickContext) {
        ctx.score.add(points);
        while self.config.bonus_life_every > 0 && ctx.score.score() >= self.next_bonus_life {
            self.lives += 1;
            self.next_bonus_life += self.config.bonus_life_every;
            log::info!("asteroids: bonus life ({} lives)", self.lives);
        }
    }
}

impl Game for Asteroids {
    type Config = AsteroidsConfig;
    type Input = AsteroidsInput;

    const ID: GameId = GameId::Asteroids;

    fn start(config: &AsteroidsConfig, rng: &mut SimRng) -> Self {
        let field = Bounds::from_size(config.field_width, config.field_height);
        let mut game = Self {
            config: config.clone(),
            field,
            ship: Ship::spawn(&field),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            lives: config.starting_lives,
            level: 1,
            next_bonus_life: config.bonus_life_every,
        };
        game.spawn_wave(rng);
        game
    }

    fn advance(&mut self, input: &AsteroidsInput, ctx: &mut TickContext) {
        self.steer(input, ctx.dt);
        if input.fire {
            self.fire();
        }
        for bullet in &mut self.bullets {
            bullet.advance(ctx.dt, &self.field);
        }
        for asteroid in &mut self.asteroids {
            asteroid.advance(ctx.dt, &self.field);
        }
    }

    fn resolve_collisions(&mut self, ctx: &mut TickContext) {
        let mut survivors = Vec::with_capacity(self.asteroids.len());
        let mut destroyed = Vec::new();
        for asteroid in std::mem::take(&mut self.asteroids) {
            let hit = self.bullets.iter_mut().find(|b| {
                !b.spent
                    && circles_overlap(b.pos, self.config.bullet_radius, asteroid.pos, asteroid.size.radius())
            });
            match hit {
                Some(bullet) => {
                    bullet.spent = true;
                    destroyed.push(asteroid);
                }
                None => survivors.push(asteroid),
            }
        }
        self.asteroids = survivors;

        for asteroid in destroyed {
            let pieces = asteroid.split(&self.config, ctx.rng);
            log::debug!("asteroids: {:?} destroyed, {} pieces", asteroid.size, pieces.len());
            self.asteroids.extend(pieces);
            self.award(asteroid.size.points(), ctx);
        }
    }

    fn resolve_player_hits(&mut self, _ctx: &mut TickContext) {
        if self.lives == 0 || self.ship.is_invincible() {
            return;
        }
        let ship = &self.ship;
        let struck = self
            .asteroids
            .iter()
            .any(|a| circles_overlap(ship.pos, self.config.ship_radius, a.pos, a.size.radius()));
        if !struck {
            return;
        }
        self.lives -= 1;
        log::info!("asteroids: ship destroyed ({} lives left)", self.lives);
        if self.lives > 0 {
            self.ship = Ship::spawn(&self.field);
            self.ship.invincible = self.config.invincibility;
        }
    }

    fn is_lost(&self) -> bool {
        self.lives == 0
    }

    fn spawn_and_cleanup(&mut self, ctx: &mut TickContext) {
        self.bullets.retain(|b| !b.spent);
        if self.asteroids.is_empty() {
            self.level += 1;
            self.spawn_wave(ctx.rng);
        }
    }

    fn progress(&self) -> u32 {
        self.level
    }
}
