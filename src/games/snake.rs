//! Snake
//!
//! Grid game: the snake steps one cell per move interval, grows on food and
//! dies on walls or itself. The interval shrinks as food is eaten.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::GameId;
use crate::sim::{Game, SimRng, TickContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub board_width: i32,
    pub board_height: i32,
    pub initial_length: usize,
    /// Seconds between steps at the start of a run
    pub step_interval: f32,
    /// Interval reduction per speed-up
    pub speed_increment: f32,
    /// Shortest interval reachable
    pub min_step_interval: f32,
    pub foods_per_speedup: u32,
    pub points_per_food: u64,
    /// Random cells tried before food placement waits for the next tick
    pub food_attempts: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            board_width: 20,
            board_height: 20,
            initial_length: 3,
            step_interval: 0.15,
            speed_increment: 0.01,
            min_step_interval: 0.05,
            foods_per_speedup: 5,
            points_per_food: 10,
            food_attempts: 32,
        }
    }
}

/// Heading on the grid (y grows downward, as on screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    config: SnakeConfig,
    /// Head first
    segments: VecDeque<IVec2>,
    direction: Direction,
    /// Heading applied on the next step
    queued: Direction,
    food: Option<IVec2>,
    move_timer: f32,
    stepped: bool,
    foods_eaten: u32,
    dead: bool,
}

impl Snake {
    pub fn segments(&self) -> &VecDeque<IVec2> {
        &self.segments
    }

    pub fn head(&self) -> IVec2 {
        self.segments.front().copied().unwrap_or(IVec2::ZERO)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<IVec2> {
        self.food
    }

    /// Put the food on a given cell (scripted scenarios, replays)
    pub fn set_food(&mut self, cell: IVec2) {
        self.food = Some(cell);
    }

    pub fn foods_eaten(&self) -> u32 {
        self.foods_eaten
    }

    /// Current seconds per step
    pub fn step_interval(&self) -> f32 {
        let speedups = self.foods_eaten / self.config.foods_per_speedup.max(1);
        (self.config.step_interval - speedups as f32 * self.config.speed_increment)
            .max(self.config.min_step_interval)
    }

    /// Queue a turn; reversing onto the body is rejected
    pub fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.queued = direction;
        true
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < self.config.board_width
            && cell.y < self.config.board_height
    }

    fn occupied(&self, cell: IVec2) -> bool {
        self.segments.contains(&cell)
    }

    fn place_food(&mut self, rng: &mut SimRng) {
        for _ in 0..self.config.food_attempts {
            let cell = IVec2::new(
                rng.range_i32(0, self.config.board_width),
                rng.range_i32(0, self.config.board_height),
            );
            if !self.occupied(cell) {
                log::debug!("snake: food at {cell}");
                self.food = Some(cell);
                return;
            }
        }
    }

    fn step(&mut self) {
        self.direction = self.queued;
        let head = self.head() + self.direction.delta();
        self.segments.push_front(head);
        self.segments.pop_back();
    }
}

impl Game for Snake {
    type Config = SnakeConfig;
    type Input = Option<Direction>;

    const ID: GameId = GameId::Snake;

    fn start(config: &SnakeConfig, rng: &mut SimRng) -> Self {
        let center = IVec2::new(config.board_width / 2, config.board_height / 2);
        let segments = (0..config.initial_length.max(1))
            .map(|i| center - IVec2::new(i as i32, 0))
            .collect();
        let mut snake = Self {
            config: config.clone(),
            segments,
            direction: Direction::Right,
            queued: Direction::Right,
            food: None,
            move_timer: 0.0,
            stepped: false,
            foods_eaten: 0,
            dead: false,
        };
        snake.place_food(rng);
        snake
    }

    fn advance(&mut self, input: &Option<Direction>, ctx: &mut TickContext) {
        if let Some(direction) = *input {
            self.turn(direction);
        }
        self.stepped = false;
        self.move_timer += ctx.dt;
        let interval = self.step_interval();
        if self.move_timer >= interval {
            // Keep the remainder, at most one step per tick
            self.move_timer = (self.move_timer - interval).min(interval);
            self.step();
            self.stepped = true;
        }
    }

    fn resolve_collisions(&mut self, ctx: &mut TickContext) {
        if !self.stepped || self.food != Some(self.head()) {
            return;
        }
        if let Some(&tail) = self.segments.back() {
            self.segments.push_back(tail);
        }
        self.food = None;
        self.foods_eaten += 1;
        ctx.score.add(self.config.points_per_food);
        if self.foods_eaten % self.config.foods_per_speedup.max(1) == 0 {
            log::debug!("snake: step interval now {:.3}s", self.step_interval());
        }
    }

    fn resolve_player_hits(&mut self, _ctx: &mut TickContext) {
        if !self.stepped {
            return;
        }
        let head = self.head();
        let bitten = self.segments.iter().skip(1).any(|&cell| cell == head);
        if !self.in_bounds(head) || bitten {
            self.dead = true;
        }
    }

    fn is_lost(&self) -> bool {
        self.dead
    }

    fn spawn_and_cleanup(&mut self, ctx: &mut TickContext) {
        if self.food.is_none() {
            self.place_food(ctx.rng);
        }
    }

    fn progress(&self) -> u32 {
        self.foods_eaten
    }
}
