//! Host layer for the embedding page
//!
//! - `FrameClock`: fixed-timestep accumulator fed with real frame deltas
//! - `FrameInput`: one input record for every game, mapped per game
//! - `GameHandle`: the mounted session, owned by the host (no globals)
//! - `Runner`: handle + clock + input, driven once per animation frame

use glam::Vec2;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::games::{
    Asteroids, AsteroidsInput, Direction, DuckHunt, DuckHuntInput, GameId, Jump, JumpInput, Snake,
};
use crate::persistence::ScoreStore;
use crate::settings::Settings;
use crate::sim::{Command, GameOverReport, Session, SessionPhase};

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a real frame delta and return how many `SIM_DT` steps to run.
    /// Deltas are clamped to `MAX_FRAME_DT`; at most `MAX_SUBSTEPS` steps.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }

    /// Fraction of a step left in the accumulator (render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Input gathered by the page between frames
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Snake heading request (one-shot)
    pub direction: Option<Direction>,
    /// Held left/right axis, -1.0 to 1.0 (Asteroids rotation, StrkJump steering)
    pub axis: f32,
    /// Held thrust (Asteroids)
    pub thrust: bool,
    /// Trigger pull (one-shot): Asteroids fire, StrkJump double jump
    pub action: bool,
    /// Aim point of a click (one-shot, Duck Hunt)
    pub shot: Option<Vec2>,
}

impl FrameInput {
    /// Clear one-shot inputs once a step has consumed them
    pub fn clear_one_shots(&mut self) {
        self.direction = None;
        self.action = false;
        self.shot = None;
    }

    fn snake(&self) -> Option<Direction> {
        self.direction
    }

    fn asteroids(&self) -> AsteroidsInput {
        AsteroidsInput {
            rotate: self.axis,
            thrust: self.thrust,
            fire: self.action,
        }
    }

    fn jump(&self) -> JumpInput {
        JumpInput {
            steer: self.axis,
            jump: self.action,
        }
    }

    fn duck_hunt(&self) -> DuckHuntInput {
        DuckHuntInput { shot: self.shot }
    }
}

/// A mounted mini-game session
pub enum GameHandle {
    Snake(Session<Snake>),
    Asteroids(Session<Asteroids>),
    StrkJump(Session<Jump>),
    DuckHunt(Session<DuckHunt>),
}

macro_rules! each_session {
    ($handle:expr, $session:ident => $body:expr) => {
        match $handle {
            GameHandle::Snake($session) => $body,
            GameHandle::Asteroids($session) => $body,
            GameHandle::StrkJump($session) => $body,
            GameHandle::DuckHunt($session) => $body,
        }
    };
}

impl GameHandle {
    pub fn id(&self) -> GameId {
        match self {
            GameHandle::Snake(_) => GameId::Snake,
            GameHandle::Asteroids(_) => GameId::Asteroids,
            GameHandle::StrkJump(_) => GameId::StrkJump,
            GameHandle::DuckHunt(_) => GameId::DuckHunt,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        each_session!(self, s => s.phase())
    }

    pub fn command(&mut self, command: Command) -> SessionPhase {
        each_session!(self, s => s.command(command))
    }

    /// One fixed step with the input mapped for the mounted game
    pub fn tick(&mut self, input: &FrameInput, dt: f32) -> SessionPhase {
        match self {
            GameHandle::Snake(s) => s.tick(&input.snake(), dt),
            GameHandle::Asteroids(s) => s.tick(&input.asteroids(), dt),
            GameHandle::StrkJump(s) => s.tick(&input.jump(), dt),
            GameHandle::DuckHunt(s) => s.tick(&input.duck_hunt(), dt),
        }
    }

    pub fn score(&self) -> u64 {
        each_session!(self, s => s.score())
    }

    pub fn high_score(&self) -> u64 {
        each_session!(self, s => s.high_score())
    }

    pub fn greeting(&self) -> String {
        each_session!(self, s => s.greeting())
    }

    pub fn elapsed(&self) -> f32 {
        each_session!(self, s => s.elapsed())
    }

    pub fn take_report(&mut self) -> Option<GameOverReport> {
        each_session!(self, s => s.take_report())
    }
}

/// Create a session for `id` in the menu phase
pub fn mount(id: GameId, settings: &Settings, store: Box<dyn ScoreStore>) -> GameHandle {
    let seed = settings.session_seed();
    let name = settings.display_name();
    log::info!("Mounting {id} (seed {seed})");
    match id {
        GameId::Snake => GameHandle::Snake(Session::new(settings.snake.clone(), store, seed, name)),
        GameId::Asteroids => {
            GameHandle::Asteroids(Session::new(settings.asteroids.clone(), store, seed, name))
        }
        GameId::StrkJump => {
            GameHandle::StrkJump(Session::new(settings.jump.clone(), store, seed, name))
        }
        GameId::DuckHunt => {
            GameHandle::DuckHunt(Session::new(settings.duck_hunt.clone(), store, seed, name))
        }
    }
}

/// Tear a session down. An unfinished run is dropped without touching the
/// stored high score; a report not yet collected is handed back.
pub fn unmount(mut handle: GameHandle) -> Option<GameOverReport> {
    log::info!("Unmounting {} in {}", handle.id(), handle.phase().as_str());
    handle.take_report()
}

/// Mounted game plus the per-frame plumbing around it
pub struct Runner {
    handle: GameHandle,
    clock: FrameClock,
    input: FrameInput,
}

impl Runner {
    pub fn new(handle: GameHandle) -> Self {
        Self {
            handle,
            clock: FrameClock::new(),
            input: FrameInput::default(),
        }
    }

    pub fn mount(id: GameId, settings: &Settings, store: Box<dyn ScoreStore>) -> Self {
        Self::new(mount(id, settings, store))
    }

    pub fn handle(&self) -> &GameHandle {
        &self.handle
    }

    /// Input record the page writes into between frames
    pub fn input_mut(&mut self) -> &mut FrameInput {
        &mut self.input
    }

    pub fn command(&mut self, command: Command) -> SessionPhase {
        let before = self.handle.phase();
        let after = self.handle.command(command);
        if before != after {
            self.clock.reset();
        }
        after
    }

    /// Run the fixed steps owed for a real frame delta. Returns the game
    /// over report if the run ended during this frame.
    pub fn frame(&mut self, frame_dt: f32) -> Option<GameOverReport> {
        let steps = self.clock.advance(frame_dt);
        for _ in 0..steps {
            self.handle.tick(&self.input, SIM_DT);
            self.input.clear_one_shots();
        }
        self.handle.take_report()
    }

    pub fn unmount(self) -> Option<GameOverReport> {
        unmount(self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn settings() -> Settings {
        Settings {
            player_name: "Ada".into(),
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_clock_steps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert!(clock.alpha() < 0.2);
    }

    #[test]
    fn test_clock_clamps_stalls() {
        let mut clock = FrameClock::new();
        // A 5 s tab switch is worth at most MAX_FRAME_DT
        let steps = clock.advance(5.0);
        assert!((5..=6).contains(&steps));
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(-1.0), 0);
    }

    #[test]
    fn test_mount_each_game() {
        for id in GameId::ALL {
            let handle = mount(id, &settings(), Box::new(MemoryStore::new()));
            assert_eq!(handle.id(), id);
            assert_eq!(handle.phase(), SessionPhase::Menu);
            assert_eq!(handle.greeting(), "Welcome, Ada");
        }
    }

    #[test]
    fn test_runner_drives_and_pauses() {
        let mut runner = Runner::mount(GameId::Asteroids, &settings(), Box::new(MemoryStore::new()));
        runner.frame(0.05);
        assert_eq!(runner.handle().elapsed(), 0.0);

        assert_eq!(runner.command(Command::Start), SessionPhase::Playing);
        runner.frame(0.05);
        let played = runner.handle().elapsed();
        assert!(played > 0.0);

        runner.command(Command::Pause);
        for _ in 0..10 {
            runner.frame(0.05);
        }
        assert_eq!(runner.handle().elapsed(), played);
        assert!(runner.unmount().is_none());
    }

    #[test]
    fn test_one_shot_input_consumed_once() {
        let mut runner = Runner::mount(GameId::Asteroids, &settings(), Box::new(MemoryStore::new()));
        runner.command(Command::Start);
        runner.input_mut().action = true;
        runner.frame(0.1);
        assert!(!runner.input_mut().action);
        if let GameHandle::Asteroids(session) = runner.handle() {
            let bullets = session.world().map(|w| w.bullets().len()).unwrap_or(0);
            assert_eq!(bullets, 1);
        } else {
            panic!("wrong game mounted");
        }
    }
}
