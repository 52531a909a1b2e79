//! Session driver
//!
//! Owns the phase machine, the run state of one mini-game, the score board, the
//! seeded RNG and the score store. The per-tick order is fixed here so every
//! game resolves a loss before anything new is spawned:
//!
//! 1. advance entities
//! 2. entity-vs-entity collisions (destroy, split, score)
//! 3. entity-vs-player-resource collisions (lives, bullets)
//! 4. terminal loss evaluation
//! 5. spawner and cleanup

use serde::{Deserialize, Serialize};

use super::phase::{Command, SessionPhase};
use super::rng::SimRng;
use super::score::Scoreboard;
use crate::consts::DEFAULT_PLAYER_NAME;
use crate::games::GameId;
use crate::highscores::HighScores;
use crate::persistence::ScoreStore;

/// Per-tick view handed to game rules
pub struct TickContext<'a> {
    /// Timestep for this tick (seconds)
    pub dt: f32,
    /// Active play time of the run, paused time excluded (seconds)
    pub now: f32,
    pub rng: &'a mut SimRng,
    pub score: &'a mut Scoreboard,
}

/// Rules of one mini-game. The session calls the stage methods in order.
pub trait Game: Sized {
    type Config: Clone + Default;
    type Input: Clone + Default;

    const ID: GameId;

    /// Fresh run state, including the first batch of entities
    fn start(config: &Self::Config, rng: &mut SimRng) -> Self;

    /// Stage 1: movement rules, timers, player input
    fn advance(&mut self, input: &Self::Input, ctx: &mut TickContext);

    /// Stage 2: entity-vs-entity collisions
    fn resolve_collisions(&mut self, ctx: &mut TickContext);

    /// Stage 3: collisions that consume player resources
    fn resolve_player_hits(&mut self, ctx: &mut TickContext);

    /// Stage 4: whether the run is lost
    fn is_lost(&self) -> bool;

    /// Stage 5: procedural spawning and cleanup
    fn spawn_and_cleanup(&mut self, ctx: &mut TickContext);

    /// Level, round or height reached, recorded with a high score
    fn progress(&self) -> u32 {
        0
    }
}

/// Final result of a run, emitted once per terminal transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub game: GameId,
    pub player_name: String,
    pub final_score: u64,
    pub high_score: u64,
    pub new_high_score: bool,
    pub progress: u32,
    pub run: u32,
}

/// One mounted mini-game session
pub struct Session<G: Game> {
    phase: SessionPhase,
    config: G::Config,
    world: Option<G>,
    scoreboard: Scoreboard,
    seed: u64,
    rng: SimRng,
    /// Runs started so far (0 until the first start)
    runs: u32,
    /// Active play time of the current run
    elapsed: f32,
    /// High score known when the current run began
    high_before_run: u64,
    time_ticks: u64,
    player_name: String,
    store: Box<dyn ScoreStore>,
    pending_report: Option<GameOverReport>,
}

impl<G: Game> Session<G> {
    /// Create a session in the menu phase, loading the stored high score
    pub fn new(config: G::Config, store: Box<dyn ScoreStore>, seed: u64, player_name: &str) -> Self {
        let stored = HighScores::load(store.as_ref(), G::ID);
        let player_name = match player_name.trim() {
            "" => DEFAULT_PLAYER_NAME.to_string(),
            name => name.to_string(),
        };
        log::info!(
            "{} session created (seed {seed}, stored high score {})",
            G::ID.name(),
            stored.best()
        );
        Self {
            phase: SessionPhase::Menu,
            config,
            world: None,
            scoreboard: Scoreboard::with_high_score(stored.best()),
            seed,
            rng: SimRng::new(seed),
            runs: 0,
            elapsed: 0.0,
            high_before_run: stored.best(),
            time_ticks: 0,
            player_name,
            store,
            pending_report: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn world(&self) -> Option<&G> {
        self.world.as_ref()
    }

    /// Mutable run state, for hosts that script a scenario
    pub fn world_mut(&mut self) -> Option<&mut G> {
        self.world.as_mut()
    }

    pub fn config(&self) -> &G::Config {
        &self.config
    }

    pub fn score(&self) -> u64 {
        self.scoreboard.score()
    }

    pub fn high_score(&self) -> u64 {
        self.scoreboard.high_score()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Greeting shown on the title screen
    pub fn greeting(&self) -> String {
        format!("Welcome, {}", self.player_name)
    }

    /// Active play time of the current run (paused time excluded)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }

    /// Take the report of the last terminal transition (once)
    pub fn take_report(&mut self) -> Option<GameOverReport> {
        self.pending_report.take()
    }

    /// Apply a command; invalid commands for the current phase are ignored.
    /// Returns the phase after the command.
    pub fn command(&mut self, command: Command) -> SessionPhase {
        let Some(next) = self.phase.apply(command) else {
            log::debug!(
                "{}: ignoring {command:?} in {}",
                G::ID.name(),
                self.phase.as_str()
            );
            return self.phase;
        };

        match (self.phase, next) {
            (SessionPhase::Menu, SessionPhase::Playing)
            | (SessionPhase::GameOver, SessionPhase::Playing) => self.begin_run(),
            (SessionPhase::GameOver, SessionPhase::Menu) => {
                self.world = None;
                self.scoreboard.reset();
                self.elapsed = 0.0;
            }
            _ => {}
        }

        if next != self.phase {
            log::info!("{}: {} -> {}", G::ID.name(), self.phase.as_str(), next.as_str());
        }
        self.phase = next;
        self.phase
    }

    /// Advance one tick. Does nothing outside `Playing`, so paused time never
    /// reaches timers or cooldowns.
    pub fn tick(&mut self, input: &G::Input, dt: f32) -> SessionPhase {
        if !self.phase.simulates() || !(dt.is_finite() && dt > 0.0) {
            return self.phase;
        }
        let Some(world) = self.world.as_mut() else {
            return self.phase;
        };

        self.elapsed += dt;
        self.time_ticks += 1;

        let mut ctx = TickContext {
            dt,
            now: self.elapsed,
            rng: &mut self.rng,
            score: &mut self.scoreboard,
        };

        world.advance(input, &mut ctx);
        world.resolve_collisions(&mut ctx);
        world.resolve_player_hits(&mut ctx);
        if world.is_lost() {
            self.finish_run();
            return self.phase;
        }
        world.spawn_and_cleanup(&mut ctx);

        self.phase
    }

    fn begin_run(&mut self) {
        self.rng = SimRng::for_run(self.seed, self.runs);
        self.runs += 1;
        self.scoreboard.reset();
        self.high_before_run = self.scoreboard.high_score();
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.pending_report = None;
        self.world = Some(G::start(&self.config, &mut self.rng));
        log::info!("{} run {} started", G::ID.name(), self.runs);
    }

    /// Terminal transition: freeze, finalize the score exactly once
    fn finish_run(&mut self) {
        self.phase = SessionPhase::GameOver;
        let final_score = self.scoreboard.score();
        let progress = self.world.as_ref().map(G::progress).unwrap_or(0);

        let outcome = HighScores::finalize(
            self.store.as_mut(),
            G::ID,
            final_score,
            &self.player_name,
            progress,
            self.high_before_run,
        );
        self.scoreboard.observe_high_score(outcome.best);

        log::info!(
            "{}: playing -> game-over (score {final_score}, best {})",
            G::ID.name(),
            self.scoreboard.high_score()
        );

        self.pending_report = Some(GameOverReport {
            game: G::ID,
            player_name: self.player_name.clone(),
            final_score,
            high_score: self.scoreboard.high_score(),
            new_high_score: outcome.improved,
            progress,
            run: self.runs,
        });
    }
}
