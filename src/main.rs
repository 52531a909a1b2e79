//! Bitwave Arcade entry point
//!
//! On the web the page mounts one mini-game at a time through `Arcade` and
//! drives it from `requestAnimationFrame`. Natively this runs a headless
//! autopilot session per game and logs the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use bitwave_arcade::consts::{SCORE_DIGITS, SIM_DT};
    use bitwave_arcade::format_score;
    use bitwave_arcade::games::{Direction, GameId};
    use bitwave_arcade::persistence::LocalStorage;
    use bitwave_arcade::platform::Runner;
    use bitwave_arcade::settings::Settings;
    use bitwave_arcade::sim::{Command, GameOverReport};

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Bitwave Arcade starting...");
    }

    fn report_json(report: Option<GameOverReport>) -> Option<String> {
        let report = report?;
        match serde_json::to_string(&report) {
            Ok(json) => Some(json),
            Err(err) => {
                log::warn!("Could not encode report: {err}");
                None
            }
        }
    }

    /// One mounted mini-game, owned by the page
    #[wasm_bindgen]
    pub struct Arcade {
        runner: Option<Runner>,
        last_time: f64,
    }

    #[wasm_bindgen]
    impl Arcade {
        /// Mount the game named by the last segment of `path` (`/games/snake`)
        #[wasm_bindgen(constructor)]
        pub fn new(path: &str) -> Result<Arcade, JsValue> {
            let id = GameId::from_path(path)
                .ok_or_else(|| JsValue::from_str(&format!("unknown game: {path}")))?;
            let settings = Settings::load(&LocalStorage);
            Ok(Arcade {
                runner: Some(Runner::mount(id, &settings, Box::new(LocalStorage))),
                last_time: 0.0,
            })
        }

        /// Advance to the animation frame timestamp (ms). Returns the game
        /// over report as JSON on the frame the run ends.
        pub fn frame(&mut self, time: f64) -> Option<String> {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            report_json(self.runner.as_mut()?.frame(dt))
        }

        /// Send a named command; returns the phase afterwards
        pub fn command(&mut self, name: &str) -> String {
            let Some(runner) = self.runner.as_mut() else {
                return "unmounted".into();
            };
            match Command::parse(name) {
                Some(command) => runner.command(command).as_str().into(),
                None => {
                    log::warn!("Unknown command: {name}");
                    runner.handle().phase().as_str().into()
                }
            }
        }

        pub fn steer(&mut self, direction: &str) {
            let direction = match direction {
                "up" => Direction::Up,
                "down" => Direction::Down,
                "left" => Direction::Left,
                "right" => Direction::Right,
                _ => return,
            };
            if let Some(runner) = self.runner.as_mut() {
                runner.input_mut().direction = Some(direction);
            }
        }

        pub fn set_axis(&mut self, axis: f32) {
            if let Some(runner) = self.runner.as_mut() {
                runner.input_mut().axis = axis.clamp(-1.0, 1.0);
            }
        }

        pub fn set_thrust(&mut self, held: bool) {
            if let Some(runner) = self.runner.as_mut() {
                runner.input_mut().thrust = held;
            }
        }

        pub fn trigger(&mut self) {
            if let Some(runner) = self.runner.as_mut() {
                runner.input_mut().action = true;
            }
        }

        pub fn shoot(&mut self, x: f32, y: f32) {
            if let Some(runner) = self.runner.as_mut() {
                runner.input_mut().shot = Some(Vec2::new(x, y));
            }
        }

        pub fn phase(&self) -> String {
            self.runner
                .as_ref()
                .map_or("unmounted", |r| r.handle().phase().as_str())
                .into()
        }

        pub fn score(&self) -> String {
            format_score(self.runner.as_ref().map_or(0, |r| r.handle().score()), SCORE_DIGITS)
        }

        pub fn high_score(&self) -> String {
            format_score(
                self.runner.as_ref().map_or(0, |r| r.handle().high_score()),
                SCORE_DIGITS,
            )
        }

        pub fn greeting(&self) -> String {
            self.runner
                .as_ref()
                .map(|r| r.handle().greeting())
                .unwrap_or_default()
        }

        /// Tear down; later calls are no-ops
        pub fn unmount(&mut self) -> Option<String> {
            report_json(self.runner.take()?.unmount())
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bitwave_arcade::persistence::{FileStore, MemoryStore, ScoreStore};
    use bitwave_arcade::settings::Settings;

    env_logger::init();
    log::info!("Bitwave Arcade (native) starting...");

    // Usage: bitwave-arcade [game] [store.json]
    let mut args = std::env::args().skip(1);
    let games = match args.next() {
        Some(name) => match bitwave_arcade::GameId::from_path(&name) {
            Some(id) => vec![id],
            None => {
                log::error!("Unknown game: {name}");
                std::process::exit(2);
            }
        },
        None => bitwave_arcade::GameId::ALL.to_vec(),
    };
    let store_path = args.next();

    let settings = match &store_path {
        Some(path) => Settings::load(&FileStore::new(path)),
        None => Settings::default(),
    };

    for id in games {
        let store: Box<dyn ScoreStore> = match &store_path {
            Some(path) => Box::new(FileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };
        autopilot::run(id, &settings, store);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page enters through wasm_main
}

/// Headless runs with scripted input
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use bitwave_arcade::consts::{SCORE_DIGITS, SIM_DT};
    use bitwave_arcade::format_score;
    use bitwave_arcade::games::{Direction, GameId};
    use bitwave_arcade::persistence::ScoreStore;
    use bitwave_arcade::platform::{FrameInput, GameHandle, mount, unmount};
    use bitwave_arcade::settings::Settings;
    use bitwave_arcade::sim::{Command, SessionPhase, SimRng};

    /// Five minutes of play at most
    const MAX_TICKS: u32 = 60 * 60 * 5;

    pub fn run(id: GameId, settings: &Settings, store: Box<dyn ScoreStore>) {
        let mut handle = mount(id, settings, store);
        println!("{} | {}", id.name(), handle.greeting());
        handle.command(Command::Start);

        let mut rng = SimRng::new(id.id() as u64);
        let mut ticks = 0;
        while handle.phase() == SessionPhase::Playing && ticks < MAX_TICKS {
            let input = scripted_input(&handle, &mut rng, ticks);
            handle.tick(&input, SIM_DT);
            ticks += 1;
        }

        match handle.take_report() {
            Some(report) => println!(
                "  score {} | best {}{} | progress {} | {:.1}s",
                format_score(report.final_score, SCORE_DIGITS),
                format_score(report.high_score, SCORE_DIGITS),
                if report.new_high_score { " (new)" } else { "" },
                report.progress,
                handle.elapsed()
            ),
            None => println!(
                "  still alive after {:.1}s with {}",
                handle.elapsed(),
                format_score(handle.score(), SCORE_DIGITS)
            ),
        }
        unmount(handle);
    }

    fn scripted_input(handle: &GameHandle, rng: &mut SimRng, tick: u32) -> FrameInput {
        let mut input = FrameInput::default();
        match handle {
            GameHandle::Snake(_) => {
                if tick % 20 == 0 {
                    input.direction =
                        rng.choose(&[Direction::Up, Direction::Down, Direction::Left, Direction::Right]);
                }
            }
            GameHandle::Asteroids(_) => {
                input.axis = 0.5;
                input.thrust = tick % 90 < 10;
                input.action = tick % 12 == 0;
            }
            GameHandle::StrkJump(session) => {
                // Steer toward the nearest platform above
                if let Some(world) = session.world() {
                    let player = world.player().pos;
                    let target = world
                        .platforms()
                        .iter()
                        .filter(|p| p.pos.y > player.y)
                        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
                    if let Some(platform) = target {
                        input.axis = (platform.pos.x - player.x).signum();
                    }
                }
                input.action = tick % 45 == 0;
            }
            GameHandle::DuckHunt(session) => {
                // Fire near the duck on a slow trigger finger
                if tick % 30 == 0 {
                    let jitter = glam::Vec2::new(rng.range(-10.0, 10.0), rng.range(-10.0, 10.0));
                    input.shot = session.world().and_then(|w| w.duck()).map(|d| d.pos + jitter);
                }
            }
        }
        input
    }
}
