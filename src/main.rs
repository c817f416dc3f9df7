//! Jetpack Runner entry point
//!
//! Headless demo loop: drives the simulation with a synthetic frame clock
//! and an altitude-hold autopilot, logs events as they happen, and prints
//! the final snapshot as JSON. Same seed, same run.
//!
//! Usage: jetpack-runner [seed] [seconds] [config.json]

use jetpack_runner::consts::{MAX_SUBSTEPS, SIM_DT};
use jetpack_runner::sim::{GameEvent, GameState, RunPhase, TickInput, tick};
use jetpack_runner::{Config, ConfigError};

/// Frame cadence the demo pretends to run at
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Demo host: owns the run plus the fixed-timestep bookkeeping
struct Demo {
    state: GameState,
    accumulator: f32,
    now_ms: f64,
}

impl Demo {
    fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(config, seed)?,
            accumulator: 0.0,
            now_ms: 0.0,
        })
    }

    /// Run simulation ticks for one frame
    fn frame(&mut self) {
        let dt = (FRAME_MS / 1000.0) as f32;
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // Altitude hold: thrust whenever the player sits below the
            // middle of the screen
            let input = TickInput {
                thrust: self.state.player.y > self.state.config().world_height / 2.0,
            };
            self.now_ms += f64::from(SIM_DT) * 1000.0;
            if let Err(e) = tick(&mut self.state, &input, SIM_DT, self.now_ms) {
                log::error!("tick failed: {}", e);
                return;
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::LifeLost { lives_left } => {
                    log::info!("bomb hit! {} lives left", lives_left);
                }
                GameEvent::GameOver => {
                    log::info!("game over at {:.1} m", self.state.distance_m());
                }
            }
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(30.0);
    let config = match args.next() {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    log::info!("Jetpack Runner starting: seed={}, {}s run", seed, seconds);

    let mut demo = match Demo::new(config, seed) {
        Ok(demo) => demo,
        Err(e) => {
            log::error!("invalid config: {}", e);
            std::process::exit(1);
        }
    };

    let frames = (seconds * 1000.0 / FRAME_MS).ceil() as u64;
    for _ in 0..frames {
        demo.frame();
        if demo.state.phase == RunPhase::GameOver {
            break;
        }
    }

    let snapshot = demo.state.snapshot();
    log::info!(
        "run finished (seed {}): {:.1} m, score {}, {} lives, {} bombs on screen",
        demo.state.seed(),
        snapshot.distance_m,
        snapshot.score,
        snapshot.lives,
        snapshot.bombs.len()
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("snapshot serialization failed: {}", e),
    }
}

fn load_config(path: &str) -> Result<Config, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(serde_json::Error::io)?;
    Config::from_json_str(&json)
}
