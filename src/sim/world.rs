//! Run state and the per-tick pipeline
//!
//! `GameState` owns everything a run needs; the free `tick` function
//! advances it deterministically. The host samples input once per frame,
//! supplies its clock, and consumes the snapshot plus any drained events.
//! Same config, same seed, same inputs: same run.

use serde::Serialize;
use thiserror::Error;

use super::bombs::{Bomb, BombField};
use super::collision;
use super::player::{HitOutcome, Player};
use super::spawner::LaneSpawner;
use crate::config::{Config, ConfigError};

/// Scroll distance that counts as one meter of score (px)
const PIXELS_PER_METER: f32 = 100.0;

/// Clock contract violations. A failed tick leaves the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TickError {
    #[error("dt must be finite and non-negative, got {0}")]
    InvalidDelta(f32),
    #[error("now must be finite, got {0}")]
    InvalidNow(f64),
    #[error("clock went backwards: now {now} < previous {prev}")]
    NonMonotonicTime { prev: f64, now: f64 },
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Lives hit zero; the world is frozen
    GameOver,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// True while the thrust control is held
    pub thrust: bool,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// A bomb connected and a life was consumed
    LifeLost { lives_left: u32 },
    /// The run ended; emitted exactly once
    GameOver,
}

/// Player fields a renderer needs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub velocity_y: f32,
    pub thrust_active: bool,
    pub invulnerable: bool,
    /// False during the hidden half of the invulnerability blink
    pub visible: bool,
}

/// Bomb fields a renderer needs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BombView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl From<&Bomb> for BombView {
    fn from(bomb: &Bomb) -> Self {
        Self {
            id: bomb.id,
            x: bomb.pos.x,
            y: bomb.pos.y,
        }
    }
}

/// Read-only view of one tick's outcome
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub player: PlayerView,
    pub bombs: Vec<BombView>,
    pub lives: u32,
    pub score: u64,
    pub distance_m: f32,
    /// Accumulated world scroll, for parallax backgrounds (px)
    pub scroll_x: f32,
    /// Time since the first tick (s)
    pub elapsed_secs: f32,
    pub phase: RunPhase,
}

/// Everything one run owns
#[derive(Debug, Clone)]
pub struct GameState {
    pub player: Player,
    pub bombs: BombField,
    pub spawner: LaneSpawner,
    pub phase: RunPhase,
    /// Fixed for the whole run; hosts reconfigure by starting a new one
    config: Config,
    /// Run seed, kept for reproducibility
    seed: u64,
    /// How far the world has scrolled since run start (px)
    scroll_x: f32,
    /// Host clock at the first tick; elapsed time is measured from here
    start_ms: Option<f64>,
    last_now_ms: Option<f64>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run. The config is validated here so every later tick can
    /// trust it; a run is torn down by dropping the state and building a
    /// fresh one with a new seed.
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = LaneSpawner::new(&config, seed)?;
        Ok(Self {
            player: Player::new(config.world_height / 2.0, config.player_lives),
            bombs: BombField::new(),
            spawner,
            phase: RunPhase::Running,
            scroll_x: 0.0,
            start_ms: None,
            last_now_ms: None,
            events: Vec::new(),
            config,
            seed,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seed this run was started with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Scroll distance in meters
    pub fn distance_m(&self) -> f32 {
        self.scroll_x / PIXELS_PER_METER
    }

    /// Score: whole meters survived times the configured rate
    pub fn score(&self) -> u64 {
        (self.scroll_x / PIXELS_PER_METER).floor() as u64 * self.config.points_per_meter
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    /// Time since the first tick, zero before it (s)
    pub fn elapsed_secs(&self) -> f32 {
        match (self.start_ms, self.last_now_ms) {
            (Some(start), Some(now)) => ((now - start) / 1000.0) as f32,
            _ => 0.0,
        }
    }

    /// Take everything that happened since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render/UI view of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: PlayerView {
                x: self.config.player_x,
                y: self.player.y,
                velocity_y: self.player.velocity_y,
                thrust_active: self.player.thrust_active,
                invulnerable: self.player.is_invulnerable(),
                visible: self.player.visible(),
            },
            bombs: self.bombs.iter_alive().map(BombView::from).collect(),
            lives: self.player.lives,
            score: self.score(),
            distance_m: self.distance_m(),
            scroll_x: self.scroll_x,
            elapsed_secs: self.elapsed_secs(),
            phase: self.phase,
        }
    }

    /// React to a player/bomb overlap. The bomb always despawns on first
    /// report; whether a life goes with it depends on the invulnerability
    /// window. Safe to call repeatedly for the same pair: removal of the
    /// bomb de-duplicates everything downstream.
    pub fn report_overlap(&mut self, bomb_id: u32) {
        if !self.bombs.destroy(bomb_id) {
            return;
        }
        match self.player.on_hit() {
            HitOutcome::LifeLost { lives_left } => {
                log::info!("hit by bomb {}: {} lives left", bomb_id, lives_left);
                self.events.push(GameEvent::LifeLost { lives_left });
                if lives_left == 0 {
                    self.phase = RunPhase::GameOver;
                    self.events.push(GameEvent::GameOver);
                    log::info!("game over at {:.1} m (seed {})", self.distance_m(), self.seed);
                }
            }
            HitOutcome::Ignored => {
                log::debug!("bomb {} absorbed by invulnerability window", bomb_id);
            }
            HitOutcome::AlreadyEliminated => {}
        }
    }
}

/// Advance the run by one tick.
///
/// `dt` is the step length in seconds, `now_ms` the host clock. Both are
/// validated before anything moves: a negative or non-finite `dt`, a
/// non-finite `now_ms`, or a clock running backwards fails the whole tick
/// without touching state. After game over, ticks still validate their
/// input but the world stays frozen.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    now_ms: f64,
) -> Result<(), TickError> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(TickError::InvalidDelta(dt));
    }
    if !now_ms.is_finite() {
        return Err(TickError::InvalidNow(now_ms));
    }
    if let Some(prev) = state.last_now_ms {
        if now_ms < prev {
            return Err(TickError::NonMonotonicTime { prev, now: now_ms });
        }
    }

    if state.start_ms.is_none() {
        state.start_ms = Some(now_ms);
    }
    state.last_now_ms = Some(now_ms);

    if state.phase == RunPhase::GameOver {
        return Ok(());
    }

    let config = state.config;

    // Vertical motion: integrate velocity, then position, then walls
    state.player.step_motion(input.thrust, dt, &config);
    state.player.y += state.player.velocity_y * dt;
    collision::clamp_to_world(
        &mut state.player.y,
        &mut state.player.velocity_y,
        config.world_height,
    );

    // Invulnerability window
    state.player.step_invulnerability(dt, &config);

    // Spawning
    let elapsed_secs = state.elapsed_secs();
    for spawn in state.spawner.step(elapsed_secs, now_ms, &config) {
        state.bombs.spawn(spawn.x, spawn.y);
    }

    // World scroll
    state.scroll_x += config.scroll_speed_x * dt;
    state.bombs.advance(dt, config.scroll_speed_x);

    // Collisions, then reactions
    let player_box = collision::player_hitbox(config.player_x, state.player.y);
    let hits: Vec<u32> = state
        .bombs
        .iter_alive()
        .filter(|bomb| player_box.overlaps(&collision::bomb_hitbox(bomb.pos)))
        .map(|bomb| bomb.id)
        .collect();
    for bomb_id in hits {
        state.report_overlap(bomb_id);
    }

    Ok(())
}
