//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical tick per host frame, driven by the host clock
//! - Seeded RNG only
//! - Timers are polled elapsed-time comparisons, never callbacks
//! - No rendering or platform dependencies
//!
//! Same config, same seed, same input sequence: identical runs.

pub mod bombs;
pub mod collision;
pub mod player;
pub mod spawner;
pub mod world;

pub use bombs::{Bomb, BombField, DESPAWN_X};
pub use collision::{Aabb, BOMB_HITBOX, PLAYER_HITBOX, WORLD_BOUNDS_BOUNCE};
pub use player::{BLINK_INTERVAL_MS, HitOutcome, Invulnerability, Player};
pub use spawner::{
    BombSpawn, DEFAULT_SAFE_DISTANCE, HISTORY_WINDOW_MS, LaneSpawner, SpawnRecord,
};
pub use world::{
    BombView, GameEvent, GameState, PlayerView, RunPhase, Snapshot, TickError, TickInput, tick,
};
