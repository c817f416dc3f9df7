//! Jetpack Runner - an endless side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vertical motion, lane spawning,
//!   collisions, run state)
//! - `config`: Immutable run configuration with startup validation
//!
//! The crate is renderer-agnostic. A host drives `sim::tick` once per frame
//! with sampled input and its own clock, then consumes `sim::Snapshot` and
//! the drained `sim::GameEvent`s. Coordinates follow screen convention:
//! x grows rightward, y grows downward.

pub mod config;
pub mod sim;

pub use config::{Config, ConfigError};
pub use sim::{GameEvent, GameState, Snapshot, TickError, TickInput, tick};

/// Host loop constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}
