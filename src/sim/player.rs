//! Player actor: vertical motion and the post-hit invulnerability window
//!
//! Horizontal position never changes; the world scrolls instead. The y axis
//! points down, so thrust accelerates toward negative y and gravity toward
//! positive y. Velocity is clamped to the configured caps after every
//! integration step, which keeps it bounded for any input sequence.
//!
//! The invulnerability window is polled, not scheduled: `step_invulnerability`
//! accumulates elapsed time each tick and flips the state back once the
//! window is over. Nothing here registers callbacks.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Visibility blink cadence while invulnerable (ms)
pub const BLINK_INTERVAL_MS: f64 = 100.0;

/// Damage gating state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Invulnerability {
    /// Hits land normally
    Vulnerable,
    /// Hits are ignored; `elapsed_ms` accumulates toward the window end
    Invulnerable { elapsed_ms: f64 },
}

/// Outcome of reporting a bomb hit to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The hit landed and a life was consumed
    LifeLost { lives_left: u32 },
    /// The invulnerability window swallowed the hit
    Ignored,
    /// No lives were left to lose; nothing changed
    AlreadyEliminated,
}

/// The jetpack rider
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    /// Vertical position of the sprite center
    pub y: f32,
    /// Vertical velocity, positive = falling (px/s)
    pub velocity_y: f32,
    /// Whether thrust was held on the last motion step
    pub thrust_active: bool,
    /// Remaining lives
    pub lives: u32,
    invuln: Invulnerability,
}

impl Player {
    pub fn new(y: f32, lives: u32) -> Self {
        Self {
            y,
            velocity_y: 0.0,
            thrust_active: false,
            lives,
            invuln: Invulnerability::Vulnerable,
        }
    }

    /// Integrate vertical velocity for one tick. Exactly one acceleration
    /// applies: thrust while held, gravity otherwise. Returns the new
    /// velocity, already clamped to `[-max_rise_speed, max_fall_speed]`.
    pub fn step_motion(&mut self, thrust_active: bool, dt: f32, config: &Config) -> f32 {
        self.thrust_active = thrust_active;
        if thrust_active {
            self.velocity_y -= config.thrust_y * dt;
        } else {
            self.velocity_y += config.gravity_y * dt;
        }
        self.velocity_y = self
            .velocity_y
            .clamp(-config.max_rise_speed, config.max_fall_speed);
        self.velocity_y
    }

    /// Advance the invulnerability window by one tick, expiring it once the
    /// configured duration has elapsed.
    pub fn step_invulnerability(&mut self, dt: f32, config: &Config) {
        if let Invulnerability::Invulnerable { elapsed_ms } = &mut self.invuln {
            *elapsed_ms += f64::from(dt) * 1000.0;
            if *elapsed_ms >= config.invuln_ms_after_hit {
                self.invuln = Invulnerability::Vulnerable;
            }
        }
    }

    /// Apply a bomb hit. While vulnerable this consumes a life and opens the
    /// invulnerability window; while invulnerable or out of lives it is a
    /// no-op, so repeated reports of the same overlap cannot double-charge.
    pub fn on_hit(&mut self) -> HitOutcome {
        if self.lives == 0 {
            return HitOutcome::AlreadyEliminated;
        }
        if matches!(self.invuln, Invulnerability::Invulnerable { .. }) {
            return HitOutcome::Ignored;
        }
        self.lives -= 1;
        self.invuln = Invulnerability::Invulnerable { elapsed_ms: 0.0 };
        HitOutcome::LifeLost {
            lives_left: self.lives,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        matches!(self.invuln, Invulnerability::Invulnerable { .. })
    }

    /// Blink signal for renderers: toggles every [`BLINK_INTERVAL_MS`] while
    /// the window is open, starting visible at the hit.
    pub fn blink_hidden(&self) -> bool {
        match self.invuln {
            Invulnerability::Invulnerable { elapsed_ms } => {
                (elapsed_ms / BLINK_INTERVAL_MS) as u64 % 2 == 1
            }
            Invulnerability::Vulnerable => false,
        }
    }

    /// Whether the sprite should draw this tick. Always true outside the
    /// invulnerability window.
    pub fn visible(&self) -> bool {
        !self.blink_hidden()
    }
}
