//! Run configuration
//!
//! One immutable struct of tuning values, validated once at startup and
//! threaded through the simulation by reference. Defaults match the shipped
//! game balance for a 1280x720 world.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration values, reported at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("scroll_speed_x must be positive, got {0}")]
    ScrollSpeed(f32),
    #[error("world dimensions must be positive, got {width}x{height}")]
    WorldSize { width: f32, height: f32 },
    #[error("speed caps must be non-negative, got rise {rise} / fall {fall}")]
    SpeedCaps { rise: f32, fall: f32 },
    #[error("bomb spacing bounds invalid: min {min}, max {max}")]
    SpacingBounds { min: f32, max: f32 },
    #[error("bomb_edge_margin {margin} leaves no spawn band in a {height} tall world")]
    EdgeMargin { margin: f32, height: f32 },
    #[error("{field} must be non-negative, got {value}")]
    NegativeTiming { field: &'static str, value: f64 },
    #[error("player_lives must be at least 1")]
    ZeroLives,
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulation tuning values
///
/// Units: positions and distances in pixels, velocities in px/s,
/// accelerations in px/s². The y axis points down, so rising means a
/// negative vertical velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === World ===
    /// Logical world width
    pub world_width: f32,
    /// Logical world height
    pub world_height: f32,
    /// Leftward obstacle scroll speed (px/s)
    pub scroll_speed_x: f32,

    // === Player physics ===
    /// Fixed screen x of the player
    pub player_x: f32,
    /// Downward acceleration while thrust is released (px/s²)
    pub gravity_y: f32,
    /// Upward acceleration while thrust is held (px/s²)
    pub thrust_y: f32,
    /// Rising speed cap, stored positive (px/s)
    pub max_rise_speed: f32,
    /// Falling speed cap (px/s)
    pub max_fall_speed: f32,

    // === Spawning ===
    /// No bombs spawn during the first seconds of a run
    pub safe_start_seconds: f32,
    /// Hard floor on the horizontal gap between bomb clusters (px)
    pub min_bomb_spacing: f32,
    /// Upper bound for the randomized cluster gap (px)
    pub max_bomb_spacing: f32,
    /// Declared vertical clearance between cluster members (px)
    pub min_vertical_gap: f32,
    /// Bombs keep this far from the top and bottom edges (px)
    pub bomb_edge_margin: f32,

    // === Damage ===
    /// Invulnerability window after a hit (ms)
    pub invuln_ms_after_hit: f64,
    /// Lives at the start of a run
    pub player_lives: u32,

    // === Scoring ===
    /// Points granted per meter of scroll distance
    pub points_per_meter: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // World
            world_width: 1280.0,
            world_height: 720.0,
            scroll_speed_x: 240.0,

            // Player physics
            player_x: 140.0,
            gravity_y: 1100.0,
            thrust_y: 1400.0,
            max_rise_speed: 420.0,
            max_fall_speed: 560.0,

            // Spawning
            safe_start_seconds: 6.0,
            min_bomb_spacing: 420.0,
            max_bomb_spacing: 560.0,
            min_vertical_gap: 160.0,
            bomb_edge_margin: 100.0,

            // Damage
            invuln_ms_after_hit: 800.0,
            player_lives: 3,

            // Scoring
            points_per_meter: 1,
        }
    }
}

impl Config {
    /// Check every value the simulation divides by, clamps against, or
    /// samples from. Comparisons are written to also reject NaN.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scroll_speed_x > 0.0) || !self.scroll_speed_x.is_finite() {
            return Err(ConfigError::ScrollSpeed(self.scroll_speed_x));
        }
        if !(self.world_width > 0.0) || !(self.world_height > 0.0) {
            return Err(ConfigError::WorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if !(self.max_rise_speed >= 0.0) || !(self.max_fall_speed >= 0.0) {
            return Err(ConfigError::SpeedCaps {
                rise: self.max_rise_speed,
                fall: self.max_fall_speed,
            });
        }
        if !(self.min_bomb_spacing > 0.0)
            || !(self.max_bomb_spacing >= self.min_bomb_spacing)
            || !self.max_bomb_spacing.is_finite()
        {
            return Err(ConfigError::SpacingBounds {
                min: self.min_bomb_spacing,
                max: self.max_bomb_spacing,
            });
        }
        if !(self.bomb_edge_margin >= 0.0) || self.bomb_edge_margin * 2.0 >= self.world_height {
            return Err(ConfigError::EdgeMargin {
                margin: self.bomb_edge_margin,
                height: self.world_height,
            });
        }
        if !(self.safe_start_seconds >= 0.0) {
            return Err(ConfigError::NegativeTiming {
                field: "safe_start_seconds",
                value: f64::from(self.safe_start_seconds),
            });
        }
        if !(self.min_vertical_gap >= 0.0) {
            return Err(ConfigError::NegativeTiming {
                field: "min_vertical_gap",
                value: f64::from(self.min_vertical_gap),
            });
        }
        if !(self.invuln_ms_after_hit >= 0.0) {
            return Err(ConfigError::NegativeTiming {
                field: "invuln_ms_after_hit",
                value: self.invuln_ms_after_hit,
            });
        }
        if self.player_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        Ok(())
    }

    /// Parse a config from JSON and validate it. Missing fields fall back
    /// to the defaults, so partial tuning overrides work.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_scroll_speed_rejected() {
        let config = Config {
            scroll_speed_x: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScrollSpeed(_))
        ));
    }

    #[test]
    fn test_negative_scroll_speed_rejected() {
        let config = Config {
            scroll_speed_x: -240.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_scroll_speed_rejected() {
        let config = Config {
            scroll_speed_x: f32::NAN,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_spacing_bounds_rejected() {
        let config = Config {
            min_bomb_spacing: 560.0,
            max_bomb_spacing: 420.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpacingBounds { .. })
        ));
    }

    #[test]
    fn test_equal_spacing_bounds_allowed() {
        let config = Config {
            min_bomb_spacing: 500.0,
            max_bomb_spacing: 500.0,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_edge_margin_rejected() {
        // Margins meeting in the middle leave nowhere to spawn
        let config = Config {
            bomb_edge_margin: 360.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EdgeMargin { .. })
        ));
    }

    #[test]
    fn test_zero_lives_rejected() {
        let config = Config {
            player_lives: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLives)));
    }

    #[test]
    fn test_negative_invuln_window_rejected() {
        let config = Config {
            invuln_ms_after_hit: -1.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeTiming { .. })
        ));
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = Config::from_json_str(r#"{"scroll_speed_x": 300.0}"#).unwrap();
        assert_eq!(config.scroll_speed_x, 300.0);
        // Everything else keeps its default
        assert_eq!(config.gravity_y, Config::default().gravity_y);
        assert_eq!(config.player_lives, 3);
    }

    #[test]
    fn test_from_json_invalid_value_rejected() {
        assert!(Config::from_json_str(r#"{"scroll_speed_x": -1.0}"#).is_err());
    }

    #[test]
    fn test_from_json_malformed_rejected() {
        assert!(matches!(
            Config::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = Config::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
