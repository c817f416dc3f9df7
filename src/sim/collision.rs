//! Collision detection and response
//!
//! Everything here is axis-aligned boxes: the player flies a 50x50 hitbox
//! matching its sprite, bombs a 20x20 body tighter than their 40x40 sprite.
//! The world's top and bottom edges clamp the player with a heavily damped
//! bounce.

use glam::Vec2;

/// Player hitbox, matching the 50x50 sprite
pub const PLAYER_HITBOX: Vec2 = Vec2::new(50.0, 50.0);
/// Bomb collision body, tighter than the 40x40 sprite
pub const BOMB_HITBOX: Vec2 = Vec2::new(20.0, 20.0);
/// Fraction of velocity kept after bouncing off a world edge
pub const WORLD_BOUNDS_BOUNCE: f32 = 0.1;

/// Axis-aligned box stored as center plus half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Strict overlap test; boxes that merely touch do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() < self.half.y + other.half.y
    }
}

/// The player's hitbox at its current position
pub fn player_hitbox(x: f32, y: f32) -> Aabb {
    Aabb::new(Vec2::new(x, y), PLAYER_HITBOX)
}

/// A bomb's hitbox at its current position
pub fn bomb_hitbox(pos: Vec2) -> Aabb {
    Aabb::new(pos, BOMB_HITBOX)
}

/// Keep the player inside the vertical world bounds.
///
/// When the hitbox runs into the top or bottom edge the position is clamped
/// flush against it and the offending velocity component is reflected with
/// [`WORLD_BOUNDS_BOUNCE`] damping. Returns true if a clamp happened.
pub fn clamp_to_world(y: &mut f32, velocity_y: &mut f32, world_height: f32) -> bool {
    let half = PLAYER_HITBOX.y * 0.5;
    let ceiling = half;
    let floor = world_height - half;

    if *y < ceiling {
        *y = ceiling;
        if *velocity_y < 0.0 {
            *velocity_y = -*velocity_y * WORLD_BOUNDS_BOUNCE;
        }
        true
    } else if *y > floor {
        *y = floor;
        if *velocity_y > 0.0 {
            *velocity_y = -*velocity_y * WORLD_BOUNDS_BOUNCE;
        }
        true
    } else {
        false
    }
}
