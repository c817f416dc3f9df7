//! Bomb entities and the registry that owns their lifetime
//!
//! Bombs never move on their own; the world scrolls them leftward at the
//! configured speed. Destruction is a two-phase affair: hits mark a bomb
//! dead immediately (so the same bomb can never land twice), and the next
//! `advance` sweep actually drops it along with anything that scrolled
//! off screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Bombs are culled once their center passes this x (px)
pub const DESPAWN_X: f32 = -50.0;

/// One floating mine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub pos: Vec2,
    /// False once a hit consumed this bomb; swept on the next advance
    pub alive: bool,
}

/// Owns every live bomb: spawning, destruction, scroll advance, despawn sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombField {
    bombs: Vec<Bomb>,
    next_id: u32,
}

impl Default for BombField {
    fn default() -> Self {
        Self::new()
    }
}

impl BombField {
    pub fn new() -> Self {
        Self {
            bombs: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a new bomb and return its id. Ids are unique for the life
    /// of the field, never reused.
    pub fn spawn(&mut self, x: f32, y: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.bombs.push(Bomb {
            id,
            pos: Vec2::new(x, y),
            alive: true,
        });
        id
    }

    /// Mark a bomb dead. Returns false when the id is unknown or already
    /// dead, which makes repeated destroy reports harmless.
    pub fn destroy(&mut self, id: u32) -> bool {
        match self.bombs.iter_mut().find(|b| b.id == id && b.alive) {
            Some(bomb) => {
                bomb.alive = false;
                true
            }
            None => false,
        }
    }

    /// Scroll every bomb leftward and sweep out dead and off-screen ones.
    /// Returns how many were removed.
    pub fn advance(&mut self, dt: f32, scroll_speed_x: f32) -> usize {
        for bomb in &mut self.bombs {
            bomb.pos.x -= scroll_speed_x * dt;
        }
        let before = self.bombs.len();
        self.bombs.retain(|b| b.alive && b.pos.x >= DESPAWN_X);
        let removed = before - self.bombs.len();
        if removed > 0 {
            log::debug!("swept {} bomb(s)", removed);
        }
        removed
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.iter().filter(|b| b.alive)
    }

    /// Closure form of [`iter_alive`](Self::iter_alive)
    pub fn for_each_alive(&self, f: impl FnMut(&Bomb)) {
        self.iter_alive().for_each(f);
    }

    pub fn get(&self, id: u32) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.id == id)
    }

    /// Number of live bombs
    pub fn len(&self) -> usize {
        self.iter_alive().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
