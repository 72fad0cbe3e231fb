//! Cinder Dash - a tile-dungeon dash-and-dodge action core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, hit detection, effects, level flow)
//! - `render`: Software pixel frame and scene composition
//! - `tilemap`: Solid-tile grid with collision queries and decor anchors
//! - `assets`: Sprite strips, pixel masks, and the fail-fast sprite registry
//! - `tuning`: Data-driven level balance
//! - `settings`: Presentation and accessibility preferences

pub mod assets;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tilemap;
pub mod time;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGB triple used by particles and primitives (alpha handled at draw time)
pub type Rgb = [u8; 3];

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz logical ticks)
    pub const TICK_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks consumed per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 10;

    /// Internal view dimensions in pixels
    pub const VIEW_W: usize = 400;
    pub const VIEW_H: usize = 300;

    /// Tile cell size in pixels
    pub const CELL_SIZE: f32 = 20.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = CELL_SIZE;
    pub const RUN_SPEED: f32 = 4.0;
    pub const GRAVITY: f32 = 1.0;
    pub const MAX_FALL_SPEED: f32 = 14.0;
    pub const JUMP_SPEED: f32 = -10.0;
    /// Releasing jump clamps remaining rise to this, for short hops
    pub const JUMP_CUT_SPEED: f32 = -4.0;
    pub const MAX_JUMPS: u8 = 2;
    pub const LIVES_START: u8 = 3;

    /// Dash economy
    pub const MAX_DASHES: u8 = 3;
    pub const DASH_METER_FULL: u32 = 60;
    pub const DODGE_FORCE: f32 = 2.5;
    /// Impulse force lost per tick, never dropping below the neutral 1.0
    pub const FORCE_DECAY: f32 = 0.1;

    /// Hurt state
    pub const HURT_TICKS: u32 = 40;
    pub const KNOCKBACK_FORCE: f32 = 2.0;
    /// Landing speed beyond which the body squashes hard
    pub const HARD_LANDING_SPEED: f32 = 6.0;

    /// Squash-stretch spring (pull of vertical scale toward 1 per tick)
    pub const SQUASH_SPRING: f32 = 0.026;
    /// Squish velocity damping per tick
    pub const SQUASH_DAMP: f32 = 0.016;
    /// Band around rest inside which scale and squish velocity snap to rest
    pub const SQUASH_REST_EPS: f32 = 0.06;
    /// Squish velocity injected by a hard landing
    pub const LANDING_SQUISH_VEL: f32 = -0.14;
    pub const SCALE_MIN: f32 = 0.3;
    pub const SCALE_MAX: f32 = 1.5;

    /// Projectiles
    pub const SINGLE_SHOT_SPEED: f32 = 2.4;
    pub const VOLLEY_SHOT_SPEED: f32 = 1.8;
    pub const VOLLEY_COUNT: usize = 14;
    pub const VOLLEY_PITCH: f32 = 22.0;
    /// Distance from the player beyond which projectiles despawn
    pub const PROJECTILE_RANGE: f32 = 520.0;

    /// Level wipe transition
    pub const WIPE_STEP: f32 = 9.0;
    /// Covers the view corners from its center
    pub const WIPE_TARGET: f32 = 250.0;
}

/// Pack RGBA bytes into the frame pixel format (R in the high byte)
#[inline]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32
}

/// Unpack a frame pixel back into [r, g, b, a]
#[inline]
pub const fn unpack_rgba(p: u32) -> [u8; 4] {
    [(p >> 24) as u8, (p >> 16) as u8, (p >> 8) as u8, p as u8]
}

/// Axis-aligned rectangle with a top-left origin (screen coordinates, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Overlap test with exclusive far edges, so touching rects do not collide
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}
