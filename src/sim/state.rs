//! The complete simulation state
//!
//! `GameState` owns everything the tick pipeline mutates, including the
//! RNG, so two states built from the same seed and fed the same inputs
//! stay byte-for-byte identical. The whole struct serializes, which is
//! what the determinism tests lean on.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use super::level::{LevelEvent, LevelFlow};
use super::player::Player;
use crate::Tuning;

/// An ember shot in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fractional strip index
    pub frame: f32,
    /// Stable per-shot variation for the halo pulse, 1..=6
    pub seed: u8,
}

/// One tick's worth of sampled input. Held fields are level-triggered,
/// the rest are edge-triggered by the sampling layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Holding jump sustains the full rise; releasing cuts it short
    pub jump_held: bool,
    /// Jump pressed this tick
    pub jump: bool,
    /// Dodge pressed this tick
    pub dodge: bool,
    pub pause: bool,
    pub reset: bool,
    pub hard_reset: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tick_count: u64,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub effects: Effects,
    pub flow: LevelFlow,
    /// World position of the view's top-left corner
    pub camera: Vec2,
    /// Remaining screen shake ticks
    pub shake: u32,
    /// This tick's shake displacement, applied at draw time
    pub shake_jitter: Vec2,
}

impl GameState {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tick_count: 0,
            player: Player::new(tuning.spawn_point(0)),
            projectiles: Vec::new(),
            effects: Effects::default(),
            flow: LevelFlow::default(),
            camera: Vec2::ZERO,
            shake: 0,
            shake_jitter: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.player.center()
    }

    /// Clear the transient world and respawn at the current level's spawn
    /// point. Lives and the level index carry over.
    pub fn soft_reset_world(&mut self, tuning: &Tuning) {
        self.projectiles.clear();
        self.effects.clear();
        self.shake = 0;
        self.shake_jitter = Vec2::ZERO;
        self.player.respawn(tuning.spawn_point(self.flow.level));
    }

    /// Back to level zero with a fresh player
    pub fn hard_reset(&mut self, tuning: &Tuning) {
        self.flow.apply(LevelEvent::HardReset);
        self.player = Player::new(tuning.spawn_point(0));
        self.projectiles.clear();
        self.effects.clear();
        self.shake = 0;
        self.shake_jitter = Vec2::ZERO;
    }
}
