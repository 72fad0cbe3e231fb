//! The player body
//!
//! Velocity integration against the tile map, the dash-charge economy, the
//! hurt/knockback window, and the squash-stretch spring. Dash and hurt
//! knockback are two logically distinct overrides, so each owns its own
//! `Impulse` slot and they never contend for one field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, CollisionFlags};
use super::state::TickInput;
use crate::Rect;
use crate::assets::SpriteKind;
use crate::consts::*;
use crate::tilemap::TileMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Animation/behavior state, also selects the sprite strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Idle,
    Run,
    Jump,
    Hurt,
}

impl Behavior {
    pub fn sprite(self) -> SpriteKind {
        match self {
            Behavior::Idle => SpriteKind::PlayerIdle,
            Behavior::Run => SpriteKind::PlayerRun,
            Behavior::Jump => SpriteKind::PlayerJump,
            Behavior::Hurt => SpriteKind::PlayerHurt,
        }
    }
}

/// A decaying forced-velocity override.
///
/// `force` multiplies run speed and forces the horizontal direction to `dir`
/// while above the neutral 1.0. Dash and hurt knockback each hold one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impulse {
    /// Velocity multiplier, >= 1; exactly 1 means inactive
    pub force: f32,
    /// Forced horizontal direction, -1 or 1
    pub dir: f32,
}

impl Default for Impulse {
    fn default() -> Self {
        Self {
            force: 1.0,
            dir: 1.0,
        }
    }
}

impl Impulse {
    #[inline]
    pub fn active(&self) -> bool {
        self.force > 1.0
    }

    pub fn trigger(&mut self, force: f32, dir: f32) {
        self.force = force.max(1.0);
        self.dir = if dir < 0.0 { -1.0 } else { 1.0 };
    }

    /// Pull force back toward neutral, never dropping below 1
    pub fn decay(&mut self) {
        self.force = (self.force - FORCE_DECAY).max(1.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub air_time: u32,
    pub jump_charges: u8,
    pub lives: u8,
    pub dash_charges: u8,
    /// Recharge meter, grants a dash charge when it fills
    pub dash_meter: u32,
    pub hurt_timer: u32,
    /// Dash override (player-triggered)
    pub dash: Impulse,
    /// Post-hit knockback override (combat-triggered)
    pub knockback: Impulse,
    pub facing: Facing,
    /// Vertical scale of the squash-stretch spring
    pub scale_y: f32,
    pub squish_vel: f32,
    pub state: Behavior,
    /// Latched by the one-shot death sequence
    pub dead: bool,
    /// Fractional animation strip index
    pub anim_frame: f32,
}

impl Player {
    pub fn new(at: Vec2) -> Self {
        Self {
            pos: at,
            vel: Vec2::ZERO,
            on_ground: false,
            air_time: 0,
            jump_charges: MAX_JUMPS,
            lives: LIVES_START,
            dash_charges: MAX_DASHES,
            dash_meter: 0,
            hurt_timer: 0,
            dash: Impulse::default(),
            knockback: Impulse::default(),
            facing: Facing::Right,
            scale_y: 1.0,
            squish_vel: 0.0,
            state: Behavior::Idle,
            dead: false,
            anim_frame: 0.0,
        }
    }

    /// Reset transient state for a level restart, keeping lives intact
    pub fn respawn(&mut self, at: Vec2) {
        let lives = self.lives;
        let dead = self.dead;
        *self = Player::new(at);
        self.lives = lives;
        self.dead = dead;
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PLAYER_SIZE * 0.5)
    }

    /// The larger of the two impulse overrides, neutral when both rest
    pub fn active_impulse(&self) -> Option<Impulse> {
        match (self.dash.active(), self.knockback.active()) {
            (true, true) if self.knockback.force > self.dash.force => Some(self.knockback),
            (true, _) => Some(self.dash),
            (_, true) => Some(self.knockback),
            _ => None,
        }
    }

    /// One physics step: velocity, tile collision, squash, charge economy.
    pub fn integrate(&mut self, input: &TickInput, map: &TileMap) -> CollisionFlags {
        if input.move_left {
            self.facing = Facing::Left;
        } else if input.move_right {
            self.facing = Facing::Right;
        }
        let move_axis = input.move_right as i32 as f32 - input.move_left as i32 as f32;

        // an active impulse forces both direction and magnitude
        self.vel.x = match self.active_impulse() {
            Some(imp) => imp.dir * RUN_SPEED * imp.force,
            None => move_axis * RUN_SPEED,
        };
        self.vel.y = (self.vel.y + GRAVITY).min(MAX_FALL_SPEED);
        // letting go of jump cuts the rise short
        if !input.jump_held && self.vel.y < JUMP_CUT_SPEED {
            self.vel.y = JUMP_CUT_SPEED;
        }

        let mut body = Rect::new(self.pos.x, self.pos.y, PLAYER_SIZE, PLAYER_SIZE);
        let solids = map.surrounding_rects(body.center());
        let flags = collision::move_and_collide(&mut body, self.vel, &solids);
        self.pos = body.pos;

        // squash reads the pre-clamp fall speed for the hard-landing check
        self.squash(&flags);

        if flags.down {
            self.vel.y = 0.0;
            self.air_time = 0;
            self.jump_charges = MAX_JUMPS;
        } else {
            self.air_time += 1;
        }
        self.on_ground = flags.down;
        if flags.up {
            self.vel.y = 0.0;
        }

        self.dash.decay();
        self.knockback.decay();
        self.recharge();

        if self.hurt_timer > 0 {
            self.hurt_timer -= 1;
        }
        self.state = if self.hurt_timer > 0 {
            Behavior::Hurt
        } else if move_axis != 0.0 {
            Behavior::Run
        } else if self.air_time > 3 {
            Behavior::Jump
        } else {
            Behavior::Idle
        };
        self.anim_frame += 0.2;

        flags
    }

    /// Consume one jump charge if any remain
    pub fn jump(&mut self) {
        if self.jump_charges > 0 {
            self.vel.y = JUMP_SPEED;
            self.jump_charges -= 1;
        }
    }

    /// Dodge burst opposite the current facing. A strict no-op with no
    /// charges banked.
    pub fn dodge(&mut self, force: f32) {
        if self.dash_charges == 0 {
            return;
        }
        self.dash_charges -= 1;
        self.dash_meter = 0;
        self.dash.trigger(force, -self.facing.sign());
    }

    fn recharge(&mut self) {
        if self.dash_meter < DASH_METER_FULL {
            self.dash_meter += 1;
        }
        if self.dash_meter >= DASH_METER_FULL && self.dash_charges < MAX_DASHES {
            self.dash_charges += 1;
            self.dash_meter = 0;
        }
    }

    fn squash(&mut self, flags: &CollisionFlags) {
        self.scale_y = (self.scale_y + self.squish_vel).clamp(SCALE_MIN, SCALE_MAX);

        if self.scale_y > 1.0 {
            self.squish_vel -= SQUASH_SPRING;
        } else if self.scale_y < 1.0 {
            self.squish_vel += SQUASH_SPRING;
        }
        if self.squish_vel > 0.0 {
            self.squish_vel -= SQUASH_DAMP;
        } else if self.squish_vel < 0.0 {
            self.squish_vel += SQUASH_DAMP;
        }

        if self.squish_vel != 0.0
            && self.squish_vel.abs() < SQUASH_REST_EPS
            && (self.scale_y - 1.0).abs() < SQUASH_REST_EPS
        {
            self.scale_y = 1.0;
            self.squish_vel = 0.0;
        }

        if flags.down && self.vel.y > HARD_LANDING_SPEED {
            self.squish_vel = LANDING_SQUISH_VEL;
        }
    }

    /// Horizontal scale mirrors the vertical to conserve apparent volume
    #[inline]
    pub fn scale_x(&self) -> f32 {
        2.0 - self.scale_y
    }
}
