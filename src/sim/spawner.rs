//! Projectile waves
//!
//! Two independent per-tick rolls while a level is armed: aimed single
//! shots from a random view edge, and full-edge volleys marching inward.
//! Shots fly in straight lines and despawn once they are far enough from
//! the player that they can never matter again.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{Effects, SPARK_PALE, Spark};
use super::state::Projectile;
use crate::consts::{
    PROJECTILE_RANGE, SINGLE_SHOT_SPEED, VOLLEY_COUNT, VOLLEY_PITCH, VOLLEY_SHOT_SPEED,
};
use crate::{Rect, Tuning};

/// Clearance outside the view edge at which shots materialize
const SPAWN_MARGIN: f32 = 6.0;
/// Aim jitter for single shots, radians either side of dead-on
const AIM_JITTER: f32 = PI / 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Unit vector pointing from this edge into the view
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(1.0, 0.0),
            Edge::Right => Vec2::new(-1.0, 0.0),
            Edge::Top => Vec2::new(0.0, 1.0),
            Edge::Bottom => Vec2::new(0.0, -1.0),
        }
    }

    fn pick(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..4) {
            0 => Edge::Left,
            1 => Edge::Right,
            2 => Edge::Top,
            _ => Edge::Bottom,
        }
    }

    /// A point `SPAWN_MARGIN` outside this edge of `view`, `t` in 0..1
    /// along the edge's length
    fn point_outside(self, view: &Rect, t: f32) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(view.left() - SPAWN_MARGIN, view.top() + view.size.y * t),
            Edge::Right => Vec2::new(view.right() + SPAWN_MARGIN, view.top() + view.size.y * t),
            Edge::Top => Vec2::new(view.left() + view.size.x * t, view.top() - SPAWN_MARGIN),
            Edge::Bottom => Vec2::new(view.left() + view.size.x * t, view.bottom() + SPAWN_MARGIN),
        }
    }
}

/// Fly every projectile one tick and drop the ones out of range
pub fn advance(projectiles: &mut Vec<Projectile>, player_center: Vec2) {
    projectiles.retain_mut(|shot| {
        shot.pos += shot.vel;
        shot.frame += 0.25;
        shot.pos.distance_squared(player_center) < PROJECTILE_RANGE * PROJECTILE_RANGE
    });
}

/// Roll this tick's spawns. Nothing spawns inside the post-start grace
/// window; after it, singles and volleys roll independently. Returns
/// whether a volley fired, so the caller can kick the screen.
pub fn roll(
    projectiles: &mut Vec<Projectile>,
    effects: &mut Effects,
    rng: &mut Pcg32,
    tuning: &Tuning,
    level: usize,
    timer: u32,
    view: Rect,
    player_center: Vec2,
) -> bool {
    if timer < tuning.grace_ticks {
        return false;
    }
    if rng.random_range(0..tuning.spawn_every(level)) == 0 {
        spawn_single(projectiles, effects, rng, view, player_center);
    }
    if rng.random_range(0..tuning.volley_every(level)) == 0 {
        let edge = Edge::pick(rng);
        spawn_volley(projectiles, effects, rng, view, edge);
        return true;
    }
    false
}

/// One shot from a random edge, aimed at the player give or take a jitter
fn spawn_single(
    projectiles: &mut Vec<Projectile>,
    effects: &mut Effects,
    rng: &mut Pcg32,
    view: Rect,
    player_center: Vec2,
) {
    let edge = Edge::pick(rng);
    let pos = edge.point_outside(&view, rng.random_range(0.0..1.0));
    let to_player = player_center - pos;
    let aim = to_player.y.atan2(to_player.x) + rng.random_range(-AIM_JITTER..AIM_JITTER);
    let vel = Vec2::new(aim.cos(), aim.sin()) * SINGLE_SHOT_SPEED;
    push_shot(projectiles, effects, rng, pos, vel);
}

/// A fence of shots along one whole edge, all flying straight in
pub fn spawn_volley(
    projectiles: &mut Vec<Projectile>,
    effects: &mut Effects,
    rng: &mut Pcg32,
    view: Rect,
    edge: Edge,
) {
    let vel = edge.inward() * VOLLEY_SHOT_SPEED;
    let along = Vec2::new(vel.y.abs(), vel.x.abs()).normalize();
    let origin = edge.point_outside(&view, 0.0);
    for i in 0..VOLLEY_COUNT {
        let pos = origin + along * (i as f32 * VOLLEY_PITCH);
        push_shot(projectiles, effects, rng, pos, vel);
    }
}

/// Register the shot and its three-spark muzzle burst
fn push_shot(
    projectiles: &mut Vec<Projectile>,
    effects: &mut Effects,
    rng: &mut Pcg32,
    pos: Vec2,
    vel: Vec2,
) {
    projectiles.push(Projectile {
        pos,
        vel,
        frame: 0.0,
        seed: rng.random_range(1..=6),
    });
    let travel = vel.y.atan2(vel.x);
    for _ in 0..3 {
        effects.sparks.push(Spark {
            pos,
            angle: travel + rng.random_range(-AIM_JITTER..AIM_JITTER),
            speed: rng.random_range(8.0..11.0),
            width: rng.random_range(2.0..4.0),
            width_decay: 0.12,
            speed_decay: 0.9,
            length: rng.random_range(10.0..12.0),
            length_decay: 0.97,
            color: SPARK_PALE,
        });
    }
}
