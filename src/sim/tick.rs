//! The fixed-order tick pipeline
//!
//! One call advances the whole game by exactly one 60 Hz step: input
//! edges, player physics, projectile flight, hit resolution, effects,
//! spawning, level flow, then camera and shake. The order is part of the
//! game's feel and never varies between phases; phases instead gate which
//! stages run at all.

use glam::Vec2;
use rand::Rng;

use super::combat;
use super::level::{FlowAction, LevelEvent, Phase};
use super::spawner::{self, Edge};
use super::state::{GameState, TickInput};
use crate::assets::AssetLibrary;
use crate::assets::SpriteKind;
use crate::consts::{DODGE_FORCE, VIEW_H, VIEW_W};
use crate::tilemap::TileMap;
use crate::{Rect, Tuning};

const SHAKE_ON_HIT: u32 = 10;
const SHAKE_ON_DEATH: u32 = 16;
const SHAKE_ON_VOLLEY: u32 = 8;
const SHAKE_AMPLITUDE: f32 = 8.0;
/// Fraction of the remaining camera error closed per tick
const CAMERA_EASE: f32 = 12.0;

/// Advance the simulation one tick.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    map: &TileMap,
    assets: &AssetLibrary,
    tuning: &Tuning,
) {
    if input.hard_reset {
        state.hard_reset(tuning);
        return;
    }
    if input.reset && state.flow.apply(LevelEvent::SoftReset) == FlowAction::SoftReset {
        state.soft_reset_world(tuning);
        return;
    }
    if input.pause {
        state.flow.apply(LevelEvent::PauseToggled);
    }

    match state.flow.phase {
        Phase::StartMenu => {
            if input.jump {
                state.flow.apply(LevelEvent::Advanced);
                state.soft_reset_world(tuning);
                log::info!("campaign started");
            }
            return;
        }
        Phase::Pause | Phase::ForcedPause | Phase::Win => return,
        Phase::Dead => {
            // the world burns on without the player
            state.tick_count += 1;
            let glow_len = assets.strip(SpriteKind::Glow).len();
            state.effects.update(map, glow_len, &mut state.rng);
            state.effects.emit_torches(map.torches(), &mut state.rng);
            drive_camera(state, map);
            return;
        }
        _ => {}
    }

    state.tick_count += 1;

    if input.jump {
        state.player.jump();
    }
    if input.dodge {
        state.player.dodge(DODGE_FORCE);
    }
    state.player.integrate(input, map);

    spawner::advance(&mut state.projectiles, state.player.center());

    let outcome = combat::resolve_hits(
        &mut state.player,
        &mut state.projectiles,
        &mut state.effects,
        assets,
        &mut state.rng,
    );
    if outcome.hit {
        state.shake = state.shake.max(SHAKE_ON_HIT);
        log::info!("player hit, {} lives left", state.player.lives);
    }
    if outcome.died {
        state.shake = state.shake.max(SHAKE_ON_DEATH);
    }

    let glow_len = assets.strip(SpriteKind::Glow).len();
    state.effects.update(map, glow_len, &mut state.rng);
    state.effects.emit_torches(map.torches(), &mut state.rng);

    if state.flow.spawning_active() {
        let volley = spawner::roll(
            &mut state.projectiles,
            &mut state.effects,
            &mut state.rng,
            tuning,
            state.flow.level,
            state.flow.timer,
            view_rect(state.camera),
            state.player.center(),
        );
        if volley {
            state.shake = state.shake.max(SHAKE_ON_VOLLEY);
        }
    }

    let action = state
        .flow
        .update(state.player.dead, state.player.pos.x, tuning);
    match action {
        FlowAction::Armed => {
            // every level past the first opens with a full right-edge wall
            if state.flow.level > 0 {
                state.shake = state.shake.max(SHAKE_ON_VOLLEY);
                spawner::spawn_volley(
                    &mut state.projectiles,
                    &mut state.effects,
                    &mut state.rng,
                    view_rect(state.camera),
                    Edge::Right,
                );
            }
            log::info!("level {} armed", state.flow.level);
        }
        FlowAction::NextLevel => {
            state.soft_reset_world(tuning);
            log::info!("level {} reached", state.flow.level);
        }
        FlowAction::Won => log::info!("campaign won after {} ticks", state.tick_count),
        FlowAction::Lost => log::info!("player died on level {}", state.flow.level),
        _ => {}
    }

    drive_camera(state, map);
}

/// The world-space rect currently covered by the view
pub fn view_rect(camera: Vec2) -> Rect {
    Rect::new(camera.x, camera.y, VIEW_W as f32, VIEW_H as f32)
}

fn drive_camera(state: &mut GameState, map: &TileMap) {
    let target = state.player.center() - Vec2::new(VIEW_W as f32, VIEW_H as f32) * 0.5;
    state.camera += (target - state.camera) / CAMERA_EASE;

    let bounds = map.bounds();
    state.camera.x = clamp_axis(state.camera.x, bounds.left(), bounds.right(), VIEW_W as f32);
    state.camera.y = clamp_axis(state.camera.y, bounds.top(), bounds.bottom(), VIEW_H as f32);

    if state.shake > 0 {
        state.shake -= 1;
        state.shake_jitter = Vec2::new(
            state.rng.random_range(-SHAKE_AMPLITUDE..SHAKE_AMPLITUDE),
            state.rng.random_range(-SHAKE_AMPLITUDE..SHAKE_AMPLITUDE),
        );
    } else {
        state.shake_jitter = Vec2::ZERO;
    }
}

/// Keep the view inside the world on one axis; a world smaller than the
/// view centers instead
fn clamp_axis(cam: f32, lo: f32, hi: f32, view: f32) -> f32 {
    if hi - lo <= view {
        lo + (hi - lo - view) * 0.5
    } else {
        cam.clamp(lo, hi - view)
    }
}
