//! Scene composition
//!
//! Pure state-to-pixels: walk the visible tile cells, then the effect
//! families back to front, the player, projectiles, the wipe circle, and
//! the HUD. Settings gate presentation here and nowhere else.

use glam::Vec2;

use super::frame::Frame;
use crate::assets::{AssetLibrary, SpriteKind};
use crate::consts::{CELL_SIZE, DASH_METER_FULL, MAX_DASHES, PLAYER_SIZE};
use crate::sim::{GameState, Phase};
use crate::tilemap::{TileKind, TileMap};
use crate::{Settings, pack_rgba};

const BACKDROP: crate::Rgb = [20, 0, 16];
const STONE: u32 = pack_rgba(58, 48, 64, 255);
const STONE_EDGE: u32 = pack_rgba(74, 62, 80, 255);
const BRICK: u32 = pack_rgba(96, 44, 40, 255);
const BRICK_EDGE: u32 = pack_rgba(116, 56, 48, 255);
const WIPE: u32 = pack_rgba(8, 0, 6, 255);
const HUD_LIFE: u32 = pack_rgba(214, 48, 48, 255);
const HUD_DASH: u32 = pack_rgba(120, 200, 255, 255);
const HUD_METER: u32 = pack_rgba(70, 110, 140, 255);

/// Render one frame of the current state.
pub fn draw_scene(
    frame: &mut Frame,
    state: &GameState,
    map: &TileMap,
    assets: &AssetLibrary,
    settings: &Settings,
) {
    let mut offset = state.camera;
    if settings.effective_screen_shake() {
        offset += state.shake_jitter;
    }

    frame.clear(BACKDROP);
    draw_tiles(frame, map, offset);
    draw_torch_halos(frame, map, state.tick_count, offset);
    draw_effects(frame, state, assets, settings, offset);
    draw_player(frame, state, assets, offset);
    draw_projectiles(frame, state, assets, offset);
    draw_wipe(frame, state, offset);
    if settings.show_hud {
        draw_hud(frame, state);
    }
}

fn draw_tiles(frame: &mut Frame, map: &TileMap, offset: Vec2) {
    let cx0 = (offset.x / CELL_SIZE).floor() as i32 - 1;
    let cy0 = (offset.y / CELL_SIZE).floor() as i32 - 1;
    let cx1 = cx0 + (frame.width() as f32 / CELL_SIZE).ceil() as i32 + 2;
    let cy1 = cy0 + (frame.height() as f32 / CELL_SIZE).ceil() as i32 + 2;
    for cy in cy0..cy1 {
        for cx in cx0..cx1 {
            let Some(tile) = map.cell(cx, cy) else {
                continue;
            };
            let (fill, edge) = match tile.kind {
                TileKind::Stone => (STONE, STONE_EDGE),
                TileKind::Brick => (BRICK, BRICK_EDGE),
            };
            let pos = Vec2::new(cx as f32 * CELL_SIZE, cy as f32 * CELL_SIZE) - offset;
            frame.fill_rect(pos, Vec2::splat(CELL_SIZE), fill);
            // a one-pixel top highlight sells the depth
            frame.fill_rect(pos, Vec2::new(CELL_SIZE, 1.0), edge);
        }
    }
}

/// Soft pulsing light pools under the torch anchors
fn draw_torch_halos(frame: &mut Frame, map: &TileMap, tick: u64, offset: Vec2) {
    for (i, &anchor) in map.torches().iter().enumerate() {
        let phase = tick as f32 * 0.08 + i as f32 * 1.7;
        let radius = 14.0 + phase.sin() * 2.5;
        let screen = anchor - offset;
        frame.fill_circle(screen, radius, pack_rgba(255, 180, 80, 26));
        frame.fill_circle(screen, radius * 0.55, pack_rgba(255, 210, 120, 30));
    }
}

fn draw_effects(
    frame: &mut Frame,
    state: &GameState,
    assets: &AssetLibrary,
    settings: &Settings,
    offset: Vec2,
) {
    let cap = settings.effective_particle_cap();
    let mut drawn = 0usize;
    let effects = &state.effects;
    let glow_strip = assets.strip(SpriteKind::Glow);

    for wave in &effects.shockwaves {
        if drawn >= cap {
            return;
        }
        drawn += 1;
        let c = wave.color;
        frame.ring(
            wave.pos - offset,
            wave.radius,
            wave.width,
            pack_rgba(c[0], c[1], c[2], 200),
        );
    }
    for circle in &effects.circles {
        if drawn >= cap {
            return;
        }
        drawn += 1;
        let c = circle.color;
        frame.fill_circle(
            circle.pos - offset,
            circle.radius.floor(),
            pack_rgba(c[0], c[1], c[2], 255),
        );
    }
    for spark in &effects.sparks {
        if drawn >= cap {
            return;
        }
        drawn += 1;
        let c = spark.color;
        let mut quad = spark.quad();
        for corner in &mut quad {
            *corner -= offset;
        }
        frame.fill_quad(quad, pack_rgba(c[0], c[1], c[2], 255));
    }
    for glow in &effects.glows {
        if drawn >= cap {
            return;
        }
        if !glow.visible(glow_strip.len()) {
            continue;
        }
        drawn += 1;
        let sprite = glow_strip.frame(glow.frame.floor() as usize);
        frame.blit_tinted(sprite, glow.pos - offset, glow.color);
    }
}

fn draw_player(frame: &mut Frame, state: &GameState, assets: &AssetLibrary, offset: Vec2) {
    let player = &state.player;
    if player.dead {
        return;
    }
    // hurt flicker: skip every other pair of ticks
    if player.hurt_timer > 0 && state.tick_count % 4 < 2 {
        return;
    }
    let strip = assets.strip(player.state.sprite());
    let sprite = strip.frame(player.anim_frame as usize);
    let center = player.center() - offset;
    // squash pivots on the feet so they stay planted
    let feet_shift = PLAYER_SIZE * 0.5 * (1.0 - player.scale_y);
    frame.blit_scaled(
        sprite,
        center + Vec2::new(0.0, feet_shift),
        Vec2::new(player.scale_x(), player.scale_y),
        player.facing == crate::sim::Facing::Left,
    );
}

fn draw_projectiles(frame: &mut Frame, state: &GameState, assets: &AssetLibrary, offset: Vec2) {
    let strip = assets.strip(SpriteKind::Projectile);
    for shot in &state.projectiles {
        let screen = shot.pos - offset;
        // per-shot halo pulse, phase fixed by the spawn seed
        let phase = (shot.seed % 100 + 100) as f32 / 200.0;
        let halo = 8.0 + (phase * state.tick_count as f32 * 0.4).sin() * 2.0;
        frame.fill_circle(screen, halo, pack_rgba(255, 120, 60, 22));
        frame.blit_tinted(strip.frame(shot.frame as usize), screen, None);
    }
}

/// The closing/opening circle between levels, centered on the player
fn draw_wipe(frame: &mut Frame, state: &GameState, offset: Vec2) {
    if state.flow.phase != Phase::Transition || state.flow.wipe_radius <= 0.0 {
        return;
    }
    let screen = state.player.center() - offset;
    frame.fill_circle(screen, state.flow.wipe_radius, WIPE);
}

fn draw_hud(frame: &mut Frame, state: &GameState) {
    let player = &state.player;
    for i in 0..player.lives {
        frame.fill_rect(
            Vec2::new(6.0 + i as f32 * 10.0, 6.0),
            Vec2::new(7.0, 7.0),
            HUD_LIFE,
        );
    }
    for i in 0..MAX_DASHES {
        let color = if i < player.dash_charges {
            HUD_DASH
        } else {
            HUD_METER
        };
        frame.fill_rect(
            Vec2::new(6.0 + i as f32 * 10.0, 17.0),
            Vec2::new(7.0, 4.0),
            color,
        );
    }
    // recharge meter under the pips
    let fill = player.dash_meter as f32 / DASH_METER_FULL as f32;
    frame.fill_rect(Vec2::new(6.0, 23.0), Vec2::new(27.0 * fill, 2.0), HUD_METER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::consts::{VIEW_H, VIEW_W};
    use crate::sim::{LevelEvent, WipeStage};

    fn scene() -> (GameState, TileMap, AssetLibrary, Settings) {
        let tuning = Tuning::default();
        let map = TileMap::from_rows(&[
            "....................",
            "..t.................",
            "....................",
            "....................",
            "%%%%################",
        ]);
        let mut state = GameState::new(2, &tuning);
        state.flow.apply(LevelEvent::Advanced);
        state.player.pos = Vec2::new(60.0, 60.0);
        (state, map, AssetLibrary::builtin(), Settings::default())
    }

    fn lit_pixels(frame: &Frame) -> usize {
        let bg = pack_rgba(BACKDROP[0], BACKDROP[1], BACKDROP[2], 255);
        (0..frame.height())
            .flat_map(|y| (0..frame.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) != bg)
            .count()
    }

    #[test]
    fn test_scene_draws_something() {
        let (state, map, assets, settings) = scene();
        let mut frame = Frame::new(VIEW_W, VIEW_H);
        draw_scene(&mut frame, &state, &map, &assets, &settings);
        assert!(lit_pixels(&frame) > 500);
    }

    #[test]
    fn test_particle_toggle_suppresses_effects() {
        let (mut state, map, assets, mut settings) = scene();
        let mut rng: rand_pcg::Pcg32 = rand::SeedableRng::seed_from_u64(4);
        state.effects.death_burst(Vec2::new(80.0, 40.0), &mut rng);

        let mut with = Frame::new(VIEW_W, VIEW_H);
        draw_scene(&mut with, &state, &map, &assets, &settings);
        settings.particles = false;
        let mut without = Frame::new(VIEW_W, VIEW_H);
        draw_scene(&mut without, &state, &map, &assets, &settings);
        assert!(lit_pixels(&with) > lit_pixels(&without));
    }

    #[test]
    fn test_dead_player_is_not_drawn() {
        let (mut state, map, assets, settings) = scene();
        let mut alive = Frame::new(VIEW_W, VIEW_H);
        draw_scene(&mut alive, &state, &map, &assets, &settings);
        state.player.dead = true;
        let mut dead = Frame::new(VIEW_W, VIEW_H);
        draw_scene(&mut dead, &state, &map, &assets, &settings);
        assert!(lit_pixels(&alive) > lit_pixels(&dead));
    }

    #[test]
    fn test_wipe_covers_frame_at_target() {
        let (mut state, map, assets, settings) = scene();
        state.flow.phase = Phase::Transition;
        state.flow.wipe_stage = WipeStage::Closing;
        state.flow.wipe_radius = crate::consts::WIPE_TARGET;
        state.camera = state.player.center() - Vec2::new(VIEW_W as f32, VIEW_H as f32) * 0.5;
        let mut frame = Frame::new(VIEW_W, VIEW_H);
        draw_scene(&mut frame, &state, &map, &assets, &settings);
        // at full radius the whole view is the wipe color (HUD aside)
        assert_eq!(frame.pixel(2, VIEW_H / 2), WIPE);
        assert_eq!(frame.pixel(VIEW_W - 2, VIEW_H - 2), WIPE);
    }
}
