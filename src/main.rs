//! Headless demo run
//!
//! Drives the simulation with a scripted pilot for one in-game minute,
//! rendering frames into an offscreen buffer along the way. Useful for
//! smoke-testing the whole pipeline and for profiling; pass a seed as the
//! first argument to vary the run.

use cinder_dash::assets::AssetLibrary;
use cinder_dash::consts::{TICK_DT, VIEW_H, VIEW_W};
use cinder_dash::render::{Frame, draw_scene};
use cinder_dash::sim::{GameState, Phase, TickInput, tick};
use cinder_dash::tilemap::TileMap;
use cinder_dash::time::TickClock;
use cinder_dash::{Settings, Tuning};

const DEMO_MAP: [&str; 16] = [
    "####################################",
    "#..................................#",
    "#..t..........t...........t........#",
    "#..................................#",
    "#..................................#",
    "#.........%%%......................#",
    "#..................%%%.............#",
    "#..................................#",
    "#......%%..........................#",
    "#..........................%%%%....#",
    "#..................................#",
    "#####..........%%%.................#",
    "#..................................#",
    "#...........................########",
    "#..................................#",
    "####################################",
];

/// Scripted input that pokes every verb the game has
struct DemoPilot;

impl DemoPilot {
    fn input(&self, tick_index: u64) -> TickInput {
        TickInput {
            move_right: tick_index % 500 < 400,
            move_left: tick_index % 500 >= 430,
            // the very first press confirms the menu
            jump: tick_index == 0 || tick_index % 90 == 30,
            jump_held: tick_index % 90 < 45,
            dodge: tick_index % 210 == 100,
            ..TickInput::default()
        }
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC1DE);
    log::info!("demo run with seed {seed:#x}");

    let assets = AssetLibrary::builtin();
    let map = TileMap::from_rows(&DEMO_MAP);
    let tuning = Tuning::default();
    let settings = Settings::load(std::path::Path::new("settings.json"));
    let pilot = DemoPilot;

    let mut state = GameState::new(seed, &tuning);
    let mut frame = Frame::new(VIEW_W, VIEW_H);
    let mut clock = TickClock::new();
    let mut tick_index = 0u64;

    // one simulated minute at 60 fps
    for frame_index in 0..3600u32 {
        for _ in 0..clock.advance(TICK_DT) {
            let input = pilot.input(tick_index);
            tick(&mut state, &input, &map, &assets, &tuning);
            tick_index += 1;
        }
        draw_scene(&mut frame, &state, &map, &assets, &settings);

        if frame_index % 300 == 0 {
            log::info!(
                "t={:>4} phase={:?} level={} lives={} shots={} effects={}",
                state.tick_count,
                state.flow.phase,
                state.flow.level,
                state.player.lives,
                state.projectiles.len(),
                state.effects.total(),
            );
        }
        if matches!(state.flow.phase, Phase::Win | Phase::Dead) {
            break;
        }
    }

    log::info!(
        "demo finished: phase={:?} level={} ticks={}",
        state.flow.phase,
        state.flow.level,
        state.tick_count,
    );
}
