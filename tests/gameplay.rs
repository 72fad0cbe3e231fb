//! End-to-end scenarios driven only through the public tick entry point.

use glam::Vec2;
use proptest::prelude::*;

use cinder_dash::assets::AssetLibrary;
use cinder_dash::consts::{
    DASH_METER_FULL, FORCE_DECAY, HURT_TICKS, LIVES_START, MAX_DASHES, SCALE_MAX, SCALE_MIN,
    WIPE_TARGET,
};
use cinder_dash::sim::{GameState, Phase, Projectile, TickInput, WipeStage, tick};
use cinder_dash::tilemap::TileMap;
use cinder_dash::{Settings, Tuning};

fn arena() -> TileMap {
    let open = ".".repeat(50);
    let floor = "#".repeat(50);
    let mut rows: Vec<&str> = vec![&open; 11];
    rows.push(&floor);
    TileMap::from_rows(&rows)
}

/// A state already past the start menu, standing on the floor
fn playing_state(seed: u64, tuning: &Tuning) -> (GameState, AssetLibrary, TileMap) {
    let map = arena();
    let assets = AssetLibrary::builtin();
    let mut state = GameState::new(seed, tuning);
    tick(
        &mut state,
        &TickInput {
            jump: true,
            ..TickInput::default()
        },
        &map,
        &assets,
        tuning,
    );
    assert_eq!(state.flow.phase, Phase::Tutorial);
    let idle = TickInput::default();
    for _ in 0..60 {
        tick(&mut state, &idle, &map, &assets, tuning);
    }
    assert!(state.player.on_ground);
    (state, assets, map)
}

fn shot_on_player(state: &GameState) -> Projectile {
    Projectile {
        pos: state.player.center(),
        vel: Vec2::new(-0.1, 0.0),
        frame: 0.0,
        seed: 1,
    }
}

#[test]
fn test_three_dodges_then_exhaustion() {
    let tuning = Tuning::default();
    let (mut state, assets, map) = playing_state(1, &tuning);
    let idle = TickInput::default();
    let dodge = TickInput {
        dodge: true,
        ..TickInput::default()
    };

    for expected_left in [2u8, 1, 0] {
        tick(&mut state, &dodge, &map, &assets, &tuning);
        assert_eq!(state.player.dash_charges, expected_left);
        assert!(state.player.dash.active());
        // two settle ticks, not enough to refill the meter
        tick(&mut state, &idle, &map, &assets, &tuning);
        tick(&mut state, &idle, &map, &assets, &tuning);
    }

    // fourth press: nothing left, no retrigger, the old force only decayed
    let force_before = state.player.dash.force;
    let meter_before = state.player.dash_meter;
    tick(&mut state, &dodge, &map, &assets, &tuning);
    assert_eq!(state.player.dash_charges, 0);
    assert!((state.player.dash.force - (force_before - FORCE_DECAY)).abs() < 1e-5);
    assert_eq!(state.player.dash_meter, meter_before + 1);
}

#[test]
fn test_meter_refills_one_charge_per_second() {
    let tuning = Tuning::default();
    let (mut state, assets, map) = playing_state(2, &tuning);
    let dodge = TickInput {
        dodge: true,
        ..TickInput::default()
    };
    tick(&mut state, &dodge, &map, &assets, &tuning);
    assert_eq!(state.player.dash_charges, MAX_DASHES - 1);

    let idle = TickInput::default();
    // the dodge tick already ran one recharge step
    for _ in 0..DASH_METER_FULL - 1 {
        tick(&mut state, &idle, &map, &assets, &tuning);
    }
    assert_eq!(state.player.dash_charges, MAX_DASHES);
    assert_eq!(state.player.dash_meter, 0);
}

#[test]
fn test_hit_immunity_and_death_burst_once() {
    let tuning = Tuning::default();
    let (mut state, assets, map) = playing_state(3, &tuning);
    let idle = TickInput::default();

    state.projectiles.push(shot_on_player(&state));
    tick(&mut state, &idle, &map, &assets, &tuning);
    assert_eq!(state.player.lives, LIVES_START - 1);
    assert_eq!(state.player.hurt_timer, HURT_TICKS);
    assert!(state.projectiles.is_empty());
    assert!(state.shake > 0);

    // contact during the hurt window never burns a second life
    state.projectiles.push(shot_on_player(&state));
    for _ in 0..10 {
        tick(&mut state, &idle, &map, &assets, &tuning);
    }
    assert_eq!(state.player.lives, LIVES_START - 1);
    state.projectiles.clear();

    // run the window out, then burn the remaining lives
    for _ in 0..HURT_TICKS {
        tick(&mut state, &idle, &map, &assets, &tuning);
    }
    state.player.lives = 1;
    state.projectiles.push(shot_on_player(&state));
    tick(&mut state, &idle, &map, &assets, &tuning);
    assert!(state.player.dead);
    assert_eq!(state.flow.phase, Phase::Dead);
    let burst_size = state.effects.total();
    assert!(burst_size > 0);

    // dead world keeps burning but never bursts again
    for _ in 0..5 {
        tick(&mut state, &idle, &map, &assets, &tuning);
        assert_eq!(state.flow.phase, Phase::Dead);
    }
}

#[test]
fn test_level_transition_timing() {
    let tuning: Tuning = serde_json::from_str(
        r#"{
            "durations": [100, 100, 100],
            "start_lines": [0.0, 0.0, 0.0],
            "spawn_every": [10000, 10000, 10000],
            "volley_every": [10000, 10000, 10000],
            "grace_ticks": 10000,
            "spawn_points": [[40.0, 100.0], [40.0, 100.0], [40.0, 100.0]]
        }"#,
    )
    .unwrap();
    let (mut state, assets, map) = playing_state(4, &tuning);
    let idle = TickInput::default();

    // already armed (start line 0); wait out the level timer
    let mut saw_closing = false;
    for _ in 0..150 {
        tick(&mut state, &idle, &map, &assets, &tuning);
        if state.flow.phase == Phase::Transition {
            saw_closing = true;
            break;
        }
    }
    assert!(saw_closing);
    assert_eq!(state.flow.wipe_stage, WipeStage::Closing);
    assert_eq!(state.flow.level, 0);

    // the wipe must fully close before the level index moves; on the
    // advancing tick the radius sits exactly at the target
    while state.flow.level == 0 {
        tick(&mut state, &idle, &map, &assets, &tuning);
        if state.flow.level == 0 {
            assert!(state.flow.wipe_radius < WIPE_TARGET);
        }
    }
    assert_eq!(state.flow.wipe_radius, WIPE_TARGET);
    assert_eq!(state.flow.level, 1);
    // world was rebuilt at the new spawn point
    assert!(state.projectiles.is_empty());

    // the opening wipe hands control back to GameOn
    for _ in 0..60 {
        tick(&mut state, &idle, &map, &assets, &tuning);
        if state.flow.phase == Phase::GameOn {
            break;
        }
    }
    assert_eq!(state.flow.phase, Phase::GameOn);
    assert_eq!(state.flow.wipe_radius, 0.0);
}

#[test]
fn test_soft_reset_keeps_progress_hard_reset_clears_it() {
    let tuning = Tuning::default();
    let (mut state, assets, map) = playing_state(5, &tuning);
    state.flow.level = 1;
    state.player.lives = 1;

    tick(
        &mut state,
        &TickInput {
            reset: true,
            ..TickInput::default()
        },
        &map,
        &assets,
        &tuning,
    );
    assert_eq!(state.flow.level, 1);
    assert_eq!(state.player.lives, 1);
    assert_eq!(state.player.pos, tuning.spawn_point(1));

    tick(
        &mut state,
        &TickInput {
            hard_reset: true,
            ..TickInput::default()
        },
        &map,
        &assets,
        &tuning,
    );
    assert_eq!(state.flow.level, 0);
    assert_eq!(state.player.lives, LIVES_START);
}

#[test]
fn test_full_run_is_deterministic() {
    let tuning = Tuning::default();
    let (mut a, assets, map) = playing_state(77, &tuning);
    let (mut b, _, _) = playing_state(77, &tuning);
    assert_eq!(a, b);
    for i in 0u32..1200 {
        let input = TickInput {
            move_right: i % 300 < 200,
            move_left: i % 300 >= 250,
            jump: i % 71 == 0,
            dodge: i % 131 == 0,
            pause: i % 400 == 399,
            ..TickInput::default()
        };
        tick(&mut a, &input, &map, &assets, &tuning);
        tick(&mut b, &input, &map, &assets, &tuning);
    }
    assert_eq!(a, b);
    // and the serialized forms agree too
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_settings_never_touch_the_simulation() {
    // presentation toggles live outside GameState entirely; rendering with
    // any settings leaves the state untouched
    let tuning = Tuning::default();
    let (mut state, assets, map) = playing_state(8, &tuning);
    let idle = TickInput::default();
    for _ in 0..30 {
        tick(&mut state, &idle, &map, &assets, &tuning);
    }
    let before = state.clone();
    let mut frame = cinder_dash::render::Frame::new(
        cinder_dash::consts::VIEW_W,
        cinder_dash::consts::VIEW_H,
    );
    for settings in [
        Settings::default(),
        Settings {
            particles: false,
            screen_shake: false,
            show_hud: false,
            reduced_motion: true,
            max_particles: 0,
        },
    ] {
        cinder_dash::render::draw_scene(&mut frame, &state, &map, &assets, &settings);
    }
    assert_eq!(state, before);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The squash spring never leaves its clamp band whatever the input
    #[test]
    fn test_scale_stays_bounded(seed in 0u64..500, script in prop::collection::vec(0u8..32, 200)) {
        let tuning = Tuning::default();
        let (mut state, assets, map) = playing_state(seed, &tuning);
        for bits in script {
            let input = TickInput {
                move_left: bits & 1 != 0,
                move_right: bits & 2 != 0,
                jump: bits & 4 != 0,
                dodge: bits & 8 != 0,
                jump_held: bits & 16 != 0,
                ..TickInput::default()
            };
            tick(&mut state, &input, &map, &assets, &tuning);
            prop_assert!((SCALE_MIN..=SCALE_MAX).contains(&state.player.scale_y));
            prop_assert!(state.player.scale_x() >= 2.0 - SCALE_MAX);
        }
    }

    /// Dash charges and meter hold their invariants under arbitrary mashing
    #[test]
    fn test_dash_economy_bounds(seed in 0u64..500, script in prop::collection::vec(0u8..16, 300)) {
        let tuning = Tuning::default();
        let (mut state, assets, map) = playing_state(seed, &tuning);
        for bits in script {
            let input = TickInput {
                move_right: bits & 1 != 0,
                jump: bits & 2 != 0,
                dodge: bits & 4 != 0,
                ..TickInput::default()
            };
            tick(&mut state, &input, &map, &assets, &tuning);
            prop_assert!(state.player.dash_charges <= MAX_DASHES);
            prop_assert!(state.player.dash_meter <= DASH_METER_FULL);
            prop_assert!(state.player.dash.force >= 1.0);
            prop_assert!(state.player.knockback.force >= 1.0);
        }
    }
}
