//! Ephemeral effect families
//!
//! Four independent families (glow particles, sparks, circle particles,
//! shockwave rings) plus a delayed-spawn queue. Every family is a plain Vec
//! pruned with `retain_mut`, so removal during the update pass cannot skip
//! or double-process an element. Nothing outside the tick pipeline mutates
//! these collections.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Rgb;
use crate::tilemap::TileMap;

/// Pale ember tone shared by sparks and shockwave rings
pub const SPARK_PALE: Rgb = [247, 237, 186];
const BLOOD_RED: Rgb = [146, 20, 24];

/// Five-stage temperature ramp walked by fire particles as they age
const FIRE_RAMP: [Rgb; 5] = [
    [255, 244, 210],
    [255, 200, 96],
    [255, 132, 48],
    [196, 60, 24],
    [96, 24, 16],
];
/// Ticks spent on each ramp stage
const FIRE_STAGE_TICKS: u32 = 6;
/// Age at which a fire particle blooms wider, once
const FIRE_BLOOM_AGE: u32 = 18;
const FIRE_BLOOM: f32 = 1.5;

const PARTICLE_GRAVITY: f32 = 0.15;
const BOUNCE_DAMP: f32 = 0.7;

/// A soft additive puff walking a fixed animation strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlowParticle {
    pub pos: Vec2,
    /// Constant per-tick motion, no acceleration
    pub motion: Vec2,
    /// Fractional strip index
    pub frame: f32,
    pub decay: f32,
    /// Recolors the white strip at draw time
    pub color: Option<Rgb>,
}

impl GlowParticle {
    /// Advance one tick; false once the strip has fully run out
    pub fn update(&mut self, strip_len: usize) -> bool {
        self.frame += self.decay;
        self.pos += self.motion;
        self.frame < (strip_len + 1) as f32
    }

    /// Rendering is suppressed on the final overflow frame
    pub fn visible(&self, strip_len: usize) -> bool {
        (self.frame.floor() as usize) < strip_len
    }
}

/// A directional quad billboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub width: f32,
    /// Subtracted from width each tick
    pub width_decay: f32,
    /// Multiplies speed each tick, < 1
    pub speed_decay: f32,
    pub length: f32,
    /// Multiplies length each tick
    pub length_decay: f32,
    pub color: Rgb,
}

impl Spark {
    /// Advance one tick; false once the width has decayed away
    pub fn update(&mut self) -> bool {
        self.pos += Vec2::new(self.angle.cos(), self.angle.sin()) * self.speed;
        self.width -= self.width_decay;
        self.speed *= self.speed_decay;
        self.length *= self.length_decay;
        self.width > 0.0
    }

    /// Corners of the billboard: tips along the travel angle, flanks
    /// perpendicular to it
    pub fn quad(&self) -> [Vec2; 4] {
        let along = Vec2::new(self.angle.cos(), self.angle.sin());
        let across = Vec2::new(-along.y, along.x);
        [
            self.pos + along * self.length,
            self.pos + across * self.width,
            self.pos - along * self.length,
            self.pos - across * self.width,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircleKind {
    /// Bounces off tiles, falls under gravity
    Blood,
    /// Free-flying, walks the temperature ramp
    Fire,
    /// Bounces like blood and sheds a fire trail every tick
    Fireball,
}

/// A filled circle with per-kind physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleParticle {
    pub kind: CircleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    pub radius: f32,
    pub decay: f32,
    pub age: u32,
}

impl CircleParticle {
    /// Advance one tick; false once the radius has decayed below 1
    pub fn update(&mut self, map: &TileMap) -> bool {
        match self.kind {
            CircleKind::Blood | CircleKind::Fireball => {
                // each axis integrates and reflects independently
                self.pos.x += self.vel.x;
                if map.is_solid(self.pos) {
                    self.pos.x -= self.vel.x;
                    self.vel.x *= -BOUNCE_DAMP;
                }
                self.pos.y += self.vel.y;
                if map.is_solid(self.pos) {
                    self.pos.y -= self.vel.y;
                    self.vel.y *= -BOUNCE_DAMP;
                }
                self.vel.y += PARTICLE_GRAVITY;
            }
            CircleKind::Fire => {
                self.pos += self.vel;
                let stage = ((self.age / FIRE_STAGE_TICKS) as usize).min(FIRE_RAMP.len() - 1);
                self.color = FIRE_RAMP[stage];
                // one-shot bloom so decay always terminates the particle
                if self.age == FIRE_BLOOM_AGE {
                    self.radius += FIRE_BLOOM;
                }
            }
        }
        self.age += 1;
        self.radius -= self.decay;
        self.radius >= 1.0
    }
}

/// An expanding ring outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shockwave {
    pub pos: Vec2,
    pub radius: f32,
    /// Per-tick radius increase
    pub growth: f32,
    /// Per-tick radius pullback, kept below `growth`
    pub shrink: f32,
    pub width: f32,
    /// Multiplies width each tick
    pub width_decay: f32,
    pub color: Rgb,
}

impl Shockwave {
    pub fn update(&mut self) -> bool {
        self.radius += self.growth;
        self.width *= self.width_decay;
        self.radius -= self.shrink;
        self.width >= 1.0
    }
}

/// All ephemeral collections, owned by the tick pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub glows: Vec<GlowParticle>,
    pub sparks: Vec<Spark>,
    pub circles: Vec<CircleParticle>,
    pub shockwaves: Vec<Shockwave>,
    /// Circle particles waiting out a spawn delay, in ticks
    pending: Vec<(u32, CircleParticle)>,
}

impl Effects {
    /// Advance every family one tick and prune the dead
    pub fn update(&mut self, map: &TileMap, glow_strip_len: usize, rng: &mut Pcg32) {
        // promote pending spawns whose delay has run out
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].0 == 0 {
                let (_, particle) = self.pending.swap_remove(i);
                self.circles.push(particle);
            } else {
                self.pending[i].0 -= 1;
                i += 1;
            }
        }

        self.glows.retain_mut(|g| g.update(glow_strip_len));
        self.sparks.retain_mut(|s| s.update());

        // fireballs shed a trail; collected aside so the pass stays a
        // single retain over a stable collection
        let mut trails = Vec::new();
        self.circles.retain_mut(|c| {
            if c.kind == CircleKind::Fireball {
                trails.push(CircleParticle {
                    kind: CircleKind::Fire,
                    pos: c.pos,
                    vel: Vec2::new(rng.random_range(-0.3..0.3), rng.random_range(-0.5..0.0)),
                    color: FIRE_RAMP[0],
                    radius: rng.random_range(2.0..3.0),
                    decay: 0.12,
                    age: 0,
                });
            }
            c.update(map)
        });
        self.circles.append(&mut trails);

        self.shockwaves.retain_mut(|w| w.update());
    }

    pub fn clear(&mut self) {
        self.glows.clear();
        self.sparks.clear();
        self.circles.clear();
        self.shockwaves.clear();
        self.pending.clear();
    }

    /// Live object count across all families, for logging
    pub fn total(&self) -> usize {
        self.glows.len() + self.sparks.len() + self.circles.len() + self.shockwaves.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Blood spray plus a fire cone biased along the knockback direction
    pub fn hit_burst(&mut self, center: Vec2, dir: f32, rng: &mut Pcg32) {
        for _ in 0..5 {
            self.circles.push(CircleParticle {
                kind: CircleKind::Blood,
                pos: center,
                vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-3.5..-1.0)),
                color: BLOOD_RED,
                radius: rng.random_range(3.0..5.0),
                decay: 0.08,
                age: 0,
            });
        }
        for _ in 0..10 {
            self.circles.push(CircleParticle {
                kind: CircleKind::Fire,
                pos: center,
                vel: Vec2::new(dir * rng.random_range(0.8..3.0), rng.random_range(-1.2..1.2)),
                color: FIRE_RAMP[0],
                radius: rng.random_range(2.5..4.0),
                decay: 0.1,
                age: 0,
            });
        }
        self.shockwaves.push(Shockwave {
            pos: center,
            radius: 4.0,
            growth: 2.4,
            shrink: 0.3,
            width: 5.0,
            width_decay: 0.9,
            color: SPARK_PALE,
        });
    }

    /// One-shot death sequence: radial fireballs, staggered fire, blood,
    /// sparks, and a wide ring
    pub fn death_burst(&mut self, center: Vec2, rng: &mut Pcg32) {
        for i in 0..18 {
            let ang = i as f32 / 18.0 * TAU + rng.random_range(-0.2..0.2);
            let speed = rng.random_range(1.6..3.6);
            self.circles.push(CircleParticle {
                kind: CircleKind::Fireball,
                pos: center,
                vel: Vec2::new(ang.cos(), ang.sin()) * speed,
                color: FIRE_RAMP[1],
                radius: rng.random_range(3.0..5.0),
                decay: 0.045,
                age: 0,
            });
        }
        for _ in 0..30 {
            let delay = rng.random_range(2..45);
            self.pending.push((
                delay,
                CircleParticle {
                    kind: CircleKind::Fire,
                    pos: center
                        + Vec2::new(rng.random_range(-6.0..6.0), rng.random_range(-6.0..6.0)),
                    vel: Vec2::new(rng.random_range(-0.8..0.8), rng.random_range(-1.6..-0.2)),
                    color: FIRE_RAMP[0],
                    radius: rng.random_range(2.5..4.5),
                    decay: 0.09,
                    age: 0,
                },
            ));
        }
        for _ in 0..30 {
            self.circles.push(CircleParticle {
                kind: CircleKind::Blood,
                pos: center,
                vel: Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(-5.0..-0.5)),
                color: BLOOD_RED,
                radius: rng.random_range(2.5..5.0),
                decay: 0.07,
                age: 0,
            });
        }
        for _ in 0..18 {
            self.sparks.push(Spark {
                pos: center,
                angle: rng.random_range(0.0..TAU),
                speed: rng.random_range(8.0..11.0),
                width: rng.random_range(3.0..5.0),
                width_decay: 0.12,
                speed_decay: 0.9,
                length: rng.random_range(10.0..12.0),
                length_decay: 0.97,
                color: SPARK_PALE,
            });
        }
        self.shockwaves.push(Shockwave {
            pos: center,
            radius: 6.0,
            growth: 3.6,
            shrink: 0.4,
            width: 8.0,
            width_decay: 0.92,
            color: SPARK_PALE,
        });
    }

    /// Each torch anchor has a 1-in-6 chance per tick of shedding one
    /// white ember puff
    pub fn emit_torches(&mut self, anchors: &[Vec2], rng: &mut Pcg32) {
        for &anchor in anchors {
            if rng.random_range(0..6) == 0 {
                self.glows.push(GlowParticle {
                    pos: anchor
                        + Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0)),
                    motion: Vec2::new(
                        rng.random_range(-0.14..0.12),
                        rng.random_range(-0.7..-0.4),
                    ),
                    frame: 3.0 + rng.random_range(0.0..2.0),
                    decay: 0.02,
                    color: Some([255, 255, 255]),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn open_map() -> TileMap {
        TileMap::from_rows(&["........", "........", "........", "########"])
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_spark_width_four_lives_exactly_34_ticks() {
        // decays held neutral so only the width subtraction acts
        let mut spark = Spark {
            pos: Vec2::ZERO,
            angle: 0.0,
            speed: 0.0,
            width: 4.0,
            width_decay: 0.12,
            speed_decay: 1.0,
            length: 10.0,
            length_decay: 1.0,
            color: SPARK_PALE,
        };
        let mut ticks = 0;
        while spark.update() {
            ticks += 1;
        }
        // the removing tick counts too
        assert_eq!(ticks + 1, 34);
    }

    #[test]
    fn test_glow_lifecycle_and_overflow_suppression() {
        let strip_len = 7;
        let mut glow = GlowParticle {
            pos: Vec2::ZERO,
            motion: Vec2::new(0.5, -0.5),
            frame: 6.5,
            decay: 0.2,
            color: None,
        };
        assert!(glow.visible(strip_len));
        // frame 6.7 -> 6.9 -> 7.1: alive but suppressed past the strip end
        assert!(glow.update(strip_len));
        assert!(glow.update(strip_len));
        assert!(glow.update(strip_len));
        assert!(!glow.visible(strip_len));
        // dies once frame passes strip_len + 1
        let mut alive = true;
        for _ in 0..6 {
            alive = glow.update(strip_len);
        }
        assert!(!alive);
    }

    #[test]
    fn test_glow_motion_is_constant() {
        let mut glow = GlowParticle {
            pos: Vec2::ZERO,
            motion: Vec2::new(0.1, -0.4),
            frame: 0.0,
            decay: 0.02,
            color: None,
        };
        for _ in 0..10 {
            glow.update(7);
        }
        assert!((glow.pos.x - 1.0).abs() < 1e-4);
        assert!((glow.pos.y + 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_blood_bounces_and_damps() {
        let map = open_map();
        let mut blood = CircleParticle {
            kind: CircleKind::Blood,
            pos: Vec2::new(50.0, 55.0),
            vel: Vec2::new(0.0, 8.0),
            color: BLOOD_RED,
            radius: 5.0,
            decay: 0.0,
            age: 0,
        };
        // floor starts at y = 60; the step into it reflects and damps
        assert!(blood.update(&map));
        assert!(blood.vel.y < 0.0);
        assert!((blood.vel.y.abs() - (8.0 * BOUNCE_DAMP - PARTICLE_GRAVITY)).abs() < 1e-4);
        assert_eq!(blood.pos.y, 55.0);
    }

    #[test]
    fn test_fire_walks_ramp_and_blooms_once() {
        let map = open_map();
        let mut fire = CircleParticle {
            kind: CircleKind::Fire,
            pos: Vec2::new(40.0, 20.0),
            vel: Vec2::ZERO,
            color: FIRE_RAMP[0],
            radius: 10.0,
            decay: 0.05,
            age: 0,
        };
        let mut bloomed = 0;
        let mut last_radius = fire.radius;
        for _ in 0..40 {
            fire.update(&map);
            if fire.radius > last_radius {
                bloomed += 1;
            }
            last_radius = fire.radius;
        }
        assert_eq!(bloomed, 1);
        assert_eq!(fire.color, FIRE_RAMP[4]);
    }

    #[test]
    fn test_fire_never_immortal() {
        let map = open_map();
        let mut fire = CircleParticle {
            kind: CircleKind::Fire,
            pos: Vec2::new(40.0, 20.0),
            vel: Vec2::ZERO,
            color: FIRE_RAMP[0],
            radius: 4.0,
            decay: 0.09,
            age: 0,
        };
        let mut alive = true;
        for _ in 0..200 {
            alive = fire.update(&map);
            if !alive {
                break;
            }
        }
        assert!(!alive);
    }

    #[test]
    fn test_fireball_sheds_a_trail_every_tick() {
        let map = open_map();
        let mut effects = Effects::default();
        let mut rng = rng();
        effects.circles.push(CircleParticle {
            kind: CircleKind::Fireball,
            pos: Vec2::new(40.0, 20.0),
            vel: Vec2::ZERO,
            color: FIRE_RAMP[1],
            radius: 20.0,
            decay: 0.0,
            age: 0,
        });
        effects.update(&map, 7, &mut rng);
        effects.update(&map, 7, &mut rng);
        let fires = effects
            .circles
            .iter()
            .filter(|c| c.kind == CircleKind::Fire)
            .count();
        assert_eq!(fires, 2);
    }

    #[test]
    fn test_pending_spawns_promote_after_delay() {
        let map = open_map();
        let mut effects = Effects::default();
        let mut rng = rng();
        effects.pending.push((
            3,
            CircleParticle {
                kind: CircleKind::Fire,
                pos: Vec2::new(40.0, 20.0),
                vel: Vec2::ZERO,
                color: FIRE_RAMP[0],
                radius: 6.0,
                decay: 0.0,
                age: 0,
            },
        ));
        for _ in 0..3 {
            effects.update(&map, 7, &mut rng);
            assert!(effects.circles.is_empty());
        }
        effects.update(&map, 7, &mut rng);
        assert_eq!(effects.circles.len(), 1);
        assert_eq!(effects.pending_len(), 0);
    }

    #[test]
    fn test_death_burst_counts() {
        let mut effects = Effects::default();
        let mut rng = rng();
        effects.death_burst(Vec2::new(50.0, 50.0), &mut rng);
        assert_eq!(effects.circles.len(), 18 + 30);
        assert_eq!(effects.pending_len(), 30);
        assert_eq!(effects.sparks.len(), 18);
        assert_eq!(effects.shockwaves.len(), 1);
    }

    #[test]
    fn test_shockwave_net_growth_and_fade() {
        let mut wave = Shockwave {
            pos: Vec2::ZERO,
            radius: 4.0,
            growth: 2.4,
            shrink: 0.3,
            width: 5.0,
            width_decay: 0.9,
            color: SPARK_PALE,
        };
        let mut ticks = 0;
        let mut last_radius = wave.radius;
        while wave.update() {
            assert!(wave.radius > last_radius);
            last_radius = wave.radius;
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!(wave.width < 1.0);
    }

    #[test]
    fn test_torch_emission_rate() {
        let mut effects = Effects::default();
        let mut rng = rng();
        let anchors = [Vec2::new(70.0, 24.0)];
        for _ in 0..600 {
            effects.emit_torches(&anchors, &mut rng);
        }
        // 1-in-6 chance per tick; allow a generous band around 100
        assert!((60..160).contains(&effects.glows.len()));
    }
}
