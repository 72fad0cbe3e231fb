//! Data-driven level balance
//!
//! One struct covers the full campaign: per-level timers, arming lines,
//! spawn cadences, and spawn points. It deserializes from JSON so balance
//! passes never touch code. Accessors panic past the authored level count;
//! asking for level 7 of a 4-level campaign is a content fault.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Level length in ticks
    #[serde(default = "default_durations")]
    durations: Vec<u32>,
    /// Player x past which the level timer arms
    #[serde(default = "default_start_lines")]
    start_lines: Vec<f32>,
    /// One single shot rolled per this many ticks, on average
    #[serde(default = "default_spawn_every")]
    spawn_every: Vec<u32>,
    /// One edge volley rolled per this many ticks, on average
    #[serde(default = "default_volley_every")]
    volley_every: Vec<u32>,
    /// Ticks after a (re)start during which nothing spawns
    #[serde(default = "default_grace_ticks")]
    pub grace_ticks: u32,
    #[serde(default = "default_spawn_points")]
    spawn_points: Vec<Vec2>,
}

fn default_durations() -> Vec<u32> {
    vec![200, 400, 500, 600]
}

fn default_start_lines() -> Vec<f32> {
    vec![120.0, 240.0, 200.0, 240.0]
}

fn default_spawn_every() -> Vec<u32> {
    vec![240, 120, 90, 70]
}

fn default_volley_every() -> Vec<u32> {
    vec![1200, 700, 550, 420]
}

fn default_grace_ticks() -> u32 {
    90
}

fn default_spawn_points() -> Vec<Vec2> {
    vec![
        Vec2::new(30.0, -10.0),
        Vec2::new(150.0, -10.0),
        Vec2::new(30.0, -10.0),
        Vec2::new(150.0, -10.0),
    ]
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            durations: default_durations(),
            start_lines: default_start_lines(),
            spawn_every: default_spawn_every(),
            volley_every: default_volley_every(),
            grace_ticks: default_grace_ticks(),
            spawn_points: default_spawn_points(),
        }
    }
}

impl Tuning {
    pub fn level_count(&self) -> usize {
        self.durations.len()
    }

    pub fn duration(&self, level: usize) -> u32 {
        self.durations
            .get(level)
            .copied()
            .unwrap_or_else(|| past_campaign(level))
    }

    pub fn start_line(&self, level: usize) -> f32 {
        self.start_lines
            .get(level)
            .copied()
            .unwrap_or_else(|| past_campaign(level))
    }

    pub fn spawn_every(&self, level: usize) -> u32 {
        self.spawn_every
            .get(level)
            .copied()
            .unwrap_or_else(|| past_campaign(level))
    }

    pub fn volley_every(&self, level: usize) -> u32 {
        self.volley_every
            .get(level)
            .copied()
            .unwrap_or_else(|| past_campaign(level))
    }

    pub fn spawn_point(&self, level: usize) -> Vec2 {
        self.spawn_points
            .get(level)
            .copied()
            .unwrap_or_else(|| past_campaign(level))
    }
}

fn past_campaign<T>(level: usize) -> T {
    panic!("level {level} is past the authored campaign")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let tuning = Tuning::default();
        let n = tuning.level_count();
        for level in 0..n {
            assert!(tuning.duration(level) > 0);
            assert!(tuning.spawn_every(level) > 0);
            assert!(tuning.volley_every(level) > tuning.spawn_every(level));
            let _ = tuning.start_line(level);
            let _ = tuning.spawn_point(level);
        }
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let text = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&text).unwrap();
        assert_eq!(back, tuning);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"durations": [100, 100]}"#).unwrap();
        assert_eq!(tuning.duration(0), 100);
        assert_eq!(tuning.grace_ticks, 90);
        assert_eq!(tuning.start_line(1), 240.0);
    }

    #[test]
    #[should_panic(expected = "past the authored campaign")]
    fn test_past_campaign_is_fatal() {
        let tuning = Tuning::default();
        let _ = tuning.duration(99);
    }
}
