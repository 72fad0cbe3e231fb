//! Wall-clock to logical-tick conversion
//!
//! Tuned constants (gravity step, decay rates, squash spring) are all
//! per-tick values, so elapsed real time must be folded into whole 60 Hz
//! ticks before the simulation runs. Leftover time carries to the next frame.

use crate::consts::{MAX_TICKS_PER_FRAME, TICK_DT};

/// Fixed timestep accumulator decoupling tick cadence from frame rate
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    accumulator: f32,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame's elapsed seconds in; returns how many ticks to run.
    ///
    /// Capped at `MAX_TICKS_PER_FRAME` so a long stall cannot snowball into
    /// an ever-growing backlog of catch-up ticks.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(TICK_DT * MAX_TICKS_PER_FRAME as f32);
        let ticks = (self.accumulator / TICK_DT) as u32;
        self.accumulator -= ticks as f32 * TICK_DT;
        ticks
    }

    /// Fraction of a tick accumulated but not yet consumed, in [0, 1)
    pub fn remainder(&self) -> f32 {
        self.accumulator / TICK_DT
    }
}
