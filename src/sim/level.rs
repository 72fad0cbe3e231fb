//! Level flow state machine
//!
//! Phase changes go through one explicit transition table so every legal
//! move is auditable in a single place. `LevelFlow` layers the mutable
//! campaign bookkeeping (level index, timer, wipe radius) on top and turns
//! per-tick observations into events for the table.

use serde::{Deserialize, Serialize};

use crate::Tuning;
use crate::consts::{WIPE_STEP, WIPE_TARGET};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    StartMenu,
    /// First level; plays normally but is the campaign's on-ramp
    Tutorial,
    GameOn,
    Pause,
    /// Pause imposed from outside (focus loss), leaves the same way
    ForcedPause,
    /// Circle wipe between levels
    Transition,
    Dead,
    Win,
}

impl Phase {
    /// Phases in which the world simulates
    pub fn active(self) -> bool {
        matches!(self, Phase::Tutorial | Phase::GameOn | Phase::Transition)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WipeStage {
    Closing,
    Opening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    /// Menu confirmed
    Advanced,
    TimerElapsed,
    WipeClosed { last_level: bool },
    WipeOpened,
    PlayerDied,
    PauseToggled,
    ForcePause,
    Released,
    SoftReset,
    HardReset,
}

/// What the caller must do after a transition lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    None,
    /// Level timer just armed
    Armed,
    BeginWipe,
    NextLevel,
    SoftReset,
    HardReset,
    Won,
    Lost,
}

/// The transition table. Returns the new phase and required action, or
/// `None` when the event does not apply to the current phase.
///
/// `resume` is the phase a pause should return to.
pub fn transition(phase: Phase, event: &LevelEvent, resume: Phase) -> Option<(Phase, FlowAction)> {
    use FlowAction as A;
    use LevelEvent as E;
    use Phase as P;

    match (phase, event) {
        (P::StartMenu, E::Advanced) => Some((P::Tutorial, A::HardReset)),

        (P::Tutorial | P::GameOn, E::TimerElapsed) => Some((P::Transition, A::BeginWipe)),
        (P::Transition, E::WipeClosed { last_level: false }) => Some((P::Transition, A::NextLevel)),
        (P::Transition, E::WipeClosed { last_level: true }) => Some((P::Win, A::Won)),
        (P::Transition, E::WipeOpened) => Some((P::GameOn, A::None)),

        (P::Tutorial | P::GameOn | P::Transition, E::PlayerDied) => Some((P::Dead, A::Lost)),

        (P::Tutorial | P::GameOn | P::Transition, E::PauseToggled) => Some((P::Pause, A::None)),
        (P::Pause, E::PauseToggled | E::Released) => Some((resume, A::None)),
        (P::Tutorial | P::GameOn | P::Transition, E::ForcePause) => Some((P::ForcedPause, A::None)),
        (P::ForcedPause, E::Released) => Some((resume, A::None)),

        // the flow substitutes the correct play phase after resetting
        (P::Tutorial | P::GameOn | P::Transition | P::Dead, E::SoftReset) => {
            Some((P::Tutorial, A::SoftReset))
        }
        (
            P::Tutorial | P::GameOn | P::Transition | P::Dead | P::Win | P::Pause | P::ForcedPause,
            E::HardReset,
        ) => Some((P::Tutorial, A::HardReset)),

        _ => None,
    }
}

/// Campaign position and the per-tick drivers of the transition table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFlow {
    pub phase: Phase,
    pub level: usize,
    /// Ticks since the level armed
    pub timer: u32,
    /// True once the player has crossed the level's start line
    pub run: bool,
    pub wipe_radius: f32,
    pub wipe_stage: WipeStage,
    resume: Phase,
}

impl Default for LevelFlow {
    fn default() -> Self {
        Self {
            phase: Phase::StartMenu,
            level: 0,
            timer: 0,
            run: false,
            wipe_radius: 0.0,
            wipe_stage: WipeStage::Opening,
            resume: Phase::Tutorial,
        }
    }
}

impl LevelFlow {
    /// Feed one event through the table and apply its bookkeeping.
    /// Events that do not apply return `FlowAction::None`.
    pub fn apply(&mut self, event: LevelEvent) -> FlowAction {
        let Some((next, action)) = transition(self.phase, &event, self.resume) else {
            return FlowAction::None;
        };
        if matches!(next, Phase::Pause | Phase::ForcedPause) && self.phase.active() {
            self.resume = self.phase;
        }
        self.phase = next;
        match action {
            FlowAction::BeginWipe => {
                self.wipe_radius = 0.0;
                self.wipe_stage = WipeStage::Closing;
            }
            FlowAction::NextLevel => {
                self.level += 1;
                self.timer = 0;
                self.run = false;
                self.wipe_stage = WipeStage::Opening;
            }
            FlowAction::SoftReset => {
                self.timer = 0;
                self.run = false;
                self.wipe_radius = 0.0;
                self.wipe_stage = WipeStage::Opening;
                self.phase = self.play_phase();
            }
            FlowAction::HardReset => {
                self.level = 0;
                self.timer = 0;
                self.run = false;
                self.wipe_radius = 0.0;
                self.wipe_stage = WipeStage::Opening;
                self.phase = Phase::Tutorial;
            }
            _ => {}
        }
        action
    }

    /// Per-tick drive: arming, the level timer, and the wipe animation.
    pub fn update(&mut self, player_dead: bool, player_x: f32, tuning: &Tuning) -> FlowAction {
        if player_dead && self.phase.active() {
            return self.apply(LevelEvent::PlayerDied);
        }

        match self.phase {
            Phase::Tutorial | Phase::GameOn => {
                if !self.run {
                    if player_x > tuning.start_line(self.level) {
                        self.run = true;
                        return FlowAction::Armed;
                    }
                    return FlowAction::None;
                }
                self.timer += 1;
                if self.timer > tuning.duration(self.level) {
                    return self.apply(LevelEvent::TimerElapsed);
                }
                FlowAction::None
            }
            Phase::Transition => match self.wipe_stage {
                WipeStage::Closing => {
                    self.wipe_radius = (self.wipe_radius + WIPE_STEP).min(WIPE_TARGET);
                    if self.wipe_radius >= WIPE_TARGET {
                        let last_level = self.level + 1 == tuning.level_count();
                        return self.apply(LevelEvent::WipeClosed { last_level });
                    }
                    FlowAction::None
                }
                WipeStage::Opening => {
                    self.wipe_radius -= WIPE_STEP;
                    if self.wipe_radius <= 0.0 {
                        self.wipe_radius = 0.0;
                        return self.apply(LevelEvent::WipeOpened);
                    }
                    FlowAction::None
                }
            },
            _ => FlowAction::None,
        }
    }

    /// The play phase matching the current level index
    pub fn play_phase(&self) -> Phase {
        if self.level == 0 {
            Phase::Tutorial
        } else {
            Phase::GameOn
        }
    }

    /// Projectile spawning runs only in an armed play phase
    pub fn spawning_active(&self) -> bool {
        matches!(self.phase, Phase::Tutorial | Phase::GameOn) && self.run
    }
}
