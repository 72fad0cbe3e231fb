//! Deterministic game simulation
//!
//! Everything under this module is pure state transformation: no clocks,
//! no I/O, no global RNG. The only sources of change are `tick` calls and
//! the inputs handed to them, so a seed plus an input script replays the
//! exact same game. Presentation (settings, rendering) stays outside.

pub mod collision;
pub mod combat;
pub mod effects;
pub mod level;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::CollisionFlags;
pub use combat::HitOutcome;
pub use effects::Effects;
pub use level::{FlowAction, LevelEvent, LevelFlow, Phase, WipeStage};
pub use player::{Behavior, Facing, Impulse, Player};
pub use spawner::Edge;
pub use state::{GameState, Projectile, TickInput};
pub use tick::{tick, view_rect};
