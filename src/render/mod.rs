//! Software rendering
//!
//! The frame is a plain pixel buffer and the composer is a pure function
//! of simulation state, so rendering can run anywhere a `&[u8]` can be
//! displayed and never feeds back into the simulation.

pub mod draw;
pub mod frame;

pub use draw::draw_scene;
pub use frame::Frame;
