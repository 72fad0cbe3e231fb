//! Axis-separated tile collision resolution
//!
//! Bodies move one axis at a time against the candidate rects handed back by
//! the tile map, so a horizontal correction can never steal a vertical
//! contact. Callers get back which sides were blocked and react to those
//! flags (ground reset, head bonk, hard-landing squash).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// Which sides of a body were blocked during one integration step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Move `body` by `vel` against `solids`, clamping one axis at a time.
///
/// Horizontal displacement resolves first, then vertical, matching the
/// movement order the physics constants were tuned against.
pub fn move_and_collide(body: &mut Rect, vel: Vec2, solids: &[Rect]) -> CollisionFlags {
    let mut flags = CollisionFlags::default();

    body.pos.x += vel.x;
    for solid in solids {
        if body.intersects(solid) {
            if vel.x > 0.0 {
                body.pos.x = solid.left() - body.size.x;
                flags.right = true;
            } else if vel.x < 0.0 {
                body.pos.x = solid.right();
                flags.left = true;
            }
        }
    }

    body.pos.y += vel.y;
    for solid in solids {
        if body.intersects(solid) {
            if vel.y > 0.0 {
                body.pos.y = solid.top() - body.size.y;
                flags.down = true;
            } else if vel.y < 0.0 {
                body.pos.y = solid.bottom();
                flags.up = true;
            }
        }
    }

    flags
}
