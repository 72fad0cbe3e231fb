//! Silhouette hit detection and the consequences of getting hit
//!
//! Projectile-versus-player contact is tested pixel mask against pixel
//! mask, so grazing a transparent corner of either sprite never counts.
//! A hit burns a life, opens the hurt window, and knocks the player back;
//! losing the last life latches the one-shot death sequence.

use rand_pcg::Pcg32;

use super::effects::Effects;
use super::player::{Behavior, Player};
use super::state::Projectile;
use crate::assets::AssetLibrary;
use crate::assets::SpriteKind;
use crate::consts::{HURT_TICKS, KNOCKBACK_FORCE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitOutcome {
    pub hit: bool,
    /// The death sequence latched this tick
    pub died: bool,
}

/// Test every projectile against the player's current silhouette and
/// apply hits. Contacts during a dash or the hurt window are ignored and
/// the projectile flies on.
pub fn resolve_hits(
    player: &mut Player,
    projectiles: &mut Vec<Projectile>,
    effects: &mut Effects,
    assets: &AssetLibrary,
    rng: &mut Pcg32,
) -> HitOutcome {
    let mut outcome = HitOutcome::default();
    if player.dead {
        return outcome;
    }

    let player_strip = assets.strip(player.state.sprite());
    let player_mask = player_strip.frame(player.anim_frame as usize).mask();
    let shot_strip = assets.strip(SpriteKind::Projectile);

    let mut i = 0;
    while i < projectiles.len() {
        let shot = projectiles[i];
        let mask = shot_strip.frame(shot.frame as usize).mask();
        let top_left = shot.pos
            - glam::Vec2::new(mask.width() as f32 * 0.5, mask.height() as f32 * 0.5);
        let offset = (
            (top_left.x - player.pos.x).round() as i32,
            (top_left.y - player.pos.y).round() as i32,
        );
        if !player_mask.overlaps(mask, offset) {
            i += 1;
            continue;
        }

        // invulnerable contact: the shot passes through
        if player.dash.active() || player.hurt_timer > 0 {
            i += 1;
            continue;
        }

        apply_hit(player, &shot, effects, rng);
        outcome.hit = true;
        projectiles.swap_remove(i);
    }

    if player.lives == 0 && !player.dead {
        player.dead = true;
        effects.death_burst(player.center(), rng);
        outcome.died = true;
    }
    outcome
}

fn apply_hit(player: &mut Player, shot: &Projectile, effects: &mut Effects, rng: &mut Pcg32) {
    player.lives = player.lives.saturating_sub(1);
    player.hurt_timer = HURT_TICKS;
    player.state = Behavior::Hurt;
    // knocked along the shot's travel; a vertical shot pushes backwards
    let dir = if shot.vel.x != 0.0 {
        shot.vel.x.signum()
    } else {
        -player.facing.sign()
    };
    player.knockback.trigger(KNOCKBACK_FORCE, dir);
    effects.hit_burst(player.center(), dir, rng);
}
