//! Sprite strips, pixel masks, and the sprite registry
//!
//! Hit detection is silhouette-based, so every sprite carries a pixel mask
//! generated from its alpha channel. Strips are looked up by `SpriteKind`;
//! a missing registration is an asset-wiring defect and panics immediately
//! rather than degrading into an invisible no-op.

use std::collections::HashMap;

use crate::{pack_rgba, unpack_rgba};

/// Bit silhouette of a sprite, one flag per pixel
#[derive(Debug, Clone)]
pub struct PixelMask {
    w: usize,
    h: usize,
    bits: Vec<bool>,
}

impl PixelMask {
    pub fn new(w: usize, h: usize, bits: Vec<bool>) -> Self {
        debug_assert_eq!(bits.len(), w * h);
        Self { w, h, bits }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    fn filled(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.w + x]
    }

    /// Silhouette overlap test against `other` placed at `offset` relative
    /// to this mask's top-left corner. Only the intersection of the two
    /// bounding boxes is scanned.
    pub fn overlaps(&self, other: &PixelMask, offset: (i32, i32)) -> bool {
        let x0 = offset.0.max(0);
        let y0 = offset.1.max(0);
        let x1 = (offset.0 + other.w as i32).min(self.w as i32);
        let y1 = (offset.1 + other.h as i32).min(self.h as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        for sy in y0..y1 {
            for sx in x0..x1 {
                if self.filled(sx as usize, sy as usize)
                    && other.filled((sx - offset.0) as usize, (sy - offset.1) as usize)
                {
                    return true;
                }
            }
        }
        false
    }
}

/// A small RGBA image plus its precomputed silhouette mask
#[derive(Debug, Clone)]
pub struct Sprite {
    w: usize,
    h: usize,
    pixels: Vec<u32>,
    mask: PixelMask,
}

impl Sprite {
    /// Build a sprite from packed RGBA pixels; the mask marks alpha > 0
    pub fn from_pixels(w: usize, h: usize, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), w * h);
        let bits = pixels.iter().map(|&p| unpack_rgba(p)[3] > 0).collect();
        Self {
            w,
            h,
            pixels,
            mask: PixelMask::new(w, h, bits),
        }
    }

    /// Per-pixel constructor: `f(x, y)` returns a packed RGBA value,
    /// with alpha 0 meaning transparent
    pub fn shade(w: usize, h: usize, f: impl Fn(usize, usize) -> u32) -> Self {
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                pixels.push(f(x, y));
            }
        }
        Self::from_pixels(w, h, pixels)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.w + x]
    }

    pub fn mask(&self) -> &PixelMask {
        &self.mask
    }
}

/// An ordered animation strip
#[derive(Debug, Clone)]
pub struct FrameStrip {
    frames: Vec<Sprite>,
}

impl FrameStrip {
    pub fn new(frames: Vec<Sprite>) -> Self {
        debug_assert!(!frames.is_empty(), "a strip needs at least one frame");
        Self { frames }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame by index, wrapping past the end
    #[inline]
    pub fn frame(&self, index: usize) -> &Sprite {
        &self.frames[index % self.frames.len()]
    }
}

/// Keys for every registered sprite strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// Soft white puff used by glow particles (recolored at draw time)
    Glow,
    Projectile,
    PlayerIdle,
    PlayerRun,
    PlayerJump,
    PlayerHurt,
}

/// Sprite registry built once at startup and passed by reference into
/// the simulation and the renderer
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    strips: HashMap<SpriteKind, FrameStrip>,
}

impl AssetLibrary {
    /// Empty registry; callers register strips decoded elsewhere
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: SpriteKind, strip: FrameStrip) {
        self.strips.insert(kind, strip);
    }

    /// Strip lookup. Panics on an unregistered kind: that is a content
    /// wiring fault, not a runtime gameplay condition.
    pub fn strip(&self, kind: SpriteKind) -> &FrameStrip {
        match self.strips.get(&kind) {
            Some(strip) => strip,
            None => panic!("no sprite strip registered for {kind:?}"),
        }
    }

    /// Procedurally authored strips covering every `SpriteKind`, so the
    /// crate runs headless without decoding image files
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        lib.register(SpriteKind::Glow, glow_strip());
        lib.register(SpriteKind::Projectile, projectile_strip());
        lib.register(SpriteKind::PlayerIdle, player_strip(&[(0, 0), (0, 1)]));
        lib.register(
            SpriteKind::PlayerRun,
            player_strip(&[(1, 0), (0, 1), (-1, 0), (0, 1)]),
        );
        lib.register(SpriteKind::PlayerJump, player_strip(&[(0, -1)]));
        lib.register(SpriteKind::PlayerHurt, hurt_strip());
        lib
    }
}

/// Seven shrinking white discs; the final frames fade the dying puff out
fn glow_strip() -> FrameStrip {
    let frames = (0..7)
        .map(|i| {
            let r = 5.5 - i as f32 * 0.65;
            disc(12, r, |d| {
                let soft = (1.0 - d / r.max(0.1)).clamp(0.0, 1.0);
                let a = (140.0 + soft * 115.0) as u8;
                pack_rgba(255, 255, 255, a)
            })
        })
        .collect();
    FrameStrip::new(frames)
}

/// Two-frame ember shot, 13px like the tile grid's two-thirds cell
fn projectile_strip() -> FrameStrip {
    let frames = (0..2)
        .map(|i| {
            disc(13, 6.0, |d| {
                if d < 2.5 {
                    // hot core, highlight swaps side per frame
                    if i == 0 {
                        pack_rgba(255, 96, 64, 255)
                    } else {
                        pack_rgba(255, 128, 64, 255)
                    }
                } else if d < 5.0 {
                    pack_rgba(150, 24, 24, 255)
                } else {
                    pack_rgba(66, 10, 14, 255)
                }
            })
        })
        .collect();
    FrameStrip::new(frames)
}

/// Body frames offset by (lean, bob) pixels per animation frame
fn player_strip(offsets: &[(i32, i32)]) -> FrameStrip {
    let frames = offsets
        .iter()
        .map(|&(lean, bob)| body_frame(lean, bob, [226, 209, 167]))
        .collect();
    FrameStrip::new(frames)
}

fn hurt_strip() -> FrameStrip {
    FrameStrip::new(vec![body_frame(0, 1, [235, 120, 104])])
}

/// 20x20 rounded body with eye pixels; the silhouette is what hit
/// detection actually tests
fn body_frame(lean: i32, bob: i32, tint: crate::Rgb) -> Sprite {
    Sprite::shade(20, 20, move |x, y| {
        let bx = x as i32 - lean;
        let by = y as i32 - bob;
        let inside = (3..17).contains(&bx) && (2..19).contains(&by);
        // clip the four corners for a rounded silhouette
        let corner = (bx <= 4 || bx >= 15) && (by <= 3 || by >= 17);
        if !inside || corner {
            return 0;
        }
        let eye = by == 7 && (bx == 7 || bx == 12);
        if eye {
            pack_rgba(24, 12, 16, 255)
        } else if by == 18 {
            pack_rgba(tint[0] / 2, tint[1] / 2, tint[2] / 2, 255)
        } else {
            pack_rgba(tint[0], tint[1], tint[2], 255)
        }
    })
}

/// Square sprite shaded by distance from its center
fn disc(size: usize, radius: f32, paint: impl Fn(f32) -> u32) -> Sprite {
    let c = (size as f32 - 1.0) * 0.5;
    Sprite::shade(size, size, move |x, y| {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
        if d <= radius { paint(d) } else { 0 }
    })
}
