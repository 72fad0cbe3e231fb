//! Software pixel frame
//!
//! A flat `Vec<u32>` of packed RGBA pixels plus the primitives the scene
//! composer needs: alpha-over blending, sprite blits (scaled, flipped,
//! tinted), filled circles, rings, and scanline-filled quads. Every write
//! is bounds-checked, so callers draw partially off-frame freely.

use glam::Vec2;

use crate::assets::Sprite;
use crate::{Rgb, pack_rgba, unpack_rgba};

pub struct Frame {
    w: usize,
    h: usize,
    pixels: Vec<u32>,
}

impl Frame {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            pixels: vec![0; w * h],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    pub fn clear(&mut self, color: Rgb) {
        let p = pack_rgba(color[0], color[1], color[2], 255);
        self.pixels.fill(p);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.w + x]
    }

    /// Raw pixel bytes in row-major order, for handing to a display layer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Alpha-over blend one pixel; off-frame writes are dropped
    pub fn set(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return;
        }
        let [r, g, b, a] = unpack_rgba(color);
        let idx = y as usize * self.w + x as usize;
        match a {
            0 => {}
            255 => self.pixels[idx] = color,
            _ => {
                let [dr, dg, db, _] = unpack_rgba(self.pixels[idx]);
                let a = a as u32;
                let inv = 255 - a;
                let blend = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv) / 255) as u8;
                self.pixels[idx] = pack_rgba(blend(r, dr), blend(g, dg), blend(b, db), 255);
            }
        }
    }

    /// Nearest-neighbor scaled blit centered on `center`, optionally
    /// mirrored horizontally
    pub fn blit_scaled(&mut self, sprite: &Sprite, center: Vec2, scale: Vec2, flip_x: bool) {
        let dw = (sprite.width() as f32 * scale.x).round().max(1.0) as i32;
        let dh = (sprite.height() as f32 * scale.y).round().max(1.0) as i32;
        let ox = (center.x - dw as f32 * 0.5).round() as i32;
        let oy = (center.y - dh as f32 * 0.5).round() as i32;
        for dy in 0..dh {
            let sy = ((dy as f32 + 0.5) / dh as f32 * sprite.height() as f32) as usize;
            let sy = sy.min(sprite.height() - 1);
            for dx in 0..dw {
                let mut sx = ((dx as f32 + 0.5) / dw as f32 * sprite.width() as f32) as usize;
                sx = sx.min(sprite.width() - 1);
                if flip_x {
                    sx = sprite.width() - 1 - sx;
                }
                self.set(ox + dx, oy + dy, sprite.pixel(sx, sy));
            }
        }
    }

    /// Centered blit with an optional multiplicative tint
    pub fn blit_tinted(&mut self, sprite: &Sprite, center: Vec2, tint: Option<Rgb>) {
        let ox = (center.x - sprite.width() as f32 * 0.5).round() as i32;
        let oy = (center.y - sprite.height() as f32 * 0.5).round() as i32;
        for sy in 0..sprite.height() {
            for sx in 0..sprite.width() {
                let mut p = sprite.pixel(sx, sy);
                if let Some(t) = tint {
                    let [r, g, b, a] = unpack_rgba(p);
                    let mul = |c: u8, m: u8| ((c as u32 * m as u32) / 255) as u8;
                    p = pack_rgba(mul(r, t[0]), mul(g, t[1]), mul(b, t[2]), a);
                }
                self.set(ox + sx as i32, oy + sy as i32, p);
            }
        }
    }

    pub fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: u32) {
        let x0 = pos.x.round() as i32;
        let y0 = pos.y.round() as i32;
        let x1 = (pos.x + size.x).round() as i32;
        let y1 = (pos.y + size.y).round() as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, color);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: u32) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let x0 = (center.x - radius).floor() as i32;
        let x1 = (center.x + radius).ceil() as i32;
        let y0 = (center.y - radius).floor() as i32;
        let y1 = (center.y + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Circle outline of the given stroke width
    pub fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: u32) {
        if radius <= 0.0 || width <= 0.0 {
            return;
        }
        let outer = radius + width * 0.5;
        let inner = (radius - width * 0.5).max(0.0);
        let o2 = outer * outer;
        let i2 = inner * inner;
        let x0 = (center.x - outer).floor() as i32;
        let x1 = (center.x + outer).ceil() as i32;
        let y0 = (center.y - outer).floor() as i32;
        let y1 = (center.y + outer).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                let d2 = dx * dx + dy * dy;
                if d2 <= o2 && d2 >= i2 {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Scanline fill of an arbitrary (convex or concave) quad
    pub fn fill_quad(&mut self, corners: [Vec2; 4], color: u32) {
        let y_min = corners.iter().map(|c| c.y).fold(f32::INFINITY, f32::min);
        let y_max = corners
            .iter()
            .map(|c| c.y)
            .fold(f32::NEG_INFINITY, f32::max);
        let y0 = y_min.floor() as i32;
        let y1 = y_max.ceil() as i32;

        for y in y0..=y1 {
            let scan = y as f32 + 0.5;
            let mut xs: Vec<f32> = Vec::with_capacity(4);
            for i in 0..4 {
                let a = corners[i];
                let b = corners[(i + 1) % 4];
                if (a.y <= scan && b.y > scan) || (b.y <= scan && a.y > scan) {
                    let t = (scan - a.y) / (b.y - a.y);
                    xs.push(a.x + t * (b.x - a.x));
                }
            }
            xs.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));
            for pair in xs.chunks_exact(2) {
                let x0 = pair[0].round() as i32;
                let x1 = pair[1].round() as i32;
                for x in x0..=x1 {
                    self.set(x, y, color);
                }
            }
        }
    }
}
