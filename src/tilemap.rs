//! Solid-tile grid with the two queries the simulation needs
//!
//! Collision resolution asks for candidate rects around a point and a
//! point-in-solid test; the renderer additionally walks visible cells.
//! Maps are authored elsewhere and handed in as ASCII rows, so the grid
//! builder is the only authoring seam this crate carries.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::CELL_SIZE;

/// Solid tile variants (render shading differs, collision does not)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Stone,
    Brick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
}

/// Row-major cell grid; `None` is empty space
#[derive(Debug, Clone)]
pub struct TileMap {
    width: usize,
    height: usize,
    cells: Vec<Option<Tile>>,
    torches: Vec<Vec2>,
    bounds: Rect,
}

impl TileMap {
    /// Build a map from ASCII rows: `#` stone, `%` brick, `t` torch
    /// anchor (not solid), anything else empty. Ragged rows are padded.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut cells = vec![None; width * height];
        let mut torches = Vec::new();

        for (cy, row) in rows.iter().enumerate() {
            for (cx, ch) in row.chars().enumerate() {
                match ch {
                    '#' => cells[cy * width + cx] = Some(Tile { kind: TileKind::Stone }),
                    '%' => cells[cy * width + cx] = Some(Tile { kind: TileKind::Brick }),
                    't' => {
                        // flame anchor sits near the top middle of the cell
                        torches.push(Vec2::new(
                            cx as f32 * CELL_SIZE + 10.0,
                            cy as f32 * CELL_SIZE + 4.0,
                        ));
                    }
                    _ => {}
                }
            }
        }

        let bounds = solid_bounds(width, height, &cells);
        Self {
            width,
            height,
            cells,
            torches,
            bounds,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell lookup by grid coordinates; out-of-range is empty
    pub fn cell(&self, cx: i32, cy: i32) -> Option<&Tile> {
        if cx < 0 || cy < 0 || cx as usize >= self.width || cy as usize >= self.height {
            return None;
        }
        self.cells[cy as usize * self.width + cx as usize].as_ref()
    }

    /// Point-in-solid-tile test used by particle and projectile bounces
    pub fn is_solid(&self, point: Vec2) -> bool {
        let cx = (point.x / CELL_SIZE).floor() as i32;
        let cy = (point.y / CELL_SIZE).floor() as i32;
        self.cell(cx, cy).is_some()
    }

    /// Collision candidates: the solid rects in the 3x3 cell block around
    /// `point`. Sufficient for bodies up to one cell moving less than one
    /// cell per tick.
    pub fn surrounding_rects(&self, point: Vec2) -> Vec<Rect> {
        let cx = (point.x / CELL_SIZE).floor() as i32;
        let cy = (point.y / CELL_SIZE).floor() as i32;
        let mut rects = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if self.cell(cx + dx, cy + dy).is_some() {
                    rects.push(Rect::new(
                        (cx + dx) as f32 * CELL_SIZE,
                        (cy + dy) as f32 * CELL_SIZE,
                        CELL_SIZE,
                        CELL_SIZE,
                    ));
                }
            }
        }
        rects
    }

    /// World-space bounding box of the authored solid cells, used for
    /// camera clamping
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// World anchor points of torch flames
    pub fn torches(&self) -> &[Vec2] {
        &self.torches
    }
}

fn solid_bounds(width: usize, height: usize, cells: &[Option<Tile>]) -> Rect {
    let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for cy in 0..height {
        for cx in 0..width {
            if cells[cy * width + cx].is_some() {
                min.x = min.x.min(cx as f32 * CELL_SIZE);
                min.y = min.y.min(cy as f32 * CELL_SIZE);
                max.x = max.x.max((cx + 1) as f32 * CELL_SIZE);
                max.y = max.y.max((cy + 1) as f32 * CELL_SIZE);
            }
        }
    }
    if min.x > max.x {
        // no solid cells authored; fall back to the grid extent
        return Rect::new(
            0.0,
            0.0,
            width as f32 * CELL_SIZE,
            height as f32 * CELL_SIZE,
        );
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}
