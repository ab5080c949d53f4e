//! Swipe-to-reveal: map touch points to slabs during a drag gesture.

use std::collections::HashSet;

use crate::slabs::{SlabLayout, TileId};

/// Resolves a viewport coordinate to the slab under it (topmost element).
pub trait PointLocator {
    fn tile_at(&self, x: f64, y: f64) -> Option<TileId>;
}

/// Arithmetic locator for a uniform grid of equally sized cells separated by `gap`.
#[derive(Clone, Debug)]
pub struct GridGeometry<'a> {
    pub layout: &'a SlabLayout,
    pub left: f64,
    pub top: f64,
    pub cell_w: f64,
    pub cell_h: f64,
    pub gap: f64,
    pub columns: usize,
}

impl PointLocator for GridGeometry<'_> {
    fn tile_at(&self, x: f64, y: f64) -> Option<TileId> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        if self.columns == 0 || self.cell_w <= 0.0 || self.cell_h <= 0.0 {
            return None;
        }
        let (lx, ly) = (x - self.left, y - self.top);
        if lx < 0.0 || ly < 0.0 {
            return None;
        }
        let pitch_x = self.cell_w + self.gap;
        let pitch_y = self.cell_h + self.gap;
        let col = (lx / pitch_x).floor() as usize;
        let row = (ly / pitch_y).floor() as usize;
        // Points inside the gutter hit nothing.
        if lx - col as f64 * pitch_x >= self.cell_w || ly - row as f64 * pitch_y >= self.cell_h {
            return None;
        }
        if col >= self.columns {
            return None;
        }
        self.layout
            .tiles()
            .get(row * self.columns + col)
            .map(|t| t.id.clone())
    }
}

/// Tracks one touch gesture so each slab fires at most once per drag.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    active: bool,
    visited: Vec<TileId>,
    seen: HashSet<TileId>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.active = true;
        self.visited.clear();
        self.seen.clear();
    }

    /// Hit-test the point; returns the slab only when the finger first enters it.
    pub fn track(&mut self, locator: &impl PointLocator, x: f64, y: f64) -> Option<TileId> {
        if !self.active {
            return None;
        }
        let id = locator.tile_at(x, y)?;
        if self.seen.insert(id.clone()) {
            self.visited.push(id.clone());
            Some(id)
        } else {
            None
        }
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Slabs entered during the current (or last) gesture, in order.
    pub fn visited(&self) -> &[TileId] {
        &self.visited
    }
}
