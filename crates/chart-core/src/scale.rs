// File: crates/chart-core/src/scale.rs
// Summary: Category (X) and linear value (Y) scales mapping data into chart-area pixels.

use crate::grid::{format_tick, Ticks};

/// Horizontal category scale. With `offset`, each category owns a slot and values sit at slot centres
/// (bar charts); without it, the first and last category touch the chart-area edges (line charts).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryScale {
    pub left_px: f32,
    pub right_px: f32,
    pub count: usize,
    pub offset: bool,
}

impl CategoryScale {
    pub fn new(left_px: f32, right_px: f32, count: usize, offset: bool) -> Self {
        Self { left_px, right_px, count, offset }
    }

    /// Pixel width allotted to one category.
    pub fn category_width(&self) -> f32 {
        let span = self.right_px - self.left_px;
        if self.offset {
            span / self.count.max(1) as f32
        } else {
            span / self.count.saturating_sub(1).max(1) as f32
        }
    }

    #[inline]
    pub fn to_px(&self, index: f64) -> f32 {
        let w = self.category_width();
        if self.offset {
            self.left_px + (index as f32 + 0.5) * w
        } else if self.count <= 1 {
            (self.left_px + self.right_px) / 2.0
        } else {
            self.left_px + index as f32 * w
        }
    }

    /// Positions of grid lines between (offset) or at (no offset) categories.
    pub fn grid_positions(&self) -> Vec<f32> {
        let w = self.category_width();
        if self.offset {
            (0..=self.count).map(|i| self.left_px + i as f32 * w).collect()
        } else {
            (0..self.count).map(|i| self.to_px(i as f64)).collect()
        }
    }
}

/// Vertical value scale mapping `[vmin, vmax]` to `[bottom, top]` pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScale {
    pub top_px: f32,
    pub bottom_px: f32,
    pub vmin: f64,
    pub vmax: f64,
    pub ticks: Vec<f64>,
    pub step: f64,
}

impl LinearScale {
    pub fn new(top_px: f32, bottom_px: f32, ticks: Ticks) -> Self {
        let mut s = Self { top_px, bottom_px, vmin: ticks.min, vmax: ticks.max, ticks: ticks.values, step: ticks.step };
        if (s.vmax - s.vmin).abs() < 1e-12 { s.vmax = s.vmin + 1.0; }
        s
    }

    /// Halved operands keep the span finite for ranges near `f64::MAX`.
    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        let half_span = (self.vmax / 2.0 - self.vmin / 2.0).max(5e-13);
        self.bottom_px - ((v / 2.0 - self.vmin / 2.0) / half_span) as f32 * (self.bottom_px - self.top_px)
    }

    /// Pixel row of the value bars grow from: zero when in range, else the nearest edge.
    pub fn base_px(&self) -> f32 {
        self.to_px(0.0f64.clamp(self.vmin, self.vmax))
    }

    pub fn tick_labels(&self, prefix: &str, suffix: &str) -> Vec<String> {
        self.ticks.iter().map(|&t| format!("{prefix}{}{suffix}", format_tick(t, self.step))).collect()
    }
}

/// The scales a laid-out chart exposes to drawing code and plugins.
#[derive(Clone, Debug, PartialEq)]
pub struct Scales {
    pub x: CategoryScale,
    pub y: LinearScale,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::nice_ticks;

    #[test]
    fn offset_categories_sit_at_slot_centres() {
        let x = CategoryScale::new(0.0, 100.0, 4, true);
        assert_eq!(x.category_width(), 25.0);
        assert_eq!(x.to_px(0.0), 12.5);
        assert_eq!(x.to_px(3.0), 87.5);
        assert_eq!(x.grid_positions().len(), 5);
    }

    #[test]
    fn edge_categories_touch_the_edges() {
        let x = CategoryScale::new(0.0, 90.0, 4, false);
        assert_eq!(x.to_px(0.0), 0.0);
        assert_eq!(x.to_px(3.0), 90.0);
        assert_eq!(CategoryScale::new(0.0, 90.0, 1, false).to_px(0.0), 45.0);
    }

    #[test]
    fn linear_mapping_and_base() {
        let y = LinearScale::new(10.0, 110.0, nice_ticks(0.0, 20.0, 5));
        assert_eq!(y.to_px(0.0), 110.0);
        assert_eq!(y.to_px(20.0), 10.0);
        assert_eq!(y.to_px(10.0), 60.0);
        assert_eq!(y.base_px(), 110.0);

        let positive = LinearScale::new(0.0, 100.0, nice_ticks(10.0, 20.0, 3));
        assert_eq!(positive.base_px(), 100.0);
        assert_eq!(y.tick_labels("$", "")[1], "$5");
    }
}
