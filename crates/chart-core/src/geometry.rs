// File: crates/chart-core/src/geometry.rs
// Summary: Canvas and chart-area geometry plus pixel snapping.

/// Pixel dimensions of the canvas a chart is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasElement {
    pub width: i32,
    pub height: i32,
}

impl CanvasElement {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// The plotting rectangle computed by layout, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ChartArea {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
    pub fn to_rect(&self) -> skia_safe::Rect {
        skia_safe::Rect::from_ltrb(self.left, self.top, self.right, self.bottom)
    }
}

/// Snap a coordinate so a 1px line lands on whole pixels.
#[inline]
pub fn align_pixel(v: f32, line_width: f32) -> f32 {
    let v = v.round();
    if (line_width.round() as i32) % 2 == 1 { v + 0.5 } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_widths_snap_to_half_pixels() {
        assert_eq!(align_pixel(10.2, 1.0), 10.5);
        assert_eq!(align_pixel(10.2, 2.0), 10.0);
    }

    #[test]
    fn chart_area_contains_is_half_open() {
        let a = ChartArea::from_ltrb(10.0, 10.0, 20.0, 30.0);
        assert!(a.contains(10.0, 10.0));
        assert!(!a.contains(20.0, 15.0));
        assert_eq!(a.width(), 10.0);
        assert_eq!(a.height(), 20.0);
    }
}
