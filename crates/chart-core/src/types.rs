// File: crates/chart-core/src/types.rs
// Summary: Shared constants and layout padding.

use serde::Deserialize;

/// Default surface width in pixels.
pub const WIDTH: u32 = 800;
/// Default surface height in pixels.
pub const HEIGHT: u32 = 600;

/// Space reserved around the chart, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self { left, right, top, bottom }
    }
    pub const fn uniform(v: f32) -> Self {
        Self::new(v, v, v, v)
    }
}

// Accepts either a single number or a `{ left, right, top, bottom }` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PaddingRepr {
    Uniform(f32),
    Sides {
        #[serde(default)]
        left: f32,
        #[serde(default)]
        right: f32,
        #[serde(default)]
        top: f32,
        #[serde(default)]
        bottom: f32,
    },
}

impl<'de> Deserialize<'de> for Padding {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PaddingRepr::deserialize(deserializer)?;
        let p = match repr {
            PaddingRepr::Uniform(v) => Padding::uniform(v),
            PaddingRepr::Sides { left, right, top, bottom } => Padding::new(left, right, top, bottom),
        };
        Ok(Padding::new(p.left.max(0.0), p.right.max(0.0), p.top.max(0.0), p.bottom.max(0.0)))
    }
}
