// File: crates/chart-canvas/src/surface.rs
// Summary: Drawing surfaces a service renders onto (reused raster buffer or per-render SVG recorder).

use std::fmt;

use chart_core::skia;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::mime::MimeType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    #[default]
    Raster,
    Svg,
}

impl SurfaceKind {
    /// Whether this surface can be encoded as `mime`.
    pub fn supports(self, mime: MimeType) -> bool {
        match self {
            SurfaceKind::Raster => !mime.is_vector(),
            SurfaceKind::Svg => mime.is_vector(),
        }
    }

    pub fn default_mime(self) -> MimeType {
        match self {
            SurfaceKind::Raster => MimeType::Png,
            SurfaceKind::Svg => MimeType::Svg,
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SurfaceKind::Raster => "raster",
            SurfaceKind::Svg => "svg",
        })
    }
}

pub(crate) fn checked_size(width: u32, height: u32) -> Result<(i32, i32), RenderError> {
    let w = i32::try_from(width).ok().filter(|w| *w > 0);
    let h = i32::try_from(height).ok().filter(|h| *h > 0);
    match (w, h) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(RenderError::InvalidSize { width, height }),
    }
}

/// RGBA8888 premultiplied pixels, allocated once per service and redrawn in place.
pub struct RasterSurface {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let (w, h) = checked_size(width, height)?;
        let len = (w as usize)
            .checked_mul(h as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(RenderError::InvalidSize { width, height })?;
        Ok(Self { width: w, height: h, pixels: vec![0; len] })
    }

    pub fn width(&self) -> u32 { self.width as u32 }
    pub fn height(&self) -> u32 { self.height as u32 }
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Run `f` against a canvas over this surface's pixels.
    pub fn draw<R>(&mut self, f: impl FnOnce(&skia::Canvas, i32, i32) -> R) -> Result<R, RenderError> {
        let info = skia::ImageInfo::new(
            (self.width, self.height),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Premul,
            None,
        );
        let row_bytes = self.width as usize * 4;
        let canvas = skia::Canvas::from_raster_direct(&info, &mut self.pixels, row_bytes, None)
            .ok_or(RenderError::Surface)?;
        Ok(f(&canvas, self.width, self.height))
    }
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Record one drawing as an SVG document.
pub fn record_svg<E>(
    width: u32,
    height: u32,
    f: impl FnOnce(&skia::Canvas, i32, i32) -> Result<(), E>,
) -> Result<Vec<u8>, E>
where
    E: From<RenderError>,
{
    let (w, h) = checked_size(width, height)?;
    let canvas = skia::svg::Canvas::new(skia::Rect::from_iwh(w, h), None);
    f(&canvas, w, h)?;
    let data = canvas.end();
    Ok(data.as_bytes().to_vec())
}
