// File: crates/chart-canvas/src/encode.rs
// Summary: Raster encoders (PNG, JPEG); pixels are converted first, then written to any writer.

use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::EncodeError;
use crate::mime::MimeType;

pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Pixels converted for one encoder, detached from the surface they were read from.
#[derive(Debug)]
pub struct RasterFrame {
    mime: MimeType,
    width: u32,
    height: u32,
    colour: ExtendedColorType,
    data: Vec<u8>,
}

impl RasterFrame {
    /// Convert premultiplied RGBA pixels into what the `mime` encoder takes.
    pub fn prepare(pixels: &[u8], width: u32, height: u32, mime: MimeType) -> Result<Self, EncodeError> {
        let (colour, data) = match mime {
            MimeType::Png => (ExtendedColorType::Rgba8, unpremultiply(pixels)),
            // Premultiplied colour is the pixel composited over black.
            MimeType::Jpeg => {
                (ExtendedColorType::Rgb8, pixels.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect())
            }
            MimeType::Svg => return Err(EncodeError::UnsupportedMediaType(format!("{mime} from a raster surface"))),
        };
        Ok(Self { mime, width, height, colour, data })
    }

    pub fn write_to<W: Write>(&self, out: W, jpeg_quality: u8) -> Result<(), EncodeError> {
        let (w, h) = (self.width, self.height);
        let written = match self.mime {
            MimeType::Jpeg => JpegEncoder::new_with_quality(out, jpeg_quality.clamp(1, 100))
                .write_image(&self.data, w, h, self.colour),
            _ => PngEncoder::new(out).write_image(&self.data, w, h, self.colour),
        };
        written.map_err(|source| EncodeError::Image { mime: self.mime, source })
    }
}

/// Encode premultiplied RGBA pixels as `mime` into `out`.
pub fn encode_raster<W: Write>(
    pixels: &[u8],
    width: u32,
    height: u32,
    mime: MimeType,
    jpeg_quality: u8,
    out: W,
) -> Result<(), EncodeError> {
    RasterFrame::prepare(pixels, width, height, mime)?.write_to(out, jpeg_quality)
}

pub fn unpremultiply(pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len());
    for px in pixels.chunks_exact(4) {
        let a = px[3] as u32;
        match a {
            0 => out.extend_from_slice(&[0, 0, 0, 0]),
            255 => out.extend_from_slice(px),
            _ => {
                let un = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
                out.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), px[3]]);
            }
        }
    }
    out
}
