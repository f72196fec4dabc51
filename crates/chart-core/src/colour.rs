// File: crates/chart-core/src/colour.rs
// Summary: Fill/stroke styles: CSS colour parsing and linear gradients, converted to Skia paints.

use serde::Deserialize;
use skia_safe as skia;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColourError {
    #[error("unrecognised colour '{0}'")]
    Unrecognised(String),
    #[error("gradient needs at least one stop")]
    EmptyGradient,
}

/// Anything the canvas accepts as a fill or stroke style.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "ColourRepr")]
pub enum Colour {
    Solid(skia::Color),
    LinearGradient(LinearGradient),
}

/// A linear gradient in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: (f32, f32),
    pub end: (f32, f32),
    /// `(offset in 0..=1, colour)` pairs, sorted by offset.
    pub stops: Vec<(f32, skia::Color)>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColourRepr {
    Css(String),
    Gradient {
        #[serde(rename = "linearGradient")]
        linear_gradient: GradientRepr,
    },
}

#[derive(Deserialize)]
struct GradientRepr {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    stops: Vec<(f32, String)>,
}

impl TryFrom<ColourRepr> for Colour {
    type Error = ColourError;

    fn try_from(repr: ColourRepr) -> Result<Self, Self::Error> {
        match repr {
            ColourRepr::Css(s) => Colour::parse(&s),
            ColourRepr::Gradient { linear_gradient: g } => {
                if g.stops.is_empty() {
                    return Err(ColourError::EmptyGradient);
                }
                let mut stops = g
                    .stops
                    .iter()
                    .map(|(offset, css)| Ok((offset.clamp(0.0, 1.0), parse_css(css)?)))
                    .collect::<Result<Vec<_>, ColourError>>()?;
                stops.sort_by(|a, b| a.0.total_cmp(&b.0));
                Ok(Colour::LinearGradient(LinearGradient {
                    start: (g.x0, g.y0),
                    end: (g.x1, g.y1),
                    stops,
                }))
            }
        }
    }
}

impl std::str::FromStr for Colour {
    type Err = ColourError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Colour::parse(s) }
}

impl From<skia::Color> for Colour {
    fn from(c: skia::Color) -> Self { Colour::Solid(c) }
}

impl Colour {
    pub fn parse(s: &str) -> Result<Self, ColourError> {
        parse_css(s).map(Colour::Solid)
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Colour::Solid(skia::Color::from_argb(a, r, g, b))
    }

    /// The solid colour, if this is not a gradient.
    pub fn solid(&self) -> Option<skia::Color> {
        match self {
            Colour::Solid(c) => Some(*c),
            Colour::LinearGradient(_) => None,
        }
    }

    /// A single colour standing in for this style where only solid colours work (text).
    pub fn representative(&self) -> skia::Color {
        match self {
            Colour::Solid(c) => *c,
            Colour::LinearGradient(g) => g.stops.first().map(|s| s.1).unwrap_or(skia::Color::BLACK),
        }
    }

    /// Point `paint` at this style.
    pub fn apply(&self, paint: &mut skia::Paint) {
        match self {
            Colour::Solid(c) => {
                paint.set_shader(None);
                paint.set_color(*c);
            }
            Colour::LinearGradient(g) => {
                let colors: Vec<skia::Color> = g.stops.iter().map(|s| s.1).collect();
                let offsets: Vec<f32> = g.stops.iter().map(|s| s.0).collect();
                let shader = skia::Shader::linear_gradient(
                    (skia::Point::new(g.start.0, g.start.1), skia::Point::new(g.end.0, g.end.1)),
                    colors.as_slice(),
                    offsets.as_slice(),
                    skia::TileMode::Clamp,
                    None,
                    None,
                );
                match shader {
                    Some(shader) => {
                        paint.set_color(skia::Color::BLACK);
                        paint.set_shader(shader);
                    }
                    // Degenerate gradients (single stop, zero length) paint their first stop.
                    None => {
                        paint.set_shader(None);
                        paint.set_color(self.representative());
                    }
                }
            }
        }
    }

    pub fn fill_paint(&self) -> skia::Paint {
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Fill);
        self.apply(&mut paint);
        paint
    }

    pub fn stroke_paint(&self, width: f32) -> skia::Paint {
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Stroke);
        paint.set_stroke_width(width);
        self.apply(&mut paint);
        paint
    }
}

/// Parse a CSS colour: named, `#rgb[a]`, `#rrggbb[aa]`, `rgb()` or `rgba()`.
pub fn parse_css(input: &str) -> Result<skia::Color, ColourError> {
    let s = input.trim().to_ascii_lowercase();
    let bad = || ColourError::Unrecognised(input.to_string());

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(bad);
    }
    if let Some(args) = s.strip_prefix("rgba(").or_else(|| s.strip_prefix("rgb(")) {
        let args = args.strip_suffix(')').ok_or_else(bad)?;
        return parse_rgb_args(args).ok_or_else(bad);
    }
    named(&s).ok_or_else(bad)
}

fn parse_hex(hex: &str) -> Option<skia::Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(skia::Color::from_argb(255, nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(skia::Color::from_argb(nibble(3)?, nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(skia::Color::from_argb(255, byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(skia::Color::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<skia::Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        let v = match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? * 255.0 / 100.0,
            None => p.parse::<f32>().ok()?,
        };
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(p) => {
            let a = match p.strip_suffix('%') {
                Some(pct) => pct.parse::<f32>().ok()? / 100.0,
                None => p.parse::<f32>().ok()?,
            };
            (a.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };
    Some(skia::Color::from_argb(alpha, channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
}

fn named(name: &str) -> Option<skia::Color> {
    let (r, g, b) = match name {
        "transparent" => return Some(skia::Color::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "lime" => (0, 255, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "silver" => (192, 192, 192),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "dimgray" | "dimgrey" => (105, 105, 105),
        "gainsboro" => (220, 220, 220),
        "whitesmoke" => (245, 245, 245),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "purple" => (128, 0, 128),
        "teal" => (0, 128, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        "gold" => (255, 215, 0),
        "indigo" => (75, 0, 130),
        "violet" => (238, 130, 238),
        "crimson" => (220, 20, 60),
        "coral" => (255, 127, 80),
        "tomato" => (255, 99, 71),
        "salmon" => (250, 128, 114),
        "steelblue" => (70, 130, 180),
        "skyblue" => (135, 206, 235),
        "royalblue" => (65, 105, 225),
        "dodgerblue" => (30, 144, 255),
        "slategray" | "slategrey" => (112, 128, 144),
        "forestgreen" => (34, 139, 34),
        "seagreen" => (46, 139, 87),
        "beige" => (245, 245, 220),
        "ivory" => (255, 255, 240),
        _ => return None,
    };
    Some(skia::Color::from_argb(255, r, g, b))
}
