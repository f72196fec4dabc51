// File: crates/chart-core/src/text.rs
// Summary: Font registration (FontBook) and a Skia textlayout shaper that resolves registered families first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use skia::textlayout::{
    FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle, TypefaceFontProvider,
};
use skia_safe as skia;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{0}' is not a font file Skia can load")]
    Unsupported(String),
    #[error("font family name must not be empty")]
    EmptyFamily,
    #[error("invalid font {attribute} '{value}'")]
    InvalidDescriptor { attribute: &'static str, value: String },
}

/// Family plus optional style attributes a registered font answers to.
///
/// The attributes describe the face as it should be matched, whatever the file itself declares:
/// registering a regular file as `weight("bold")` makes it the face bold text of that family uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontDescriptor {
    pub family: String,
    /// CSS weight: `normal`, `bold` or `100`..`900`.
    pub weight: Option<String>,
    /// CSS style: `normal`, `italic` or `oblique`.
    pub style: Option<String>,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>) -> Self {
        Self { family: family.into(), weight: None, style: None }
    }
    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

#[derive(Clone, Debug)]
struct RegisteredFace {
    descriptor: FontDescriptor,
    weight: i32,
    italic: bool,
    data: Arc<Vec<u8>>,
}

/// Fonts registered for later renders. Holds raw font bytes so it can cross threads.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<RegisteredFace>,
}

impl FontBook {
    pub fn new() -> Self { Self::default() }

    pub fn register_file(&mut self, path: impl AsRef<Path>, descriptor: FontDescriptor) -> Result<(), FontError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Io { path: path.to_path_buf(), source })?;
        self.register_bytes(data, descriptor)
            .map_err(|e| match e {
                FontError::Unsupported(_) => FontError::Unsupported(path.display().to_string()),
                other => other,
            })
    }

    pub fn register_bytes(&mut self, data: Vec<u8>, descriptor: FontDescriptor) -> Result<(), FontError> {
        if descriptor.family.trim().is_empty() {
            return Err(FontError::EmptyFamily);
        }
        let weight = match descriptor.weight.as_deref() {
            None => 400,
            Some(w) => parse_absolute_weight(w)
                .ok_or_else(|| FontError::InvalidDescriptor { attribute: "weight", value: w.to_string() })?,
        };
        let italic = match descriptor.style.as_deref() {
            None => false,
            Some(s) => parse_italic(s)
                .ok_or_else(|| FontError::InvalidDescriptor { attribute: "style", value: s.to_string() })?,
        };
        if skia::FontMgr::new().new_from_data(&data, None).is_none() {
            return Err(FontError::Unsupported(descriptor.family.clone()));
        }
        tracing::debug!(family = %descriptor.family, weight, italic, bytes = data.len(), "registered font");
        self.faces.push(RegisteredFace { descriptor, weight, italic, data: Arc::new(data) });
        Ok(())
    }

    pub fn len(&self) -> usize { self.faces.len() }
    pub fn is_empty(&self) -> bool { self.faces.is_empty() }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.descriptor.family.as_str())
    }

    pub fn shaper(&self) -> TextShaper { TextShaper::with_fonts(self) }
}

/// Resolved font for one piece of text.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub families: Vec<String>,
    pub size: f32,
    pub weight: i32,
    pub italic: bool,
}

impl FontSpec {
    /// Split a CSS-like family list (`"'Helvetica Neue', Arial, sans-serif"`).
    pub fn from_family_list(list: &str, size: f32) -> Self {
        let families = list
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
            .filter(|f| !f.is_empty())
            .collect();
        Self { families, size, weight: 400, italic: false }
    }
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
    pub fn bold(mut self) -> Self {
        self.weight = 700;
        self
    }
    /// Apply a CSS weight keyword or number; unknown values leave the weight unchanged.
    pub fn with_weight(mut self, weight: &str) -> Self {
        if let Some(w) = parse_weight(weight) {
            self.weight = w;
        }
        self
    }
    /// Apply a font style string such as `"bold"`, `"italic"` or `"italic 600"`.
    pub fn with_style(mut self, style: &str) -> Self {
        for token in style.split_whitespace() {
            match parse_italic(token) {
                Some(italic) if token != "normal" => self.italic = italic,
                _ => self = self.with_weight(token),
            }
        }
        self
    }
    fn font_style(&self) -> skia::FontStyle {
        let slant = if self.italic { skia::font_style::Slant::Italic } else { skia::font_style::Slant::Upright };
        skia::FontStyle::new(skia::font_style::Weight::from(self.weight), skia::font_style::Width::NORMAL, slant)
    }
}

fn parse_weight(s: &str) -> Option<i32> {
    match s.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(400),
        "bold" => Some(700),
        "lighter" => Some(300),
        "bolder" => Some(800),
        other => other.parse::<i32>().ok().filter(|w| (1..=1000).contains(w)),
    }
}

// Relative keywords have nothing to be relative to on a registered face.
fn parse_absolute_weight(s: &str) -> Option<i32> {
    match s.trim().to_ascii_lowercase().as_str() {
        "lighter" | "bolder" => None,
        _ => parse_weight(s),
    }
}

fn parse_italic(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(false),
        "italic" | "oblique" => Some(true),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// A registered face as the shaper knows it: requested family, matching attributes, private alias.
#[derive(Clone, Debug)]
struct FaceAlias {
    family: String,
    weight: i32,
    italic: bool,
    alias: String,
}

pub struct TextShaper {
    fonts: FontCollection,
    faces: Vec<FaceAlias>,
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}

impl TextShaper {
    pub fn new() -> Self { Self::with_fonts(&FontBook::default()) }

    pub fn with_fonts(book: &FontBook) -> Self {
        let mut fc = FontCollection::new();
        let mut faces = Vec::with_capacity(book.len());
        if !book.is_empty() {
            let mgr = skia::FontMgr::new();
            let mut provider = TypefaceFontProvider::new();
            for (i, face) in book.faces.iter().enumerate() {
                let Some(typeface) = mgr.new_from_data(&face.data, None) else { continue };
                // Each face sits alone under its alias so Skia cannot swap in a sibling.
                let alias = format!("{}#{i}", face.descriptor.family);
                provider.register_typeface(typeface, Some(alias.as_str()));
                faces.push(FaceAlias {
                    family: face.descriptor.family.clone(),
                    weight: face.weight,
                    italic: face.italic,
                    alias,
                });
            }
            fc.set_asset_font_manager(Some(provider.into()));
        }
        // System fonts back up anything not registered.
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc, faces }
    }

    /// Registered face closest to `font` within `family`: slant first, then weight distance.
    fn registered_face(&self, family: &str, font: &FontSpec) -> Option<&FaceAlias> {
        self.faces
            .iter()
            .filter(|f| f.family.eq_ignore_ascii_case(family))
            .min_by_key(|f| (f.italic != font.italic, (f.weight - font.weight).abs()))
    }

    /// Family list handed to Skia, with registered families replaced by their face aliases.
    fn resolve_families(&self, font: &FontSpec) -> Vec<String> {
        if font.families.is_empty() {
            return vec!["sans-serif".to_string()];
        }
        font.families
            .iter()
            .map(|family| match self.registered_face(family, font) {
                Some(face) => face.alias.clone(),
                None => family.clone(),
            })
            .collect()
    }

    fn make_style(&self, font: &FontSpec, color: skia::Color) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(font.size.max(1.0));
        ts.set_color(color);
        ts.set_font_style(font.font_style());
        ts.set_font_families(self.resolve_families(font).as_slice());
        ts
    }

    pub fn layout(&self, text: &str, font: &FontSpec, color: skia::Color) -> Paragraph {
        let pstyle = ParagraphStyle::new();
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        let style = self.make_style(font, color);
        builder.push_style(&style);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    /// Width of the longest line and total height.
    pub fn measure(&self, text: &str, font: &FontSpec) -> (f32, f32) {
        let p = self.layout(text, font, skia::Color::TRANSPARENT);
        (p.longest_line(), p.height())
    }

    pub fn measure_width(&self, text: &str, font: &FontSpec) -> f32 {
        self.measure(text, font).0
    }

    /// Draw `text` anchored at `(x, y)` with the given alignment.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &skia::Canvas,
        text: &str,
        x: f32,
        y: f32,
        font: &FontSpec,
        color: skia::Color,
        h: HAlign,
        v: VAlign,
    ) {
        let mut p = self.layout(text, font, color);
        let w = p.longest_line();
        let ht = p.height();
        let left = match h {
            HAlign::Left => x,
            HAlign::Center => x - w / 2.0,
            HAlign::Right => x - w,
        };
        let top = match v {
            VAlign::Top => y,
            VAlign::Middle => y - ht / 2.0,
            VAlign::Bottom => y - ht,
        };
        p.paint(canvas, (left, top));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_lists_are_split_and_unquoted() {
        let f = FontSpec::from_family_list("'Helvetica Neue', \"Arial\", sans-serif", 12.0);
        assert_eq!(f.families, vec!["Helvetica Neue", "Arial", "sans-serif"]);
        assert_eq!(f.weight, 400);
        assert_eq!(f.clone().with_weight("bold").weight, 700);
        assert_eq!(f.clone().with_weight("600").weight, 600);
        assert_eq!(f.with_weight("heavy").weight, 400);
    }

    #[test]
    fn style_strings_set_slant_and_weight() {
        let f = FontSpec::from_family_list("sans-serif", 12.0);
        let bold = f.clone().with_style("bold");
        assert_eq!((bold.weight, bold.italic), (700, false));
        let italic = f.clone().with_style("italic 600");
        assert_eq!((italic.weight, italic.italic), (600, true));
        let plain = f.with_style("normal");
        assert_eq!((plain.weight, plain.italic), (400, false));
    }

    #[test]
    fn registered_families_resolve_to_the_closest_face() {
        let face = |family: &str, weight, italic, alias: &str| FaceAlias {
            family: family.to_string(),
            weight,
            italic,
            alias: alias.to_string(),
        };
        let mut shaper = TextShaper::new();
        shaper.faces = vec![
            face("Brand", 400, false, "Brand#0"),
            face("Brand", 700, false, "Brand#1"),
            face("Brand", 400, true, "Brand#2"),
        ];

        let spec = FontSpec::from_family_list("brand, Arial", 12.0);
        assert_eq!(shaper.resolve_families(&spec), vec!["Brand#0", "Arial"]);
        assert_eq!(shaper.resolve_families(&spec.clone().with_weight("800")), vec!["Brand#1", "Arial"]);
        assert_eq!(shaper.resolve_families(&spec.clone().with_style("italic bold")), vec!["Brand#2", "Arial"]);
        assert_eq!(shaper.resolve_families(&FontSpec::from_family_list("", 12.0)), vec!["sans-serif"]);
    }

    #[test]
    fn descriptors_with_unknown_attributes_are_rejected() {
        let mut book = FontBook::new();
        let err = book.register_bytes(Vec::new(), FontDescriptor::new("x").weight("heavy")).unwrap_err();
        assert!(matches!(err, FontError::InvalidDescriptor { attribute: "weight", .. }));
        let err = book.register_bytes(Vec::new(), FontDescriptor::new("x").weight("bolder")).unwrap_err();
        assert!(matches!(err, FontError::InvalidDescriptor { attribute: "weight", .. }));
        let err = book.register_bytes(Vec::new(), FontDescriptor::new("x").style("slanted")).unwrap_err();
        assert_eq!(err.to_string(), "invalid font style 'slanted'");
        assert!(book.is_empty());
    }

    #[test]
    fn rejects_garbage_font_bytes() {
        let mut book = FontBook::new();
        let err = book.register_bytes(b"definitely not a font".to_vec(), FontDescriptor::new("x")).unwrap_err();
        assert!(matches!(err, FontError::Unsupported(_)));
        assert!(book.is_empty());
    }

    #[test]
    fn rejects_empty_family_and_missing_files() {
        let mut book = FontBook::new();
        assert!(matches!(
            book.register_bytes(Vec::new(), FontDescriptor::new("  ")),
            Err(FontError::EmptyFamily)
        ));
        assert!(matches!(
            book.register_file("/definitely/not/here.ttf", FontDescriptor::new("x")),
            Err(FontError::Io { .. })
        ));
    }
}
