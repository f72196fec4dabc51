// File: crates/chart-canvas/src/mime.rs
// Summary: Output media types a render can be encoded as.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::EncodeError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum MimeType {
    #[default]
    Png,
    Jpeg,
    Svg,
}

impl MimeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            MimeType::Png => "image/png",
            MimeType::Jpeg => "image/jpeg",
            MimeType::Svg => "image/svg+xml",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            MimeType::Png => "png",
            MimeType::Jpeg => "jpg",
            MimeType::Svg => "svg",
        }
    }

    pub const fn is_vector(self) -> bool {
        matches!(self, MimeType::Svg)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MimeType {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image/png" => Ok(MimeType::Png),
            "image/jpeg" | "image/jpg" => Ok(MimeType::Jpeg),
            "image/svg+xml" => Ok(MimeType::Svg),
            _ => Err(EncodeError::UnsupportedMediaType(s.to_string())),
        }
    }
}

impl TryFrom<String> for MimeType {
    type Error = EncodeError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}
