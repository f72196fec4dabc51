// File: crates/chart-canvas/src/error.rs
// Summary: Render-service errors; chart failures pass through, encoding failures stay separate.

use chart_core::{ChartError, FontError};
use thiserror::Error;

use crate::mime::MimeType;

/// Failures producing bytes from a finished drawing.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("{0} has no stream variant")]
    StreamUnsupported(MimeType),
    #[error("failed to encode {mime}")]
    Image {
        mime: MimeType,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write encoded output")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// The chart configuration or a plugin failed; the engine's error is kept as is.
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("engine factory failed: {0:#}")]
    Factory(anyhow::Error),
    #[error("chart callback failed: {0:#}")]
    Callback(anyhow::Error),
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("could not create a drawing context for the surface")]
    Surface,
    #[error("streaming renders need a running Tokio runtime")]
    NoRuntime,
    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl RenderError {
    /// True when the failure came from encoding rather than from drawing the chart.
    pub fn is_encode(&self) -> bool {
        matches!(self, RenderError::Encode(_))
    }
}
