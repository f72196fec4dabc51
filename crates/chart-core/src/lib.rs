// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the engine handle, chart lifecycle and plugin contract.

pub mod chart;
pub mod colour;
pub mod config;
mod draw;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod plugin;
pub mod scale;
pub mod text;
pub mod types;

pub use chart::{Chart, Element, ElementKind, RenderTarget};
pub use colour::{Colour, ColourError};
pub use config::{ChartConfiguration, ChartType};
pub use engine::{ChartId, Defaults, Engine};
pub use error::{ChartError, PluginError};
pub use geometry::{CanvasElement, ChartArea};
pub use plugin::{Hook, HookResult, Plugin, PluginRegistry};
pub use scale::Scales;
pub use text::{FontBook, FontDescriptor, FontError, FontSpec, TextShaper};

// Re-exported so plugin crates draw with the same Skia build as the engine.
pub use skia_safe as skia;
