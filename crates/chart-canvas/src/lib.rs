// File: crates/chart-canvas/src/lib.rs
// Summary: Server-side chart rendering service; wraps chart-core with surfaces, encoders and module isolation.

pub mod encode;
pub mod error;
pub mod mime;
pub mod modules;
pub mod service;
pub mod stream;
pub mod surface;

pub use error::{EncodeError, RenderError};
pub use mime::MimeType;
pub use modules::{ModuleError, ModuleLoader, PluginModule};
pub use service::{
    ChartCallback, ChartRenderService, ChartRenderServiceBuilder, EngineFactory, EngineStrategy, RenderServiceConfig,
};
pub use stream::ByteStream;
pub use surface::SurfaceKind;

pub use chart_core;
pub use chart_plugins;
