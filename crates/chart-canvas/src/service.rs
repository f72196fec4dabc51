// File: crates/chart-canvas/src/service.rs
// Summary: ChartRenderService; one reusable surface, a configured engine, and buffer/data-URL/stream outputs.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chart_core::{Chart, ChartConfiguration, Engine, FontBook, FontDescriptor, RenderTarget, TextShaper};
use chart_core::{skia, types};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::encode::{RasterFrame, DEFAULT_JPEG_QUALITY};
use crate::error::{EncodeError, RenderError};
use crate::mime::MimeType;
use crate::stream::{self, ByteStream};
use crate::surface::{self, RasterSurface, SurfaceKind};

/// Configures a freshly built engine (register plugins, adjust defaults).
pub type ChartCallback = Arc<dyn Fn(&mut Engine) -> anyhow::Result<()> + Send + Sync>;
/// Produces the engine a service renders with.
pub type EngineFactory = Arc<dyn Fn() -> anyhow::Result<Engine> + Send + Sync>;

/// When the factory and callback run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineStrategy {
    /// Once, when the service is built. Every render shares that engine.
    #[default]
    Shared,
    /// Before every render, so no engine state outlives a render.
    PerRender,
}

/// Serialisable service settings. Callbacks and factories are attached on the builder.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderServiceConfig {
    pub width: u32,
    pub height: u32,
    pub surface: SurfaceKind,
    pub engine: EngineStrategy,
    pub jpeg_quality: u8,
}

impl Default for RenderServiceConfig {
    fn default() -> Self {
        Self {
            width: types::WIDTH,
            height: types::HEIGHT,
            surface: SurfaceKind::Raster,
            engine: EngineStrategy::Shared,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl RenderServiceConfig {
    pub fn builder(&self) -> ChartRenderServiceBuilder {
        ChartRenderService::builder(self.width, self.height)
            .surface(self.surface)
            .engine_strategy(self.engine)
            .jpeg_quality(self.jpeg_quality)
    }
}

pub struct ChartRenderServiceBuilder {
    config: RenderServiceConfig,
    callback: Option<ChartCallback>,
    factory: Option<EngineFactory>,
}

impl ChartRenderServiceBuilder {
    pub fn chart_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Engine) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    pub fn engine_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<Engine> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn surface(mut self, kind: SurfaceKind) -> Self {
        self.config.surface = kind;
        self
    }

    pub fn engine_strategy(mut self, strategy: EngineStrategy) -> Self {
        self.config.engine = strategy;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Allocate the surface and, for [`EngineStrategy::Shared`], build and configure the engine.
    pub fn build(self) -> Result<ChartRenderService, RenderError> {
        let RenderServiceConfig { width, height, surface, engine: strategy, jpeg_quality } = self.config;
        surface::checked_size(width, height)?;
        let factory: EngineFactory = match self.factory {
            Some(factory) => factory,
            None => Arc::new(default_engine),
        };
        let raster = match surface {
            SurfaceKind::Raster => Some(Mutex::new(RasterSurface::new(width, height)?)),
            SurfaceKind::Svg => None,
        };
        let shared = match strategy {
            EngineStrategy::Shared => Some(Arc::new(make_engine(&factory, self.callback.as_ref())?)),
            EngineStrategy::PerRender => None,
        };
        info!(width, height, %surface, ?strategy, "chart render service ready");
        Ok(ChartRenderService {
            inner: Arc::new(Inner {
                width,
                height,
                surface,
                strategy,
                jpeg_quality,
                factory,
                callback: self.callback,
                shared,
                raster,
                fonts: RwLock::new(FontBook::new()),
            }),
        })
    }
}

fn default_engine() -> anyhow::Result<Engine> {
    Ok(Engine::new())
}

fn make_engine(factory: &EngineFactory, callback: Option<&ChartCallback>) -> Result<Engine, RenderError> {
    let mut engine = factory().map_err(RenderError::Factory)?;
    if let Some(callback) = callback {
        callback(&mut engine).map_err(RenderError::Callback)?;
    }
    Ok(engine)
}

/// Renders chart configurations to encoded images.
///
/// Each service owns one drawing surface; renders on the same service are serialised on it
/// and keep the surface's memory for the next render. Use one service per worker for
/// parallel throughput.
pub struct ChartRenderService {
    inner: Arc<Inner>,
}

struct Inner {
    width: u32,
    height: u32,
    surface: SurfaceKind,
    strategy: EngineStrategy,
    jpeg_quality: u8,
    factory: EngineFactory,
    callback: Option<ChartCallback>,
    shared: Option<Arc<Engine>>,
    raster: Option<Mutex<RasterSurface>>,
    fonts: RwLock<FontBook>,
}

impl ChartRenderService {
    pub fn builder(width: u32, height: u32) -> ChartRenderServiceBuilder {
        ChartRenderServiceBuilder {
            config: RenderServiceConfig { width, height, ..RenderServiceConfig::default() },
            callback: None,
            factory: None,
        }
    }

    /// Raster service with a plain engine.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::builder(width, height).build()
    }

    pub fn width(&self) -> u32 { self.inner.width }
    pub fn height(&self) -> u32 { self.inner.height }
    pub fn surface_kind(&self) -> SurfaceKind { self.inner.surface }
    pub fn engine_strategy(&self) -> EngineStrategy { self.inner.strategy }

    /// The engine every render uses, when the strategy is [`EngineStrategy::Shared`].
    pub fn shared_engine(&self) -> Option<&Engine> {
        self.inner.shared.as_deref()
    }

    /// Charts still attached to the shared engine. Zero between renders.
    pub fn instance_count(&self) -> usize {
        self.inner.shared.as_ref().map_or(0, |e| e.instance_count())
    }

    /// Make a font file available to later renders of this service under `descriptor.family`,
    /// matched by the descriptor's weight and style rather than the file's own.
    pub fn register_font(&self, path: impl AsRef<Path>, descriptor: FontDescriptor) -> Result<(), RenderError> {
        let mut fonts = self.inner.fonts.write().unwrap_or_else(PoisonError::into_inner);
        fonts.register_file(path, descriptor)?;
        Ok(())
    }

    pub fn render_to_buffer_sync(
        &self,
        config: &ChartConfiguration,
        mime: Option<MimeType>,
    ) -> Result<Vec<u8>, RenderError> {
        self.inner.render_to_vec(config, mime)
    }

    /// Render on the blocking pool and return the encoded bytes.
    pub async fn render_to_buffer(
        &self,
        config: &ChartConfiguration,
        mime: Option<MimeType>,
    ) -> Result<Vec<u8>, RenderError> {
        let inner = Arc::clone(&self.inner);
        let config = config.clone();
        let handle: tokio::task::JoinHandle<Result<Vec<u8>, RenderError>> =
            tokio::task::spawn_blocking(move || inner.render_to_vec(&config, mime));
        handle.await?
    }

    pub fn render_to_data_url_sync(
        &self,
        config: &ChartConfiguration,
        mime: Option<MimeType>,
    ) -> Result<String, RenderError> {
        let mime = self.inner.resolve_mime(mime);
        let bytes = self.render_to_buffer_sync(config, Some(mime))?;
        Ok(data_url(mime, &bytes))
    }

    pub async fn render_to_data_url(
        &self,
        config: &ChartConfiguration,
        mime: Option<MimeType>,
    ) -> Result<String, RenderError> {
        let mime = self.inner.resolve_mime(mime);
        let bytes = self.render_to_buffer(config, Some(mime)).await?;
        Ok(data_url(mime, &bytes))
    }

    /// Render and encode incrementally into a [`ByteStream`].
    ///
    /// Must be called from within a Tokio runtime. Vector output has no stream variant and is
    /// refused up front; raster failures arrive as the stream's last item.
    pub fn render_to_stream(
        &self,
        config: &ChartConfiguration,
        mime: Option<MimeType>,
    ) -> Result<ByteStream, RenderError> {
        let mime = self.inner.resolve_mime(mime);
        if mime.is_vector() || self.inner.surface == SurfaceKind::Svg {
            return Err(EncodeError::StreamUnsupported(mime).into());
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| RenderError::NoRuntime)?;
        let (writer, stream) = stream::channel();
        let inner = Arc::clone(&self.inner);
        let config = config.clone();
        runtime.spawn_blocking(move || {
            let mut writer = writer;
            match inner.render_into(&config, mime, &mut writer) {
                Ok(()) => {
                    if let Err(e) = writer.finish() {
                        debug!(error = %e, "stream consumer went away");
                    }
                }
                Err(e) => writer.fail(e),
            }
        });
        Ok(stream)
    }
}

impl fmt::Debug for ChartRenderService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartRenderService")
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .field("surface", &self.inner.surface)
            .field("strategy", &self.inner.strategy)
            .finish_non_exhaustive()
    }
}

fn data_url(mime: MimeType, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

impl Inner {
    fn resolve_mime(&self, mime: Option<MimeType>) -> MimeType {
        mime.unwrap_or_else(|| self.surface.default_mime())
    }

    fn render_to_vec(&self, config: &ChartConfiguration, mime: Option<MimeType>) -> Result<Vec<u8>, RenderError> {
        let mut out = Vec::new();
        self.render_into(config, self.resolve_mime(mime), &mut out)?;
        Ok(out)
    }

    fn engine(&self) -> Result<Arc<Engine>, RenderError> {
        match &self.shared {
            Some(engine) => Ok(Arc::clone(engine)),
            None => Ok(Arc::new(make_engine(&self.factory, self.callback.as_ref())?)),
        }
    }

    /// Draw `config` on this service's surface and write it encoded as `mime`.
    fn render_into<W: Write>(&self, config: &ChartConfiguration, mime: MimeType, out: &mut W) -> Result<(), RenderError> {
        let started = Instant::now();
        let engine = self.engine()?;
        let text = self.fonts.read().unwrap_or_else(PoisonError::into_inner).shaper();
        match &self.raster {
            Some(raster) => {
                // Only drawing holds the surface; writing may block on a slow stream consumer.
                let frame = {
                    let mut raster = raster.lock().unwrap_or_else(PoisonError::into_inner);
                    raster.draw(|canvas, w, h| draw_chart(&engine, &text, canvas, w, h, config))??;
                    RasterFrame::prepare(raster.pixels(), raster.width(), raster.height(), mime)?
                };
                frame.write_to(&mut *out, self.jpeg_quality)?;
            }
            None => {
                let document = surface::record_svg(self.width, self.height, |canvas, w, h| {
                    draw_chart(&engine, &text, canvas, w, h, config)
                })?;
                if !self.surface.supports(mime) {
                    return Err(EncodeError::UnsupportedMediaType(format!("{mime} from an SVG surface")).into());
                }
                out.write_all(&document).map_err(EncodeError::from)?;
            }
        }
        debug!(%mime, elapsed_ms = started.elapsed().as_millis() as u64, "chart rendered");
        Ok(())
    }
}

/// One full chart lifecycle. The chart is destroyed before returning, also on failure.
fn draw_chart(
    engine: &Engine,
    text: &TextShaper,
    canvas: &skia::Canvas,
    width: i32,
    height: i32,
    config: &ChartConfiguration,
) -> Result<(), RenderError> {
    let mut chart = Chart::new(engine, RenderTarget::new(canvas, width, height), config, text)?;
    let rendered = chart.render();
    let destroyed = chart.destroy();
    if let (Err(_), Err(e)) = (&rendered, &destroyed) {
        warn!(error = %e, "destroy failed after a failed render");
    }
    rendered.and(destroyed).map_err(RenderError::from)
}
