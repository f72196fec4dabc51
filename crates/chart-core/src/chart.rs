// File: crates/chart-core/src/chart.rs
// Summary: Chart instance lifecycle (init, update/layout, draw, destroy) and plugin hook dispatch.

use serde_json::Value;
use skia_safe as skia;

use crate::config::{ChartConfiguration, ChartType};
use crate::engine::{ChartId, Engine};
use crate::error::ChartError;
use crate::geometry::{CanvasElement, ChartArea};
use crate::grid::{nice_ticks, Ticks};
use crate::plugin::{resolve_options, Hook};
use crate::scale::{CategoryScale, LinearScale, Scales};
use crate::text::{FontSpec, TextShaper};
use crate::draw;

pub(crate) const LINE_HEIGHT: f32 = 1.2;
pub(crate) const TICK_MARK: f32 = 10.0;
pub(crate) const TICK_PADDING: f32 = 4.0;
pub(crate) const BOX_PADDING: f32 = 10.0;
pub(crate) const LEGEND_BOX_WIDTH: f32 = 40.0;
const MAX_TICKS: usize = 11;

/// What a chart draws into: canvas size plus the drawing context.
/// Either can be missing, e.g. for a chart built before its surface exists.
#[derive(Clone, Copy)]
pub struct RenderTarget<'c> {
    pub canvas: Option<CanvasElement>,
    pub ctx: Option<&'c skia::Canvas>,
}

impl<'c> RenderTarget<'c> {
    pub fn new(ctx: &'c skia::Canvas, width: i32, height: i32) -> Self {
        Self { canvas: Some(CanvasElement::new(width, height)), ctx: Some(ctx) }
    }

    /// A sized canvas with no drawing context; layout works, drawing does not.
    pub fn without_context(width: i32, height: i32) -> Self {
        Self { canvas: Some(CanvasElement::new(width, height)), ctx: None }
    }

    pub fn empty() -> Self {
        Self { canvas: None, ctx: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Bar,
    Point,
}

/// Pixel geometry of one data point after layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Element {
    pub dataset_index: usize,
    pub index: usize,
    pub value: f64,
    pub kind: ElementKind,
    /// Centre x.
    pub x: f32,
    /// Pixel row of the value (bar tip or point centre).
    pub y: f32,
    /// Pixel row the element grows from.
    pub base: f32,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LegendItem {
    pub dataset_index: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Layout {
    /// Centre x and top of the title line.
    pub title: Option<(f32, f32)>,
    pub legend: Vec<LegendItem>,
}

/// One chart bound to an engine, a configuration and (optionally) a drawing surface.
///
/// Creating a chart registers it with the engine; [`Chart::destroy`], or dropping it, releases
/// the canvas and context references and unregisters it.
pub struct Chart<'c> {
    id: ChartId,
    engine: &'c Engine,
    config: &'c ChartConfiguration,
    text: &'c TextShaper,
    canvas: Option<CanvasElement>,
    ctx: Option<&'c skia::Canvas>,
    chart_area: Option<ChartArea>,
    scales: Option<Scales>,
    layout: Layout,
    attached: bool,
}

impl<'c> Chart<'c> {
    pub fn new(
        engine: &'c Engine,
        target: RenderTarget<'c>,
        config: &'c ChartConfiguration,
        text: &'c TextShaper,
    ) -> Result<Self, ChartError> {
        let chart = Self {
            id: engine.attach(),
            engine,
            config,
            text,
            canvas: target.canvas,
            ctx: target.ctx,
            chart_area: None,
            scales: None,
            layout: Layout::default(),
            attached: true,
        };
        tracing::debug!(chart = %chart.id, kind = ?config.chart_type, "chart created");
        chart.notify(Hook::BeforeInit, 1.0)?;
        chart.notify(Hook::AfterInit, 1.0)?;
        Ok(chart)
    }

    pub fn id(&self) -> ChartId { self.id }
    pub fn engine(&self) -> &'c Engine { self.engine }
    pub fn config(&self) -> &'c ChartConfiguration { self.config }
    pub fn text(&self) -> &'c TextShaper { self.text }
    pub fn canvas(&self) -> Option<CanvasElement> { self.canvas }
    pub fn ctx(&self) -> Option<&'c skia::Canvas> { self.ctx }
    /// Plotting rectangle; `None` until [`Chart::update`] has run.
    pub fn chart_area(&self) -> Option<ChartArea> { self.chart_area }
    pub fn scales(&self) -> Option<&Scales> { self.scales.as_ref() }
    pub(crate) fn layout(&self) -> &Layout { &self.layout }

    pub fn is_dataset_visible(&self, index: usize) -> bool {
        self.config.data.datasets.get(index).is_some_and(|d| !d.hidden)
    }

    /// This chart's resolved options for plugin `id`; `None` if the chart disabled it.
    pub fn plugin_options(&self, id: &str) -> Option<Value> {
        resolve_options(self.engine.defaults.plugins.get(id), self.config.plugin_options(id))
    }

    /// Base font from the engine defaults, optionally resized.
    pub fn font(&self, size: Option<f32>) -> FontSpec {
        let d = &self.engine.defaults;
        FontSpec::from_family_list(&d.font_family, size.unwrap_or(d.font_size)).with_style(&d.font_style)
    }

    /// Fit scales and compute the plotting rectangle.
    pub fn update(&mut self) -> Result<(), ChartError> {
        let canvas = self.canvas.ok_or(ChartError::NoCanvas)?;
        self.notify(Hook::BeforeUpdate, 1.0)?;
        self.fit(canvas);
        self.notify(Hook::AfterLayout, 1.0)?;
        self.notify(Hook::AfterUpdate, 1.0)?;
        Ok(())
    }

    /// Paint the laid-out chart: clear, plugins' `before_draw`, scales and boxes, datasets, `after_draw`.
    pub fn draw(&self) -> Result<(), ChartError> {
        self.canvas.ok_or(ChartError::NoCanvas)?;
        let ctx = self.ctx.ok_or(ChartError::NoContext)?;
        let (Some(area), Some(scales)) = (self.chart_area, self.scales.as_ref()) else {
            return Err(ChartError::NotLaidOut);
        };
        ctx.clear(skia::Color::TRANSPARENT);
        self.notify(Hook::BeforeDraw, 1.0)?;
        draw::scales(self, ctx, area, scales);
        draw::title(self, ctx);
        draw::legend(self, ctx);
        self.notify(Hook::BeforeDatasetsDraw, 1.0)?;
        draw::datasets(self, ctx)?;
        self.notify(Hook::AfterDatasetsDraw, 1.0)?;
        self.notify(Hook::AfterDraw, 1.0)?;
        Ok(())
    }

    /// `update` followed by `draw`.
    pub fn render(&mut self) -> Result<(), ChartError> {
        self.update()?;
        self.draw()
    }

    /// Release the canvas and context, run plugins' `destroy` and unregister from the engine.
    /// Later calls do nothing.
    pub fn destroy(&mut self) -> Result<(), ChartError> {
        if !self.attached {
            return Ok(());
        }
        self.attached = false;
        self.canvas = None;
        self.ctx = None;
        self.chart_area = None;
        self.scales = None;
        self.layout = Layout::default();
        let result = self.notify(Hook::Destroy, 1.0);
        self.engine.detach(self.id);
        tracing::debug!(chart = %self.id, "chart destroyed");
        result
    }

    fn notify(&self, hook: Hook, easing: f64) -> Result<(), ChartError> {
        for plugin in self.engine.plugins().iter() {
            let Some(options) = self.plugin_options(plugin.id()) else { continue };
            tracing::trace!(chart = %self.id, plugin = plugin.id(), %hook, "notify");
            let result = match hook {
                Hook::BeforeInit => plugin.before_init(self, &options),
                Hook::AfterInit => plugin.after_init(self, &options),
                Hook::BeforeUpdate => plugin.before_update(self, &options),
                Hook::AfterLayout => plugin.after_layout(self, &options),
                Hook::AfterUpdate => plugin.after_update(self, &options),
                Hook::BeforeDraw => plugin.before_draw(self, easing, &options),
                Hook::BeforeDatasetsDraw => plugin.before_datasets_draw(self, easing, &options),
                Hook::AfterDatasetsDraw => plugin.after_datasets_draw(self, easing, &options),
                Hook::AfterDraw => plugin.after_draw(self, easing, &options),
                Hook::Destroy => plugin.destroy(self, &options),
            };
            result.map_err(|source| ChartError::Plugin { id: plugin.id().to_string(), hook: hook.name(), source })?;
        }
        Ok(())
    }

    // ---- layout -------------------------------------------------------------

    fn fit(&mut self, canvas: CanvasElement) {
        let opts = &self.config.options;
        let pad = opts.layout.padding.unwrap_or(self.engine.defaults.layout_padding);
        let (w, h) = (canvas.width as f32, canvas.height as f32);
        let left = pad.left;
        let right = (w - pad.right).max(left + 1.0);
        let mut top = pad.top;
        let mut bottom = h - pad.bottom;
        let mut layout = Layout::default();

        if opts.title.display && !opts.title.text.is_empty() {
            let font = self.title_font();
            layout.title = Some(((left + right) / 2.0, top + BOX_PADDING));
            top += font.size * LINE_HEIGHT + 2.0 * BOX_PADDING;
        }
        if opts.legend.display {
            let (items, height) = self.fit_legend(left, right, top);
            if !items.is_empty() {
                layout.legend = items;
                top += height;
            }
        }

        let x_font = self.tick_font(&opts.scales.x);
        let y_font = self.tick_font(&opts.scales.y);
        let offset = self.category_offset();
        let count = self.config.category_count();

        if opts.scales.x.display {
            bottom -= x_font.size * LINE_HEIGHT + TICK_MARK + TICK_PADDING;
        }
        if opts.scales.y.display {
            // Room for half of the topmost tick label.
            top += y_font.size * LINE_HEIGHT / 2.0;
        }
        bottom = bottom.max(top + 1.0);

        // Tick count depends on plot height, label width on ticks; the first pass settles both.
        let ticks = self.fit_y_ticks(bottom - top, y_font.size);
        let y_width = if opts.scales.y.display && opts.scales.y.ticks.display {
            let prefix = &opts.scales.y.ticks.prefix;
            let suffix = &opts.scales.y.ticks.suffix;
            let sizing = LinearScale::new(top, bottom, ticks);
            let widest = sizing
                .tick_labels(prefix, suffix)
                .iter()
                .map(|l| self.text.measure_width(l, &y_font))
                .fold(0.0f32, f32::max);
            widest + TICK_MARK + 2.0 * TICK_PADDING
        } else if opts.scales.y.display {
            TICK_MARK
        } else {
            0.0
        };

        let mut plot_right = right;
        if opts.scales.x.display && !offset && count > 0 {
            let last = self.category_label(count - 1);
            plot_right -= self.text.measure_width(&last, &x_font) / 2.0;
        }
        let plot_left = (left + y_width).min(plot_right - 1.0);
        let area = ChartArea::from_ltrb(plot_left, top, plot_right.max(plot_left + 1.0), bottom);

        let ticks = self.fit_y_ticks(area.height(), y_font.size);
        self.scales = Some(Scales {
            x: CategoryScale::new(area.left, area.right, count, offset),
            y: LinearScale::new(area.top, area.bottom, ticks),
        });
        self.chart_area = Some(area);
        self.layout = layout;
        tracing::debug!(chart = %self.id, ?area, "layout");
    }

    fn fit_legend(&self, left: f32, right: f32, top: f32) -> (Vec<LegendItem>, f32) {
        let font = self.font(None);
        let row_height = font.size + BOX_PADDING;
        let avail = right - left;
        let mut rows: Vec<Vec<(usize, f32)>> = vec![Vec::new()];
        let mut row_width = 0.0f32;
        for (i, ds) in self.config.data.datasets.iter().enumerate() {
            if ds.label.is_empty() {
                continue;
            }
            let width = LEGEND_BOX_WIDTH + font.size / 2.0 + self.text.measure_width(&ds.label, &font);
            let needed = if row_width == 0.0 { width } else { row_width + BOX_PADDING + width };
            if needed > avail && row_width > 0.0 {
                rows.push(Vec::new());
                row_width = width;
            } else {
                row_width = needed;
            }
            if let Some(row) = rows.last_mut() {
                row.push((i, width));
            }
        }
        rows.retain(|r| !r.is_empty());
        if rows.is_empty() {
            return (Vec::new(), 0.0);
        }

        let mut items = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            let total: f32 = row.iter().map(|(_, w)| w).sum::<f32>() + BOX_PADDING * (row.len() - 1) as f32;
            let mut x = left + (avail - total).max(0.0) / 2.0;
            let y = top + BOX_PADDING + r as f32 * row_height;
            for &(dataset_index, width) in row {
                items.push(LegendItem { dataset_index, x, y });
                x += width + BOX_PADDING;
            }
        }
        (items, rows.len() as f32 * row_height + BOX_PADDING)
    }

    fn fit_y_ticks(&self, plot_height: f32, font_size: f32) -> Ticks {
        let y = &self.config.options.scales.y;
        let (mut lo, mut hi) = self.value_range().unwrap_or((0.0, 1.0));
        if y.begin_at_zero || y.stacked {
            lo = lo.min(0.0);
            hi = hi.max(0.0);
        }
        if let Some(min) = y.min { lo = min; }
        if let Some(max) = y.max { hi = max; }
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        let by_height = (plot_height / (font_size * 1.5)).ceil().max(2.0) as usize;
        let mut ticks = nice_ticks(lo, hi, by_height.min(MAX_TICKS));
        if let Some(min) = y.min {
            ticks.values.retain(|v| *v >= min);
            if ticks.values.first() != Some(&min) { ticks.values.insert(0, min); }
            ticks.min = min;
        }
        if let Some(max) = y.max {
            ticks.values.retain(|v| *v <= max);
            if ticks.values.last() != Some(&max) { ticks.values.push(max); }
            ticks.max = max;
        }
        ticks
    }

    /// Min and max over visible values; stacked scales use per-category sums split by sign.
    fn value_range(&self) -> Option<(f64, f64)> {
        let datasets = &self.config.data.datasets;
        let visible = || datasets.iter().enumerate().filter(|(_, d)| !d.hidden);
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        if self.config.options.scales.y.stacked {
            for kind in [ChartType::Bar, ChartType::Line] {
                for index in 0..self.config.category_count() {
                    let (mut pos, mut neg) = (0.0, 0.0);
                    for (i, d) in visible() {
                        if self.config.dataset_type(i) != kind { continue; }
                        match d.data.get(index).copied().flatten() {
                            Some(v) if v >= 0.0 => pos += v,
                            Some(v) => neg += v,
                            None => {}
                        }
                    }
                    lo = lo.min(neg);
                    hi = hi.max(pos);
                }
            }
        } else {
            for v in visible().flat_map(|(_, d)| d.data.iter().flatten()) {
                lo = lo.min(*v);
                hi = hi.max(*v);
            }
        }
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }

    /// Bars get a slot per category; pure line charts run edge to edge.
    fn category_offset(&self) -> bool {
        self.config.chart_type == ChartType::Bar
            || (0..self.config.data.datasets.len()).any(|i| self.config.dataset_type(i) == ChartType::Bar)
    }

    pub(crate) fn category_label(&self, index: usize) -> String {
        self.config.data.labels.get(index).cloned().unwrap_or_default()
    }

    pub(crate) fn tick_font(&self, axis: &crate::config::AxisOptions) -> FontSpec {
        self.font(axis.ticks.font_size)
    }

    pub(crate) fn title_font(&self) -> FontSpec {
        self.font(self.config.options.title.font_size).bold()
    }

    // ---- elements -----------------------------------------------------------

    /// Laid-out geometry of every present value in dataset `dataset_index`.
    /// Hidden datasets have no elements.
    pub fn dataset_elements(&self, dataset_index: usize) -> Result<Vec<Element>, ChartError> {
        let scales = self.scales.as_ref().ok_or(ChartError::NotLaidOut)?;
        let Some(ds) = self.config.data.datasets.get(dataset_index) else { return Ok(Vec::new()) };
        if ds.hidden {
            return Ok(Vec::new());
        }
        let defaults = &self.engine.defaults;
        let axes = &self.config.options.scales;
        let stack_values = axes.y.stacked;
        let kind = self.config.dataset_type(dataset_index);

        let value_at = |index: usize, v: f64| -> (f32, f32) {
            if stack_values {
                let start = self.stack_start(dataset_index, index, v);
                let base = scales.y.to_px(start.clamp(scales.y.vmin, scales.y.vmax));
                (scales.y.to_px(start + v), base)
            } else {
                (scales.y.to_px(v), scales.y.base_px())
            }
        };

        let elements = match kind {
            ChartType::Bar => {
                let bars: Vec<usize> = (0..self.config.data.datasets.len())
                    .filter(|&i| self.is_dataset_visible(i) && self.config.dataset_type(i) == ChartType::Bar)
                    .collect();
                let shared = axes.x.stacked || axes.y.stacked;
                let slots = if shared { 1 } else { bars.len().max(1) };
                let slot = if shared { 0 } else { bars.iter().position(|&i| i == dataset_index).unwrap_or(0) };
                let group = scales.x.category_width() * defaults.category_percentage;
                let slot_width = group / slots as f32;
                let width = slot_width * defaults.bar_percentage;
                ds.data
                    .iter()
                    .enumerate()
                    .filter_map(|(index, v)| v.map(|v| (index, v)))
                    .map(|(index, value)| {
                        let (y, base) = value_at(index, value);
                        let x = scales.x.to_px(index as f64) - group / 2.0 + slot_width * (slot as f32 + 0.5);
                        Element { dataset_index, index, value, kind: ElementKind::Bar, x, y, base, width }
                    })
                    .collect()
            }
            ChartType::Line => {
                let radius = ds.point_radius.unwrap_or(defaults.point_radius);
                ds.data
                    .iter()
                    .enumerate()
                    .filter_map(|(index, v)| v.map(|v| (index, v)))
                    .map(|(index, value)| {
                        let (y, base) = value_at(index, value);
                        let x = scales.x.to_px(index as f64);
                        Element { dataset_index, index, value, kind: ElementKind::Point, x, y, base, width: radius * 2.0 }
                    })
                    .collect()
            }
        };
        Ok(elements)
    }

    // Sum of same-signed values stacked below `dataset_index` at `index`.
    fn stack_start(&self, dataset_index: usize, index: usize, value: f64) -> f64 {
        let kind = self.config.dataset_type(dataset_index);
        self.config.data.datasets[..dataset_index]
            .iter()
            .enumerate()
            .filter(|(j, d)| !d.hidden && self.config.dataset_type(*j) == kind)
            .filter_map(|(_, d)| d.data.get(index).copied().flatten())
            .filter(|v| (*v >= 0.0) == (value >= 0.0))
            .sum()
    }
}

impl Drop for Chart<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.destroy() {
            tracing::warn!(chart = %self.id, error = %err, "destroy hook failed during drop");
        }
    }
}

impl std::fmt::Debug for Chart<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("id", &self.id)
            .field("canvas", &self.canvas)
            .field("has_ctx", &self.ctx.is_some())
            .field("chart_area", &self.chart_area)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> ChartConfiguration {
        ChartConfiguration::from_json(json).unwrap()
    }

    #[test]
    fn update_needs_a_canvas_and_draw_needs_a_context() {
        let engine = Engine::new();
        let text = TextShaper::new();
        let cfg = config(r#"{"type": "bar", "data": {"labels": ["a"], "datasets": [{"data": [1]}]}}"#);

        let mut bare = Chart::new(&engine, RenderTarget::empty(), &cfg, &text).unwrap();
        assert!(matches!(bare.update(), Err(ChartError::NoCanvas)));

        let mut headless = Chart::new(&engine, RenderTarget::without_context(200, 100), &cfg, &text).unwrap();
        assert!(matches!(headless.draw(), Err(ChartError::NoContext)));
        headless.update().unwrap();
        assert!(headless.chart_area().is_some());
        assert!(matches!(headless.draw(), Err(ChartError::NoContext)));
    }

    #[test]
    fn stacked_bars_share_a_slot_and_accumulate() {
        let engine = Engine::new();
        let text = TextShaper::new();
        let cfg = config(
            r#"{"type": "bar",
                "data": {"labels": ["a", "b"], "datasets": [{"data": [1, 2]}, {"data": [3, null]}]},
                "options": {"scales": {"x": {"stacked": true}, "y": {"stacked": true}}}}"#,
        );
        let mut chart = Chart::new(&engine, RenderTarget::without_context(400, 300), &cfg, &text).unwrap();
        chart.update().unwrap();
        let lower = chart.dataset_elements(0).unwrap();
        let upper = chart.dataset_elements(1).unwrap();
        assert_eq!(lower.len(), 2);
        assert_eq!(upper.len(), 1);
        assert_eq!(lower[0].x, upper[0].x);
        assert!((upper[0].base - lower[0].y).abs() < 1e-3);
        let y = &chart.scales().unwrap().y;
        assert!(y.vmax >= 4.0);
        assert_eq!(y.vmin, 0.0);
    }

    #[test]
    fn grouped_bars_sit_side_by_side_inside_the_category() {
        let engine = Engine::new();
        let text = TextShaper::new();
        let cfg = config(r#"{"type": "bar", "data": {"labels": ["a"], "datasets": [{"data": [1]}, {"data": [2]}]}}"#);
        let mut chart = Chart::new(&engine, RenderTarget::without_context(400, 300), &cfg, &text).unwrap();
        chart.update().unwrap();
        let a = chart.dataset_elements(0).unwrap()[0];
        let b = chart.dataset_elements(1).unwrap()[0];
        let area = chart.chart_area().unwrap();
        assert!(a.x < b.x);
        assert!(a.x - a.width / 2.0 >= area.left);
        assert!(b.x + b.width / 2.0 <= area.right);
    }

    #[test]
    fn hidden_datasets_have_no_elements_and_no_range() {
        let engine = Engine::new();
        let text = TextShaper::new();
        let cfg = config(
            r#"{"type": "line", "data": {"labels": ["a", "b"],
                "datasets": [{"data": [1, 2]}, {"data": [500, 900], "hidden": true}]}}"#,
        );
        let mut chart = Chart::new(&engine, RenderTarget::without_context(400, 300), &cfg, &text).unwrap();
        assert!(matches!(chart.dataset_elements(0), Err(ChartError::NotLaidOut)));
        chart.update().unwrap();
        assert!(chart.dataset_elements(1).unwrap().is_empty());
        assert!(chart.scales().unwrap().y.vmax < 100.0);
        let points = chart.dataset_elements(0).unwrap();
        let area = chart.chart_area().unwrap();
        assert_eq!(points[0].x, area.left);
    }

    #[test]
    fn extreme_finite_values_lay_out_without_overflow() {
        let engine = Engine::new();
        let text = TextShaper::new();
        for cfg in [
            config(r#"{"type": "bar", "data": {"labels": ["a", "b"], "datasets": [{"data": [1.7e308, -1.7e308]}]}}"#),
            config(
                r#"{"type": "line", "data": {"labels": ["a"], "datasets": [{"data": [1]}]},
                    "options": {"scales": {"y": {"min": -1.7e308, "max": 1.7e308}}}}"#,
            ),
        ] {
            let mut chart = Chart::new(&engine, RenderTarget::without_context(400, 300), &cfg, &text).unwrap();
            chart.update().unwrap();
            let y = &chart.scales().unwrap().y;
            assert!(y.ticks.len() <= MAX_TICKS + 2);
            assert!(y.ticks.iter().all(|t| t.is_finite()));
            let area = chart.chart_area().unwrap();
            for element in chart.dataset_elements(0).unwrap() {
                assert!(element.y.is_finite());
                assert!(element.y >= area.top - 0.5 && element.y <= area.bottom + 0.5);
            }
        }
    }

    #[test]
    fn destroy_releases_everything_once() {
        let engine = Engine::new();
        let text = TextShaper::new();
        let cfg = config(r#"{"type": "line"}"#);
        let mut chart = Chart::new(&engine, RenderTarget::without_context(100, 100), &cfg, &text).unwrap();
        chart.update().unwrap();
        assert_eq!(engine.instance_count(), 1);
        chart.destroy().unwrap();
        chart.destroy().unwrap();
        assert!(chart.canvas().is_none());
        assert!(chart.chart_area().is_none());
        assert_eq!(engine.instance_count(), 0);
    }
}
