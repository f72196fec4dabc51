// File: crates/chart-plugins/src/annotation.rs
// Summary: Line and box annotations drawn at a chosen point of the draw cycle, tracked per chart.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chart_core::text::{HAlign, VAlign};
use chart_core::{Chart, ChartArea, ChartId, Colour, HookResult, Plugin, Scales};
use serde::Deserialize;
use serde_json::Value;
use skia_safe as skia;
use thiserror::Error;

pub const ID: &str = "annotation";

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("invalid annotation options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("annotation references unknown category '{0}'")]
    UnknownCategory(String),
}

/// When an annotation is painted relative to the datasets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawTime {
    BeforeDatasetsDraw,
    #[default]
    AfterDatasetsDraw,
    AfterDraw,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Horizontal,
    Vertical,
}

/// A position on either axis: a value (y) / index (x), or a category label.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Label(String),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineLabel {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub background_color: Option<Colour>,
    #[serde(default)]
    pub font_color: Option<Colour>,
    #[serde(default)]
    pub font_size: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAnnotation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub draw_time: Option<DrawTime>,
    #[serde(default)]
    pub mode: Mode,
    pub value: AxisValue,
    #[serde(default)]
    pub border_color: Option<Colour>,
    #[serde(default)]
    pub border_width: Option<f32>,
    #[serde(default)]
    pub border_dash: Vec<f32>,
    #[serde(default)]
    pub label: Option<LineLabel>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxAnnotation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub draw_time: Option<DrawTime>,
    #[serde(default)]
    pub x_min: Option<AxisValue>,
    #[serde(default)]
    pub x_max: Option<AxisValue>,
    #[serde(default)]
    pub y_min: Option<AxisValue>,
    #[serde(default)]
    pub y_max: Option<AxisValue>,
    #[serde(default)]
    pub background_color: Option<Colour>,
    #[serde(default)]
    pub border_color: Option<Colour>,
    #[serde(default)]
    pub border_width: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Line(LineAnnotation),
    Box(BoxAnnotation),
}

impl Annotation {
    fn draw_time(&self) -> Option<DrawTime> {
        match self {
            Annotation::Line(a) => a.draw_time,
            Annotation::Box(a) => a.draw_time,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationOptions {
    #[serde(default)]
    draw_time: DrawTime,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

#[derive(Debug)]
struct Tracked {
    annotations: Vec<Annotation>,
    default_time: DrawTime,
}

/// Annotation plugin. Parsed annotations are kept per chart from `after_init` until `destroy`.
///
/// Annotations are read from the plugin options (`options.plugins.annotation.annotations`)
/// or, failing that, from a top-level `options.annotation` block.
#[derive(Debug, Default)]
pub struct Annotations {
    charts: Mutex<HashMap<ChartId, Tracked>>,
}

impl Annotations {
    pub fn new() -> Self { Self::default() }

    /// Charts whose annotation state is currently held.
    pub fn tracked_charts(&self) -> usize {
        self.charts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn parse(chart: &Chart<'_>, options: &Value) -> Result<AnnotationOptions, AnnotationError> {
        let from_plugin = options.get("annotations").is_some();
        let source = if from_plugin {
            options
        } else {
            match chart.config().options.extra.get(ID) {
                Some(block) => block,
                None => options,
            }
        };
        Ok(AnnotationOptions::deserialize(source)?)
    }

    fn draw_phase(&self, chart: &Chart<'_>, phase: DrawTime) -> Result<(), AnnotationError> {
        let (Some(ctx), Some(area), Some(scales)) = (chart.ctx(), chart.chart_area(), chart.scales()) else {
            return Ok(());
        };
        let charts = self.charts.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tracked) = charts.get(&chart.id()) else { return Ok(()) };
        let due = tracked
            .annotations
            .iter()
            .filter(|a| a.draw_time().unwrap_or(tracked.default_time) == phase);
        for annotation in due {
            let saved = ctx.save();
            ctx.clip_rect(area.to_rect(), None, Some(true));
            let result = match annotation {
                Annotation::Box(b) => draw_box(chart, ctx, area, scales, b),
                Annotation::Line(l) => draw_line(chart, ctx, area, scales, l),
            };
            ctx.restore_to_count(saved);
            result?;
        }
        Ok(())
    }
}

impl Plugin for Annotations {
    fn id(&self) -> &str { ID }

    fn after_init(&self, chart: &Chart<'_>, options: &Value) -> HookResult {
        let parsed = Self::parse(chart, options)?;
        tracing::debug!(chart = %chart.id(), count = parsed.annotations.len(), "annotations parsed");
        self.charts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chart.id(), Tracked { annotations: parsed.annotations, default_time: parsed.draw_time });
        Ok(())
    }

    fn before_datasets_draw(&self, chart: &Chart<'_>, _easing: f64, _options: &Value) -> HookResult {
        Ok(self.draw_phase(chart, DrawTime::BeforeDatasetsDraw)?)
    }

    fn after_datasets_draw(&self, chart: &Chart<'_>, _easing: f64, _options: &Value) -> HookResult {
        Ok(self.draw_phase(chart, DrawTime::AfterDatasetsDraw)?)
    }

    fn after_draw(&self, chart: &Chart<'_>, _easing: f64, _options: &Value) -> HookResult {
        Ok(self.draw_phase(chart, DrawTime::AfterDraw)?)
    }

    fn destroy(&self, chart: &Chart<'_>, _options: &Value) -> HookResult {
        self.charts.lock().unwrap_or_else(PoisonError::into_inner).remove(&chart.id());
        Ok(())
    }
}

fn category_index(chart: &Chart<'_>, value: &AxisValue) -> Result<f64, AnnotationError> {
    match value {
        AxisValue::Number(n) => Ok(*n),
        AxisValue::Label(label) => chart
            .config()
            .data
            .labels
            .iter()
            .position(|l| l == label)
            .map(|i| i as f64)
            .ok_or_else(|| AnnotationError::UnknownCategory(label.clone())),
    }
}

fn y_value(value: &AxisValue) -> Result<f64, AnnotationError> {
    match value {
        AxisValue::Number(n) => Ok(*n),
        AxisValue::Label(s) => s.trim().parse().map_err(|_| AnnotationError::UnknownCategory(s.clone())),
    }
}

fn draw_box(
    chart: &Chart<'_>,
    ctx: &skia::Canvas,
    area: ChartArea,
    scales: &Scales,
    b: &BoxAnnotation,
) -> Result<(), AnnotationError> {
    let x = |v: &Option<AxisValue>, edge: f32| -> Result<f32, AnnotationError> {
        v.as_ref().map_or(Ok(edge), |v| Ok(scales.x.to_px(category_index(chart, v)?)))
    };
    let y = |v: &Option<AxisValue>, edge: f32| -> Result<f32, AnnotationError> {
        v.as_ref().map_or(Ok(edge), |v| Ok(scales.y.to_px(y_value(v)?)))
    };
    let (x0, x1) = (x(&b.x_min, area.left)?, x(&b.x_max, area.right)?);
    let (y0, y1) = (y(&b.y_max, area.top)?, y(&b.y_min, area.bottom)?);
    let rect = skia::Rect::from_ltrb(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1));
    if let Some(fill) = &b.background_color {
        ctx.draw_rect(rect, &fill.fill_paint());
    }
    let width = b.border_width.unwrap_or(1.0);
    if let (Some(stroke), true) = (&b.border_color, width > 0.0) {
        ctx.draw_rect(rect, &stroke.stroke_paint(width));
    }
    Ok(())
}

fn draw_line(
    chart: &Chart<'_>,
    ctx: &skia::Canvas,
    area: ChartArea,
    scales: &Scales,
    l: &LineAnnotation,
) -> Result<(), AnnotationError> {
    let (from, to) = match l.mode {
        Mode::Horizontal => {
            let y = scales.y.to_px(y_value(&l.value)?);
            ((area.left, y), (area.right, y))
        }
        Mode::Vertical => {
            let x = scales.x.to_px(category_index(chart, &l.value)?);
            ((x, area.top), (x, area.bottom))
        }
    };
    let colour = l.border_color.clone().unwrap_or_else(|| Colour::rgba(0, 0, 0, 255));
    let mut paint = colour.stroke_paint(l.border_width.unwrap_or(1.0));
    if l.border_dash.len() >= 2 {
        paint.set_path_effect(skia::PathEffect::dash(&l.border_dash, 0.0));
    }
    ctx.draw_line(from, to, &paint);

    if let Some(label) = l.label.as_ref().filter(|label| label.enabled && !label.content.is_empty()) {
        let font = chart.font(label.font_size).bold();
        let (w, h) = chart.text().measure(&label.content, &font);
        let (cx, cy) = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
        let (pad_x, pad_y) = (6.0, 6.0);
        let bg = skia::Rect::from_xywh(cx - w / 2.0 - pad_x, cy - h / 2.0 - pad_y, w + 2.0 * pad_x, h + 2.0 * pad_y);
        let fill = label.background_color.clone().unwrap_or_else(|| Colour::rgba(0, 0, 0, 204));
        ctx.draw_round_rect(bg, 6.0, 6.0, &fill.fill_paint());
        let text = label.font_color.as_ref().map_or(skia::Color::WHITE, Colour::representative);
        chart.text().draw(ctx, &label.content, cx, cy, &font, text, HAlign::Center, VAlign::Middle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_both_annotation_kinds() {
        let o: AnnotationOptions = serde_json::from_value(json!({
            "annotations": [
                {"type": "line", "mode": "horizontal", "scaleID": "y-axis-0", "value": 48,
                 "borderColor": "black", "borderWidth": 5, "label": {"enabled": true, "content": "Test Label"}},
                {"type": "box", "drawTime": "beforeDatasetsDraw", "xMin": "February", "xMax": "April",
                 "yMin": -23, "yMax": 40, "backgroundColor": "rgba(101, 33, 171, 0.5)"}
            ]
        }))
        .unwrap();
        assert_eq!(o.draw_time, DrawTime::AfterDatasetsDraw);
        assert_eq!(o.annotations.len(), 2);
        assert!(matches!(&o.annotations[0], Annotation::Line(l) if l.value == AxisValue::Number(48.0)));
        assert_eq!(o.annotations[1].draw_time(), Some(DrawTime::BeforeDatasetsDraw));
    }

    #[test]
    fn unknown_kinds_are_rejected() {
        let r: Result<AnnotationOptions, _> =
            serde_json::from_value(json!({"annotations": [{"type": "ellipse", "value": 1}]}));
        assert!(r.is_err());
    }
}
