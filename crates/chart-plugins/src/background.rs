// File: crates/chart-plugins/src/background.rs
// Summary: Canvas background plugin: paints canvas fill, border and plot-area fill under the chart.

use chart_core::{Chart, Colour, HookResult, Plugin};
use serde::Deserialize;
use serde_json::Value;
use skia_safe as skia;
use thiserror::Error;

pub const ID: &str = "canvasBackground";

#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("Canvas is invalid")]
    MissingCanvas,
    #[error("ChartArea is invalid")]
    MissingChartArea,
    #[error("Context is invalid")]
    MissingContext,
    #[error("invalid canvasBackground options: {0}")]
    Options(#[from] serde_json::Error),
}

/// Options read from `options.plugins.canvasBackground`.
///
/// Every layer is optional; a missing field means that layer is not painted. The older
/// `canvasColour` / `border` / `chartAreaColour` names are accepted as aliases.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundOptions {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, alias = "canvasColour")]
    pub canvas_fill: Option<Colour>,
    #[serde(default, alias = "border")]
    pub border_width: Option<f32>,
    #[serde(default)]
    pub border_colour: Option<Colour>,
    #[serde(default, alias = "chartAreaColour")]
    pub plot_area_fill: Option<Colour>,
}

impl BackgroundOptions {
    pub fn from_value(options: &Value) -> Result<Self, BackgroundError> {
        Ok(Self::deserialize(options)?)
    }
}

/// Paints under-layers in `before_draw`, after layout and before any scale or dataset.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasBackground;

impl CanvasBackground {
    pub fn new() -> Self { Self }

    /// Paint the layers `options` asks for. Disabled options paint nothing and never fail.
    pub fn paint(&self, chart: &Chart<'_>, options: &BackgroundOptions) -> Result<(), BackgroundError> {
        if !options.enabled {
            return Ok(());
        }
        let canvas = chart.canvas().ok_or(BackgroundError::MissingCanvas)?;
        let area = chart.chart_area().ok_or(BackgroundError::MissingChartArea)?;
        let ctx = chart.ctx().ok_or(BackgroundError::MissingContext)?;

        let full = skia::Rect::from_wh(canvas.width as f32, canvas.height as f32);
        let saved = ctx.save();
        if let Some(fill) = &options.canvas_fill {
            ctx.draw_rect(full, &fill.fill_paint());
        }
        if let (Some(colour), Some(width)) = (&options.border_colour, options.border_width) {
            if width != 0.0 {
                ctx.draw_rect(full, &colour.stroke_paint(width));
            }
        }
        if let Some(fill) = &options.plot_area_fill {
            ctx.draw_rect(area.to_rect(), &fill.fill_paint());
        }
        ctx.restore_to_count(saved);
        Ok(())
    }
}

impl Plugin for CanvasBackground {
    fn id(&self) -> &str { ID }

    fn before_draw(&self, chart: &Chart<'_>, _easing: f64, options: &Value) -> HookResult {
        let options = BackgroundOptions::from_value(options)?;
        self.paint(chart, &options)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_disabled() {
        let o = BackgroundOptions::from_value(&json!({})).unwrap();
        assert_eq!(o, BackgroundOptions::default());
        assert!(!o.enabled);
    }

    #[test]
    fn accepts_legacy_names() {
        let o = BackgroundOptions::from_value(&json!({
            "enabled": true, "canvasColour": "#F5F5F5", "border": 4, "borderColour": "#A9A9A9", "chartAreaColour": "white"
        }))
        .unwrap();
        assert_eq!(o.canvas_fill, Some(Colour::parse("#F5F5F5").unwrap()));
        assert_eq!(o.border_width, Some(4.0));
        assert!(o.plot_area_fill.is_some());
    }

    #[test]
    fn bad_colours_are_option_errors() {
        let err = BackgroundOptions::from_value(&json!({"enabled": true, "canvasFill": "not-a-colour"})).unwrap_err();
        assert!(matches!(err, BackgroundError::Options(_)));
    }
}
