// File: crates/chart-plugins/src/datalabels.rs
// Summary: Data-label plugin: draws each element's value next to its bar or point.

use std::sync::Arc;

use chart_core::plugin::merge_values;
use chart_core::text::{HAlign, VAlign};
use chart_core::{Chart, Colour, Element, ElementKind, Engine, HookResult, Plugin};
use serde::Deserialize;
use serde_json::{json, Value};

pub const ID: &str = "datalabels";

/// What a display predicate or formatter sees for one label.
#[derive(Clone, Copy, Debug)]
pub struct LabelContext<'a> {
    pub dataset_index: usize,
    pub index: usize,
    pub value: f64,
    pub dataset_label: &'a str,
}

pub type DisplayFn = Arc<dyn Fn(&LabelContext<'_>) -> bool + Send + Sync>;
pub type FormatFn = Arc<dyn Fn(&LabelContext<'_>) -> String + Send + Sync>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    Center,
    Start,
    End,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Center,
    Start,
    End,
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct FontOptions {
    #[serde(default)]
    size: Option<f32>,
    #[serde(default)]
    weight: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct LabelOptions {
    #[serde(default = "yes")]
    display: bool,
    #[serde(default)]
    color: Option<Colour>,
    #[serde(default)]
    font: FontOptions,
    #[serde(default)]
    anchor: Anchor,
    #[serde(default)]
    align: Align,
    #[serde(default = "default_offset")]
    offset: f32,
    /// Round values to this many decimals before printing.
    #[serde(default)]
    precision: Option<usize>,
}

fn yes() -> bool { true }
fn default_offset() -> f32 { 4.0 }

/// Label plugin. Options come from `options.plugins.datalabels`, overridden per dataset by a
/// `datalabels` block on the dataset (`false` there hides that dataset's labels).
#[derive(Clone, Default)]
pub struct DataLabels {
    display: Option<DisplayFn>,
    formatter: Option<FormatFn>,
}

impl DataLabels {
    pub fn new() -> Self { Self::default() }

    /// Show a label only where `f` returns true (on top of the `display` option).
    pub fn display_when(mut self, f: impl Fn(&LabelContext<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.display = Some(Arc::new(f));
        self
    }

    pub fn formatter(mut self, f: impl Fn(&LabelContext<'_>) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(f));
        self
    }

    fn dataset_options(chart: &Chart<'_>, dataset_index: usize, options: &Value) -> Option<Result<LabelOptions, serde_json::Error>> {
        let ds = chart.config().data.datasets.get(dataset_index)?;
        let mut merged = options.clone();
        match ds.extra.get(ID) {
            Some(Value::Bool(false)) => return None,
            Some(block @ Value::Object(_)) => merge_values(&mut merged, block),
            _ => {}
        }
        Some(LabelOptions::deserialize(&merged))
    }

    fn text_for(&self, ctx: &LabelContext<'_>, opts: &LabelOptions) -> String {
        if let Some(f) = &self.formatter {
            return f(ctx);
        }
        match opts.precision {
            Some(p) => format!("{:.*}", p, ctx.value),
            None => format_number(ctx.value),
        }
    }
}

impl std::fmt::Debug for DataLabels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLabels")
            .field("display", &self.display.is_some())
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

impl Plugin for DataLabels {
    fn id(&self) -> &str { ID }

    fn after_datasets_draw(&self, chart: &Chart<'_>, _easing: f64, options: &Value) -> HookResult {
        let Some(canvas) = chart.ctx() else { return Ok(()) };
        let defaults = &chart.engine().defaults;
        for dataset_index in 0..chart.config().data.datasets.len() {
            if !chart.is_dataset_visible(dataset_index) {
                continue;
            }
            let Some(opts) = Self::dataset_options(chart, dataset_index, options) else { continue };
            let opts = opts?;
            if !opts.display {
                continue;
            }
            let ds = &chart.config().data.datasets[dataset_index];
            let mut font = chart.font(opts.font.size);
            if let Some(weight) = &opts.font.weight {
                font = font.with_weight(weight);
            }
            let colour = opts.color.as_ref().unwrap_or(&defaults.font_color).representative();

            for element in chart.dataset_elements(dataset_index)? {
                let ctx = LabelContext { dataset_index, index: element.index, value: element.value, dataset_label: &ds.label };
                if self.display.as_ref().is_some_and(|f| !f(&ctx)) {
                    continue;
                }
                let text = self.text_for(&ctx, &opts);
                let (w, h) = chart.text().measure(&text, &font);
                let (x, y) = label_centre(&element, &opts, w, h);
                chart.text().draw(canvas, &text, x, y, &font, colour, HAlign::Center, VAlign::Middle);
            }
        }
        Ok(())
    }
}

/// Register the plugin and its defaults on `engine`, as loading the module would.
pub fn install(engine: &mut Engine) {
    install_with(engine, DataLabels::new());
}

pub fn install_with(engine: &mut Engine, plugin: DataLabels) {
    engine.register_plugin(plugin);
    engine.set_plugin_defaults(ID, json!({"display": true, "anchor": "center", "align": "center", "offset": 4}));
}

// Anchor picks a point on the element; align then moves the label away from it.
fn label_centre(e: &Element, opts: &LabelOptions, w: f32, h: f32) -> (f32, f32) {
    let (ax, ay) = match (e.kind, opts.anchor) {
        (ElementKind::Point, _) | (ElementKind::Bar, Anchor::End) => (e.x, e.y),
        (ElementKind::Bar, Anchor::Center) => (e.x, (e.y + e.base) / 2.0),
        (ElementKind::Bar, Anchor::Start) => (e.x, e.base),
    };
    // Direction pointing from the base towards the value.
    let up = if e.y <= e.base { -1.0 } else { 1.0 };
    let dy = opts.offset + h / 2.0;
    let dx = opts.offset + w / 2.0;
    match opts.align {
        Align::Center => (ax, ay),
        Align::End => (ax, ay + up * dy),
        Align::Start => (ax, ay - up * dy),
        Align::Top => (ax, ay - dy),
        Align::Bottom => (ax, ay + dy),
        Align::Left => (ax - dx, ay),
        Align::Right => (ax + dx, ay),
    }
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(anchor: Anchor, align: Align) -> LabelOptions {
        LabelOptions { display: true, color: None, font: FontOptions::default(), anchor, align, offset: 4.0, precision: None }
    }

    fn bar() -> Element {
        Element { dataset_index: 0, index: 0, value: 5.0, kind: ElementKind::Bar, x: 50.0, y: 20.0, base: 100.0, width: 10.0 }
    }

    #[test]
    fn anchors_and_aligns_follow_the_bar_direction() {
        assert_eq!(label_centre(&bar(), &opts(Anchor::Center, Align::Center), 10.0, 10.0), (50.0, 60.0));
        // Start anchor with end alignment sits just inside the base, towards the tip.
        assert_eq!(label_centre(&bar(), &opts(Anchor::Start, Align::End), 10.0, 10.0), (50.0, 91.0));
        // End anchor with start alignment sits just inside the tip.
        assert_eq!(label_centre(&bar(), &opts(Anchor::End, Align::Start), 10.0, 10.0), (50.0, 29.0));

        let mut negative = bar();
        negative.y = 150.0;
        assert_eq!(label_centre(&negative, &opts(Anchor::End, Align::End), 10.0, 10.0), (50.0, 159.0));
    }

    #[test]
    fn numbers_print_like_the_source_value() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn option_defaults() {
        let o: LabelOptions = serde_json::from_value(json!({})).unwrap();
        assert!(o.display);
        assert_eq!(o.offset, 4.0);
        assert_eq!(o.anchor, Anchor::Center);
    }
}
