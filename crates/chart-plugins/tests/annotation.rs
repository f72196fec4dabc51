// File: crates/chart-plugins/tests/annotation.rs
// Purpose: Annotation draw times, geometry and per-chart state release.

use std::sync::Arc;

use chart_core::skia;
use chart_core::{Chart, ChartArea, ChartConfiguration, ChartError, Engine, RenderTarget, Scales, TextShaper};
use chart_plugins::{AnnotationError, Annotations};
use serde_json::{json, Value};

const W: i32 = 320;
const H: i32 = 240;

struct Rendered {
    pixels: Vec<u8>,
    area: ChartArea,
    scales: Scales,
    bar: chart_core::Element,
}

fn config(options: Value) -> ChartConfiguration {
    let mut options = options;
    chart_core::plugin::merge_values(
        &mut options,
        &json!({"legend": {"display": false},
                "scales": {"x": {"gridLines": {"display": false}}, "y": {"min": 0, "max": 50, "gridLines": {"display": false}}}}),
    );
    ChartConfiguration::from_value(json!({
        "type": "bar",
        "data": {"labels": ["January", "February", "March", "April"],
                 "datasets": [{"data": [20, 30, 10, 40], "backgroundColor": "#ff0000"}]},
        "options": options
    }))
    .unwrap()
}

fn render(engine: &Engine, config: &ChartConfiguration) -> Result<Rendered, ChartError> {
    let info = skia::ImageInfo::new((W, H), skia::ColorType::RGBA8888, skia::AlphaType::Premul, None);
    let mut pixels = vec![0u8; (W * H * 4) as usize];
    let (area, scales, bar) = {
        let canvas = skia::Canvas::from_raster_direct(&info, &mut pixels, None, None).expect("raster canvas");
        let text = TextShaper::new();
        let mut chart = Chart::new(engine, RenderTarget::new(&canvas, W, H), config, &text)?;
        chart.render()?;
        let bar = chart.dataset_elements(0)?[3];
        (chart.chart_area().expect("area"), chart.scales().expect("scales").clone(), bar)
    };
    Ok(Rendered { pixels, area, scales, bar })
}

fn pixel(pixels: &[u8], x: i32, y: i32) -> [u8; 4] {
    let i = ((y * W + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

fn engine_with(plugin: Arc<Annotations>) -> Engine {
    let mut engine = Engine::new();
    engine.register_plugin_arc(plugin);
    engine
}

#[test]
fn box_before_datasets_sits_under_the_bars() {
    let plugin = Arc::new(Annotations::new());
    let engine = engine_with(plugin.clone());
    let cfg = config(json!({"annotation": {"annotations": [
        {"type": "box", "drawTime": "beforeDatasetsDraw", "backgroundColor": "#00ff00"}
    ]}}));
    let r = render(&engine, &cfg).unwrap();
    // Bars stay on top of the box.
    assert_eq!(pixel(&r.pixels, r.bar.x as i32, ((r.bar.y + r.bar.base) / 2.0) as i32), [255, 0, 0, 255]);
    // Above the shortest bar only the box shows.
    let third = r.scales.x.to_px(2.0) as i32;
    assert_eq!(pixel(&r.pixels, third, (r.area.top + 3.0) as i32), [0, 255, 0, 255]);
    assert_eq!(plugin.tracked_charts(), 0);
}

#[test]
fn box_after_datasets_covers_the_bars_it_spans() {
    let plugin = Arc::new(Annotations::new());
    let engine = engine_with(plugin);
    let cfg = config(json!({"plugins": {"annotation": {"annotations": [
        {"type": "box", "xMin": "March", "backgroundColor": "#0000ff"}
    ]}}}));
    let r = render(&engine, &cfg).unwrap();
    assert_eq!(pixel(&r.pixels, r.bar.x as i32, ((r.bar.y + r.bar.base) / 2.0) as i32), [0, 0, 255, 255]);
}

#[test]
fn horizontal_line_lands_on_its_value() {
    let plugin = Arc::new(Annotations::new());
    let engine = engine_with(plugin);
    let cfg = config(json!({"annotation": {"annotations": [
        {"type": "line", "mode": "horizontal", "scaleID": "y-axis-0", "value": 45,
         "borderColor": "black", "borderWidth": 5}
    ]}}));
    let r = render(&engine, &cfg).unwrap();
    let y = r.scales.y.to_px(45.0) as i32;
    let x = ((r.area.left + r.area.right) / 2.0) as i32;
    assert_eq!(pixel(&r.pixels, x, y), [0, 0, 0, 255]);
    assert_eq!(pixel(&r.pixels, x, y - 10)[3], 0);
}

#[test]
fn state_is_held_only_while_the_chart_lives() {
    let plugin = Arc::new(Annotations::new());
    let engine = engine_with(plugin.clone());
    let cfg = config(json!({"annotation": {"annotations": [{"type": "line", "value": 10}]}}));
    let text = TextShaper::new();
    let mut chart = Chart::new(&engine, RenderTarget::without_context(W, H), &cfg, &text).unwrap();
    assert_eq!(plugin.tracked_charts(), 1);
    chart.update().unwrap();
    chart.destroy().unwrap();
    assert_eq!(plugin.tracked_charts(), 0);

    for _ in 0..5 {
        render(&engine, &cfg).unwrap();
    }
    assert_eq!(plugin.tracked_charts(), 0);
}

#[test]
fn unknown_category_fails_the_draw() {
    let engine = engine_with(Arc::new(Annotations::new()));
    let cfg = config(json!({"annotation": {"annotations": [
        {"type": "line", "mode": "vertical", "value": "December"}
    ]}}));
    let err = render(&engine, &cfg).err().expect("render should fail");
    assert!(matches!(&err, ChartError::Plugin { hook: "afterDatasetsDraw", .. }));
    assert!(matches!(
        err.plugin_source().and_then(|e| e.downcast_ref::<AnnotationError>()),
        Some(AnnotationError::UnknownCategory(c)) if c == "December"
    ));
}
