// File: crates/chart-core/tests/smoke.rs
// Purpose: End-to-end draw onto a raster canvas with pixel spot checks.

use chart_core::skia;
use chart_core::{Chart, ChartConfiguration, Element, Engine, RenderTarget, TextShaper};
use serde_json::json;

const W: i32 = 200;
const H: i32 = 150;

fn draw(config: &ChartConfiguration) -> (Vec<u8>, Vec<Vec<Element>>) {
    let info = skia::ImageInfo::new((W, H), skia::ColorType::RGBA8888, skia::AlphaType::Premul, None);
    let mut pixels = vec![0u8; (W * H * 4) as usize];
    // Stale content the draw must clear.
    pixels.fill(0x7f);
    let elements = {
        let canvas = skia::Canvas::from_raster_direct(&info, &mut pixels, None, None).expect("raster canvas");
        let engine = Engine::new();
        let text = TextShaper::new();
        let mut chart = Chart::new(&engine, RenderTarget::new(&canvas, W, H), config, &text).expect("chart");
        chart.render().expect("render");
        let elements: Vec<Vec<Element>> =
            (0..config.data.datasets.len()).map(|i| chart.dataset_elements(i).expect("elements")).collect();
        elements
    };
    (pixels, elements)
}

fn pixel(pixels: &[u8], x: i32, y: i32) -> [u8; 4] {
    let i = ((y * W + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

#[test]
fn bars_are_painted_in_their_dataset_colour() {
    let config = ChartConfiguration::from_value(json!({
        "type": "bar",
        "data": {"labels": ["a", "b", "c"], "datasets": [{"data": [4, 8, 2], "backgroundColor": "#ff0000"}]},
        "options": {"legend": {"display": false}, "scales": {"y": {"beginAtZero": true}}}
    }))
    .unwrap();
    let (pixels, elements) = draw(&config);
    assert_eq!(elements[0].len(), 3);
    let tallest = elements[0][1];
    assert!(tallest.y < tallest.base);
    let mid = ((tallest.y + tallest.base) / 2.0) as i32;
    assert_eq!(pixel(&pixels, tallest.x as i32, mid), [255, 0, 0, 255]);
    // The draw starts from a cleared canvas.
    assert_eq!(pixel(&pixels, 0, 0)[3], 0);
}

#[test]
fn per_point_colours_and_null_gaps() {
    let config = ChartConfiguration::from_value(json!({
        "type": "line",
        "data": {"labels": ["a", "b", "c", "d"],
                 "datasets": [{"data": [1, null, 3, 4], "fill": false, "pointRadius": 0},
                              {"type": "bar", "data": [2, 2, 2, 2], "backgroundColor": ["#00ff00", "#0000ff", "#00ff00", "#0000ff"]}]},
        "options": {"legend": {"display": false}}
    }))
    .unwrap();
    let (pixels, elements) = draw(&config);
    assert_eq!(elements[0].len(), 3);
    let blue = elements[1][1];
    let green = elements[1][2];
    let y = ((blue.y + blue.base) / 2.0) as i32;
    assert_eq!(pixel(&pixels, blue.x as i32, y), [0, 0, 255, 255]);
    assert_eq!(pixel(&pixels, green.x as i32, y), [0, 255, 0, 255]);
}
