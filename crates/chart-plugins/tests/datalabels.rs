// File: crates/chart-plugins/tests/datalabels.rs
// Purpose: Data-label installation, option layering and the display/formatter callbacks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chart_core::skia;
use chart_core::{Chart, ChartConfiguration, ChartError, Engine, RenderTarget, TextShaper};
use chart_plugins::datalabels::{self, DataLabels};
use serde_json::json;

fn stacked_config() -> ChartConfiguration {
    ChartConfiguration::from_value(json!({
        "type": "bar",
        "data": {
            "labels": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            "datasets": [
                {"label": "Dataset 1", "backgroundColor": "rgb(255, 99, 132)", "data": [12, 19, 3, 5, 2, 3],
                 "datalabels": {"align": "end", "anchor": "start"}},
                {"label": "Dataset 2", "backgroundColor": "rgb(54, 162, 235)", "data": [3, 5, 2, 3, 30, 15, 19, 2],
                 "datalabels": {"align": "center", "anchor": "center"}},
                {"label": "Dataset 3", "backgroundColor": "rgb(75, 192, 192)", "data": [12, 19, 3, 5, 2, 3],
                 "datalabels": {"anchor": "end", "align": "start"}}
            ]
        },
        "options": {
            "plugins": {"datalabels": {"color": "white", "font": {"weight": "bold"}}},
            "scales": {"x": {"stacked": true}, "y": {"stacked": true}}
        }
    }))
    .unwrap()
}

fn render(engine: &Engine, config: &ChartConfiguration) -> Result<(), ChartError> {
    let info = skia::ImageInfo::new((400, 300), skia::ColorType::RGBA8888, skia::AlphaType::Premul, None);
    let mut pixels = vec![0u8; 400 * 300 * 4];
    let canvas = skia::Canvas::from_raster_direct(&info, &mut pixels, None, None).expect("raster canvas");
    let text = TextShaper::new();
    let mut chart = Chart::new(engine, RenderTarget::new(&canvas, 400, 300), config, &text)?;
    chart.render()
}

#[test]
fn install_registers_plugin_and_defaults() {
    let mut engine = Engine::new();
    datalabels::install(&mut engine);
    assert_eq!(engine.plugins().ids(), vec!["datalabels"]);
    assert_eq!(engine.defaults.plugins["datalabels"]["offset"], json!(4));
}

#[test]
fn display_predicate_sees_every_visible_element() {
    let seen = Arc::new(AtomicUsize::new(0));
    let shown = Arc::new(Mutex::new(Vec::new()));
    let counter = seen.clone();
    let labels = shown.clone();
    let plugin = DataLabels::new()
        .display_when(move |ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            ctx.value > 15.0
        })
        .formatter(move |ctx| {
            labels.lock().unwrap().push((ctx.dataset_index, ctx.index));
            format!("{}", ctx.value.round())
        });
    let mut engine = Engine::new();
    datalabels::install_with(&mut engine, plugin);

    render(&engine, &stacked_config()).unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 6 + 8 + 6);
    assert_eq!(*shown.lock().unwrap(), vec![(0, 1), (1, 4), (1, 6), (2, 1)]);
}

#[test]
fn datasets_can_opt_out_and_hidden_ones_are_skipped() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let mut engine = Engine::new();
    datalabels::install_with(&mut engine, DataLabels::new().display_when(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    }));
    let config = ChartConfiguration::from_value(json!({
        "type": "line",
        "data": {"labels": ["a", "b", "c"], "datasets": [
            {"data": [1, 2, 3], "datalabels": false},
            {"data": [4, null, 6]},
            {"data": [7, 8, 9], "hidden": true}
        ]}
    }))
    .unwrap();
    render(&engine, &config).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    let off = ChartConfiguration::from_value(json!({
        "type": "line",
        "data": {"labels": ["a"], "datasets": [{"data": [1]}]},
        "options": {"plugins": {"datalabels": {"display": false}}}
    }))
    .unwrap();
    render(&engine, &off).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn bad_dataset_options_surface_as_plugin_errors() {
    let mut engine = Engine::new();
    datalabels::install(&mut engine);
    let config = ChartConfiguration::from_value(json!({
        "type": "bar",
        "data": {"labels": ["a"], "datasets": [{"data": [1], "datalabels": {"anchor": "sideways"}}]}
    }))
    .unwrap();
    let err = render(&engine, &config).unwrap_err();
    assert!(matches!(err, ChartError::Plugin { hook: "afterDatasetsDraw", .. }));
}
