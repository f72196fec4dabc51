// File: crates/chart-canvas/benches/service_bench.rs
// Summary: End-to-end render + encode throughput per media type on one reused service.

use chart_canvas::chart_core::ChartConfiguration;
use chart_canvas::{ChartRenderService, MimeType, SurfaceKind};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn config(n: usize) -> ChartConfiguration {
    let labels: Vec<String> = (0..n).map(|i| format!("d{i}")).collect();
    let data: Vec<f64> = (0..n).map(|i| (i as f64 * 0.3).cos() * 8.0 + 10.0).collect();
    ChartConfiguration::from_value(json!({
        "type": "line",
        "data": {"labels": labels, "datasets": [{"label": "load", "data": data, "borderColor": "#3366cc"}]}
    }))
    .expect("valid config")
}

fn bench_service(c: &mut Criterion) {
    let raster = ChartRenderService::new(800, 500).expect("raster service");
    let vector = ChartRenderService::builder(800, 500).surface(SurfaceKind::Svg).build().expect("svg service");
    let config = config(90);
    let mut group = c.benchmark_group("render_service");
    for mime in [MimeType::Png, MimeType::Jpeg] {
        group.bench_function(mime.extension(), |b| {
            b.iter(|| black_box(raster.render_to_buffer_sync(&config, Some(mime)).expect("render")));
        });
    }
    group.bench_function("svg", |b| {
        b.iter(|| black_box(vector.render_to_buffer_sync(&config, None).expect("render")));
    });
    group.finish();
}

criterion_group!(benches, bench_service);
criterion_main!(benches);
