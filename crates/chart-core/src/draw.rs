// File: crates/chart-core/src/draw.rs
// Summary: Painting routines for scales, title, legend and bar/line datasets on a Skia canvas.

use skia_safe as skia;

use crate::chart::{Chart, Element, LEGEND_BOX_WIDTH, TICK_MARK, TICK_PADDING};
use crate::colour::Colour;
use crate::config::{ChartType, Dataset};
use crate::engine::Defaults;
use crate::error::ChartError;
use crate::geometry::{align_pixel, ChartArea};
use crate::scale::Scales;
use crate::text::{HAlign, VAlign};

pub(crate) fn scales(chart: &Chart<'_>, canvas: &skia::Canvas, area: ChartArea, scales: &Scales) {
    let defaults = &chart.engine().defaults;
    let axes = &chart.config().options.scales;
    let font_colour = |c: &Option<Colour>| c.as_ref().unwrap_or(&defaults.font_color).representative();

    if axes.y.display {
        let grid = axes.y.grid_lines.color.as_ref().unwrap_or(&defaults.grid_color);
        if axes.y.grid_lines.display {
            let zero = axes.y.grid_lines.color.as_ref().unwrap_or(&defaults.zero_line_color);
            for &t in &scales.y.ticks {
                let py = align_pixel(scales.y.to_px(t), 1.0);
                let crosses = t == 0.0 && scales.y.vmin < 0.0 && scales.y.vmax > 0.0;
                let paint = if crosses { zero.stroke_paint(1.0) } else { grid.stroke_paint(1.0) };
                canvas.draw_line((area.left - TICK_MARK, py), (area.right, py), &paint);
            }
        }
        if axes.y.ticks.display {
            let font = chart.tick_font(&axes.y);
            let colour = font_colour(&axes.y.ticks.font_color);
            let labels = scales.y.tick_labels(&axes.y.ticks.prefix, &axes.y.ticks.suffix);
            for (&t, label) in scales.y.ticks.iter().zip(&labels) {
                let x = area.left - TICK_MARK - TICK_PADDING;
                chart.text().draw(canvas, label, x, scales.y.to_px(t), &font, colour, HAlign::Right, VAlign::Middle);
            }
        }
        let x = align_pixel(area.left, 1.0);
        canvas.draw_line((x, area.top), (x, area.bottom), &grid.stroke_paint(1.0));
    }

    if axes.x.display {
        let grid = axes.x.grid_lines.color.as_ref().unwrap_or(&defaults.grid_color);
        if axes.x.grid_lines.display {
            let paint = grid.stroke_paint(1.0);
            for px in scales.x.grid_positions() {
                let px = align_pixel(px, 1.0);
                canvas.draw_line((px, area.top), (px, area.bottom + TICK_MARK), &paint);
            }
        }
        if axes.x.ticks.display {
            let font = chart.tick_font(&axes.x);
            let colour = font_colour(&axes.x.ticks.font_color);
            let y = area.bottom + TICK_MARK + TICK_PADDING / 2.0;
            for i in 0..scales.x.count {
                let label = chart.category_label(i);
                if label.is_empty() {
                    continue;
                }
                let x = scales.x.to_px(i as f64);
                chart.text().draw(canvas, &label, x, y, &font, colour, HAlign::Center, VAlign::Top);
            }
        }
        let y = align_pixel(area.bottom, 1.0);
        canvas.draw_line((area.left, y), (area.right, y), &grid.stroke_paint(1.0));
    }
}

pub(crate) fn title(chart: &Chart<'_>, canvas: &skia::Canvas) {
    let Some((x, y)) = chart.layout().title else { return };
    let title = &chart.config().options.title;
    let colour = title.font_color.as_ref().unwrap_or(&chart.engine().defaults.font_color).representative();
    chart.text().draw(canvas, &title.text, x, y, &chart.title_font(), colour, HAlign::Center, VAlign::Top);
}

pub(crate) fn legend(chart: &Chart<'_>, canvas: &skia::Canvas) {
    let defaults = &chart.engine().defaults;
    let font = chart.font(None);
    let colour = defaults.font_color.representative();
    for item in &chart.layout().legend {
        let Some(ds) = chart.config().data.datasets.get(item.dataset_index) else { continue };
        let swatch = skia::Rect::from_xywh(item.x, item.y, LEGEND_BOX_WIDTH, font.size);
        canvas.draw_rect(swatch, &fill_for(ds, 0, defaults).fill_paint());
        let border = ds.border_width.unwrap_or(0.0);
        if border > 0.0 {
            canvas.draw_rect(swatch, &stroke_for(ds, 0, defaults).stroke_paint(border));
        }

        let tx = item.x + LEGEND_BOX_WIDTH + font.size / 2.0;
        let ty = item.y + font.size / 2.0;
        chart.text().draw(canvas, &ds.label, tx, ty, &font, colour, HAlign::Left, VAlign::Middle);
        if ds.hidden {
            let w = chart.text().measure_width(&ds.label, &font);
            let mut strike = skia::Paint::default();
            strike.set_color(colour);
            strike.set_stroke_width(1.0);
            canvas.draw_line((tx, ty), (tx + w, ty), &strike);
        }
    }
}

/// Bars first, then lines; within each kind the first dataset ends up on top.
pub(crate) fn datasets(chart: &Chart<'_>, canvas: &skia::Canvas) -> Result<(), ChartError> {
    let count = chart.config().data.datasets.len();
    for kind in [ChartType::Bar, ChartType::Line] {
        for i in (0..count).rev() {
            if chart.config().dataset_type(i) != kind || !chart.is_dataset_visible(i) {
                continue;
            }
            let elements = chart.dataset_elements(i)?;
            let ds = &chart.config().data.datasets[i];
            match kind {
                ChartType::Bar => bars(chart, canvas, ds, &elements),
                ChartType::Line => line(chart, canvas, ds, &elements),
            }
        }
    }
    Ok(())
}

fn bars(chart: &Chart<'_>, canvas: &skia::Canvas, ds: &Dataset, elements: &[Element]) {
    let defaults = &chart.engine().defaults;
    let border = ds.border_width.unwrap_or(0.0);
    for e in elements {
        let half = e.width / 2.0;
        let rect = skia::Rect::from_ltrb(e.x - half, e.y.min(e.base), e.x + half, e.y.max(e.base));
        canvas.draw_rect(rect, &fill_for(ds, e.index, defaults).fill_paint());
        if border > 0.0 {
            canvas.draw_rect(rect, &stroke_for(ds, e.index, defaults).stroke_paint(border));
        }
    }
}

fn line(chart: &Chart<'_>, canvas: &skia::Canvas, ds: &Dataset, elements: &[Element]) {
    let defaults = &chart.engine().defaults;
    // A missing value breaks the line.
    let mut segments: Vec<&[Element]> = Vec::new();
    let mut start = 0;
    for i in 1..=elements.len() {
        if i == elements.len() || elements[i].index != elements[i - 1].index + 1 {
            segments.push(&elements[start..i]);
            start = i;
        }
    }

    if ds.fill.unwrap_or(true) {
        let paint = fill_for(ds, 0, defaults).fill_paint();
        for seg in segments.iter().filter(|s| s.len() > 1) {
            let mut path = skia::Path::new();
            path.move_to((seg[0].x, seg[0].base));
            for e in seg.iter() {
                path.line_to((e.x, e.y));
            }
            path.line_to((seg[seg.len() - 1].x, seg[seg.len() - 1].base));
            path.close();
            canvas.draw_path(&path, &paint);
        }
    }

    let width = ds.border_width.unwrap_or(defaults.line_width);
    if width > 0.0 {
        let mut paint = stroke_for(ds, 0, defaults).stroke_paint(width);
        paint.set_stroke_join(skia::paint::Join::Round);
        for seg in segments.iter().filter(|s| s.len() > 1) {
            let mut path = skia::Path::new();
            path.move_to((seg[0].x, seg[0].y));
            for e in &seg[1..] {
                path.line_to((e.x, e.y));
            }
            canvas.draw_path(&path, &paint);
        }
    }

    for e in elements {
        let radius = e.width / 2.0;
        if radius <= 0.0 {
            continue;
        }
        canvas.draw_circle((e.x, e.y), radius, &fill_for(ds, e.index, defaults).fill_paint());
        canvas.draw_circle((e.x, e.y), radius, &stroke_for(ds, e.index, defaults).stroke_paint(1.0));
    }
}

fn fill_for<'a>(ds: &'a Dataset, index: usize, defaults: &'a Defaults) -> &'a Colour {
    ds.background_color.as_ref().and_then(|c| c.at(index)).unwrap_or(&defaults.default_color)
}

fn stroke_for<'a>(ds: &'a Dataset, index: usize, defaults: &'a Defaults) -> &'a Colour {
    ds.border_color.as_ref().and_then(|c| c.at(index)).unwrap_or(&defaults.default_color)
}
