// File: crates/chart-core/src/grid.rs
// Summary: Tick layout helpers: "nice" numeric steps and label formatting.

/// Round `range` to 1, 2, 5 or 10 times a power of ten.
pub fn nice_num(range: f64, round: bool) -> f64 {
    if range <= 0.0 || !range.is_finite() { return 1.0; }
    let exponent = range.log10().floor();
    let fraction = range / 10f64.powf(exponent);
    let nice = if round {
        if fraction < 1.5 { 1.0 } else if fraction < 3.0 { 2.0 } else if fraction < 7.0 { 5.0 } else { 10.0 }
    } else if fraction <= 1.0 { 1.0 } else if fraction <= 2.0 { 2.0 } else if fraction <= 5.0 { 5.0 } else { 10.0 };
    nice * 10f64.powf(exponent)
}

/// Evenly spaced tick values covering `[min, max]`, at most `max_ticks` of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Ticks {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub values: Vec<f64>,
}

pub fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> Ticks {
    // Overflowed stack sums arrive as infinities; keep them on the representable range.
    let (mut min, mut max) = (representable(min), representable(max));
    if (max - min).abs() < 1e-12 {
        // Flat data: open a unit window around the value.
        if min == 0.0 { max = 1.0; } else { min -= min.abs() * 0.5; max += max.abs() * 0.5; }
    }
    let max_ticks = max_ticks.max(2);
    let range = nice_num(max - min, false);
    let step = nice_num(range / (max_ticks - 1) as f64, true);
    let nice_min = (min / step).floor() * step;
    let nice_max = (max / step).ceil() * step;
    let count = ((nice_max - nice_min) / step).round();
    // Spans wider than f64::MAX defeat the nice-number rounding.
    if !count.is_finite() || count > (2 * max_ticks + 2) as f64 {
        return even_ticks(min, max, max_ticks);
    }
    let count = count as usize;
    let decimals = step_decimals(step);
    let values = (0..=count)
        .map(|i| round_to(nice_min + step * i as f64, decimals))
        .collect();
    Ticks { min: round_to(nice_min, decimals), max: round_to(nice_max, decimals), step, values }
}

fn representable(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(f64::MIN, f64::MAX) }
}

/// `n` ticks spread linearly from `min` to `max`, computed without forming `max - min`.
fn even_ticks(min: f64, max: f64, n: usize) -> Ticks {
    let last = (n - 1) as f64;
    let values = (0..n)
        .map(|i| {
            let t = i as f64 / last;
            min * (1.0 - t) + max * t
        })
        .collect();
    let step = max / last - min / last;
    Ticks { min, max, step: if step.is_finite() { step } else { f64::MAX }, values }
}

/// Fractional digits needed to print multiples of `step` exactly.
pub fn step_decimals(step: f64) -> usize {
    if step >= 1.0 || step <= 0.0 { return 0; }
    (-step.log10().floor()) as usize
}

fn round_to(v: f64, decimals: usize) -> f64 {
    let p = 10f64.powi(decimals as i32);
    let r = (v * p).round() / p;
    if r == 0.0 { 0.0 } else { r }
}

pub fn format_tick(v: f64, step: f64) -> String {
    format!("{:.*}", step_decimals(step), v)
}
